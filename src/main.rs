use clap::Parser;
use passvault::cli::commands::{
    add, audit_cmd, completions, delete, edit, export, generate, import_cmd, init, list, passwd,
    shell, show, stats,
};
use passvault::cli::{output, Cli, Commands, Context};
use passvault::errors::{ErrorKind, Result};

fn main() {
    let cli = Cli::parse();

    // Commands that never touch a vault.
    let result = match cli.command {
        Commands::Generate {
            length,
            no_symbols,
            no_digits,
            no_uppercase,
        } => Some(generate::execute(length, no_symbols, no_digits, no_uppercase)),
        Commands::Completions { shell } => {
            Some(completions::execute(shell, &mut std::io::stdout()))
        }
        _ => None,
    };

    let result = match result {
        Some(r) => r,
        None => match Context::resolve(&cli) {
            Ok(ctx) => {
                let r = run(&cli, &ctx);
                if let Err(e) = &r {
                    if e.kind() != ErrorKind::UserCancelled {
                        ctx.audit("error", None, Some(&e.to_string()));
                    }
                }
                r
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        if e.kind() == ErrorKind::UserCancelled {
            output::info("Cancelled.");
            return;
        }
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: &Cli, ctx: &Context) -> Result<()> {
    match &cli.command {
        Commands::Init { name } => init::execute(ctx, name.as_deref()),
        Commands::Add {
            name,
            username,
            password,
            url,
            category,
            notes,
            generate,
        } => add::execute(
            ctx,
            add::AddArgs {
                name: name.clone(),
                username: username.clone(),
                password: password.clone(),
                url: url.clone(),
                category: category.clone(),
                notes: notes.clone(),
                generate: *generate,
            },
        ),
        Commands::List {
            search,
            category,
            sort,
            desc,
        } => list::execute(ctx, search.as_deref(), category.as_deref(), *sort, *desc),
        Commands::Show { id, reveal, copy } => show::execute(ctx, id, *reveal, *copy),
        Commands::Edit {
            id,
            name,
            username,
            password,
            url,
            category,
            notes,
        } => edit::execute(
            ctx,
            id,
            edit::EditArgs {
                name: name.clone(),
                username: username.clone(),
                password: password.clone(),
                url: url.clone(),
                category: category.clone(),
                notes: notes.clone(),
            },
        ),
        Commands::Delete { id, force } => delete::execute(ctx, id, *force),
        Commands::Stats => stats::execute(ctx),
        Commands::Export { output } => export::execute(ctx, output.as_deref()),
        Commands::Import { input } => import_cmd::execute(ctx, input),
        Commands::Passwd => passwd::execute(ctx),
        Commands::Shell => shell::execute(ctx),
        Commands::Audit { last, since } => audit_cmd::execute(ctx, *last, since.as_deref()),
        Commands::Generate { .. } | Commands::Completions { .. } => Ok(()),
    }
}
