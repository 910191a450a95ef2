//! `passvault list`: display credentials in a table.

use crate::cli::output;
use crate::cli::{Context, SortArg};
use crate::errors::Result;
use crate::vault::{SearchFilter, SortOrder};

/// Execute the `list` command.
pub fn execute(
    ctx: &Context,
    search: Option<&str>,
    category: Option<&str>,
    sort: SortArg,
    desc: bool,
) -> Result<()> {
    let session = ctx.open_session()?;

    let filter = SearchFilter {
        term: search.unwrap_or_default().to_string(),
        category: category.map(str::to_string),
        sort_by: sort.into(),
        order: if desc { SortOrder::Desc } else { SortOrder::Asc },
    };
    let matches = session.filter(&filter)?;
    let total = session.credentials()?.len();

    if matches.len() == total {
        output::info(&format!("{}: {total} credential(s)", session.name()?));
    } else {
        output::info(&format!(
            "{}: {} of {total} credential(s) match",
            session.name()?,
            matches.len()
        ));
    }

    output::print_credentials_table(&matches);

    Ok(())
}
