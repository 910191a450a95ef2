//! `passvault shell`: interactive session on one unlocked vault.
//!
//! The vault stays unlocked between commands until `lock`, `exit`, or the
//! idle timeout from `lock_timeout_minutes`. A locked shell asks for the
//! master password again before running the next command.
//!
//!   passvault> list mail
//!   passvault> show 3f2c...
//!   passvault> lock

use std::io::{self, BufRead, BufReader, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use chrono::Utc;

use crate::cli::commands::show::copy_to_clipboard;
use crate::cli::output;
use crate::cli::Context;
use crate::crypto::CryptoProvider;
use crate::errors::Result;
use crate::vault::analysis::VaultStats;
use crate::vault::{SearchFilter, Session, VaultResource};

/// Wrong-password attempts allowed when unlocking.
const UNLOCK_ATTEMPTS: usize = 3;

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Lock,
    Exit,
}

/// What arrived while waiting at the prompt.
#[derive(Debug)]
enum Input {
    Line(io::Result<String>),
    /// The idle timer ran out and the session was locked.
    Idle,
    /// Input is exhausted.
    Closed,
}

/// Reads lines on a background thread, one per request, so the prompt
/// can wait with a deadline. Nothing is read from the input unless a line
/// has been asked for, which leaves the terminal free for password prompts.
struct LineReader {
    requests: Sender<()>,
    lines: Receiver<io::Result<String>>,
    pending: bool,
}

impl LineReader {
    fn spawn<B: BufRead + Send + 'static>(mut input: B) -> Self {
        let (requests, request_rx) = mpsc::channel::<()>();
        let (line_tx, lines) = mpsc::channel();

        thread::spawn(move || {
            while request_rx.recv().is_ok() {
                let mut line = String::new();
                match input.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if line_tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = line_tx.send(Err(e));
                        break;
                    }
                }
            }
        });

        Self {
            requests,
            lines,
            pending: false,
        }
    }

    /// Next line, waiting at most `timeout` (forever when `None`).
    fn next(&mut self, timeout: Option<Duration>) -> Input {
        if !self.pending {
            if self.requests.send(()).is_err() {
                return Input::Closed;
            }
            self.pending = true;
        }

        let received = match timeout {
            Some(wait) => self.lines.recv_timeout(wait),
            None => self.lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok(line) => {
                self.pending = false;
                Input::Line(line)
            }
            Err(RecvTimeoutError::Timeout) => Input::Idle,
            Err(RecvTimeoutError::Disconnected) => Input::Closed,
        }
    }
}

/// Wait for the next line, locking `session` as soon as its idle timer
/// runs out even if nothing is typed.
fn next_input<R: VaultResource, P: CryptoProvider>(
    session: &mut Session<R, P>,
    reader: &mut LineReader,
) -> Input {
    loop {
        let wait = if session.is_locked() {
            None
        } else {
            session.auto_lock().remaining()
        };
        match reader.next(wait) {
            Input::Idle => {
                if session.lock_if_idle() {
                    return Input::Idle;
                }
            }
            other => return other,
        }
    }
}

/// Call `open` until it succeeds, fails for a reason other than a wrong
/// password, or runs out of attempts.
fn unlock_with_retries<S>(mut open: impl FnMut() -> Result<S>) -> Result<S> {
    let mut attempt = 1;
    loop {
        match open() {
            Err(e) if e.kind().is_retryable() && attempt < UNLOCK_ATTEMPTS => {
                output::error(&e.to_string());
                attempt += 1;
            }
            result => return result,
        }
    }
}

/// Execute the `shell` command.
pub fn execute(ctx: &Context) -> Result<()> {
    let mut session = unlock_with_retries(|| ctx.open_session())?;
    match session.auto_lock().timeout() {
        Some(t) => output::info(&format!(
            "Vault '{}' unlocked. Locks after {} minute(s) idle. Type `help` for commands.",
            session.name()?,
            t.as_secs() / 60
        )),
        None => output::info(&format!(
            "Vault '{}' unlocked. Type `help` for commands.",
            session.name()?
        )),
    }

    let mut reader = LineReader::spawn(BufReader::new(io::stdin()));
    loop {
        print!("passvault> ");
        io::stdout().flush()?;

        let line = match next_input(&mut session, &mut reader) {
            Input::Line(line) => line?,
            Input::Idle => {
                println!();
                ctx.audit("locked", None, Some("idle timeout"));
                output::warning("Vault locked after inactivity. Enter a command to unlock.");
                continue;
            }
            Input::Closed => break,
        };

        if session.is_locked() {
            session = unlock_with_retries(|| ctx.open_session())?;
        }

        match run_command(&session, line.trim(), ctx.settings.clipboard) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Lock) => {
                session.lock();
                ctx.audit("locked", None, Some("locked by user"));
                output::success("Vault locked.");
            }
            Ok(Flow::Exit) => break,
            Err(e) => output::error(&e.to_string()),
        }
    }

    if !session.is_locked() {
        session.lock();
        ctx.audit("locked", None, Some("shell closed"));
    }
    Ok(())
}

/// Run one shell line against an unlocked session.
fn run_command<R: VaultResource, P: CryptoProvider>(
    session: &Session<R, P>,
    line: &str,
    clipboard: bool,
) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" | "?" => print_help(),
        "list" | "ls" => {
            let filter = SearchFilter {
                term: arg.to_string(),
                ..SearchFilter::default()
            };
            output::print_credentials_table(&session.filter(&filter)?);
        }
        "show" => output::print_credential(session.get(arg)?, false),
        "reveal" => output::print_credential(session.get(arg)?, true),
        "copy" => {
            if !clipboard {
                output::warning("Clipboard access is disabled in .passvault.toml.");
            } else {
                copy_to_clipboard(&session.get(arg)?.password)?;
                output::success("Password copied to clipboard.");
            }
        }
        "categories" => {
            for category in session.categories()? {
                println!("{category}");
            }
        }
        "stats" => {
            let stats = VaultStats::compute(session.credentials()?, Utc::now());
            output::print_stats(session.name()?, &stats);
        }
        "lock" => return Ok(Flow::Lock),
        "exit" | "quit" => return Ok(Flow::Exit),
        other => output::warning(&format!("Unknown command '{other}'. Type `help`.")),
    }
    Ok(Flow::Continue)
}

fn print_help() {
    println!("  list [TERM]     list credentials, optionally filtered");
    println!("  show <ID>       show a credential (password masked)");
    println!("  reveal <ID>     show a credential with its password");
    println!("  copy <ID>       copy a password to the clipboard");
    println!("  categories      list categories in use");
    println!("  stats           vault health summary");
    println!("  lock            lock the vault now");
    println!("  exit            lock and leave the shell");
}
