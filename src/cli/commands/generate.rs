//! `passvault generate`: print a random password. Needs no vault.

use crate::cli::output;
use crate::errors::Result;
use crate::vault::analysis::assess_password;
use crate::vault::generator::{generate_password, GeneratorOptions};

/// Execute the `generate` command.
pub fn execute(length: usize, no_symbols: bool, no_digits: bool, no_uppercase: bool) -> Result<()> {
    let options = GeneratorOptions {
        length,
        lowercase: true,
        uppercase: !no_uppercase,
        digits: !no_digits,
        symbols: !no_symbols,
    };
    let password = generate_password(&options)?;

    println!("{}", password.as_str());
    output::print_strength(&assess_password(&password));

    Ok(())
}
