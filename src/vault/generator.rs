//! Random password generation.

use rand::seq::{IndexedRandom, SliceRandom};
use zeroize::Zeroizing;

use crate::errors::{PassVaultError, Result};

const LOWERCASE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGIT_CHARS: &[u8] = b"0123456789";
const SYMBOL_CHARS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

pub const MIN_LENGTH: usize = 4;
pub const MAX_LENGTH: usize = 128;

/// Which characters a generated password may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub lowercase: bool,
    pub uppercase: bool,
    pub digits: bool,
    pub symbols: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: 20,
            lowercase: true,
            uppercase: true,
            digits: true,
            symbols: true,
        }
    }
}

/// Generate a password satisfying `options`.
///
/// Every enabled class contributes at least one character; the rest are
/// drawn from the union of all enabled classes and the result is shuffled.
pub fn generate_password(options: &GeneratorOptions) -> Result<Zeroizing<String>> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(PassVaultError::Validation(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH}"
        )));
    }

    let classes: Vec<&[u8]> = [
        (options.lowercase, LOWERCASE_CHARS),
        (options.uppercase, UPPERCASE_CHARS),
        (options.digits, DIGIT_CHARS),
        (options.symbols, SYMBOL_CHARS),
    ]
    .into_iter()
    .filter_map(|(enabled, chars)| enabled.then_some(chars))
    .collect();

    if classes.is_empty() {
        return Err(PassVaultError::Validation(
            "at least one character class must be enabled".into(),
        ));
    }

    let charset: Vec<u8> = classes.concat();
    let mut rng = rand::rng();
    let mut bytes = Zeroizing::new(Vec::<u8>::with_capacity(options.length));

    for class in &classes {
        bytes.extend(class.choose(&mut rng));
    }
    while bytes.len() < options.length {
        bytes.extend(charset.choose(&mut rng));
    }
    bytes.shuffle(&mut rng);

    // All charsets are ASCII.
    let password: String = bytes.iter().map(|&b| char::from(b)).collect();
    Ok(Zeroizing::new(password))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_cover_every_class() {
        for _ in 0..20 {
            let pw = generate_password(&GeneratorOptions::default()).unwrap();
            assert_eq!(pw.len(), 20);
            assert!(pw.chars().any(|c| c.is_ascii_lowercase()));
            assert!(pw.chars().any(|c| c.is_ascii_uppercase()));
            assert!(pw.chars().any(|c| c.is_ascii_digit()));
            assert!(pw.bytes().any(|b| SYMBOL_CHARS.contains(&b)));
        }
    }

    #[test]
    fn digits_only() {
        let options = GeneratorOptions {
            length: 12,
            lowercase: false,
            uppercase: false,
            digits: true,
            symbols: false,
        };
        let pw = generate_password(&options).unwrap();
        assert_eq!(pw.len(), 12);
        assert!(pw.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn rejects_out_of_range_length() {
        let short = GeneratorOptions {
            length: 3,
            ..GeneratorOptions::default()
        };
        assert!(generate_password(&short).is_err());

        let long = GeneratorOptions {
            length: 129,
            ..GeneratorOptions::default()
        };
        assert!(generate_password(&long).is_err());
    }

    #[test]
    fn rejects_no_classes() {
        let options = GeneratorOptions {
            length: 10,
            lowercase: false,
            uppercase: false,
            digits: false,
            symbols: false,
        };
        assert!(generate_password(&options).is_err());
    }

    #[test]
    fn passwords_differ() {
        let a = generate_password(&GeneratorOptions::default()).unwrap();
        let b = generate_password(&GeneratorOptions::default()).unwrap();
        assert_ne!(*a, *b);
    }
}
