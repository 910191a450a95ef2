//! Password strength scoring and vault health statistics.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use super::credential::Credential;
use crate::crypto;

/// Passwords not changed for longer than this count as old.
pub const OLD_PASSWORD_DAYS: i64 = 90;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "12345678", "qwerty", "letmein", "welcome", "admin", "iloveyou",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthLevel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl std::fmt::Display for StrengthLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Weak => "weak",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Strong => "strong",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordStrength {
    /// 0..=7: one point per length threshold (8, 12, 16) and per
    /// character class present.
    pub score: u8,
    pub level: StrengthLevel,
    pub feedback: Vec<String>,
}

/// Score a password.
pub fn assess_password(password: &str) -> PasswordStrength {
    let mut score = 0u8;
    let mut feedback = Vec::new();
    let len = password.chars().count();

    for threshold in [8, 12, 16] {
        if len >= threshold {
            score += 1;
        }
    }
    if len < 12 {
        feedback.push("Use at least 12 characters".to_string());
    }

    let classes = [
        (password.chars().any(|c| c.is_lowercase()), "Add lowercase letters"),
        (password.chars().any(|c| c.is_uppercase()), "Add uppercase letters"),
        (password.chars().any(|c| c.is_ascii_digit()), "Add digits"),
        (
            password.chars().any(|c| !c.is_alphanumeric()),
            "Add symbols",
        ),
    ];
    for (present, hint) in classes {
        if present {
            score += 1;
        } else {
            feedback.push(hint.to_string());
        }
    }

    let lowered = password.to_lowercase();
    let common = COMMON_PASSWORDS.iter().any(|p| lowered.contains(p));
    if common {
        feedback.push("Avoid common passwords and patterns".to_string());
    }

    let level = if common || score <= 3 {
        StrengthLevel::Weak
    } else if score <= 4 {
        StrengthLevel::Fair
    } else if score <= 5 {
        StrengthLevel::Good
    } else {
        StrengthLevel::Strong
    };

    PasswordStrength {
        score,
        level,
        feedback,
    }
}

/// Aggregate health figures for a credential list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultStats {
    pub total_credentials: usize,
    pub categories_count: usize,
    pub last_modified: Option<DateTime<Utc>>,
    pub weak_passwords: usize,
    /// Credentials whose password is shared with at least one other.
    pub duplicate_passwords: usize,
    pub old_passwords: usize,
}

impl VaultStats {
    pub fn compute(credentials: &[Credential], now: DateTime<Utc>) -> Self {
        let categories: HashSet<&str> = credentials
            .iter()
            .map(|c| c.category.as_str())
            .filter(|c| !c.is_empty())
            .collect();

        // Compare digests rather than keeping extra plaintext copies around.
        let mut by_hash: HashMap<String, usize> = HashMap::new();
        for c in credentials {
            *by_hash.entry(crypto::hash(&c.password)).or_default() += 1;
        }
        let duplicate_passwords: usize = by_hash.values().filter(|&&n| n > 1).sum();

        let cutoff = now - Duration::days(OLD_PASSWORD_DAYS);

        Self {
            total_credentials: credentials.len(),
            categories_count: categories.len(),
            last_modified: credentials.iter().map(|c| c.updated_at).max(),
            weak_passwords: credentials
                .iter()
                .filter(|c| assess_password(&c.password).level == StrengthLevel::Weak)
                .count(),
            duplicate_passwords,
            old_passwords: credentials.iter().filter(|c| c.updated_at < cutoff).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::credential::CredentialDraft;

    fn credential(name: &str, password: &str, category: &str, at: DateTime<Utc>) -> Credential {
        let draft = CredentialDraft {
            name: name.into(),
            username: "user".into(),
            password: password.into(),
            url: String::new(),
            notes: String::new(),
            category: category.into(),
        };
        Credential::new(&draft, at).unwrap()
    }

    #[test]
    fn short_simple_password_is_weak() {
        let s = assess_password("abc");
        assert_eq!(s.level, StrengthLevel::Weak);
        assert!(!s.feedback.is_empty());
    }

    #[test]
    fn common_password_is_weak_regardless_of_score() {
        assert_eq!(
            assess_password("Password123456!").level,
            StrengthLevel::Weak
        );
    }

    #[test]
    fn long_mixed_password_is_strong() {
        let s = assess_password("v7#Qm!x2Lp9@Rt4Zk");
        assert_eq!(s.score, 7);
        assert_eq!(s.level, StrengthLevel::Strong);
        assert!(s.feedback.is_empty());
    }

    #[test]
    fn medium_password_levels() {
        // 8 chars, lower + digit: 1 + 2 = 3
        assert_eq!(assess_password("abcd1234").level, StrengthLevel::Weak);
        // 12 chars, lower + upper + digit: 2 + 3 = 5
        assert_eq!(assess_password("Abcdefgh1234").level, StrengthLevel::Good);
    }

    #[test]
    fn stats_count_duplicates_weak_and_old() {
        let now = Utc::now();
        let old = now - Duration::days(OLD_PASSWORD_DAYS + 1);
        let creds = vec![
            credential("a", "v7#Qm!x2Lp9@Rt4Zk", "Work", now),
            credential("b", "v7#Qm!x2Lp9@Rt4Zk", "Email", now),
            credential("c", "abc", "Work", old),
        ];

        let stats = VaultStats::compute(&creds, now);
        assert_eq!(stats.total_credentials, 3);
        assert_eq!(stats.categories_count, 2);
        assert_eq!(stats.duplicate_passwords, 2);
        assert_eq!(stats.weak_passwords, 1);
        assert_eq!(stats.old_passwords, 1);
        assert_eq!(stats.last_modified, Some(now));
    }

    #[test]
    fn stats_of_empty_vault() {
        let stats = VaultStats::compute(&[], Utc::now());
        assert_eq!(stats.total_credentials, 0);
        assert_eq!(stats.last_modified, None);
    }
}
