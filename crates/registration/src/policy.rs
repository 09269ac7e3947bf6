//! Email shape and password policy.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// Hardcoded pattern: compiling it cannot fail.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("hardcoded email regex is invalid")
});

pub const MIN_PASSWORD_LEN: usize = 8;

/// Characters accepted as "special".
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Email shape check (`local@domain.tld`, no whitespace).
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// One of the five independent password checks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordRequirement {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    Symbol,
}

impl PasswordRequirement {
    pub const ALL: [PasswordRequirement; 5] = [
        PasswordRequirement::MinLength,
        PasswordRequirement::Uppercase,
        PasswordRequirement::Lowercase,
        PasswordRequirement::Digit,
        PasswordRequirement::Symbol,
    ];

    pub fn is_met(&self, password: &str) -> bool {
        match self {
            PasswordRequirement::MinLength => password.chars().count() >= MIN_PASSWORD_LEN,
            PasswordRequirement::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            PasswordRequirement::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            PasswordRequirement::Digit => password.chars().any(|c| c.is_ascii_digit()),
            PasswordRequirement::Symbol => password.chars().any(|c| PASSWORD_SYMBOLS.contains(c)),
        }
    }

    /// Checklist label.
    pub fn label(&self) -> &'static str {
        match self {
            PasswordRequirement::MinLength => "Au moins 8 caractères",
            PasswordRequirement::Uppercase => "Une lettre majuscule",
            PasswordRequirement::Lowercase => "Une lettre minuscule",
            PasswordRequirement::Digit => "Un chiffre",
            PasswordRequirement::Symbol => "Un caractère spécial",
        }
    }

    /// Inline form used inside the error sentence.
    pub fn phrase(&self) -> &'static str {
        match self {
            PasswordRequirement::MinLength => "au moins 8 caractères",
            PasswordRequirement::Uppercase => "une lettre majuscule",
            PasswordRequirement::Lowercase => "une lettre minuscule",
            PasswordRequirement::Digit => "un chiffre",
            PasswordRequirement::Symbol => "un caractère spécial",
        }
    }
}

/// Requirements the password fails, in checklist order.
pub fn missing_requirements(password: &str) -> Vec<PasswordRequirement> {
    PasswordRequirement::ALL
        .into_iter()
        .filter(|req| !req.is_met(password))
        .collect()
}

/// Strength indicator shown under the password field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PasswordStrength {
    Weak,
    Medium,
    Strong,
}

impl PasswordStrength {
    pub fn of(password: &str) -> Self {
        let passed = PasswordRequirement::ALL.len() - missing_requirements(password).len();
        match passed {
            0..=2 => PasswordStrength::Weak,
            3..=4 => PasswordStrength::Medium,
            _ => PasswordStrength::Strong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Faible",
            PasswordStrength::Medium => "Moyen",
            PasswordStrength::Strong => "Fort",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(is_valid_email("sophie.martin@student.esst.edu"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("user@host"));
        assert!(!is_valid_email("us er@host.fr"));
        assert!(!is_valid_email("a@@b.fr"));
    }

    #[test]
    fn lowercase_digits_only_lacks_upper_and_symbol() {
        assert_eq!(
            missing_requirements("abc12345"),
            vec![PasswordRequirement::Uppercase, PasswordRequirement::Symbol]
        );
    }

    #[test]
    fn compliant_password_passes_all_five() {
        assert!(missing_requirements("Abc123!@").is_empty());
    }

    #[test]
    fn each_check_is_independent() {
        assert_eq!(missing_requirements("Ab1!"), vec![PasswordRequirement::MinLength]);
        assert_eq!(missing_requirements("abcdef1!"), vec![PasswordRequirement::Uppercase]);
        assert_eq!(missing_requirements("ABCDEF1!"), vec![PasswordRequirement::Lowercase]);
        assert_eq!(missing_requirements("Abcdefg!"), vec![PasswordRequirement::Digit]);
        assert_eq!(missing_requirements("Abcdefg1"), vec![PasswordRequirement::Symbol]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 7 characters, more than 8 bytes.
        assert!(!PasswordRequirement::MinLength.is_met("Éééé1!a"));
    }

    #[test]
    fn strength_buckets() {
        assert_eq!(PasswordStrength::of(""), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::of("abc"), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::of("abc12345"), PasswordStrength::Medium);
        assert_eq!(PasswordStrength::of("Abc123!@"), PasswordStrength::Strong);
        assert_eq!(PasswordStrength::of("Abc123!@").label(), "Fort");
    }
}
