//! Password strength rules applied at registration.

use std::collections::HashSet;

use lazy_static::lazy_static;
use thiserror::Error;

/// One or more human-readable reasons a password was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .reasons.join(" "))]
pub struct PolicyViolation {
    pub reasons: Vec<String>,
}

pub trait PasswordPolicy: Send + Sync {
    fn validate(&self, password: &str) -> Result<(), PolicyViolation>;
}

lazy_static! {
    static ref COMMON_PASSWORDS: HashSet<&'static str> = [
        "password", "password1", "password123", "passw0rd", "123456", "1234567",
        "12345678", "123456789", "1234567890", "qwerty", "qwerty123", "qwertyuiop",
        "abc123", "111111", "000000", "iloveyou", "admin", "admin123", "welcome",
        "welcome1", "letmein", "monkey", "dragon", "football", "baseball",
        "sunshine", "princess", "trustno1", "superman", "starwars", "master",
        "shadow", "michael", "jennifer", "whatever", "freedom", "zaq12wsx",
        "1q2w3e4r", "1qaz2wsx", "asdfghjkl", "changeme", "secret", "login",
    ]
    .into_iter()
    .collect();
}

/// Minimum length, common-password and all-digits checks. All failing rules
/// are reported together.
#[derive(Debug, Clone)]
pub struct DefaultPasswordPolicy {
    pub min_length: usize,
}

impl Default for DefaultPasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy for DefaultPasswordPolicy {
    fn validate(&self, password: &str) -> Result<(), PolicyViolation> {
        let mut reasons = Vec::new();

        if password.chars().count() < self.min_length {
            reasons.push(format!(
                "This password is too short. It must contain at least {} characters.",
                self.min_length
            ));
        }
        if COMMON_PASSWORDS.contains(password.trim().to_lowercase().as_str()) {
            reasons.push("This password is too common.".to_string());
        }
        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            reasons.push("This password is entirely numeric.".to_string());
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(PolicyViolation { reasons })
        }
    }
}
