use crate::utils::error::{Result, TradeError};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use once_cell::sync::Lazy;
use rand::rngs::OsRng;

const COMMON_PASSWORDS: &[&str] = &[
    "password", "password1", "password123", "123456789", "12345678", "qwerty123",
    "qwertyuiop", "iloveyou", "sunshine", "princess", "football", "baseball",
    "welcome1", "letmein1", "admin123", "passw0rd", "trustno1", "1q2w3e4r",
    "abc12345", "zaq12wsx", "starwars", "whatever", "superman", "changeme",
];

/// Hash checked when a login names an unknown user, so both paths cost the same.
static DUMMY_HASH: Lazy<Option<String>> =
    Lazy::new(|| hash_password("trade-network-placeholder").ok());

/// Argon2id hash in PHC string form (`$argon2id$v=19$...`).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| TradeError::PasswordHashError {
            message: e.to_string(),
        })
}

pub fn verify_password(password: &str, encoded: &str) -> bool {
    match PasswordHash::new(encoded) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Runs the hash on the blocking pool; argon2 is deliberately slow.
pub async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| TradeError::PasswordHashError {
            message: e.to_string(),
        })?
}

/// Verifies on the blocking pool. `None` checks against a placeholder hash
/// and always fails.
pub async fn verify_password_blocking(password: String, encoded: Option<String>) -> bool {
    tokio::task::spawn_blocking(move || match encoded {
        Some(encoded) => verify_password(&password, &encoded),
        None => {
            if let Some(dummy) = DUMMY_HASH.as_deref() {
                let _ = verify_password(&password, dummy);
            }
            false
        }
    })
    .await
    .unwrap_or(false)
}

/// Rules a new password must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    pub min_length: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self { min_length: 8 }
    }
}

impl PasswordPolicy {
    pub fn new(min_length: usize) -> Self {
        Self { min_length }
    }

    pub fn check(&self, field: &str, password: &str, username: &str) -> Result<()> {
        if password.chars().count() < self.min_length {
            return Err(TradeError::validation(
                field,
                format!(
                    "This password is too short. It must contain at least {} characters",
                    self.min_length
                ),
            ));
        }

        if password.chars().all(|c| c.is_ascii_digit()) {
            return Err(TradeError::validation(field, "This password is entirely numeric"));
        }

        let lowered = password.to_lowercase();
        if COMMON_PASSWORDS.contains(&lowered.as_str()) {
            return Err(TradeError::validation(field, "This password is too common"));
        }

        let username = username.to_lowercase();
        if username.chars().count() >= 3
            && (lowered.contains(&username) || username.contains(&lowered))
        {
            return Err(TradeError::validation(
                field,
                "The password is too similar to the username",
            ));
        }

        Ok(())
    }
}
