//! Passwords
//!
//! Clear text is NFKC-normalized, zeroized on drop and only ever turned
//! into an Argon2id PHC string. The PHC string is what the users table and
//! the activation token carry.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Why a newly chosen password was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters")]
    TooShort { min: usize },

    #[error("Password must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Password cannot be empty")]
    EmptyOrWhitespace,

    #[error("Password contains invalid characters")]
    InvalidCharacter,
}

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

/// Length is counted in characters after normalization; tab and newline are
/// the only control characters allowed.
fn check_policy(password: &str) -> Result<(), PasswordPolicyError> {
    if password.trim().is_empty() {
        return Err(PasswordPolicyError::EmptyOrWhitespace);
    }

    match password.chars().count() {
        n if n < MIN_PASSWORD_LENGTH => Err(PasswordPolicyError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        }),
        n if n > MAX_PASSWORD_LENGTH => Err(PasswordPolicyError::TooLong {
            max: MAX_PASSWORD_LENGTH,
        }),
        _ if password
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\t' | '\n')) =>
        {
            Err(PasswordPolicyError::InvalidCharacter)
        }
        _ => Ok(()),
    }
}

/// Clear text password; not `Clone`, redacted in `Debug`
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// A password being set (registration, password change)
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let password = Self::normalized(raw);
        check_policy(&password.0)?;
        Ok(password)
    }

    /// A password typed at login or as the old password; only the stored
    /// hash decides whether it is right
    pub fn for_verification(raw: String) -> Self {
        Self::normalized(raw)
    }

    fn normalized(mut raw: String) -> Self {
        let normalized = raw.nfkc().collect();
        raw.zeroize();
        Self(normalized)
    }

    /// Argon2id with a fresh salt
    pub fn hash(&self) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)
            .map(|hash| HashedPassword(hash.to_string()))
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClearTextPassword([REDACTED])")
    }
}

/// Argon2id PHC string
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// Accepts only strings that parse as PHC
    pub fn from_phc_string(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = phc.into();
        PasswordHash::new(&phc).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self(phc))
    }

    pub fn as_phc_string(&self) -> &str {
        &self.0
    }

    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        PasswordHash::new(&self.0).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.0.as_bytes(), &parsed)
                .is_ok()
        })
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HashedPassword([HASH])")
    }
}
