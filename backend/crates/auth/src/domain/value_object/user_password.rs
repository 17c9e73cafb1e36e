//! User Password Value Object
//!
//! Domain wrapper over `platform::password`, mapping policy failures to
//! user-facing messages.

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{ClearTextPassword, HashedPassword, PasswordPolicyError};
use std::fmt;

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// A newly chosen password; the policy applies
    pub fn new(raw: String) -> AppResult<Self> {
        // Policy messages are already user-facing
        let clear_text = ClearTextPassword::new(raw)
            .map_err(|e: PasswordPolicyError| AppError::bad_request(e.to_string()))?;

        Ok(Self(clear_text))
    }

    /// A password offered for comparison (login, old password)
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Argon2id PHC string, safe to store and to carry inside an activation token
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword) -> AppResult<Self> {
        let hashed = raw
            .0
            .hash()
            .map_err(|e| AppError::internal("Password hashing failed").with_source(e))?;

        Ok(Self(hashed))
    }

    pub fn from_phc_string(phc_string: impl Into<String>) -> AppResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc_string)
            .map_err(|e| AppError::internal("Invalid password hash").with_source(e))?;

        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(&raw.0)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_password_validation() {
        assert!(RawPassword::new("secret1".to_string()).is_ok());

        let err = RawPassword::new("abc".to_string()).unwrap_err();
        assert_eq!(err.message(), "Password must be at least 6 characters");

        assert!(RawPassword::new("".to_string()).is_err());
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw).unwrap();

        assert!(hashed.verify(&RawPassword::candidate("TestPassword123!".to_string())));
        assert!(!hashed.verify(&RawPassword::candidate("nope".to_string())));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let hashed = UserPassword::from_raw(&raw).unwrap();

        let restored = UserPassword::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&raw));
        assert!(UserPassword::from_phc_string("plain").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Secret"));

        let hashed = UserPassword::from_raw(&raw).unwrap();
        assert!(format!("{:?}", hashed).contains("HASH"));
    }
}
