use crate::error::AppError;
use bcrypt::{hash, verify};

// Hashed once at startup and verified against when a login names an unknown email.
const DUMMY_PASSWORD: &str = "not-a-real-password";

/// bcrypt hashing with a configurable cost factor.
///
/// Also keeps a dummy hash at the same cost so a login for an unknown email spends
/// as long in bcrypt as a login with a wrong password.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Fails if `cost` is outside bcrypt's accepted range (4..=31).
    pub fn new(cost: u32) -> Result<Self, AppError> {
        let dummy_hash = hash(DUMMY_PASSWORD, cost)?;
        Ok(Self { cost, dummy_hash })
    }

    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        Ok(hash(password, self.cost)?)
    }

    pub fn verify_password(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        Ok(verify(password, hashed_password)?)
    }

    /// Runs a verification whose result is thrown away.
    pub fn burn_verification(&self, password: &str) {
        let _ = verify(password, &self.dummy_hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4).unwrap()
    }

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = hasher();
        let password = "test_password123";
        let hashed = hasher.hash_password(password).unwrap();

        assert_ne!(hashed, password);
        assert!(hasher.verify_password(password, &hashed).unwrap());
        assert!(!hasher.verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = hasher();
        let first = hasher.hash_password("same").unwrap();
        let second = hasher.hash_password("same").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_cost_is_applied() {
        let hasher = hasher();
        let hashed = hasher.hash_password("pw").unwrap();
        assert!(hashed.starts_with("$2b$04$"), "unexpected hash prefix: {}", hashed);
    }

    #[test]
    fn test_rejects_invalid_cost() {
        assert!(matches!(
            PasswordHasher::new(2),
            Err(AppError::InternalServerError(_))
        ));
        assert!(PasswordHasher::new(40).is_err());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match hasher().verify_password("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => assert!(!msg.is_empty()),
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
