// Declaro — Password hashing
//
// Argon2id PHC strings for the credential table. The salt is random per hash
// and the cost parameters travel inside the PHC string, so hashes written
// under one configuration still verify after the configuration changes.

use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use super::AuthError;

/// Length of the random salt in bytes.
const SALT_LEN: usize = 16;

/// Single lane; the table is tiny and hashing happens once per call.
const PARALLELISM: u32 = 1;

#[derive(Debug, Clone)]
pub struct CredentialHasher {
    params: Params,
}

impl CredentialHasher {
    /// Build a hasher with explicit Argon2 costs.
    pub fn new(memory_kib: u32, iterations: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, PARALLELISM, None)
            .map_err(|e| AuthError::Hashing(format!("invalid Argon2 params: {}", e)))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password into a PHC string.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt_bytes);

        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| AuthError::Hashing(format!("salt encoding failed: {}", e)))?;

        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Hashing(format!("Argon2id hash failed: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored PHC string.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored)
            .map_err(|e| AuthError::Hashing(format!("malformed stored hash: {}", e)))?;

        match self.argon2().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(format!("Argon2id verify failed: {}", e))),
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> CredentialHasher {
        CredentialHasher::new(Params::MIN_M_COST, 1).unwrap()
    }

    #[test]
    fn test_hash_verifies_same_password() {
        let hasher = cheap();
        let hash = hasher.hash("demo123").unwrap();
        assert!(hasher.verify("demo123", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_does_not_verify() {
        let hasher = cheap();
        let hash = hasher.hash("demo123").unwrap();
        assert!(!hasher.verify("wrong", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = cheap();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b, "Each hash must use a fresh salt");
        assert!(!a.contains("same"), "PHC string must not embed the plaintext");
    }

    #[test]
    fn test_hash_verifies_under_different_costs() {
        let written = cheap().hash("demo123").unwrap();
        let reader = CredentialHasher::new(Params::MIN_M_COST * 2, 2).unwrap();
        assert!(reader.verify("demo123", &written).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = cheap().verify("demo123", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::Hashing(_))));
    }

    #[test]
    fn test_invalid_params_rejected() {
        assert!(CredentialHasher::new(0, 1).is_err());
    }
}
