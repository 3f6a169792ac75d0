use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand_core::OsRng;

use super::errors::AuthError;

/// Argon2id hashing with a fresh random salt per credential
///
/// Verification reads its parameters from the stored PHC string, so hashes
/// made with different cost settings keep verifying.
#[derive(Clone, Default)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Cheapest parameters argon2 accepts; only for tests
    #[cfg(test)]
    pub(crate) fn fast() -> Self {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .expect("minimum argon2 params are valid");
        Self::with_params(params)
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!(error = %e, "Argon2 password hashing failed");
                AuthError::Hashing(e.to_string())
            })
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(error = %e, "Stored password hash could not be parsed");
            AuthError::Hashing(e.to_string())
        })?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::Hashing(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = CredentialHasher::fast();
        let hash = hasher.hash("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("secret1", &hash).unwrap());
        assert!(!hasher.verify("secret2", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = CredentialHasher::fast();
        assert_ne!(hasher.hash("secret1").unwrap(), hasher.hash("secret1").unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let hasher = CredentialHasher::fast();
        assert!(matches!(
            hasher.verify("secret1", "not-a-phc-string"),
            Err(AuthError::Hashing(_))
        ));
    }
}
