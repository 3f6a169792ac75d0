use crate::storage::StoreError;

// ============================================================================
// Auth Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Credential hashing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "validation",
            AuthError::DuplicateEmail(_) => "duplicate_email",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Storage(_) => "storage",
            AuthError::Hashing(_) => "hashing",
        }
    }
}
