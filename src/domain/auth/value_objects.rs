use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

// ============================================================================
// Auth Value Objects
// ============================================================================

/// Opaque user identifier; compared byte-for-byte
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Email address, trimmed and lowercased
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Normalize without validating (for lookups)
    pub fn normalized(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Normalize and require something that looks like an address
    pub fn parse(raw: &str) -> Result<Self, AuthError> {
        let email = Self::normalized(raw);
        if email.0.is_empty() {
            return Err(AuthError::Validation("Please fill in all fields".to_string()));
        }
        match email.0.split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
            _ => Err(AuthError::Validation(format!("Invalid email address: {}", raw.trim()))),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The signed-in user as seen by callers and kept in the session slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

/// Persisted user record, including the credential
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Plaintext written by older clients; replaced by a hash on next login
    #[serde(default, rename = "password", skip_serializing_if = "Option::is_none")]
    pub legacy_password: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn email_matches(&self, email: &Email) -> bool {
        Email::normalized(&self.email) == *email
    }

    /// The record minus its credential
    pub fn sanitized(&self) -> User {
        User {
            id: self.id.clone(),
            name: self.name.clone(),
            email: Email::normalized(&self.email),
            created_at: self.created_at,
        }
    }
}

// Credentials stay out of logs
impl fmt::Debug for StoredUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("has_hash", &self.password_hash.is_some())
            .field("has_legacy_password", &self.legacy_password.is_some())
            .field("created_at", &self.created_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_normalization() {
        let email = Email::parse("  X@Y.com ").unwrap();
        assert_eq!(email.as_str(), "x@y.com");
        assert_eq!(Email::normalized("X@y.COM"), email);
    }

    #[test]
    fn test_email_validation() {
        assert!(matches!(Email::parse(""), Err(AuthError::Validation(_))));
        assert!(matches!(Email::parse("not-an-email"), Err(AuthError::Validation(_))));
        assert!(matches!(Email::parse("@y.com"), Err(AuthError::Validation(_))));
        assert!(matches!(Email::parse("x@"), Err(AuthError::Validation(_))));
    }

    #[test]
    fn test_legacy_plaintext_record_loads() {
        let json = r#"{
            "id": "user-1700000000000-7",
            "name": "Ravi",
            "email": "Ravi@Example.com",
            "password": "secret1",
            "createdAt": "2024-03-01T10:00:00.000Z"
        }"#;

        let user: StoredUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.legacy_password.as_deref(), Some("secret1"));
        assert!(user.password_hash.is_none());
        assert!(user.email_matches(&Email::normalized("ravi@example.com")));
        assert_eq!(user.sanitized().email.as_str(), "ravi@example.com");
    }

    #[test]
    fn test_debug_hides_credentials() {
        let user = StoredUser {
            id: UserId::from("u1"),
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password_hash: Some("$argon2id$secret".to_string()),
            legacy_password: Some("hunter2".to_string()),
            created_at: Utc::now(),
        };

        let printed = format!("{user:?}");
        assert!(!printed.contains("argon2id"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_sanitized_user_has_no_credential_field() {
        let user = StoredUser {
            id: UserId::from("u1"),
            name: "Ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password_hash: Some("hash".to_string()),
            legacy_password: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.sanitized()).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "ravi@example.com");
    }
}
