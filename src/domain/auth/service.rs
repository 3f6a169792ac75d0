use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::instrument;

use crate::context::ServiceContext;
use crate::notify::Notification;
use crate::storage::{slots, Collection, StoreError};

use super::errors::AuthError;
use super::password::CredentialHasher;
use super::value_objects::{Email, StoredUser, User, UserId};

// ============================================================================
// Auth Service
// ============================================================================
//
// Session state machine:
//   Unauthenticated --signup/login--> Authenticated
//   Authenticated --logout/failed restore--> Unauthenticated
//
// The session lives in memory and is mirrored to the `currentUser` slot so a
// later process can restore it. Passwords never leave this module unhashed.
//
// ============================================================================

const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService {
    ctx: ServiceContext,
    users: Collection<StoredUser>,
    hasher: CredentialHasher,
    current: RwLock<Option<User>>,
    write_lock: Mutex<()>,
}

impl AuthService {
    pub fn new(ctx: ServiceContext) -> Self {
        let users = Collection::new(ctx.store.clone(), slots::USERS);
        Self {
            ctx,
            users,
            hasher: CredentialHasher::default(),
            current: RwLock::new(None),
            write_lock: Mutex::new(()),
        }
    }

    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        self.ctx.simulate_latency().await;

        let result = self.register(name, email, password).await;
        self.ctx.metrics.record_auth_attempt("signup", result.is_ok());
        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "✅ Account created");
                self.ctx
                    .notifier
                    .notify(Notification::success("Account created successfully"));
                Ok(user)
            }
            Err(e) => self.fail(e),
        }
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Please fill in all fields".to_string()));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let email = Email::parse(email)?;

        let _guard = self.write_lock.lock().await;
        let mut users = self.users.load().await?;
        if users.iter().any(|u| u.email_matches(&email)) {
            return Err(AuthError::DuplicateEmail(email.to_string()));
        }

        let password_hash = self.hash_blocking(password).await?;
        let stored = StoredUser {
            id: UserId::generate(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: Some(password_hash),
            legacy_password: None,
            created_at: Utc::now(),
        };
        let user = stored.sanitized();

        users.push(stored);
        self.users.save(&users).await?;
        self.establish_session(&user).await?;

        Ok(user)
    }

    #[instrument(skip_all, fields(email = %email.trim()))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.ctx.simulate_latency().await;

        let result = self.authenticate(email, password).await;
        self.ctx.metrics.record_auth_attempt("login", result.is_ok());
        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "✅ Logged in");
                self.ctx
                    .notifier
                    .notify(Notification::success("Logged in successfully"));
                Ok(user)
            }
            Err(e) => self.fail(e),
        }
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<User, AuthError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::Validation("Please fill in all fields".to_string()));
        }
        let email = Email::normalized(email);

        let _guard = self.write_lock.lock().await;
        let mut users = self.users.load().await?;
        let Some(index) = users.iter().position(|u| u.email_matches(&email)) else {
            return Err(AuthError::InvalidCredentials);
        };

        let stored = &users[index];
        let verified = match (&stored.password_hash, &stored.legacy_password) {
            (Some(hash), _) => self.verify_blocking(password, hash).await?,
            (None, Some(plain)) => plain == password,
            (None, None) => false,
        };
        if !verified {
            return Err(AuthError::InvalidCredentials);
        }

        if users[index].password_hash.is_none() {
            tracing::info!(user_id = %users[index].id, "Upgrading plaintext credential to argon2id");
            let hash = self.hash_blocking(password).await?;
            users[index].password_hash = Some(hash);
            users[index].legacy_password = None;
            self.users.save(&users).await?;
        }

        let user = users[index].sanitized();
        self.establish_session(&user).await?;
        Ok(user)
    }

    /// Drops the session; the slot is cleared even when nobody was signed in
    #[instrument(skip_all)]
    pub async fn logout(&self) -> Result<(), AuthError> {
        *self.current.write().await = None;
        self.ctx.metrics.set_session_active(false);

        if let Err(e) = self.ctx.store.remove(slots::CURRENT_USER).await {
            return self.fail(e.into());
        }

        tracing::info!("Logged out");
        self.ctx.notifier.notify(Notification::info("Logged out"));
        Ok(())
    }

    /// Load the persisted session, if any
    ///
    /// A slot that does not parse is cleared. Nothing here is reported to the
    /// caller as an error.
    #[instrument(skip_all)]
    pub async fn restore_session(&self) -> Option<User> {
        let raw = match self.ctx.store.get(slots::CURRENT_USER).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return self.clear_in_memory_session().await,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored session");
                return self.clear_in_memory_session().await;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "Session restored");
                *self.current.write().await = Some(user.clone());
                self.ctx.metrics.set_session_active(true);
                Some(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored session is malformed, clearing it");
                if let Err(e) = self.ctx.store.remove(slots::CURRENT_USER).await {
                    tracing::warn!(error = %e, "Could not clear malformed session");
                }
                self.clear_in_memory_session().await
            }
        }
    }

    async fn clear_in_memory_session(&self) -> Option<User> {
        *self.current.write().await = None;
        self.ctx.metrics.set_session_active(false);
        None
    }

    async fn establish_session(&self, user: &User) -> Result<(), AuthError> {
        let raw = serde_json::to_string(user).map_err(|source| StoreError::Serialization {
            slot: slots::CURRENT_USER.to_string(),
            source,
        })?;
        self.ctx.store.set(slots::CURRENT_USER, raw).await?;

        *self.current.write().await = Some(user.clone());
        self.ctx.metrics.set_session_active(true);
        Ok(())
    }

    async fn hash_blocking(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    async fn verify_blocking(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))?
    }

    fn fail<T>(&self, error: AuthError) -> Result<T, AuthError> {
        tracing::warn!(error = %error, kind = error.kind(), "Auth operation failed");
        self.ctx.metrics.record_error("auth", error.kind());
        self.ctx.notifier.notify(Notification::error(error.to_string()));
        Err(error)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use crate::notify::{NotificationLevel, RecordingNotifier};
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    struct Harness {
        service: AuthService,
        store: Arc<MemoryStore>,
        notifier: Arc<RecordingNotifier>,
        ctx: ServiceContext,
    }

    fn harness_with_store(store: Arc<MemoryStore>) -> Harness {
        let notifier = Arc::new(RecordingNotifier::new());
        let ctx = ServiceContext::new(store.clone(), notifier.clone(), Arc::new(Metrics::new().unwrap()));
        Harness {
            service: AuthService::new(ctx.clone()).with_hasher(CredentialHasher::fast()),
            store,
            notifier,
            ctx,
        }
    }

    fn harness() -> Harness {
        harness_with_store(Arc::new(MemoryStore::new()))
    }

    async fn stored_users(store: &MemoryStore) -> Vec<serde_json::Value> {
        let raw = store.get(slots::USERS).await.unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[tokio::test]
    async fn test_signup_creates_user_and_session() {
        let h = harness();

        let user = h.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();
        assert_eq!(user.email.as_str(), "x@y.com");
        assert_eq!(h.service.current_user().await, Some(user.clone()));

        let users = stored_users(&h.store).await;
        assert_eq!(users.len(), 1);
        assert!(users[0]["passwordHash"].as_str().unwrap().starts_with("$argon2id$"));
        assert!(users[0].get("password").is_none());

        let session = h.store.get(slots::CURRENT_USER).await.unwrap().unwrap();
        let session: serde_json::Value = serde_json::from_str(&session).unwrap();
        assert!(session.get("passwordHash").is_none());
        assert_eq!(session["id"], user.id.as_str());

        assert_eq!(h.notifier.last().unwrap().message, "Account created successfully");
        assert_eq!(h.ctx.metrics.active_session.get(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_signup_rejected() {
        let h = harness();
        h.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();

        let err = h.service.signup("Other", " X@Y.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail(_)));
        assert_eq!(stored_users(&h.store).await.len(), 1);

        let last = h.notifier.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.message, "Email already exists");
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let h = harness();

        let err = h.service.signup("", "x@y.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Please fill in all fields");

        let err = h.service.signup("Ravi", "x@y.com", "12345").await.unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");

        let err = h.service.signup("Ravi", "no-at-sign", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        assert!(h.store.get(slots::USERS).await.unwrap().is_none());
        assert!(!h.service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let h = harness();
        h.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();
        h.service.logout().await.unwrap();

        let err = h.service.login("x@y.com", "wrong-password").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!h.service.is_authenticated().await);
        assert!(h.store.get(slots::CURRENT_USER).await.unwrap().is_none());
        assert_eq!(h.notifier.last().unwrap().message, "Invalid email or password");
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let h = harness();
        let err = h.service.login("nobody@y.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_is_case_insensitive_on_email() {
        let h = harness();
        let created = h.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();
        h.service.logout().await.unwrap();

        let user = h.service.login("  X@Y.COM ", "secret1").await.unwrap();
        assert_eq!(user.id, created.id);
        assert!(h.service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let h = harness();
        h.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();

        h.service.logout().await.unwrap();
        assert!(h.service.current_user().await.is_none());
        assert!(h.store.get(slots::CURRENT_USER).await.unwrap().is_none());

        let last = h.notifier.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Info);
        assert_eq!(h.ctx.metrics.active_session.get(), 0);

        // no session at all is fine too
        h.service.logout().await.unwrap();
    }

    #[tokio::test]
    async fn test_restore_session_from_another_service() {
        let store = Arc::new(MemoryStore::new());
        let first = harness_with_store(store.clone());
        let user = first.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();

        let second = harness_with_store(store);
        assert_eq!(second.service.restore_session().await, Some(user.clone()));
        assert_eq!(second.service.current_user().await, Some(user));
    }

    #[tokio::test]
    async fn test_restore_malformed_session_clears_slot() {
        let h = harness();
        h.store
            .set(slots::CURRENT_USER, "{not json".to_string())
            .await
            .unwrap();

        assert!(h.service.restore_session().await.is_none());
        assert!(h.store.get(slots::CURRENT_USER).await.unwrap().is_none());
        assert!(h.notifier.entries().is_empty());
    }

    #[tokio::test]
    async fn test_restore_without_session() {
        let h = harness();
        assert!(h.service.restore_session().await.is_none());
        assert!(!h.service.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_legacy_plaintext_credential_upgraded_on_login() {
        let h = harness();
        let legacy = r#"[{
            "id": "user-1700000000000-1",
            "name": "Old Account",
            "email": "old@y.com",
            "password": "secret1",
            "createdAt": "2024-03-01T10:00:00Z"
        }]"#;
        h.store.set(slots::USERS, legacy.to_string()).await.unwrap();

        let err = h.service.login("old@y.com", "secret2").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let user = h.service.login("old@y.com", "secret1").await.unwrap();
        assert_eq!(user.id.as_str(), "user-1700000000000-1");

        let users = stored_users(&h.store).await;
        assert!(users[0].get("password").is_none());
        assert!(users[0]["passwordHash"].as_str().unwrap().starts_with("$argon2id$"));

        h.service.logout().await.unwrap();
        assert!(h.service.login("old@y.com", "secret1").await.is_ok());
    }

    #[tokio::test]
    async fn test_auth_metrics() {
        let h = harness();
        h.service.signup("Ravi", "x@y.com", "secret1").await.unwrap();
        let _ = h.service.login("x@y.com", "nope-nope").await;

        let attempts = &h.ctx.metrics.auth_attempts;
        assert_eq!(attempts.with_label_values(&["signup", "success"]).get(), 1);
        assert_eq!(attempts.with_label_values(&["login", "failure"]).get(), 1);
        assert_eq!(
            h.ctx
                .metrics
                .service_errors
                .with_label_values(&["auth", "invalid_credentials"])
                .get(),
            1
        );
    }
}
