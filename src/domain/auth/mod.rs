// ============================================================================
// Auth Domain - Accounts and the Current Session
// ============================================================================
//
// - Value objects (UserId, Email, User, StoredUser)
// - Errors (AuthError enum)
// - Argon2id credential hashing
// - AuthService (signup, login, logout, restore_session)
//
// ============================================================================

pub mod value_objects;
pub mod errors;
pub mod password;
pub mod service;

pub use value_objects::*;
pub use errors::*;
pub use password::*;
pub use service::*;
