// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each area has its own subdirectory:
// - auth: accounts, credentials and the current session
// - order: fuel orders, pricing and payment
// - station: nearby stations and their posted prices
//
// Persistence goes through `crate::storage`; nothing here knows which
// backend is in use.
//
// ============================================================================

pub mod auth;
pub mod order;
pub mod station;
