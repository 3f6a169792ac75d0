// ============================================================================
// Order Domain - Fuel Order Lifecycle and Payment
// ============================================================================
//
// This module contains ALL order-specific code:
// - Value objects (OrderId, FuelType, OrderStatus, PaymentStatus, PaymentMethod)
// - Commands (UpdateStatus, Pay)
// - Errors (OrderError enum)
// - FuelOrder record with its transition rules
// - Pricing, payment details and history search
// - OrderService (load → check → mutate → save)
//
// ============================================================================

pub mod value_objects;
pub mod commands;
pub mod errors;
pub mod fuel_order;
pub mod pricing;
pub mod payment;
pub mod search;
pub mod service;

// Re-export for convenience
pub use value_objects::*;
pub use commands::*;
pub use errors::*;
pub use fuel_order::*;
pub use pricing::*;
pub use payment::*;
pub use search::*;
pub use service::*;
