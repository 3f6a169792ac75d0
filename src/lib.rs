// ============================================================================
// Fuel delivery ordering core
// ============================================================================
//
// - storage: slot-based key/value persistence (memory or JSON files)
// - domain: auth, orders and stations
// - context: collaborators shared by the services
// - notify / metrics: user-facing notifications and Prometheus counters
// - config: environment-driven settings
//
// ============================================================================

pub mod config;
pub mod context;
pub mod domain;
pub mod metrics;
pub mod notify;
pub mod storage;

pub use config::{AppConfig, ConfigError};
pub use context::ServiceContext;
pub use domain::auth::{AuthError, AuthService, User, UserId};
pub use domain::order::{
    FuelOrder, FuelType, NewOrder, OrderError, OrderId, OrderService, OrderStatus, PaymentMethod,
    PaymentStatus, TransitionPolicy,
};
pub use domain::station::{FuelStation, StationDirectory};
pub use metrics::Metrics;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StoreError};
