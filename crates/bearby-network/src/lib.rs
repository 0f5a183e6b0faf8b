//! Network registry for the Bearby wallet core.
//!
//! Keeps, per named network, an ordered list of provider endpoints with a
//! config version, plus a cap on how many providers are exposed at once.
//!
//! - [`config`] — network entries and the built-in templates
//! - [`registry`] — selection, reconfiguration and failover rotation

pub mod config;
pub mod registry;

pub use config::{builtin_networks, is_builtin, NetworkConfig, NetworkEntry};
pub use registry::NetworkRegistry;
