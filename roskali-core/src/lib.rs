//! Core types, route sequencing, and service wiring for the roskali smart
//! waste toolkit.

/// Domain models and identifiers shared by all sources.
pub mod model;
/// Registry and helpers for plugging bin sources into the service.
pub mod plugin;
/// Traits describing the source and classifier interfaces.
pub mod ports;
/// Greedy nearest-neighbor route sequencing.
pub mod route;
/// High-level service facade used by clients.
pub mod service;

pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use route::*;
pub use service::*;
