// === PUBLIC CONTRACT ===
// Other crates should only depend on the contract module
pub mod contract;

pub use contract::{client, error, model};

// === MODULE DEFINITION ===
pub mod module;
pub use module::RepairsModule;

// === INTERNAL MODULES ===
// Exposed for integration tests. Use `contract` for stable APIs.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod gateways;
#[doc(hidden)]
pub mod infra;
