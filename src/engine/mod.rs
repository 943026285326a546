//! Federated query engines
//!
//! The basic engine owns ordered registries of backend handlers per
//! capability, fans every raw query out across them, and resolves rows into
//! catalog entities. The full engine composes compound set-algebraic
//! predicates on top of the basic primitives.

mod basic;
mod full;
mod registry;

pub use basic::BasicQueryEngine;
pub use full::FullQueryEngine;
pub use registry::HandlerRegistry;

use std::time::Duration;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-backend-call timeout; an elapsed call is treated as a backend
    /// failure and degrades to an empty result.
    pub backend_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend_timeout: Duration::from_secs(10),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = timeout;
        self
    }
}
