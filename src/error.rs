//! Simulation error types
//!
//! Allocation and capacity errors bubble up through `add_*` calls to the
//! spawning code. Invariant violations indicate a broken add/remove
//! discipline and are never retried.

use thiserror::Error;

/// Errors that can occur in the simulation core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Growing a dynamic buffer failed.
    #[error("out of memory while growing {what}")]
    OutOfMemory {
        /// The structure that could not grow.
        what: &'static str,
    },

    /// A fixed-size table is full.
    #[error("{what} full: capacity {capacity}")]
    CapacityExceeded {
        /// The structure that is full.
        what: &'static str,
        /// Its fixed capacity.
        capacity: usize,
    },

    /// The transactional add/remove discipline was broken.
    #[error("invariant violated: {0}")]
    InvariantViolation(&'static str),

    /// A spawn request carried non-finite motion.
    #[error("invalid spawn: {0}")]
    InvalidSpawn(&'static str),

    /// Invalid configuration file or value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
