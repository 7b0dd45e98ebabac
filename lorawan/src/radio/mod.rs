//! Radio link adapter contract

/// Adapter trait and handshake types
pub mod traits;

pub use traits::{JoinAuth, JoinError, LinkAdapter, PowerMode};
