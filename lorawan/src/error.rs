//! Node error type

use core::fmt;

use crate::config::device::ConfigError;

/// LoRaWAN node error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeError<E> {
    /// Invalid configuration
    Config(ConfigError),
    /// Join accept not received within the join timeout
    JoinTimeout,
    /// Operation not allowed in the current state
    InvalidState,
    /// No downlink within the receive window
    RecvTimeout,
    /// Session storage failed
    Persistence(E),
    /// Radio link error
    Link(E),
    /// Scalar payload does not fit a single byte
    PayloadOutOfRange,
    /// Port outside the application range 1..=223
    InvalidPort(u8),
}

impl<E> From<ConfigError> for NodeError<E> {
    fn from(error: ConfigError) -> Self {
        NodeError::Config(error)
    }
}

impl<E: fmt::Debug> fmt::Display for NodeError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Config(e) => write!(f, "invalid configuration: {}", e),
            NodeError::JoinTimeout => f.write_str("join timeout"),
            NodeError::InvalidState => f.write_str("invalid state for operation"),
            NodeError::RecvTimeout => f.write_str("receive timeout"),
            NodeError::Persistence(e) => write!(f, "session storage error: {:?}", e),
            NodeError::Link(e) => write!(f, "radio link error: {:?}", e),
            NodeError::PayloadOutOfRange => f.write_str("scalar payload outside 0..=255"),
            NodeError::InvalidPort(port) => write!(f, "port {} outside 1..=223", port),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for NodeError<E> {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}
