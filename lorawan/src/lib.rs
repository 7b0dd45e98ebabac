//! LoRaWAN node session manager
//!
//! This crate manages the session lifecycle of a battery powered LoRaWAN
//! end device on top of an existing LoRaWAN stack. The stack (radio, MAC,
//! crypto, non-volatile storage) is reached through the [`LinkAdapter`]
//! trait; this crate decides when to reuse a stored session and when to
//! join, keeps the session persisted, and frames uplinks and downlinks
//! through a raw socket.
//!
//! # Features
//! - OTAA join with or without an explicit DevEUI
//! - Session restore on boot, persist after every join and uplink
//! - Reset (erase and re-join) and shutdown into radio sleep
//! - Single byte scalar payload encoding with range checks
//! - Provisioning helpers (hardware EUI, session erase, key generation)
//! - `no_std`, no allocation
//!
//! # Example
//! ```no_run
//! use lorawan_node::{config::NodeConfig, node::LoRaWANNode};
//! # use lorawan_node::radio::LinkAdapter;
//! # fn run<A: LinkAdapter>(adapter: A) -> Result<(), lorawan_node::NodeError<A::Error>> {
//!
//! let config = NodeConfig::from_hex("522d4954777f8e25", "7526981c04eaca6a7267eecef4903277")?
//!     .with_debug(true);
//!
//! // Restore the stored session or join the network
//! let mut node = LoRaWANNode::start(adapter, config)?;
//!
//! // Send one byte on port 1
//! node.send(&[42u8], 1)?;
//!
//! // Wait for a downlink
//! if let Some(downlink) = node.recv(64)? {
//!     let _ = (downlink.port, downlink.data);
//! }
//!
//! node.shutdown()?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

// Must come first so the logging macros are visible to the other modules.
mod fmt;

/// Node configuration
pub mod config;

/// Periodic counter uplink
pub mod counter;

/// Error types
pub mod error;

/// Node controller
pub mod node;

/// Uplink payloads
pub mod payload;

/// Radio link adapter contract
pub mod radio;

/// Session persistence
pub mod session;

/// Transport session
pub mod transport;

/// Provisioning helpers
pub mod utils;

pub use config::{Credentials, NodeConfig};
pub use error::NodeError;
pub use node::{LoRaWANNode, NodeState, SendStatus};
pub use radio::LinkAdapter;
