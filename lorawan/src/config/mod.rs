//! Node configuration
//!
//! This module contains the types used to configure a LoRaWAN node:
//! - Identity credentials (AppEUI, AppKey, optional DevEUI)
//! - Join parameters (region, spreading factor, ADR, data rate, timeout)
//! - Node behavior (receive window, strict send, debug output)

/// Credentials, join parameters and node configuration
pub mod device;

pub use device::{
    AppKey, ConfigError, Credentials, Eui64, JoinConfig, NodeConfig, Region,
};
