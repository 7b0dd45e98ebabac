//! Provisioning helpers
//!
//! Small tools used while provisioning a node: read the radio's hardware
//! EUI, wipe a stored session, and generate a fresh AppEUI/AppKey pair.

use core::fmt::{self, Write};

use heapless::String;
use rand_core::{CryptoRng, RngCore};

use crate::config::device::{AppKey, Eui64, EUI_LEN, KEY_LEN};
use crate::error::NodeError;
use crate::radio::traits::LinkAdapter;
use crate::session::SessionStore;

/// AppEUI prefix used by [`generate_keys`] when none is given ("pyco")
pub const DEFAULT_APP_EUI_PREFIX: [u8; 4] = [0x70, 0x79, 0x63, 0x6f];

/// Hardware EUI of the radio as uppercase hex
pub fn device_eui_hex<A: LinkAdapter>(adapter: &mut A) -> Result<String<16>, A::Error> {
    let eui = adapter.device_eui()?;
    let mut out = String::new();
    // 16 hex digits always fit
    write!(out, "{:X}", eui).ok();
    Ok(out)
}

/// Erase the session stored by the adapter
///
/// A storage failure is reported as [`NodeError::Persistence`].
pub fn erase_stored_session<A: LinkAdapter>(adapter: &mut A) -> Result<(), NodeError<A::Error>> {
    SessionStore::new(adapter).erase()
}

/// Freshly generated OTAA credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedKeys {
    /// Application EUI: prefix followed by four random bytes
    pub app_eui: Eui64,
    /// Random application root key
    pub app_key: AppKey,
}

impl fmt::Display for GeneratedKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AppEUI: {:x}", self.app_eui)?;
        write!(f, "AppKey: {:x}", self.app_key)
    }
}

/// Generate an AppEUI with a fixed 4 byte prefix and a random AppKey
pub fn generate_keys<R: RngCore + CryptoRng>(rng: &mut R, prefix: [u8; 4]) -> GeneratedKeys {
    let mut app_eui = [0u8; EUI_LEN];
    app_eui[..4].copy_from_slice(&prefix);
    rng.fill_bytes(&mut app_eui[4..]);

    let mut app_key = [0u8; KEY_LEN];
    rng.fill_bytes(&mut app_key);

    GeneratedKeys {
        app_eui: Eui64::new(app_eui),
        app_key: AppKey::new(app_key),
    }
}
