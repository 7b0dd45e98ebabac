use core::fmt;

use crate::radio::traits::JoinAuth;

/// EUI-64 length in bytes
pub const EUI_LEN: usize = 8;
/// AES-128 root key length in bytes
pub const KEY_LEN: usize = 16;

/// Lowest spreading factor accepted by the radio
pub const MIN_SPREADING_FACTOR: u8 = 7;
/// Highest spreading factor accepted by the radio
pub const MAX_SPREADING_FACTOR: u8 = 12;

/// Default join timeout in seconds
pub const DEFAULT_JOIN_TIMEOUT_SECS: u32 = 10;
/// Default receive window of the transport socket in milliseconds
pub const DEFAULT_RECV_TIMEOUT_MS: u32 = 6_000;
/// Default data rate index used for the join request and the socket
pub const DEFAULT_DATA_RATE: u8 = 5;

/// Configuration error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Input contains a non-hex character
    InvalidHex,
    /// Input has the wrong number of hex digits
    InvalidLength {
        /// Expected number of hex digits
        expected: usize,
        /// Number of hex digits found
        found: usize,
    },
    /// Spreading factor outside 7..=12
    SpreadingFactor(u8),
    /// Data rate index not valid for the region
    DataRate {
        /// Configured region
        region: Region,
        /// Rejected data rate index
        data_rate: u8,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidHex => f.write_str("invalid hex digit"),
            ConfigError::InvalidLength { expected, found } => {
                write!(f, "expected {} hex digits, found {}", expected, found)
            }
            ConfigError::SpreadingFactor(sf) => {
                write!(f, "spreading factor {} outside 7..=12", sf)
            }
            ConfigError::DataRate { region, data_rate } => {
                write!(f, "data rate {} not valid for {}", data_rate, region)
            }
        }
    }
}

fn parse_hex<const N: usize>(input: &str) -> Result<[u8; N], ConfigError> {
    let input = input.trim();
    if input.len() != N * 2 {
        return Err(ConfigError::InvalidLength {
            expected: N * 2,
            found: input.len(),
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(input, &mut out).map_err(|_| ConfigError::InvalidHex)?;
    Ok(out)
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8], upper: bool) -> fmt::Result {
    let mut buf = [0u8; 2 * KEY_LEN];
    let out = buf.get_mut(..bytes.len() * 2).ok_or(fmt::Error)?;
    hex::encode_to_slice(bytes, out).map_err(|_| fmt::Error)?;
    if upper {
        out.make_ascii_uppercase();
    }
    f.write_str(core::str::from_utf8(out).map_err(|_| fmt::Error)?)
}

/// EUI-64 identifier (AppEUI / DevEUI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Eui64([u8; EUI_LEN]);

impl Eui64 {
    /// Create from raw bytes
    pub const fn new(bytes: [u8; EUI_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a 16 digit hex string
    pub fn from_hex(input: &str) -> Result<Self, ConfigError> {
        parse_hex(input).map(Self)
    }

    /// Raw bytes
    pub fn as_bytes(&self) -> &[u8; EUI_LEN] {
        &self.0
    }
}

impl From<[u8; EUI_LEN]> for Eui64 {
    fn from(bytes: [u8; EUI_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::LowerHex for Eui64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0, false)
    }
}

impl fmt::UpperHex for Eui64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0, true)
    }
}

impl fmt::Display for Eui64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

/// AES-128 application root key
///
/// `Debug` never prints the key material.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AppKey([u8; KEY_LEN]);

impl AppKey {
    /// Create from raw bytes
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse from a 32 digit hex string
    pub fn from_hex(input: &str) -> Result<Self, ConfigError> {
        parse_hex(input).map(Self)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl From<[u8; KEY_LEN]> for AppKey {
    fn from(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppKey(..)")
    }
}

impl fmt::LowerHex for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0, false)
    }
}

impl fmt::UpperHex for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0, true)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AppKey {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AppKey(..)")
    }
}

/// LoRaWAN region the radio operates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    /// Asia 923 MHz
    As923,
    /// Australia 915 MHz
    Au915,
    /// China 470 MHz
    Cn470,
    /// Europe 868 MHz
    #[default]
    Eu868,
    /// India 865 MHz
    In865,
    /// United States 915 MHz
    Us915,
}

impl Region {
    /// Highest data rate index usable for uplinks in this region
    pub fn max_uplink_data_rate(&self) -> u8 {
        match self {
            Region::As923 => 7,
            Region::Au915 => 6,
            Region::Cn470 => 5,
            Region::Eu868 => 7,
            Region::In865 => 7,
            Region::Us915 => 4,
        }
    }

    /// Whether `data_rate` is a valid uplink index for this region
    pub fn is_valid_data_rate(&self, data_rate: u8) -> bool {
        data_rate <= self.max_uplink_data_rate()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::As923 => "AS923",
            Region::Au915 => "AU915",
            Region::Cn470 => "CN470",
            Region::Eu868 => "EU868",
            Region::In865 => "IN865",
            Region::Us915 => "US915",
        };
        f.write_str(name)
    }
}

/// Identity credentials used for OTAA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Credentials {
    /// Application EUI
    pub app_eui: Eui64,
    /// Application root key
    pub app_key: AppKey,
    /// Device EUI; the adapter's hardware EUI is used when absent
    pub dev_eui: Option<Eui64>,
}

impl Credentials {
    /// Create credentials without an explicit device EUI
    pub fn new(app_eui: Eui64, app_key: AppKey) -> Self {
        Self {
            app_eui,
            app_key,
            dev_eui: None,
        }
    }

    /// Parse credentials from hex strings
    pub fn from_hex(app_eui: &str, app_key: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Eui64::from_hex(app_eui)?, AppKey::from_hex(app_key)?))
    }

    /// Use an explicit device EUI
    pub fn with_dev_eui(mut self, dev_eui: Eui64) -> Self {
        self.dev_eui = Some(dev_eui);
        self
    }

    /// Use an explicit device EUI given as hex
    pub fn with_dev_eui_hex(self, dev_eui: &str) -> Result<Self, ConfigError> {
        Ok(self.with_dev_eui(Eui64::from_hex(dev_eui)?))
    }

    /// Handshake variant for these credentials
    pub fn auth(&self) -> JoinAuth {
        match self.dev_eui {
            Some(dev_eui) => JoinAuth::Full {
                dev_eui,
                app_eui: self.app_eui,
                app_key: self.app_key,
            },
            None => JoinAuth::Abbreviated {
                app_eui: self.app_eui,
                app_key: self.app_key,
            },
        }
    }
}

/// Radio and join parameters, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JoinConfig {
    /// Operating region
    pub region: Region,
    /// Spreading factor (7-12)
    pub spreading_factor: u8,
    /// Adaptive data rate
    pub adaptive_data_rate: bool,
    /// Data rate index for the join request and the socket
    pub data_rate: u8,
    /// Maximum time to wait for the join accept, in seconds
    pub join_timeout_secs: u32,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            region: Region::default(),
            spreading_factor: MIN_SPREADING_FACTOR,
            adaptive_data_rate: true,
            data_rate: DEFAULT_DATA_RATE,
            join_timeout_secs: DEFAULT_JOIN_TIMEOUT_SECS,
        }
    }
}

impl JoinConfig {
    /// Join timeout in milliseconds
    pub fn join_timeout_ms(&self) -> u32 {
        self.join_timeout_secs.saturating_mul(1000)
    }

    /// Check spreading factor and data rate bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SPREADING_FACTOR..=MAX_SPREADING_FACTOR).contains(&self.spreading_factor) {
            return Err(ConfigError::SpreadingFactor(self.spreading_factor));
        }
        if !self.region.is_valid_data_rate(self.data_rate) {
            return Err(ConfigError::DataRate {
                region: self.region,
                data_rate: self.data_rate,
            });
        }
        Ok(())
    }
}

/// Complete node configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeConfig {
    /// Identity credentials
    pub credentials: Credentials,
    /// Radio and join parameters
    pub join: JoinConfig,
    /// Receive window of the transport socket in milliseconds
    pub recv_timeout_ms: u32,
    /// Reject sends without a session instead of skipping them
    pub strict_send: bool,
    /// Emit lifecycle events to the log
    pub debug: bool,
}

impl NodeConfig {
    /// Create a configuration with default radio parameters
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            join: JoinConfig::default(),
            recv_timeout_ms: DEFAULT_RECV_TIMEOUT_MS,
            strict_send: false,
            debug: false,
        }
    }

    /// Create a configuration from hex AppEUI and AppKey
    pub fn from_hex(app_eui: &str, app_key: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Credentials::from_hex(app_eui, app_key)?))
    }

    /// Set an explicit device EUI
    pub fn with_dev_eui(mut self, dev_eui: Eui64) -> Self {
        self.credentials.dev_eui = Some(dev_eui);
        self
    }

    /// Set the region
    pub fn with_region(mut self, region: Region) -> Self {
        self.join.region = region;
        self
    }

    /// Set the spreading factor
    pub fn with_spreading_factor(mut self, spreading_factor: u8) -> Self {
        self.join.spreading_factor = spreading_factor;
        self
    }

    /// Enable or disable adaptive data rate
    pub fn with_adaptive_data_rate(mut self, enabled: bool) -> Self {
        self.join.adaptive_data_rate = enabled;
        self
    }

    /// Set the data rate index
    pub fn with_data_rate(mut self, data_rate: u8) -> Self {
        self.join.data_rate = data_rate;
        self
    }

    /// Set the join timeout in seconds
    pub fn with_join_timeout_secs(mut self, secs: u32) -> Self {
        self.join.join_timeout_secs = secs;
        self
    }

    /// Set the socket receive window in milliseconds
    pub fn with_recv_timeout_ms(mut self, ms: u32) -> Self {
        self.recv_timeout_ms = ms;
        self
    }

    /// Reject sends while no session is active
    pub fn with_strict_send(mut self, strict: bool) -> Self {
        self.strict_send = strict;
        self
    }

    /// Enable lifecycle debug output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Validate all parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.join.validate()
    }
}
