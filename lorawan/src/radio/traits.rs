use crate::config::device::{AppKey, Eui64, JoinConfig};

/// Radio power mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Receiver always on
    AlwaysOn,
    /// Radio only wakes up to transmit
    TxOnly,
    /// Radio asleep
    Sleep,
}

/// OTAA handshake variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JoinAuth {
    /// DevEUI, AppEUI and AppKey
    Full {
        /// Device EUI
        dev_eui: Eui64,
        /// Application EUI
        app_eui: Eui64,
        /// Application root key
        app_key: AppKey,
    },
    /// AppEUI and AppKey; the adapter supplies its own DevEUI
    Abbreviated {
        /// Application EUI
        app_eui: Eui64,
        /// Application root key
        app_key: AppKey,
    },
}

impl JoinAuth {
    /// Application EUI used in the handshake
    pub fn app_eui(&self) -> Eui64 {
        match self {
            JoinAuth::Full { app_eui, .. } | JoinAuth::Abbreviated { app_eui, .. } => *app_eui,
        }
    }

    /// Explicit device EUI, if any
    pub fn dev_eui(&self) -> Option<Eui64> {
        match self {
            JoinAuth::Full { dev_eui, .. } => Some(*dev_eui),
            JoinAuth::Abbreviated { .. } => None,
        }
    }
}

/// Join handshake failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinError<E> {
    /// No join accept within the timeout
    Timeout,
    /// Radio error
    Link(E),
}

impl<E> From<E> for JoinError<E> {
    fn from(error: E) -> Self {
        JoinError::Link(error)
    }
}

/// Radio link adapter: the LoRaWAN stack the node runs on top of
///
/// The adapter owns the MAC layer, the session keys and frame counters, and
/// the non-volatile copy of the session. The node only sequences calls.
pub trait LinkAdapter {
    /// Error type for adapter operations
    type Error;

    /// Socket handle returned by [`LinkAdapter::open_socket`]
    type Socket;

    /// Bring the radio up in LoRaWAN mode
    fn configure(&mut self, config: &JoinConfig) -> Result<(), Self::Error>;

    /// Hardware EUI of the radio
    fn device_eui(&mut self) -> Result<Eui64, Self::Error>;

    /// Load the session from non-volatile storage into the stack
    fn restore_session(&mut self) -> Result<(), Self::Error>;

    /// Check if the stack currently holds a joined session
    fn has_session(&self) -> bool;

    /// Run the OTAA handshake, blocking up to `timeout_ms`
    fn join(
        &mut self,
        auth: &JoinAuth,
        timeout_ms: u32,
        data_rate: u8,
    ) -> Result<(), JoinError<Self::Error>>;

    /// Save the current session to non-volatile storage
    fn persist_session(&mut self) -> Result<(), Self::Error>;

    /// Erase the stored and in-memory session
    fn erase_session(&mut self) -> Result<(), Self::Error>;

    /// Set the radio power mode
    fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Self::Error>;

    /// Open a raw LoRaWAN socket at `data_rate`
    fn open_socket(&mut self, data_rate: u8) -> Result<Self::Socket, Self::Error>;

    /// Set the receive window of a socket
    fn set_recv_timeout(&mut self, socket: &Self::Socket, timeout_ms: u32)
        -> Result<(), Self::Error>;

    /// Bind a socket to a LoRaWAN port
    fn bind(&mut self, socket: &Self::Socket, port: u8) -> Result<(), Self::Error>;

    /// Switch a socket between blocking and non-blocking mode
    fn set_blocking(&mut self, socket: &Self::Socket, blocking: bool) -> Result<(), Self::Error>;

    /// Transmit an uplink on the bound port
    /// Returns the number of bytes sent
    fn send(&mut self, socket: &Self::Socket, data: &[u8]) -> Result<usize, Self::Error>;

    /// Receive a downlink into `buffer`
    /// Returns the number of bytes received and the port they arrived on,
    /// or `WouldBlock` when nothing arrived within the socket's window
    fn recv_from(
        &mut self,
        socket: &Self::Socket,
        buffer: &mut [u8],
    ) -> nb::Result<(usize, u8), Self::Error>;

    /// Close a socket
    fn close(&mut self, socket: Self::Socket) -> Result<(), Self::Error>;
}
