#![allow(dead_code)]

use std::collections::VecDeque;

use heapless::Vec;
use lorawan_node::config::{Eui64, JoinConfig};
use lorawan_node::radio::traits::{JoinAuth, JoinError, LinkAdapter, PowerMode};

/// Mock adapter error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// Non-volatile storage failure
    Storage,
    /// Radio failure
    Radio,
    /// Unknown or closed socket
    BadSocket,
}

/// How the mock answers join requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinBehavior {
    /// Join accept received
    Accept,
    /// No join accept within the timeout
    Timeout,
    /// Radio error during the handshake
    Fail,
    /// Join call returns but no session is established
    NoSession,
}

/// Session held by the mock stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockSession {
    /// Distinguishes sessions from different joins
    pub id: u32,
    /// Uplink frame counter
    pub fcnt_up: u32,
}

/// Recorded adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Configure,
    DeviceEui,
    RestoreSession,
    Join {
        dev_eui: Option<Eui64>,
        timeout_ms: u32,
        data_rate: u8,
    },
    PersistSession,
    EraseSession,
    SetPowerMode(PowerMode),
    OpenSocket(u8),
    SetRecvTimeout(u32),
    Bind(u8),
    SetBlocking(bool),
    Send(std::vec::Vec<u8>),
    RecvFrom(usize),
    Close(u32),
}

/// Mock link adapter for testing
pub struct MockAdapter {
    /// Every call in order
    pub calls: std::vec::Vec<Call>,
    /// Session in non-volatile storage
    pub stored: Option<MockSession>,
    /// Session loaded in the stack
    pub active: Option<MockSession>,
    /// Join outcome
    pub join_behavior: JoinBehavior,
    /// Hardware EUI
    pub eui: Eui64,
    /// Power mode last requested
    pub power_mode: PowerMode,
    /// Fail persist calls
    pub fail_persist: bool,
    /// Fail restore calls
    pub fail_restore: bool,
    /// Fail close calls
    pub fail_close: bool,
    /// Fail transmissions
    pub fail_send: bool,
    /// Fail erase calls; nothing is erased
    pub fail_erase: bool,
    open_sockets: std::vec::Vec<u32>,
    next_socket: u32,
    joins: u32,
    blocking: bool,
    bound_port: Option<u8>,
    last_tx: Option<Vec<u8, 256>>,
    rx_queue: VecDeque<(Vec<u8, 256>, u8)>,
}

impl MockAdapter {
    /// Create new mock adapter with empty storage
    pub fn new() -> Self {
        Self {
            calls: std::vec::Vec::new(),
            stored: None,
            active: None,
            join_behavior: JoinBehavior::Accept,
            eui: Eui64::new([0x70, 0xb3, 0xd5, 0x49, 0x9a, 0x01, 0x02, 0x03]),
            power_mode: PowerMode::AlwaysOn,
            fail_persist: false,
            fail_restore: false,
            fail_close: false,
            fail_send: false,
            fail_erase: false,
            open_sockets: std::vec::Vec::new(),
            next_socket: 1,
            joins: 0,
            blocking: false,
            bound_port: None,
            last_tx: None,
            rx_queue: VecDeque::new(),
        }
    }

    /// Create a mock whose storage already holds a session
    pub fn with_stored_session() -> Self {
        let mut adapter = Self::new();
        adapter.stored = Some(MockSession {
            id: 100,
            fcnt_up: 7,
        });
        adapter
    }

    /// Queue a downlink for the next receive call
    pub fn push_downlink(&mut self, data: &[u8], port: u8) {
        let mut rx_data = Vec::new();
        rx_data.extend_from_slice(data).unwrap();
        self.rx_queue.push_back((rx_data, port));
    }

    /// Get last transmitted data
    pub fn get_last_tx(&self) -> Option<&[u8]> {
        self.last_tx.as_ref().map(|v| v.as_slice())
    }

    /// Port the socket was last bound to
    pub fn bound_port(&self) -> Option<u8> {
        self.bound_port
    }

    /// Whether the socket is in blocking mode
    pub fn is_blocking(&self) -> bool {
        self.blocking
    }

    /// Number of sockets currently open
    pub fn open_socket_count(&self) -> usize {
        self.open_sockets.len()
    }

    /// Number of times a call matching `f` was made
    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    /// Number of join attempts
    pub fn join_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Join { .. }))
    }

    /// Number of persist calls
    pub fn persist_calls(&self) -> usize {
        self.count(|c| *c == Call::PersistSession)
    }

    /// Number of transmissions
    pub fn send_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Send(_)))
    }

    fn check_socket(&self, socket: &u32) -> Result<(), MockError> {
        if self.open_sockets.contains(socket) {
            Ok(())
        } else {
            Err(MockError::BadSocket)
        }
    }
}

impl LinkAdapter for MockAdapter {
    type Error = MockError;
    type Socket = u32;

    fn configure(&mut self, _config: &JoinConfig) -> Result<(), Self::Error> {
        self.calls.push(Call::Configure);
        Ok(())
    }

    fn device_eui(&mut self) -> Result<Eui64, Self::Error> {
        self.calls.push(Call::DeviceEui);
        Ok(self.eui)
    }

    fn restore_session(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::RestoreSession);
        if self.fail_restore {
            return Err(MockError::Storage);
        }
        self.active = self.stored;
        Ok(())
    }

    fn has_session(&self) -> bool {
        self.active.is_some()
    }

    fn join(
        &mut self,
        auth: &JoinAuth,
        timeout_ms: u32,
        data_rate: u8,
    ) -> Result<(), JoinError<Self::Error>> {
        self.calls.push(Call::Join {
            dev_eui: auth.dev_eui(),
            timeout_ms,
            data_rate,
        });
        match self.join_behavior {
            JoinBehavior::Accept => {
                self.joins += 1;
                self.active = Some(MockSession {
                    id: self.joins,
                    fcnt_up: 0,
                });
                Ok(())
            }
            JoinBehavior::Timeout => Err(JoinError::Timeout),
            JoinBehavior::Fail => Err(JoinError::Link(MockError::Radio)),
            JoinBehavior::NoSession => Ok(()),
        }
    }

    fn persist_session(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::PersistSession);
        if self.fail_persist {
            return Err(MockError::Storage);
        }
        self.stored = self.active;
        Ok(())
    }

    fn erase_session(&mut self) -> Result<(), Self::Error> {
        self.calls.push(Call::EraseSession);
        if self.fail_erase {
            return Err(MockError::Storage);
        }
        self.stored = None;
        self.active = None;
        Ok(())
    }

    fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Self::Error> {
        self.calls.push(Call::SetPowerMode(mode));
        self.power_mode = mode;
        Ok(())
    }

    fn open_socket(&mut self, data_rate: u8) -> Result<Self::Socket, Self::Error> {
        self.calls.push(Call::OpenSocket(data_rate));
        let socket = self.next_socket;
        self.next_socket += 1;
        self.open_sockets.push(socket);
        Ok(socket)
    }

    fn set_recv_timeout(&mut self, socket: &Self::Socket, timeout_ms: u32) -> Result<(), Self::Error> {
        self.calls.push(Call::SetRecvTimeout(timeout_ms));
        self.check_socket(socket)
    }

    fn bind(&mut self, socket: &Self::Socket, port: u8) -> Result<(), Self::Error> {
        self.calls.push(Call::Bind(port));
        self.check_socket(socket)?;
        self.bound_port = Some(port);
        Ok(())
    }

    fn set_blocking(&mut self, socket: &Self::Socket, blocking: bool) -> Result<(), Self::Error> {
        self.calls.push(Call::SetBlocking(blocking));
        self.check_socket(socket)?;
        self.blocking = blocking;
        Ok(())
    }

    fn send(&mut self, socket: &Self::Socket, data: &[u8]) -> Result<usize, Self::Error> {
        self.calls.push(Call::Send(data.to_vec()));
        self.check_socket(socket)?;
        if self.fail_send {
            return Err(MockError::Radio);
        }
        let mut tx_data = Vec::new();
        tx_data.extend_from_slice(data).unwrap();
        self.last_tx = Some(tx_data);
        if let Some(session) = self.active.as_mut() {
            session.fcnt_up += 1;
        }
        Ok(data.len())
    }

    fn recv_from(
        &mut self,
        socket: &Self::Socket,
        buffer: &mut [u8],
    ) -> nb::Result<(usize, u8), Self::Error> {
        self.calls.push(Call::RecvFrom(buffer.len()));
        self.check_socket(socket)?;
        match self.rx_queue.pop_front() {
            Some((rx_data, port)) => {
                let len = rx_data.len().min(buffer.len());
                buffer[..len].copy_from_slice(&rx_data[..len]);
                Ok((len, port))
            }
            None => Err(nb::Error::WouldBlock),
        }
    }

    fn close(&mut self, socket: Self::Socket) -> Result<(), Self::Error> {
        self.calls.push(Call::Close(socket));
        if self.fail_close {
            return Err(MockError::Radio);
        }
        self.check_socket(&socket)?;
        self.open_sockets.retain(|s| *s != socket);
        Ok(())
    }
}
