//! Transport session
//!
//! A raw LoRaWAN socket opened once the node holds a session. The port is
//! not fixed at creation; every send rebinds it. Between sends the socket is
//! left non-blocking, and each transmit runs in blocking mode so the call
//! returns only after the radio is done.

use heapless::Vec;

use crate::error::NodeError;
use crate::radio::traits::LinkAdapter;

/// Largest application payload the node sends or receives
pub const MAX_PAYLOAD_SIZE: usize = 242;

/// Lowest application port
pub const MIN_APP_PORT: u8 = 1;
/// Highest application port
pub const MAX_APP_PORT: u8 = 223;

/// Received downlink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Downlink {
    /// Payload bytes
    pub data: Vec<u8, MAX_PAYLOAD_SIZE>,
    /// Port the downlink arrived on
    pub port: u8,
}

/// Open transport session over an adapter socket
#[derive(Debug)]
pub struct TransportSession<S> {
    socket: S,
    port: Option<u8>,
    data_rate: u8,
    recv_timeout_ms: u32,
}

impl<S> TransportSession<S> {
    /// Open a socket at `data_rate` with the given receive window
    pub fn open<A>(
        adapter: &mut A,
        data_rate: u8,
        recv_timeout_ms: u32,
    ) -> Result<Self, NodeError<A::Error>>
    where
        A: LinkAdapter<Socket = S>,
    {
        let socket = adapter.open_socket(data_rate).map_err(NodeError::Link)?;
        if let Err(e) = adapter.set_recv_timeout(&socket, recv_timeout_ms) {
            adapter.close(socket).ok();
            return Err(NodeError::Link(e));
        }
        Ok(Self {
            socket,
            port: None,
            data_rate,
            recv_timeout_ms,
        })
    }

    /// Currently bound port
    pub fn port(&self) -> Option<u8> {
        self.port
    }

    /// Data rate the socket was opened with
    pub fn data_rate(&self) -> u8 {
        self.data_rate
    }

    /// Receive window in milliseconds
    pub fn recv_timeout_ms(&self) -> u32 {
        self.recv_timeout_ms
    }

    /// Adapter socket handle
    pub fn socket(&self) -> &S {
        &self.socket
    }

    /// Bind to an application port
    pub fn bind<A>(&mut self, adapter: &mut A, port: u8) -> Result<(), NodeError<A::Error>>
    where
        A: LinkAdapter<Socket = S>,
    {
        if !(MIN_APP_PORT..=MAX_APP_PORT).contains(&port) {
            return Err(NodeError::InvalidPort(port));
        }
        adapter.bind(&self.socket, port).map_err(NodeError::Link)?;
        self.port = Some(port);
        Ok(())
    }

    /// Transmit `data` on the bound port, blocking until the radio is done
    pub fn send<A>(&mut self, adapter: &mut A, data: &[u8]) -> Result<usize, NodeError<A::Error>>
    where
        A: LinkAdapter<Socket = S>,
    {
        if self.port.is_none() {
            return Err(NodeError::InvalidState);
        }
        adapter
            .set_blocking(&self.socket, true)
            .map_err(NodeError::Link)?;
        let sent = adapter.send(&self.socket, data);
        // Non-blocking is restored even if the transmit failed.
        let restored = adapter.set_blocking(&self.socket, false);
        let sent = sent.map_err(NodeError::Link)?;
        restored.map_err(NodeError::Link)?;
        Ok(sent)
    }

    /// Receive up to `max_bytes` of the next downlink
    ///
    /// Fails with [`NodeError::RecvTimeout`] if nothing arrives within the
    /// socket's window.
    pub fn recv_from<A>(
        &mut self,
        adapter: &mut A,
        max_bytes: usize,
    ) -> Result<Downlink, NodeError<A::Error>>
    where
        A: LinkAdapter<Socket = S>,
    {
        let mut buffer = [0u8; MAX_PAYLOAD_SIZE];
        let max = max_bytes.min(MAX_PAYLOAD_SIZE);
        let (len, port) = match adapter.recv_from(&self.socket, &mut buffer[..max]) {
            Ok(received) => received,
            Err(nb::Error::WouldBlock) => return Err(NodeError::RecvTimeout),
            Err(nb::Error::Other(e)) => return Err(NodeError::Link(e)),
        };
        let mut data = Vec::new();
        data.extend_from_slice(&buffer[..len.min(max)])
            .map_err(|_| NodeError::InvalidState)?;
        Ok(Downlink { data, port })
    }

    /// Close the socket
    pub fn close<A>(self, adapter: &mut A) -> Result<(), NodeError<A::Error>>
    where
        A: LinkAdapter<Socket = S>,
    {
        adapter.close(self.socket).map_err(NodeError::Link)
    }
}
