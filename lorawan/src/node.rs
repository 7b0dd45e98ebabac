//! LoRaWAN node controller
//!
//! Owns one session's lifecycle on top of a [`LinkAdapter`]: restore a
//! stored session or join with OTAA, persist the session, keep a transport
//! socket open for uplinks and downlinks, and tear everything down on reset
//! or shutdown.
//!
//! ```text
//! Uninitialized -> Restoring -> Connected
//!                      |            |  reset
//!                      v            v
//!                   Joining <-------+
//!                    |    \
//!                    v     v
//!               Connected  Failed --(join)--> Joining
//!
//! any state --(shutdown)--> Terminated
//! ```
//!
//! Join failures are never retried internally; duty cycle limits leave the
//! retry policy to the caller.

use core::fmt;

use crate::config::device::NodeConfig;
use crate::error::NodeError;
use crate::payload::{encode_scalar, Payload};
use crate::radio::traits::{JoinError, LinkAdapter, PowerMode};
use crate::session::SessionStore;
use crate::transport::{Downlink, TransportSession};

macro_rules! dprint {
    ($node:expr, $($arg:tt)*) => {
        if $node.config.debug {
            debug!($($arg)*);
        }
    };
}

/// Node controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NodeState {
    /// Constructed, no session attempt yet
    Uninitialized,
    /// Loading the stored session
    Restoring,
    /// OTAA handshake in progress
    Joining,
    /// Session active, transport open
    Connected,
    /// Last join or restore failed; join again to recover
    Failed,
    /// Shut down; the node cannot be reused
    Terminated,
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeState::Uninitialized => "uninitialized",
            NodeState::Restoring => "restoring",
            NodeState::Joining => "joining",
            NodeState::Connected => "connected",
            NodeState::Failed => "failed",
            NodeState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Result of [`LoRaWANNode::send`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    /// Uplink transmitted; number of bytes sent
    Sent(usize),
    /// No session was active, nothing was sent
    NotJoined,
}

/// LoRaWAN node
pub struct LoRaWANNode<A: LinkAdapter> {
    adapter: A,
    config: NodeConfig,
    state: NodeState,
    transport: Option<TransportSession<A::Socket>>,
}

impl<A: LinkAdapter> LoRaWANNode<A> {
    /// Create a node and bring the radio up
    ///
    /// No session is touched until [`setup`](Self::setup).
    pub fn new(mut adapter: A, config: NodeConfig) -> Result<Self, NodeError<A::Error>> {
        config.validate()?;
        adapter.configure(&config.join).map_err(NodeError::Link)?;

        Ok(Self {
            adapter,
            config,
            state: NodeState::Uninitialized,
            transport: None,
        })
    }

    /// Create a node and run [`setup`](Self::setup)
    pub fn start(adapter: A, config: NodeConfig) -> Result<Self, NodeError<A::Error>> {
        let mut node = Self::new(adapter, config)?;
        node.setup()?;
        Ok(node)
    }

    /// Current state
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Check if a session is active and the transport is open
    pub fn is_connected(&self) -> bool {
        self.state == NodeState::Connected
    }

    /// Node configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// Open transport session, if any
    pub fn transport(&self) -> Option<&TransportSession<A::Socket>> {
        self.transport.as_ref()
    }

    /// Underlying link adapter
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Underlying link adapter, mutably
    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    /// Release the link adapter
    pub fn into_adapter(self) -> A {
        self.adapter
    }

    /// Reuse the stored session, or join the network if there is none
    pub fn setup(&mut self) -> Result<(), NodeError<A::Error>> {
        self.ensure_alive()?;
        self.close_transport()?;

        self.state = NodeState::Restoring;
        let restored = match SessionStore::new(&mut self.adapter).restore() {
            Ok(restored) => restored,
            Err(e) => {
                warn!("LoRaWANNode: session restore failed");
                self.state = NodeState::Failed;
                return Err(e);
            }
        };

        if restored {
            dprint!(self, "LoRaWANNode: restored session");
            self.open_transport()
        } else {
            self.join()
        }
    }

    /// Join the network with OTAA
    ///
    /// Uses the full DevEUI/AppEUI/AppKey handshake when a device EUI is
    /// configured, otherwise the AppEUI/AppKey pair.
    pub fn join(&mut self) -> Result<(), NodeError<A::Error>> {
        self.ensure_alive()?;
        self.close_transport()?;

        self.state = NodeState::Joining;
        let auth = self.config.credentials.auth();
        let timeout_ms = self.config.join.join_timeout_ms();

        dprint!(self, "LoRaWANNode: send join request");
        match self.adapter.join(&auth, timeout_ms, self.config.join.data_rate) {
            Ok(()) => {}
            Err(JoinError::Timeout) => {
                dprint!(self, "LoRaWANNode: timeout error");
                self.state = NodeState::Failed;
                return Err(NodeError::JoinTimeout);
            }
            Err(JoinError::Link(e)) => {
                self.state = NodeState::Failed;
                return Err(NodeError::Link(e));
            }
        }

        if !self.adapter.has_session() {
            dprint!(self, "LoRaWANNode: join returned without a session");
            self.state = NodeState::Failed;
            return Err(NodeError::JoinTimeout);
        }

        if let Err(e) = SessionStore::new(&mut self.adapter).persist() {
            warn!("LoRaWANNode: session persist failed after join");
            self.state = NodeState::Failed;
            return Err(e);
        }

        self.open_transport()?;
        dprint!(self, "LoRaWANNode: joined network");
        Ok(())
    }

    /// Drop the session and join again
    ///
    /// Closes the transport, erases the stored and in-memory session, then
    /// runs [`join`](Self::join). Fails with `InvalidState` if no transport
    /// is open. The erase is attempted even if closing the socket fails; on
    /// either failure the node is left `Failed` and the first error returned.
    pub fn reset(&mut self) -> Result<(), NodeError<A::Error>> {
        self.ensure_alive()?;
        let transport = self.transport.take().ok_or(NodeError::InvalidState)?;

        dprint!(self, "LoRaWANNode: reset session");
        let closed = transport.close(&mut self.adapter);
        if closed.is_err() {
            warn!("LoRaWANNode: socket close failed during reset");
        }
        let erased = SessionStore::new(&mut self.adapter).erase();
        if let Err(e) = closed.and(erased) {
            self.state = NodeState::Failed;
            return Err(e);
        }
        self.join()
    }

    /// Send an uplink on `port`
    ///
    /// Without an active session nothing is sent and `NotJoined` is
    /// returned, or `InvalidState` when strict send is configured. Every
    /// transmitted uplink is followed by a session persist so frame counters
    /// survive power loss.
    pub fn send<'p, P>(&mut self, payload: P, port: u8) -> Result<SendStatus, NodeError<A::Error>>
    where
        P: Into<Payload<'p>>,
    {
        self.ensure_alive()?;

        let transport = match self.transport.as_mut() {
            Some(transport) => transport,
            None => return Self::not_joined(&self.config),
        };
        transport.bind(&mut self.adapter, port)?;

        if !self.adapter.has_session() {
            return Self::not_joined(&self.config);
        }

        let payload: Payload<'p> = payload.into();
        let scalar;
        let bytes: &[u8] = match payload {
            Payload::Bytes(bytes) => bytes,
            Payload::Scalar(value) => {
                scalar = [encode_scalar(value).map_err(|_| NodeError::PayloadOutOfRange)?];
                &scalar
            }
        };

        dprint!(self, "LoRaWANNode: send payload: {} bytes on port {}", bytes.len(), port);
        let sent = transport.send(&mut self.adapter, bytes)?;
        SessionStore::new(&mut self.adapter).persist()?;

        Ok(SendStatus::Sent(sent))
    }

    /// Receive up to `max_bytes` of the next downlink
    ///
    /// Returns `None` if nothing arrived within the receive window.
    pub fn recv(&mut self, max_bytes: usize) -> Result<Option<Downlink>, NodeError<A::Error>> {
        self.ensure_alive()?;
        let transport = self.transport.as_mut().ok_or(NodeError::InvalidState)?;

        match transport.recv_from(&mut self.adapter, max_bytes) {
            Ok(downlink) => {
                dprint!(
                    self,
                    "LoRaWANNode: recv payload: {} bytes, port: {}",
                    downlink.data.len(),
                    downlink.port
                );
                Ok(Some(downlink))
            }
            Err(NodeError::RecvTimeout) => {
                dprint!(self, "LoRaWANNode: recv timeout");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Close the transport and put the radio to sleep
    ///
    /// Safe to call from any state and more than once. The sleep request is
    /// issued even if closing the socket fails; the first error is returned.
    pub fn shutdown(&mut self) -> Result<(), NodeError<A::Error>> {
        let closed = match self.transport.take() {
            Some(transport) => transport.close(&mut self.adapter),
            None => Ok(()),
        };
        if closed.is_err() {
            warn!("LoRaWANNode: socket close failed during shutdown");
        }

        let slept = self
            .adapter
            .set_power_mode(PowerMode::Sleep)
            .map_err(NodeError::Link);
        self.state = NodeState::Terminated;
        dprint!(self, "LoRaWANNode: shutdown");

        closed.and(slept)
    }

    /// Close the open socket, if any, before a new one replaces it
    fn close_transport(&mut self) -> Result<(), NodeError<A::Error>> {
        let transport = match self.transport.take() {
            Some(transport) => transport,
            None => return Ok(()),
        };
        if let Err(e) = transport.close(&mut self.adapter) {
            warn!("LoRaWANNode: socket close failed");
            self.state = NodeState::Failed;
            return Err(e);
        }
        Ok(())
    }

    fn open_transport(&mut self) -> Result<(), NodeError<A::Error>> {
        match TransportSession::open(
            &mut self.adapter,
            self.config.join.data_rate,
            self.config.recv_timeout_ms,
        ) {
            Ok(transport) => {
                self.transport = Some(transport);
                self.state = NodeState::Connected;
                Ok(())
            }
            Err(e) => {
                self.state = NodeState::Failed;
                Err(e)
            }
        }
    }

    fn not_joined(config: &NodeConfig) -> Result<SendStatus, NodeError<A::Error>> {
        if config.strict_send {
            return Err(NodeError::InvalidState);
        }
        if config.debug {
            debug!("LoRaWANNode: not joined, uplink skipped");
        }
        Ok(SendStatus::NotJoined)
    }

    fn ensure_alive(&self) -> Result<(), NodeError<A::Error>> {
        if self.state == NodeState::Terminated {
            Err(NodeError::InvalidState)
        } else {
            Ok(())
        }
    }
}
