//! Session persistence
//!
//! The negotiated session (keys, frame counters, data rate) lives inside the
//! link adapter. [`SessionStore`] is the narrow view the node has of its
//! non-volatile copy: restore, persist and erase. The node never sees the
//! session bytes.

use crate::error::NodeError;
use crate::radio::traits::LinkAdapter;

/// Non-volatile session storage backed by a link adapter
pub struct SessionStore<'a, A: LinkAdapter> {
    adapter: &'a mut A,
}

impl<'a, A: LinkAdapter> SessionStore<'a, A> {
    /// Wrap an adapter
    pub fn new(adapter: &'a mut A) -> Self {
        Self { adapter }
    }

    /// Load the stored session into the adapter
    ///
    /// Returns `true` if the adapter holds a usable session afterwards.
    pub fn restore(&mut self) -> Result<bool, NodeError<A::Error>> {
        self.adapter
            .restore_session()
            .map_err(NodeError::Persistence)?;
        Ok(self.adapter.has_session())
    }

    /// Save the adapter's current session
    pub fn persist(&mut self) -> Result<(), NodeError<A::Error>> {
        self.adapter
            .persist_session()
            .map_err(NodeError::Persistence)
    }

    /// Erase the stored and in-memory session
    pub fn erase(&mut self) -> Result<(), NodeError<A::Error>> {
        self.adapter.erase_session().map_err(NodeError::Persistence)
    }
}
