//! Periodic counter uplink
//!
//! Sends a one byte counter on a fixed port, then sleeps for the interval.
//! The counter wraps from 255 back to 0.

use embedded_hal::blocking::delay::DelayMs;

use crate::error::NodeError;
use crate::node::{LoRaWANNode, SendStatus};
use crate::radio::traits::LinkAdapter;

/// Default uplink interval in milliseconds
pub const DEFAULT_INTERVAL_MS: u32 = 30_000;

/// Counter uplink driver
#[derive(Debug, Clone)]
pub struct CounterUplink {
    counter: u8,
    port: u8,
    interval_ms: u32,
}

impl Default for CounterUplink {
    fn default() -> Self {
        Self::new(1, DEFAULT_INTERVAL_MS)
    }
}

impl CounterUplink {
    /// Create a driver sending on `port` every `interval_ms`
    pub fn new(port: u8, interval_ms: u32) -> Self {
        Self {
            counter: 0,
            port,
            interval_ms,
        }
    }

    /// Value sent by the next tick
    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Send the current counter and advance it
    pub fn tick<A: LinkAdapter>(
        &mut self,
        node: &mut LoRaWANNode<A>,
    ) -> Result<SendStatus, NodeError<A::Error>> {
        let status = node.send(&[self.counter], self.port)?;
        self.counter = self.counter.wrapping_add(1);
        Ok(status)
    }

    /// Send the current counter, then wait for the interval
    pub fn run_once<A, D>(
        &mut self,
        node: &mut LoRaWANNode<A>,
        delay: &mut D,
    ) -> Result<SendStatus, NodeError<A::Error>>
    where
        A: LinkAdapter,
        D: DelayMs<u32>,
    {
        let status = self.tick(node)?;
        delay.delay_ms(self.interval_ms);
        Ok(status)
    }
}
