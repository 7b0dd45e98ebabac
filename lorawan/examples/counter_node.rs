//! Counter node on a loopback link
//!
//! Runs the periodic counter uplink against an in-process adapter that
//! accepts every join and echoes each uplink back as a downlink. Shows the
//! full lifecycle: setup (join), uplinks with persistence, a downlink, a
//! reset and the final shutdown.
//!
//! On hardware the adapter wraps the radio's LoRaWAN stack and the delay
//! comes from the HAL; everything else stays the same.

use std::collections::VecDeque;
use std::thread;
use std::time::Duration;

use embedded_hal::blocking::delay::DelayMs;
use lorawan_node::{
    config::{Eui64, JoinConfig, NodeConfig},
    counter::CounterUplink,
    node::LoRaWANNode,
    radio::{JoinAuth, JoinError, LinkAdapter, PowerMode},
    utils,
};

// Replace with credentials from utils::generate_keys
const APP_EUI: &str = "522d4954777f8e25";
const APP_KEY: &str = "7526981c04eaca6a7267eecef4903277";

#[derive(Debug)]
struct LoopbackError;

#[derive(Default)]
struct LoopbackAdapter {
    joined: bool,
    stored: bool,
    port: u8,
    echo: VecDeque<(Vec<u8>, u8)>,
}

impl LinkAdapter for LoopbackAdapter {
    type Error = LoopbackError;
    type Socket = ();

    fn configure(&mut self, config: &JoinConfig) -> Result<(), Self::Error> {
        println!("radio up: {} SF{}", config.region, config.spreading_factor);
        Ok(())
    }

    fn device_eui(&mut self) -> Result<Eui64, Self::Error> {
        Ok(Eui64::new([0x70, 0xb3, 0xd5, 0x7e, 0xd0, 0x00, 0x00, 0x01]))
    }

    fn restore_session(&mut self) -> Result<(), Self::Error> {
        self.joined = self.stored;
        Ok(())
    }

    fn has_session(&self) -> bool {
        self.joined
    }

    fn join(&mut self, auth: &JoinAuth, _timeout_ms: u32, _dr: u8) -> Result<(), JoinError<Self::Error>> {
        println!("join as {}", auth.app_eui());
        self.joined = true;
        Ok(())
    }

    fn persist_session(&mut self) -> Result<(), Self::Error> {
        self.stored = self.joined;
        Ok(())
    }

    fn erase_session(&mut self) -> Result<(), Self::Error> {
        self.stored = false;
        self.joined = false;
        Ok(())
    }

    fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Self::Error> {
        println!("power mode: {:?}", mode);
        Ok(())
    }

    fn open_socket(&mut self, _data_rate: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_recv_timeout(&mut self, _socket: &(), _timeout_ms: u32) -> Result<(), Self::Error> {
        Ok(())
    }

    fn bind(&mut self, _socket: &(), port: u8) -> Result<(), Self::Error> {
        self.port = port;
        Ok(())
    }

    fn set_blocking(&mut self, _socket: &(), _blocking: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn send(&mut self, _socket: &(), data: &[u8]) -> Result<usize, Self::Error> {
        self.echo.push_back((data.to_vec(), self.port));
        Ok(data.len())
    }

    fn recv_from(&mut self, _socket: &(), buffer: &mut [u8]) -> nb::Result<(usize, u8), Self::Error> {
        let (data, port) = self.echo.pop_front().ok_or(nb::Error::WouldBlock)?;
        let len = data.len().min(buffer.len());
        buffer[..len].copy_from_slice(&data[..len]);
        Ok((len, port))
    }

    fn close(&mut self, _socket: ()) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct StdDelay;

impl DelayMs<u32> for StdDelay {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut adapter = LoopbackAdapter::default();
    println!("device EUI: {}", utils::device_eui_hex(&mut adapter).map_err(|e| format!("{:?}", e))?);

    let config = NodeConfig::from_hex(APP_EUI, APP_KEY)?.with_debug(true);

    println!("setup node...");
    let mut node = LoRaWANNode::start(adapter, config)?;

    let mut counter = CounterUplink::new(1, 100);
    let mut delay = StdDelay;
    for _ in 0..3 {
        let status = counter.run_once(&mut node, &mut delay)?;
        println!("uplink {:?}", status);
        if let Some(downlink) = node.recv(16)? {
            println!("downlink on port {}: {:?}", downlink.port, &downlink.data[..]);
        }
    }

    node.reset()?;
    println!("rejoined: {}", node.state());

    node.shutdown()?;
    Ok(())
}
