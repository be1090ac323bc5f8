//! Byte transport seam.
//!
//! The production implementation wraps a serial port; tests substitute a
//! scripted in-memory transport.

use std::io;
use std::time::Duration;

use log::info;
use serialport::{ClearBuffer, SerialPort, SerialPortType};

use crate::LinkError;

/// A bidirectional byte stream with bounded, non-blocking-ish reads.
pub trait Transport: Send {
    /// Write the whole buffer.
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Read whatever is currently available, returning 0 when nothing is
    /// pending. Must not block for longer than a few milliseconds.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Discard any buffered inbound bytes.
    fn drain_input(&mut self) -> io::Result<()>;
}

/// Serial-port transport.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path` at `baud` with a short read timeout so `read_available`
    /// stays bounded.
    pub fn open(path: &str, baud: u32) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud)
            .timeout(Duration::from_millis(5))
            .open()?;
        info!("opened serial port {path} at {baud} baud");
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(&mut self.port, bytes)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match io::Read::read(&mut self.port, buf) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }

    fn drain_input(&mut self) -> io::Result<()> {
        self.port
            .clear(ClearBuffer::Input)
            .map_err(|e| io::Error::other(e.to_string()))
    }
}

/// Transport that discards everything, for vision-only dry runs with no
/// robot connected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTransport;

impl Transport for NullTransport {
    fn write_all(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Ok(())
    }

    fn read_available(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn drain_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pick a serial port to talk to the robot.
///
/// USB ports are preferred over anything else; among equals the first
/// enumerated wins. The caller decides what to do when nothing is found.
pub fn find_port() -> Result<String, LinkError> {
    let ports = serialport::available_ports()?;
    let chosen = ports
        .iter()
        .find(|p| matches!(p.port_type, SerialPortType::UsbPort(_)))
        .or_else(|| ports.first())
        .ok_or(LinkError::NoPortFound)?;
    Ok(chosen.port_name.clone())
}
