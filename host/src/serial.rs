//! Direct serial transport
//!
//! Talks to the robot's USB serial adapter (e.g. `/dev/ttyUSB0` at 9600
//! baud). Reads only ask for what the driver reports as pending, so a poll
//! never waits on the port timeout.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use crate::error::LinkError;
use crate::link::Transport;

const PORT_TIMEOUT: Duration = Duration::from_secs(1);

pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    path: String,
    baud_rate: u32,
}

impl SerialTransport {
    /// # Errors
    /// [`LinkError::Open`] if the device cannot be opened at `baud_rate`.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, LinkError> {
        let port = serialport::new(path, baud_rate)
            .timeout(PORT_TIMEOUT)
            .open()
            .map_err(|source| LinkError::Open {
                port: path.to_string(),
                source,
            })?;

        tracing::info!("opened serial port {} at {} baud", path, baud_rate);
        Ok(Self {
            port: Some(port),
            path: path.to_string(),
            baud_rate,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    pub fn close(&mut self) {
        if self.port.take().is_some() {
            tracing::info!("closed serial port {}", self.path);
        }
    }

    fn port(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial port closed"))
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .field("baud_rate", &self.baud_rate)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let port = self.port()?;
        port.write_all(bytes)?;
        port.flush()
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let port = self.port()?;
        let pending = port.bytes_to_read().map_err(io::Error::from)? as usize;
        if pending == 0 || buf.is_empty() {
            return Ok(0);
        }
        let want = pending.min(buf.len());
        match port.read(&mut buf[..want]) {
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e),
        }
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_device() {
        let err = SerialTransport::open("/dev/maze-pilot-no-such-tty", 9600).unwrap_err();
        match err {
            LinkError::Open { port, .. } => assert_eq!(port, "/dev/maze-pilot-no-such-tty"),
            other => panic!("expected open error, got {:?}", other),
        }
    }
}
