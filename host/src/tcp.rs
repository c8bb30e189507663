//! TCP transport for a serial-to-network bridge
//!
//! The robot's serial port is exposed on a TCP socket (ser2net and similar
//! bridges). Reads are non-blocking so the feedback drain can poll; writes
//! switch the socket to blocking for the duration of one command.

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::LinkError;
use crate::link::Transport;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct TcpTransport {
    stream: Option<TcpStream>,
    address: String,
}

impl TcpTransport {
    /// # Errors
    /// [`LinkError::Connect`] if the address does not resolve or the
    /// connection cannot be established.
    pub fn connect(address: &str) -> Result<Self, LinkError> {
        let connect_err = |source: io::Error| LinkError::Connect {
            address: address.to_string(),
            source,
        };

        let addr = address
            .to_socket_addrs()
            .map_err(connect_err)?
            .next()
            .ok_or_else(|| connect_err(io::Error::new(io::ErrorKind::NotFound, "address did not resolve")))?;

        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).map_err(connect_err)?;
        stream.set_nodelay(true).map_err(connect_err)?;
        stream.set_nonblocking(true).map_err(connect_err)?;

        tracing::info!("connected to {}", address);
        Ok(Self {
            stream: Some(stream),
            address: address.to_string(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.shutdown(Shutdown::Both);
            tracing::info!("closed connection to {}", self.address);
        }
    }

    fn stream(&mut self) -> io::Result<&mut TcpStream> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection closed"))
    }
}

impl Transport for TcpTransport {
    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        let stream = self.stream()?;
        stream.set_nonblocking(false)?;
        let result = stream.write_all(bytes).and_then(|()| stream.flush());
        stream.set_nonblocking(true)?;
        result
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let stream = self.stream()?;
        match stream.read(buf) {
            Ok(0) => {
                self.stream = None;
                Err(io::Error::new(io::ErrorKind::UnexpectedEof, "peer closed the connection"))
            }
            Ok(n) => Ok(n),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Err(e) => Err(e),
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.close();
    }
}
