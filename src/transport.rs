use crate::error::SweepError;
use crate::scpi::{parse_block_header, F64_BYTES};
use log::{debug, trace, warn};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Request/response command channel to an instrument.
///
/// Implementations only move bytes; command sequencing belongs to the
/// session. A read that exceeds the current timeout must be reported as
/// [`SweepError::AcquisitionTimeout`] so the caller can tell it apart from
/// other I/O failures.
pub trait Transport {
    fn write(&mut self, cmd: &str) -> Result<(), SweepError>;

    /// One response line without its terminator
    fn read_line(&mut self) -> Result<String, SweepError>;

    /// Payload of one binary block response of `expected_len` bytes.
    ///
    /// A definite-length header announcing more than `expected_len` bytes is
    /// rejected before the payload is read. An indefinite-length (`#0`)
    /// payload is read as exactly `expected_len` bytes followed by the
    /// message terminator, since binary data may itself contain `\n`.
    fn read_block(&mut self, expected_len: usize) -> Result<Vec<u8>, SweepError>;

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), SweepError>;

    fn timeout(&self) -> Duration;

    /// Must be safe to call more than once
    fn close(&mut self) -> Result<(), SweepError>;

    fn query(&mut self, cmd: &str) -> Result<String, SweepError> {
        self.write(cmd)?;
        self.read_line()
    }

    fn query_block(&mut self, cmd: &str, expected_len: usize) -> Result<Vec<u8>, SweepError> {
        self.write(cmd)?;
        self.read_block(expected_len)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, cmd: &str) -> Result<(), SweepError> {
        (**self).write(cmd)
    }

    fn read_line(&mut self) -> Result<String, SweepError> {
        (**self).read_line()
    }

    fn read_block(&mut self, expected_len: usize) -> Result<Vec<u8>, SweepError> {
        (**self).read_block(expected_len)
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), SweepError> {
        (**self).set_timeout(timeout)
    }

    fn timeout(&self) -> Duration {
        (**self).timeout()
    }

    fn close(&mut self) -> Result<(), SweepError> {
        (**self).close()
    }
}

/// Newline-terminated SCPI over a raw TCP socket
pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    stream: TcpStream,
    timeout: Duration,
    closed: bool,
}

/// Default raw-socket SCPI port
pub const SCPI_PORT: u16 = 5025;

impl TcpTransport {
    pub fn connect(address: &str, port: u16, timeout: Duration) -> Result<TcpTransport, SweepError> {
        let socket_addr: SocketAddr = (address, port)
            .to_socket_addrs()
            .map_err(|e| SweepError::TransportError(format!("invalid address {address}: {e}")))?
            .next()
            .ok_or_else(|| SweepError::TransportError(format!("no address for {address}")))?;

        debug!("Connecting to instrument at {socket_addr}");
        let stream = TcpStream::connect_timeout(&socket_addr, timeout).map_err(|e| {
            warn!("Failed to connect to {socket_addr}: {e}");
            SweepError::TransportError(format!("connect to {socket_addr}: {e}"))
        })?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;

        let reader = BufReader::new(stream.try_clone()?);
        Ok(TcpTransport {
            reader,
            stream,
            timeout,
            closed: false,
        })
    }

    fn map_io(&self, err: io::Error) -> SweepError {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => {
                SweepError::AcquisitionTimeout(self.timeout)
            }
            _ => SweepError::TransportError(err.to_string()),
        }
    }

    fn ensure_open(&self) -> Result<(), SweepError> {
        if self.closed {
            return Err(SweepError::TransportError(
                "transport already closed".to_string(),
            ));
        }
        Ok(())
    }

    fn read_exact_bytes(&mut self, n: usize) -> Result<Vec<u8>, SweepError> {
        let mut buf = vec![0u8; n];
        self.reader
            .read_exact(&mut buf)
            .map_err(|e| self.map_io(e))?;
        Ok(buf)
    }
}

impl Transport for TcpTransport {
    fn write(&mut self, cmd: &str) -> Result<(), SweepError> {
        self.ensure_open()?;
        trace!("Send: {cmd}");
        let mut msg = Vec::with_capacity(cmd.len() + 1);
        msg.extend_from_slice(cmd.as_bytes());
        msg.push(b'\n');
        self.stream
            .write_all(&msg)
            .and_then(|_| self.stream.flush())
            .map_err(|e| self.map_io(e))
    }

    fn read_line(&mut self) -> Result<String, SweepError> {
        self.ensure_open()?;
        let mut line = String::new();
        let n = self
            .reader
            .read_line(&mut line)
            .map_err(|e| self.map_io(e))?;
        if n == 0 {
            return Err(SweepError::TransportError(
                "connection closed by instrument".to_string(),
            ));
        }
        let line = line.trim_end_matches(&['\r', '\n'][..]).to_string();
        trace!("Received: {line}");
        Ok(line)
    }

    fn read_block(&mut self, expected_len: usize) -> Result<Vec<u8>, SweepError> {
        self.ensure_open()?;
        let mut header = self.read_exact_bytes(2)?;
        let ndigits = match (header[1] as char).to_digit(10) {
            Some(d) => d as usize,
            None => 0,
        };
        header.extend(self.read_exact_bytes(ndigits)?);
        let (_, len) = parse_block_header(&header)?;

        let len = match len {
            Some(len) if len > expected_len => {
                warn!("Block of {len} bytes exceeds the expected {expected_len}");
                return Err(SweepError::MalformedSweepData {
                    expected: expected_len / F64_BYTES,
                    found: (len + F64_BYTES - 1) / F64_BYTES,
                });
            }
            Some(len) => len,
            None => expected_len,
        };
        let payload = self.read_exact_bytes(len)?;
        let term = self.read_exact_bytes(1)?;
        if header[1] == b'0' && term[0] != b'\n' {
            return Err(SweepError::TransportError(format!(
                "indefinite block longer than {expected_len} bytes"
            )));
        }
        trace!("Received block of {} bytes", payload.len());
        Ok(payload)
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<(), SweepError> {
        self.ensure_open()?;
        self.stream.set_read_timeout(Some(timeout))?;
        self.stream.set_write_timeout(Some(timeout))?;
        self.timeout = timeout;
        Ok(())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn close(&mut self) -> Result<(), SweepError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("Closing instrument connection");
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
