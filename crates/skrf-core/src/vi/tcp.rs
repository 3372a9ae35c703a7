use std::io::{BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::trace;

use super::{Instrument, InstrumentError};

/// Default timeout applied to socket operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Raw socket connection, usually port 5025
#[derive(Debug)]
pub struct TcpInstrument {
    address: String,
    stream: TcpStream,
    reader: BufReader<TcpStream>,
}

impl TcpInstrument {
    pub fn connect(address: &str, timeout: Duration) -> Result<Self, InstrumentError> {
        let connect_err = |source| InstrumentError::Connect {
            address: address.to_string(),
            source,
        };

        let socket_addr = address
            .to_socket_addrs()
            .map_err(connect_err)?
            .next()
            .ok_or_else(|| {
                connect_err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses resolved",
                ))
            })?;
        let stream = TcpStream::connect_timeout(&socket_addr, timeout).map_err(connect_err)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        let reader = BufReader::new(stream.try_clone()?);

        Ok(Self {
            address: address.to_string(),
            stream,
            reader,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl Instrument for TcpInstrument {
    fn write(&mut self, command: &str) -> Result<(), InstrumentError> {
        trace!(address = %self.address, command, "scpi write");
        self.stream.write_all(command.as_bytes())?;
        self.stream.write_all(b"\n")?;
        self.stream.flush()?;
        Ok(())
    }

    fn read(&mut self) -> Result<String, InstrumentError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InstrumentError::Closed);
        }
        let reply = line.trim_end_matches(['\r', '\n']).to_owned();
        trace!(address = %self.address, reply = %reply, "scpi read");
        Ok(reply)
    }
}
