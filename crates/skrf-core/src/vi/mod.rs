//! Instrument control over raw SCPI sockets
//!
//! Commands are newline terminated; replies are single lines. Numeric block
//! replies are comma-separated ASCII.

mod tcp;
mod vna;

use thiserror::Error;

use crate::namespace::{ExportList, LoadError, ModuleDecl};

pub use tcp::{TcpInstrument, DEFAULT_TIMEOUT};
pub use vna::{Vna, MAX_POINTS};

/// Namespace declaration of this module
pub const MODULE: ModuleDecl = ModuleDecl::new("vi", exports);

fn exports() -> Result<ExportList, LoadError> {
    Ok(ExportList::new("vi", module_path!())
        .ty::<dyn Instrument>("Instrument")
        .ty::<TcpInstrument>("TcpInstrument")
        .ty::<Vna<TcpInstrument>>("Vna")
        .ty::<InstrumentError>("InstrumentError"))
}

#[derive(Error, Debug)]
pub enum InstrumentError {
    #[error("cannot connect to {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection closed by instrument")]
    Closed,

    #[error("unexpected reply to '{command}': {reply}")]
    Reply { command: String, reply: String },
}

/// A message-based instrument
pub trait Instrument {
    /// Send one command line
    fn write(&mut self, command: &str) -> Result<(), InstrumentError>;

    /// Read one reply line, without the terminator
    fn read(&mut self) -> Result<String, InstrumentError>;

    fn query(&mut self, command: &str) -> Result<String, InstrumentError> {
        self.write(command)?;
        self.read()
    }

    /// `*IDN?` reply
    fn identify(&mut self) -> Result<String, InstrumentError> {
        self.query("*IDN?")
    }

    /// Query a single number
    fn query_f64(&mut self, command: &str) -> Result<f64, InstrumentError> {
        let reply = self.query(command)?;
        reply.trim().parse().map_err(|_| InstrumentError::Reply {
            command: command.to_string(),
            reply,
        })
    }

    /// Query a comma-separated list of numbers
    fn query_values(&mut self, command: &str) -> Result<Vec<f64>, InstrumentError> {
        let reply = self.query(command)?;
        reply
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| InstrumentError::Reply {
                command: command.to_string(),
                reply,
            })
    }
}
