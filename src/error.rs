//! Error type shared by the layout loader, the OPC client and the send loop.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("could not read layout file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse layout file {}", path.display())]
    Layout {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not parse layout")]
    Parse(#[from] serde_json::Error),

    #[error("could not connect to server at {addr}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to send frame")]
    Send {
        #[source]
        source: std::io::Error,
    },

    /// The OPC length field is a u16, so a frame holds at most 21845 pixels.
    #[error("frame of {pixels} pixels does not fit in one OPC message")]
    FrameTooLarge { pixels: usize },

    #[error("could not install Ctrl-C handler")]
    Signal(#[from] ctrlc::Error),
}

impl Error {
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}
