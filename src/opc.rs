//! Open Pixel Control client.
//!
//! Only the "set pixel colors" message is implemented. Each message is a
//! four-byte header followed by packed RGB triplets:
//!
//! | byte | meaning                     |
//! |------|-----------------------------|
//! | 0    | channel (0 = all devices)   |
//! | 1    | command (0 = set colors)    |
//! | 2..4 | payload length, big-endian  |
//! | 4..  | r, g, b for each pixel      |

use crate::Color;
use crate::error::{Error, Result};
use std::io::Write;
use std::net::TcpStream;

const SET_PIXEL_COLORS: u8 = 0;
const HEADER_LEN: usize = 4;

/// Largest frame that fits in the 16-bit length field.
pub const MAX_PIXELS: usize = u16::MAX as usize / 3;

/// Anything that can accept a frame of pixels.
///
/// The send loop is written against this trait so tests can record frames
/// instead of opening sockets.
pub trait PixelSink {
    fn put_pixels(&mut self, channel: u8, pixels: &[Color]) -> Result<()>;
}

/// Encode one "set pixel colors" message.
pub fn encode(channel: u8, pixels: &[Color]) -> Result<Vec<u8>> {
    if pixels.len() > MAX_PIXELS {
        return Err(Error::FrameTooLarge {
            pixels: pixels.len(),
        });
    }
    let len = (pixels.len() * 3) as u16;

    let mut msg = Vec::with_capacity(HEADER_LEN + pixels.len() * 3);
    msg.push(channel);
    msg.push(SET_PIXEL_COLORS);
    msg.extend_from_slice(&len.to_be_bytes());
    for c in pixels {
        msg.extend_from_slice(&[c.r, c.g, c.b]);
    }
    Ok(msg)
}

/// OPC client over any byte stream, normally a [`TcpStream`].
#[derive(Debug)]
pub struct OpcClient<W: Write> {
    stream: W,
}

impl<W: Write> OpcClient<W> {
    pub fn new(stream: W) -> Self {
        Self { stream }
    }

    pub fn into_inner(self) -> W {
        self.stream
    }
}

impl<W: Write> PixelSink for OpcClient<W> {
    fn put_pixels(&mut self, channel: u8, pixels: &[Color]) -> Result<()> {
        let msg = encode(channel, pixels)?;
        self.stream
            .write_all(&msg)
            .and_then(|()| self.stream.flush())
            .map_err(|source| Error::Send { source })
    }
}

/// Connect to an OPC server given as `host:port`.
pub fn connect(server: &str) -> Result<OpcClient<TcpStream>> {
    match server.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {}
        _ => {
            return Err(Error::config(format!(
                "server address {server:?} must look like host:port"
            )));
        }
    }

    let stream = TcpStream::connect(server).map_err(|source| Error::Connect {
        addr: server.to_string(),
        source,
    })?;
    // Frames are small and latency matters more than throughput.
    if let Err(e) = stream.set_nodelay(true) {
        tracing::warn!("Could not disable Nagle on {}: {}", server, e);
    }
    Ok(OpcClient::new(stream))
}
