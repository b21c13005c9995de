//! Length-prefixed framing over a TCP stream: each envelope travels as a
//! u32 big-endian byte count followed by that many bytes.

use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;

use crate::dispatch::{Channel, ChannelError};

/// Frames larger than this are treated as a broken peer, not a request.
pub const MAX_FRAME_LEN: usize = 1 << 20;

pub struct FramedTcp {
    stream: TcpStream,
}

impl FramedTcp {
    pub fn new(stream: TcpStream) -> Self {
        Self { stream }
    }
}

impl Channel for FramedTcp {
    fn send(&mut self, frame: &[u8]) -> Result<(), ChannelError> {
        let len = u32::try_from(frame.len())
            .map_err(|_| std::io::Error::new(ErrorKind::InvalidInput, "frame too large"))?;
        self.stream.write_all(&len.to_be_bytes())?;
        self.stream.write_all(frame)?;
        self.stream.flush()?;
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>, ChannelError> {
        let mut len_bytes = [0u8; 4];
        if let Err(err) = self.stream.read_exact(&mut len_bytes) {
            // eof between frames is a normal hang-up
            if err.kind() == ErrorKind::UnexpectedEof {
                return Err(ChannelError::Disconnected);
            }
            return Err(err.into());
        }
        let len = u32::from_be_bytes(len_bytes) as usize;
        if len > MAX_FRAME_LEN {
            return Err(ChannelError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("frame length {len} exceeds cap"),
            )));
        }
        let mut frame = vec![0u8; len];
        self.stream.read_exact(&mut frame)?;
        Ok(frame)
    }
}
