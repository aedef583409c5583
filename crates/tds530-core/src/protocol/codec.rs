//! Framing for the instrument TCP stream.
//!
//! Replies have no length prefix; a frame ends at the line holding the
//! `END` terminator. Bytes received after the terminator stay in the buffer
//! and start the next frame.

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::error::ProtocolError;

/// Frame terminator: `END` followed by seven spaces.
pub const TERMINATOR: &[u8] = b"END       ";

/// Upper bound for buffered bytes while no terminator has been seen.
///
/// Only an unterminated buffer is checked: a longer reply whose terminator
/// is already in the buffer is still returned as one frame.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Requests understood by the instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `ST`: report the current value of every channel.
    Status,
}

impl Command {
    /// Wire bytes, including the CRLF line ending.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Status => b"ST\r\n",
        }
    }
}

/// Codec that writes [`Command`]s and yields complete reply frames as text.
///
/// Invalid UTF-8 in a reply is replaced rather than rejected.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_len: usize,
    /// Offset up to which the buffer was already searched.
    scanned: usize,
}

impl FrameCodec {
    pub const fn new() -> Self {
        Self::with_max_frame_len(MAX_FRAME_LEN)
    }

    pub const fn with_max_frame_len(max_frame_len: usize) -> Self {
        Self {
            max_frame_len,
            scanned: 0,
        }
    }

    fn find_terminator(&self, buf: &[u8]) -> Option<usize> {
        // Back off so a terminator split across reads is still found
        let from = self.scanned.saturating_sub(TERMINATOR.len() - 1);
        buf[from..]
            .windows(TERMINATOR.len())
            .position(|w| w == TERMINATOR)
            .map(|pos| from + pos)
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn is_line_break(b: u8) -> bool {
    b == b'\r' || b == b'\n'
}

impl Decoder for FrameCodec {
    type Item = String;
    type Error = ProtocolError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        // Line breaks left over from the previous frame's terminator line
        let leading = buf.iter().take_while(|b| is_line_break(**b)).count();
        if leading > 0 {
            buf.advance(leading);
            self.scanned = self.scanned.saturating_sub(leading);
        }

        let Some(pos) = self.find_terminator(buf) else {
            if buf.len() > self.max_frame_len {
                return Err(ProtocolError::FrameTooLarge {
                    max: self.max_frame_len,
                });
            }
            self.scanned = buf.len();
            return Ok(None);
        };

        let mut end = pos + TERMINATOR.len();
        while end < buf.len() && is_line_break(buf[end]) {
            end += 1;
        }

        let frame = buf.split_to(end);
        self.scanned = 0;
        Ok(Some(String::from_utf8_lossy(&frame).into_owned()))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, ProtocolError> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }
        // A partial reply cut off by the peer is dropped
        if !buf.is_empty() {
            tracing::debug!(bytes = buf.len(), "Discarding incomplete reply at end of stream");
            buf.clear();
        }
        self.scanned = 0;
        Ok(None)
    }
}

impl Encoder<Command> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, command: Command, dst: &mut BytesMut) -> Result<(), ProtocolError> {
        dst.put_slice(command.as_bytes());
        Ok(())
    }
}
