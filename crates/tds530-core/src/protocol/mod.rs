//! TDS530 line protocol.
//!
//! The logger is polled with `ST\r\n` and answers with a timestamp line, one
//! `M%03d  %lf` line per channel and an `END` terminator line.

mod codec;
mod error;
mod parse;

pub use codec::{Command, FrameCodec, MAX_FRAME_LEN, TERMINATOR};
pub use error::ProtocolError;
pub use parse::{parse_frame, parse_reading, parse_timestamp};
