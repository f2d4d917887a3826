//! Worker pipe protocol
//!
//! Parent and reducer processes exchange MessagePack (rmp-serde) messages over
//! pipes. The parent sends the sample on the child's stdin; the child answers
//! with one tagged result on the shared result pipe.
//!
//! # Message Flow
//!
//! ```text
//! Coordinator                   Reducer process
//!     |                              |
//!     |------- SAMPLE(values) ------>|  (child stdin)
//!     |                              |
//!     |<------ RESULT(kind, value) --|  (shared result pipe)
//! ```
//!
//! # Message Framing
//!
//! Each message is prefixed with a 4-byte length field (little-endian u32):
//!
//! ```text
//! [4 bytes: message length][N bytes: MessagePack-serialized message]
//! ```
//!
//! A frame is written with a single `write_all` call. Result frames are a few
//! dozen bytes, well under `PIPE_BUF`, so concurrent writers on the same pipe
//! never interleave.

use super::WorkerError;
use crate::stats::StatResult;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::{self, Read, Write};

/// Largest accepted message body
pub const MAX_FRAME_LEN: usize = 64 * 1024 * 1024;

/// Messages exchanged between coordinator and reducer processes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message<'a> {
    /// Sample values, coordinator to worker
    Sample(Cow<'a, [i32]>),
    /// Tagged statistic, worker to coordinator
    Result(StatResult),
}

/// Serialize a message with its length prefix
pub fn encode_frame(msg: &Message<'_>) -> Result<Vec<u8>, WorkerError> {
    let body = rmp_serde::to_vec(msg)
        .map_err(|e| WorkerError::Protocol(format!("failed to serialize message: {}", e)))?;

    if body.len() > MAX_FRAME_LEN {
        return Err(WorkerError::Protocol(format!(
            "message too large: {} bytes (max {})",
            body.len(),
            MAX_FRAME_LEN
        )));
    }

    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Write one framed message and flush
pub fn write_message<W: Write>(writer: &mut W, msg: &Message<'_>) -> Result<(), WorkerError> {
    let frame = encode_frame(msg)?;
    writer.write_all(&frame)?;
    writer.flush()?;
    Ok(())
}

/// Read one framed message
///
/// Returns `Ok(None)` on a clean end of stream, i.e. when the writer side was
/// closed exactly on a frame boundary.
pub fn read_message<R: Read>(reader: &mut R) -> Result<Option<Message<'static>>, WorkerError> {
    let mut len_buf = [0u8; 4];
    let mut filled = 0;
    while filled < len_buf.len() {
        match reader.read(&mut len_buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => return Err(WorkerError::Protocol("truncated frame header".into())),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let msg_len = u32::from_le_bytes(len_buf) as usize;
    if msg_len > MAX_FRAME_LEN {
        return Err(WorkerError::Protocol(format!(
            "message too large: {} bytes (max {})",
            msg_len, MAX_FRAME_LEN
        )));
    }

    let mut body = vec![0u8; msg_len];
    reader.read_exact(&mut body).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => WorkerError::Protocol("truncated frame body".into()),
        _ => WorkerError::Io(e),
    })?;

    let msg = rmp_serde::from_slice(&body)
        .map_err(|e| WorkerError::Protocol(format!("failed to deserialize message: {}", e)))?;
    Ok(Some(msg))
}
