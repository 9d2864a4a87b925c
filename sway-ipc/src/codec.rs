//! i3-ipc framing.
//!
//! Every message, in both directions, is a fixed header followed by a JSON
//! payload:
//!
//! ```text
//! | "i3-ipc" | payload length: i32 | payload type: u32 | payload ... |
//! ```
//!
//! Integers are in native byte order, sway and its clients always share a
//! host.

use crate::buffer::ScratchBuffer;
use crate::error::{InvalidCode, Result, SwayIpcError};
use bytes::{Buf, BufMut};
use log::trace;
use serde_json::Value;
use std::io::{self, Read, Write};

/// Sway IPC magic string - "i3-ipc"
pub const MAGIC: [u8; 6] = *b"i3-ipc";
pub const MAGIC_LEN: usize = 6;
pub const HEADER_LEN: usize = MAGIC_LEN + 4 + 4;

/// Set on the payload type of every event frame.
pub const EVENT_FLAG: u32 = 0x80000000;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Header {
    pub payload_len: usize,
    pub payload_type: u32,
}

#[derive(Debug)]
pub struct Frame {
    pub payload_type: u32,
    pub document: Value,
}

/// Validates a received header. The length is only trusted after the magic
/// matched.
pub fn decode_header(raw: &[u8; HEADER_LEN]) -> Result<Header> {
    if raw[..MAGIC_LEN] != MAGIC {
        return Err(SwayIpcError::invalid(
            InvalidCode::BadMagic,
            format!(
                "Sway sent response with wrong magic string. Magic string was {:?}",
                String::from_utf8_lossy(&raw[..MAGIC_LEN])
            ),
        ));
    }

    let mut cursor = &raw[MAGIC_LEN..];
    let payload_len = cursor.get_i32_ne();
    let payload_type = cursor.get_u32_ne();

    if payload_len < 0 {
        return Err(SwayIpcError::invalid(
            InvalidCode::NegativeLength,
            format!(
                "Sway sent response with negative payload length {}",
                payload_len
            ),
        ));
    }

    Ok(Header {
        payload_len: payload_len as usize,
        payload_type,
    })
}

/// Writes one frame: the header and `payload_len` bytes produced by `fill`
/// leave in a single `write_all`.
///
/// `fill` receives a slice of exactly `payload_len` bytes and must write all
/// of it.
pub fn write_frame<W, F>(
    writer: &mut W,
    buffer: &mut ScratchBuffer,
    payload_type: u32,
    payload_len: usize,
    fill: F,
) -> Result<()>
where
    W: Write,
    F: FnOnce(&mut [u8]),
{
    let length = i32::try_from(payload_len).map_err(|_| {
        SwayIpcError::posix(
            format!("Payload of {} bytes does not fit into a frame", payload_len),
            io::Error::from_raw_os_error(libc::EMSGSIZE),
        )
    })?;

    let frame_len = HEADER_LEN + payload_len;
    buffer.allocate(frame_len);

    {
        let (mut header, payload) = buffer[..frame_len].split_at_mut(HEADER_LEN);
        header.put_slice(&MAGIC);
        header.put_i32_ne(length);
        header.put_u32_ne(payload_type);
        fill(payload);
    }

    trace!("Writing frame type {} with {} bytes.", payload_type, payload_len);
    writer.write_all(&buffer[..frame_len]).map_err(|err| {
        SwayIpcError::posix("Error when writing sway commands", err)
    })
}

pub fn write_payload<W: Write>(
    writer: &mut W,
    buffer: &mut ScratchBuffer,
    payload_type: u32,
    payload: &[u8],
) -> Result<()> {
    write_frame(writer, buffer, payload_type, payload.len(), |dst| {
        dst.copy_from_slice(payload)
    })
}

/// Reads exactly one frame and parses its payload.
pub fn read_frame<R: Read>(
    reader: &mut R,
    buffer: &mut ScratchBuffer,
) -> Result<Frame> {
    let mut raw = [0; HEADER_LEN];
    reader.read_exact(&mut raw).map_err(|err| {
        SwayIpcError::posix("Error when reading sway response header", err)
    })?;

    let header = decode_header(&raw)?;
    trace!(
        "Reading frame type {} with {} bytes.",
        header.payload_type, header.payload_len
    );

    buffer.allocate(header.payload_len);
    let payload = &mut buffer[..header.payload_len];
    reader.read_exact(payload).map_err(|err| {
        SwayIpcError::posix("Error when reading sway response", err)
    })?;

    let document = serde_json::from_slice(payload).map_err(|err| {
        SwayIpcError::json(err, "Parsing error when receiving response from sway")
    })?;

    Ok(Frame {
        payload_type: header.payload_type,
        document,
    })
}
