//! Length-prefixed framing over a connected byte stream.
//!
//! A single [`recv_frame`] call corresponds to exactly one application
//! message; no framing beyond the 2-byte little-endian length prefix
//! is defined at this layer.

use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{ProtocolError, Result};

/// Read one length-prefixed frame from `stream`.
///
/// Loops over short reads until the declared length is satisfied. A
/// half-closed peer mid-frame fails with [`ProtocolError::PeerClosed`];
/// any other I/O fault fails with [`ProtocolError::Transport`].
/// `length == 0` is permitted and yields an empty payload.
pub fn recv_frame<S: Read>(stream: &mut S) -> Result<Vec<u8>> {
    let len = read_exact_tolerant(stream, 2)?;
    let mut len_cursor: &[u8] = &len;
    let length = len_cursor
        .read_u16::<LittleEndian>()
        .expect("2-byte buffer always yields a u16") as usize;

    if length == 0 {
        return Ok(Vec::new());
    }

    read_exact_tolerant(stream, length)
}

/// Write the entire buffer to `stream`, looping over short writes.
pub fn send_all<S: Write>(stream: &mut S, data: &[u8]) -> Result<()> {
    stream.write_all(data).map_err(ProtocolError::Transport)
}

/// Write a length-prefixed frame: a 2-byte little-endian length
/// followed by `payload`.
pub fn send_frame<S: Write>(stream: &mut S, payload: &[u8]) -> Result<()> {
    let mut framed = Vec::with_capacity(2 + payload.len());
    framed
        .write_u16::<LittleEndian>(payload.len() as u16)
        .expect("writing to a Vec<u8> never fails");
    framed.extend_from_slice(payload);
    send_all(stream, &framed)
}

/// Read exactly `size` bytes, tolerating short reads, distinguishing a
/// clean peer half-close (0 bytes returned with some of `size` still
/// outstanding) from any other I/O failure.
fn read_exact_tolerant<S: Read>(stream: &mut S, size: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; size];
    let mut read = 0;
    while read < size {
        let n = stream.read(&mut buf[read..]).map_err(ProtocolError::Transport)?;
        if n == 0 {
            return Err(ProtocolError::PeerClosed);
        }
        read += n;
    }
    Ok(buf)
}
