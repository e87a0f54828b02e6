//! Error types shared by the wire codec and transport layers.

use thiserror::Error;

/// Errors that can arise while reading, decoding or writing a single
/// connection's protocol traffic.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The peer half-closed the connection mid-frame.
    #[error("peer closed connection")]
    PeerClosed,

    /// Any other socket I/O failure.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A single bet's binary layout was truncated, oversized, or its
    /// birthdate/UTF-8 fields did not parse.
    #[error("malformed bet: {0}")]
    MalformedBet(String),

    /// The batch framing (`<uint8 bet_len, bet_len bytes>`*) did not
    /// cover the payload exactly.
    #[error("malformed batch: {0}")]
    MalformedBatch(String),
}

/// Convenience alias for fallible protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
