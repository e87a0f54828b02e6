//! The tagged unit of work a worker dequeues from `work_q` (spec C6).
//!
//! A single enum, discriminated by its variant — not by tuple arity,
//! per the spec's design note against reproducing the source's arity
//! trick.

use std::net::TcpStream;

/// One item of work for a worker thread to process.
pub enum WorkItem {
    /// A newly accepted connection, not yet classified.
    NewConn(TcpStream),
    /// Post-barrier task: send `winners` to `agency` over `conn`, then
    /// close it.
    Announce(TcpStream, u8, Vec<u32>),
    /// Poison pill: the worker should exit its loop.
    Stop,
}
