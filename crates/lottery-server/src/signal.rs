//! Cancellation binder (spec C8): converts an asynchronous termination
//! signal into a cooperative flag the server loop polls between
//! accept ticks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Install a handler for the process's interrupt/terminate signals
/// that flips `finished` to `true`. The server loop is responsible for
/// observing the flag; this function does not itself interrupt any
/// blocked call.
pub fn install(finished: Arc<AtomicBool>) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        finished.store(true, Ordering::SeqCst);
    })
}
