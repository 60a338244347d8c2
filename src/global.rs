//! A process-wide default connection.
//!
//! Most programs should pass a [`Connection`] around explicitly. This
//! facade exists for the small scripts that do not want to: it keeps one
//! lazily-opened connection behind a mutex and lends it out per call.

use std::sync::{Mutex, OnceLock};

use crate::connection::Connection;
use crate::error::Result;

static DEFAULT: OnceLock<Mutex<Option<Connection>>> = OnceLock::new();

fn cell() -> &'static Mutex<Option<Connection>> {
    DEFAULT.get_or_init(|| Mutex::new(None))
}

/// Runs `op` against the default connection, opening it on first use via
/// socket-path discovery. Calls are serialized by a mutex, so this is
/// safe (if slow) to use across threads.
pub fn with_default<T>(op: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
    let mut slot = cell().lock().unwrap_or_else(|poison| poison.into_inner());
    if slot.is_none() {
        *slot = Some(Connection::connect()?);
    }
    op(slot.as_mut().expect("just connected"))
}

/// Drops the default connection. The next [`with_default`] call opens a
/// fresh one, re-running socket discovery.
pub fn disconnect_default() {
    let mut slot = cell().lock().unwrap_or_else(|poison| poison.into_inner());
    *slot = None;
}
