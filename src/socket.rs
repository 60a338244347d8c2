//! Blocking socket primitives: whole-buffer reads and writes with
//! classified outcomes, readiness polling, and socket-path discovery.
//!
//! Every transfer loops until the requested byte count is satisfied, so
//! partial progress is always retried within the same call. Outcomes are
//! classified into success, EOF, would-block and hard error; the
//! connection layer maps these onto the public error taxonomy.

use std::io::{self, ErrorKind, Read, Write};
use std::os::unix::io::RawFd;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::Error;

/// Classified failure of a whole-buffer transfer.
#[derive(Debug)]
pub(crate) enum IoFailure {
    /// The peer went away before the transfer completed.
    Eof {
        /// Bytes that were still outstanding when EOF was observed.
        remaining: usize,
    },
    /// A non-blocking socket had no data (or no buffer space).
    WouldBlock,
    /// Any other I/O failure.
    Err(io::Error),
}

/// Writes all of `buf`, retrying partial writes.
///
/// A broken pipe (or a zero-length write) counts as EOF, matching the
/// read side's classification.
pub(crate) fn write_full(stream: &mut UnixStream, buf: &[u8]) -> Result<(), IoFailure> {
    let mut done = 0;
    while done < buf.len() {
        match stream.write(&buf[done..]) {
            Ok(0) => return Err(IoFailure::Eof { remaining: buf.len() - done }),
            Ok(n) => done += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                return Err(IoFailure::Eof { remaining: buf.len() - done });
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => return Err(IoFailure::WouldBlock),
            Err(err) => return Err(IoFailure::Err(err)),
        }
    }
    Ok(())
}

/// Fills all of `buf`, retrying partial reads.
pub(crate) fn read_full(stream: &mut UnixStream, buf: &mut [u8]) -> Result<(), IoFailure> {
    let mut done = 0;
    while done < buf.len() {
        match stream.read(&mut buf[done..]) {
            Ok(0) => return Err(IoFailure::Eof { remaining: buf.len() - done }),
            Ok(n) => done += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => return Err(IoFailure::WouldBlock),
            Err(err) => return Err(IoFailure::Err(err)),
        }
    }
    Ok(())
}

/// Outcome of waiting for readability on the event socket.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PollStatus {
    /// Data is available for reading.
    Ready,
    /// The timeout elapsed with no data.
    TimedOut,
    /// The peer hung up or the descriptor errored.
    Hup,
}

/// Waits for `fd` to become readable.
///
/// `timeout_ms` follows `poll(2)` conventions: negative waits forever,
/// zero returns immediately.
pub(crate) fn poll_readable(fd: RawFd, timeout_ms: i32) -> crate::error::Result<PollStatus> {
    let mut pfd = libc::pollfd { fd, events: libc::POLLIN, revents: 0 };
    loop {
        let code = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
        if code == -1 {
            let err = io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                continue;
            }
            return Err(Error::Io(err));
        }
        if code == 0 {
            return Ok(PollStatus::TimedOut);
        }
        if pfd.revents & libc::POLLIN != 0 {
            return Ok(PollStatus::Ready);
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Ok(PollStatus::Hup);
        }
        return Ok(PollStatus::TimedOut);
    }
}

/// Determines the IPC socket path by running `i3 --get-socketpath`.
///
/// i3 prints the path followed by a newline and exits cleanly; anything
/// else (spawn failure, non-zero exit, missing newline, empty output) means
/// there is no usable peer, which classifies as [`Error::Closed`].
pub(crate) fn discover_socket_path() -> crate::error::Result<PathBuf> {
    let output = Command::new("i3")
        .arg("--get-socketpath")
        .output()
        .map_err(|err| Error::Closed(format!("running 'i3 --get-socketpath': {err}")))?;

    if !output.status.success() {
        return Err(Error::Closed(format!(
            "'i3 --get-socketpath' exited with {}",
            output.status
        )));
    }

    let stdout = String::from_utf8(output.stdout)
        .map_err(|_| Error::Closed("'i3 --get-socketpath' printed non-UTF-8 output".into()))?;
    let path = match stdout.strip_suffix('\n') {
        Some(path) if !path.is_empty() => path,
        _ => {
            return Err(Error::Closed(
                "'i3 --get-socketpath' output does not end with newline".into(),
            ));
        }
    };

    debug!(path, "discovered i3 socket path");
    Ok(PathBuf::from(path))
}

/// Connects a fresh stream socket to `path`.
pub(crate) fn connect_stream(path: &Path) -> crate::error::Result<UnixStream> {
    UnixStream::connect(path)
        .map_err(|err| Error::Closed(format!("connecting to '{}': {err}", path.display())))
}
