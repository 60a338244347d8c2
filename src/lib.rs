//! i3ipc-client - a client library for the i3 window manager IPC interface.
//!
//! The library speaks i3's framed control protocol over two UNIX stream
//! sockets: synchronous request/reply messages on one, subscriptions and
//! the resulting event stream on the other. Replies and events
//! materialize into plain Rust records.
//!
//! ```no_run
//! use i3ipc_client::{Connection, EventType};
//!
//! let mut conn = Connection::connect()?;
//! conn.run_command("workspace 2")?;
//!
//! conn.subscribe(&[EventType::Window])?;
//! while let Some(event) = conn.event_next(-1)? {
//!     println!("{event:?}");
//! }
//! # Ok::<(), i3ipc_client::Error>(())
//! ```
//!
//! All I/O is blocking and caller-driven; the library never reads without
//! an explicit request. For integration with external event loops, the
//! raw socket descriptors are exposed through
//! [`Connection::event_fd`] and [`Connection::message_fd`].

mod connection;
mod error;
pub mod global;
#[doc(hidden)]
pub mod json;
mod message;
pub mod schema;
mod socket;

pub use connection::Connection;
pub use error::{Error, ErrorKind, Result};
pub use message::{EventType, Expected, Frame, MessageType, HEADER_LEN, MAGIC};
pub use schema::event::Event;
pub use schema::node::Node;
