//! The connection to i3: two sockets, the reordering transport, and one
//! method per protocol message.
//!
//! i3 serves requests and subscriptions over the same socket path, but a
//! subscription turns a socket into an event firehose, so the library
//! keeps two independent connections: all synchronous messages use the
//! message socket, subscribe and event reads use the event socket.
//!
//! Because events arrive asynchronously, the reply to a subscribe request
//! can be interleaved with events that raced it. [`Connection`] resolves
//! this with a reordering receive: frames that do not match the awaited
//! type are pushed onto a pending queue and handed out, in arrival order,
//! by later [`event_next`](Connection::event_next) calls. No event is
//! dropped and event-to-event order is preserved.
//!
//! Errors latch: after a failure every operation returns
//! [`Error::BadState`] until [`reinitialize`](Connection::reinitialize).

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, ErrorKind, Result};
use crate::message::{
    decode_header, describe_type, encode_frame, EventType, Expected, Frame, MessageType,
    HEADER_LEN, MAX_MESSAGE_LEN,
};
use crate::schema::bar::BarConfig;
use crate::schema::event::Event;
use crate::schema::reply::{
    BarConfigIdsReply, BindingModesReply, CommandOutcome, CommandReply, ConfigReply, MarksReply,
    OutputsReply, StatusReply, TreeReply, Version, WorkspacesReply,
};
use crate::schema::{from_payload, FromJson};
use crate::socket::{self, IoFailure, PollStatus};

enum State {
    Ready,
    Poisoned(ErrorKind),
}

/// Which of the two sockets an operation talks to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Message,
    Event,
}

/// A connection pair to one i3 instance.
pub struct Connection {
    messages: UnixStream,
    events: UnixStream,
    socket_path: PathBuf,
    /// Whether the caller supplied the path. Discovered paths are
    /// re-discovered on reinitialization, the peer may have moved.
    explicit_path: bool,
    state: State,
    /// Events received while waiting for a specific reply, in arrival
    /// order. Drained by `event_next` before any fresh read.
    pending: VecDeque<Frame>,
    send_buf: Vec<u8>,
    payload_buf: String,
}

impl Connection {
    /// Connects to the running i3 instance, discovering the socket path
    /// with `i3 --get-socketpath`.
    pub fn connect() -> Result<Connection> {
        let path = socket::discover_socket_path()?;
        Self::open(path, false)
    }

    /// Connects to an explicit socket path.
    pub fn connect_to(path: impl AsRef<Path>) -> Result<Connection> {
        Self::open(path.as_ref().to_path_buf(), true)
    }

    fn open(path: PathBuf, explicit: bool) -> Result<Connection> {
        let messages = socket::connect_stream(&path)?;
        let events = socket::connect_stream(&path)?;
        debug!(path = %path.display(), "connected message and event sockets");
        Ok(Connection {
            messages,
            events,
            socket_path: path,
            explicit_path: explicit,
            state: State::Ready,
            pending: VecDeque::new(),
            send_buf: Vec::new(),
            payload_buf: String::new(),
        })
    }

    /// The latched error classification, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self.state {
            State::Ready => None,
            State::Poisoned(kind) => Some(kind),
        }
    }

    /// Clears a latched error.
    ///
    /// Hard errors (and `force`) tear down both sockets, drop all pending
    /// events and reconnect; a latched [`ErrorKind::Failed`] only needs
    /// its flag cleared. Calling this on a healthy connection does
    /// nothing.
    pub fn reinitialize(&mut self, force: bool) -> Result<()> {
        let kind = match self.state {
            State::Ready => return Ok(()),
            State::Poisoned(kind) => kind,
        };
        if kind.is_hard() || force {
            if !self.explicit_path {
                self.socket_path = socket::discover_socket_path()?;
            }
            self.messages = socket::connect_stream(&self.socket_path)?;
            self.events = socket::connect_stream(&self.socket_path)?;
            self.pending.clear();
            debug!(path = %self.socket_path.display(), "reinitialized connection");
        }
        self.state = State::Ready;
        Ok(())
    }

    /// Raw descriptor of the event socket, for integration with external
    /// `poll`/`select` loops.
    pub fn event_fd(&self) -> RawFd {
        self.events.as_raw_fd()
    }

    /// Raw descriptor of the message socket.
    pub fn message_fd(&self) -> RawFd {
        self.messages.as_raw_fd()
    }

    fn guard(&self) -> Result<()> {
        match self.state {
            State::Ready => Ok(()),
            State::Poisoned(kind) => Err(Error::BadState(kind)),
        }
    }

    /// Latches the first failure; later errors keep the original state.
    fn latch<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            let kind = err.kind();
            if kind != ErrorKind::BadState && matches!(self.state, State::Ready) {
                self.state = State::Poisoned(kind);
            }
        }
        result
    }

    /// Runs one operation under the guard/latch discipline.
    fn run<T>(&mut self, op: impl FnOnce(&mut Connection) -> Result<T>) -> Result<T> {
        self.guard()?;
        let result = op(self);
        self.latch(result)
    }

    fn stream(&mut self, role: Role) -> &mut UnixStream {
        match role {
            Role::Message => &mut self.messages,
            Role::Event => &mut self.events,
        }
    }

    /// Sends one frame. Subscribe goes to the event socket, everything
    /// else to the message socket; types without a payload always send an
    /// empty one.
    pub fn send_message(&mut self, ty: MessageType, payload: &[u8]) -> Result<()> {
        self.run(|conn| conn.send_inner(ty, payload))
    }

    fn send_inner(&mut self, ty: MessageType, payload: &[u8]) -> Result<()> {
        let payload = match ty {
            MessageType::RunCommand
            | MessageType::Subscribe
            | MessageType::SendTick
            | MessageType::Sync
            | MessageType::GetBarConfig => payload,
            _ => &[],
        };
        let role = if ty == MessageType::Subscribe { Role::Event } else { Role::Message };

        self.send_buf.clear();
        let mut buf = std::mem::take(&mut self.send_buf);
        encode_frame(&mut buf, ty as u32, payload);
        let on_event_socket = role == Role::Event;
        debug!(
            ty = ty.request_name(),
            length = payload.len(),
            payload = %String::from_utf8_lossy(payload),
            on_event_socket,
            "sending message"
        );
        let outcome = socket::write_full(self.stream(role), &buf);
        self.send_buf = buf;

        match outcome {
            Ok(()) => Ok(()),
            Err(IoFailure::Eof { remaining }) => Err(Error::Closed(format!(
                "eof while writing message ({remaining} bytes left to write)"
            ))),
            Err(IoFailure::WouldBlock) => {
                Err(Error::Io(std::io::ErrorKind::WouldBlock.into()))
            }
            Err(IoFailure::Err(err)) => Err(Error::Io(err)),
        }
    }

    fn read_exact(&mut self, role: Role, buf: &mut [u8]) -> Result<()> {
        match socket::read_full(self.stream(role), buf) {
            Ok(()) => Ok(()),
            Err(IoFailure::Eof { remaining }) => Err(Error::Closed(format!(
                "unexpected eof ({remaining} bytes left to read)"
            ))),
            Err(IoFailure::WouldBlock) => {
                Err(Error::Io(std::io::ErrorKind::WouldBlock.into()))
            }
            Err(IoFailure::Err(err)) => Err(Error::Io(err)),
        }
    }

    fn receive_frame(&mut self, role: Role) -> Result<Frame> {
        let mut head = [0u8; HEADER_LEN];
        self.read_exact(role, &mut head)?;
        let (length, ty) = decode_header(&head);

        if length < 0 {
            return Err(Error::Malformed(format!(
                "i3 sent message with negative length ({length})"
            )));
        }
        let total = HEADER_LEN + length as usize + 1;
        if total > MAX_MESSAGE_LEN {
            return Err(Error::Malformed(format!(
                "i3 sent too-long message (size {total}, max is {MAX_MESSAGE_LEN})"
            )));
        }

        let mut payload = vec![0u8; length as usize];
        self.read_exact(role, &mut payload)?;
        let on_event_socket = role == Role::Event;
        debug!(
            ty = describe_type(ty),
            length,
            payload = %String::from_utf8_lossy(&payload),
            on_event_socket,
            "received message"
        );
        Ok(Frame { ty, payload })
    }

    /// Receives exactly one frame and insists on the expected type.
    /// A mismatch is a transport error, not a frame error.
    pub fn receive_matching(&mut self, expected: Expected) -> Result<Frame> {
        self.run(|conn| conn.receive_matching_inner(expected))
    }

    fn receive_matching_inner(&mut self, expected: Expected) -> Result<Frame> {
        let role = match expected {
            Expected::Reply(MessageType::Subscribe) | Expected::AnyEvent => Role::Event,
            Expected::Reply(_) => Role::Message,
        };
        let frame = self.receive_frame(role)?;
        if !expected.matches(frame.ty) {
            return Err(Error::Malformed(format!(
                "message type does not match, expected {}, got {}({:#x})",
                expected.describe(),
                describe_type(frame.ty),
                frame.ty
            )));
        }
        Ok(frame)
    }

    /// Receives frames until one matches `expected`, queueing everything
    /// else for later `event_next` calls. The pending queue is consulted
    /// first, so already-buffered frames keep their arrival order.
    pub fn receive_reordering(&mut self, expected: Expected) -> Result<Frame> {
        self.run(|conn| conn.receive_reordering_inner(expected))
    }

    fn receive_reordering_inner(&mut self, expected: Expected) -> Result<Frame> {
        if let Some(at) = self.pending.iter().position(|frame| expected.matches(frame.ty)) {
            return Ok(self.pending.remove(at).unwrap());
        }
        loop {
            let frame = self.receive_matching_inner(Expected::AnyEvent)?;
            if expected.matches(frame.ty) {
                return Ok(frame);
            }
            debug!(ty = describe_type(frame.ty), "queueing frame received out of order");
            self.pending.push_back(frame);
        }
    }

    /// One synchronous round trip: send, receive the matching reply,
    /// materialize it.
    fn request<T: FromJson>(&mut self, ty: MessageType, payload: &[u8]) -> Result<T> {
        self.send_inner(ty, payload)?;
        let mut frame = self.receive_matching_inner(Expected::Reply(ty))?;
        from_payload(&mut frame.payload)
    }

    /// Runs an i3 command and returns the per-subcommand outcomes.
    ///
    /// Any `success: false` entry is turned into
    /// [`Error::CommandFailed`] carrying the peer's error string and the
    /// index of the offending subcommand. Use
    /// [`run_command_results`](Connection::run_command_results) to inspect
    /// failures yourself.
    pub fn run_command(&mut self, command: &str) -> Result<CommandReply> {
        self.run(|conn| {
            let reply: CommandReply = conn.request(MessageType::RunCommand, command.as_bytes())?;
            for (index, outcome) in reply.iter().enumerate() {
                if !outcome.success {
                    return Err(Error::CommandFailed {
                        index,
                        message: outcome.error.clone().unwrap_or_default(),
                    });
                }
            }
            Ok(reply)
        })
    }

    /// Runs an i3 command without inspecting the outcomes.
    pub fn run_command_results(&mut self, command: &str) -> Result<Vec<CommandOutcome>> {
        self.run(|conn| conn.request(MessageType::RunCommand, command.as_bytes()))
    }

    /// Lists all workspaces.
    pub fn get_workspaces(&mut self) -> Result<WorkspacesReply> {
        self.run(|conn| conn.request(MessageType::GetWorkspaces, &[]))
    }

    /// Lists all outputs.
    pub fn get_outputs(&mut self) -> Result<OutputsReply> {
        self.run(|conn| conn.request(MessageType::GetOutputs, &[]))
    }

    /// Fetches the container tree.
    pub fn get_tree(&mut self) -> Result<TreeReply> {
        self.run(|conn| conn.request(MessageType::GetTree, &[]))
    }

    /// Lists all marks.
    pub fn get_marks(&mut self) -> Result<MarksReply> {
        self.run(|conn| conn.request(MessageType::GetMarks, &[]))
    }

    /// Lists the configured bar ids.
    pub fn get_bar_config_ids(&mut self) -> Result<BarConfigIdsReply> {
        self.run(|conn| conn.request(MessageType::GetBarConfig, &[]))
    }

    /// Fetches the configuration of one bar by id.
    pub fn get_bar_config(&mut self, id: &str) -> Result<BarConfig> {
        self.run(|conn| conn.request(MessageType::GetBarConfig, id.as_bytes()))
    }

    /// Queries version information.
    pub fn get_version(&mut self) -> Result<Version> {
        self.run(|conn| conn.request(MessageType::GetVersion, &[]))
    }

    /// Convenience: just the `(major, minor, patch)` triple.
    pub fn version_triple(&mut self) -> Result<(i32, i32, i32)> {
        let version = self.get_version()?;
        Ok((version.major, version.minor, version.patch))
    }

    /// Lists the binding modes.
    pub fn get_binding_modes(&mut self) -> Result<BindingModesReply> {
        self.run(|conn| conn.request(MessageType::GetBindingModes, &[]))
    }

    /// Fetches the raw contents of the last loaded config file.
    pub fn get_config(&mut self) -> Result<ConfigReply> {
        self.run(|conn| conn.request(MessageType::GetConfig, &[]))
    }

    /// Broadcasts a tick with the given payload to tick subscribers.
    pub fn send_tick(&mut self, payload: &str) -> Result<()> {
        self.run(|conn| {
            let reply: StatusReply = conn.request(MessageType::SendTick, payload.as_bytes())?;
            if !reply.success {
                return Err(Error::Malformed("i3 rejected the tick".into()));
            }
            Ok(())
        })
    }

    /// Sends a sync request tying `rnd` to an X11 `window`. See the i3
    /// sync protocol documentation.
    pub fn sync(&mut self, rnd: u32, window: u64) -> Result<()> {
        self.run(|conn| {
            let mut payload = std::mem::take(&mut conn.payload_buf);
            payload.clear();
            let _ = write!(payload, r#"{{"rnd":{rnd},"window":{window}}}"#);
            let result: Result<StatusReply> = conn.request(MessageType::Sync, payload.as_bytes());
            conn.payload_buf = payload;
            if !result?.success {
                return Err(Error::Malformed("i3 rejected the sync request".into()));
            }
            Ok(())
        })
    }

    /// Subscribes the event socket to the given event types.
    ///
    /// The payload is a hand-built JSON array of event names. Events that
    /// arrive while the subscribe reply is in flight are queued, not
    /// lost; the next [`event_next`](Connection::event_next) call will
    /// deliver them in order.
    pub fn subscribe(&mut self, events: &[EventType]) -> Result<()> {
        self.run(|conn| {
            let mut payload = std::mem::take(&mut conn.payload_buf);
            payload.clear();
            payload.push('[');
            for (i, event) in events.iter().enumerate() {
                if i > 0 {
                    payload.push(',');
                }
                payload.push('"');
                payload.push_str(event.name());
                payload.push('"');
            }
            payload.push(']');

            let sent = conn.send_inner(MessageType::Subscribe, payload.as_bytes());
            conn.payload_buf = payload;
            sent?;

            let mut frame =
                conn.receive_reordering_inner(Expected::Reply(MessageType::Subscribe))?;
            let reply: StatusReply = from_payload(&mut frame.payload)?;
            if !reply.success {
                return Err(Error::Malformed("i3 rejected the subscription".into()));
            }
            Ok(())
        })
    }

    /// Subscribes to a single event type.
    pub fn subscribe_one(&mut self, event: EventType) -> Result<()> {
        self.subscribe(&[event])
    }

    /// Waits for the next event.
    ///
    /// Events queued by an earlier reordering receive are delivered
    /// first, before any fresh read. `timeout_ms` follows `poll(2)`
    /// conventions: negative waits forever, zero polls. `Ok(None)` means
    /// the timeout elapsed.
    pub fn event_next(&mut self, timeout_ms: i32) -> Result<Option<Event>> {
        self.run(|conn| {
            if let Some(mut frame) = conn.pending.pop_front() {
                return Ok(Some(Event::from_frame(&mut frame)?));
            }

            match socket::poll_readable(conn.events.as_raw_fd(), timeout_ms)? {
                PollStatus::TimedOut => return Ok(None),
                PollStatus::Hup => {
                    return Err(Error::Closed("event socket hung up".into()));
                }
                PollStatus::Ready => {}
            }

            let mut frame = conn.receive_reordering_inner(Expected::AnyEvent)?;
            Ok(Some(Event::from_frame(&mut frame)?))
        })
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("socket_path", &self.socket_path)
            .field("error_kind", &self.error_kind())
            .field("pending_events", &self.pending.len())
            .finish()
    }
}
