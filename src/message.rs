//! Wire frame codec for the i3 IPC protocol.
//!
//! Every message is a packed 14-byte header followed by a UTF-8 JSON
//! payload:
//!
//! - 6 magic bytes `"i3-ipc"`
//! - payload length as a little-endian `i32`
//! - message type as a little-endian `u32`
//!
//! Reply types occupy 0..=11; event types reuse the same numbering with
//! the high bit set, so the two ranges never collide.

use byteorder::{ByteOrder, LittleEndian};
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// The magic bytes stamped at the start of every frame.
pub const MAGIC: [u8; 6] = *b"i3-ipc";

/// Size of the packed frame header in bytes.
pub const HEADER_LEN: usize = 14;

/// Hard cap on `header + payload + 1`; i3 never sends anything close.
pub(crate) const MAX_MESSAGE_LEN: usize = 256 * 1024 * 1024;

/// High bit distinguishing event frames from reply frames.
pub(crate) const EVENT_BIT: u32 = 1 << 31;

/// Message (and reply) types of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum MessageType {
    /// Run one or more semicolon-separated commands.
    RunCommand = 0,
    /// List workspaces.
    GetWorkspaces = 1,
    /// Subscribe the event socket to a set of event types.
    Subscribe = 2,
    /// List outputs.
    GetOutputs = 3,
    /// Fetch the full container tree.
    GetTree = 4,
    /// List all marks.
    GetMarks = 5,
    /// Fetch bar configuration (ids without a payload, one bar by name).
    GetBarConfig = 6,
    /// Query version information.
    GetVersion = 7,
    /// List binding modes.
    GetBindingModes = 8,
    /// Fetch the raw last-loaded config.
    GetConfig = 9,
    /// Broadcast a tick event to subscribers.
    SendTick = 10,
    /// Sync with the X server through i3.
    Sync = 11,
}

static MESSAGE_TYPE_NAMES: [&str; 12] = [
    "run_command",
    "get_workspaces",
    "subscribe",
    "get_outputs",
    "get_tree",
    "get_marks",
    "get_bar_config",
    "get_version",
    "get_binding_modes",
    "get_config",
    "send_tick",
    "sync",
];

static REPLY_TYPE_NAMES: [&str; 12] = [
    "command",
    "workspaces",
    "subscribe",
    "outputs",
    "tree",
    "marks",
    "bar_config",
    "version",
    "binding_modes",
    "config",
    "tick",
    "sync",
];

impl MessageType {
    /// Name of the outgoing message, for diagnostics.
    pub fn request_name(self) -> &'static str {
        MESSAGE_TYPE_NAMES[self as usize]
    }

    /// Name of the corresponding reply, for diagnostics.
    pub fn reply_name(self) -> &'static str {
        REPLY_TYPE_NAMES[self as usize]
    }
}

/// Event types deliverable on the event socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum EventType {
    /// Workspace focus/lifecycle changes.
    Workspace = 0,
    /// Output layout changes.
    Output = 1,
    /// Binding mode changes.
    Mode = 2,
    /// Window lifecycle and property changes.
    Window = 3,
    /// A bar configuration was updated.
    BarconfigUpdate = 4,
    /// A binding was triggered.
    Binding = 5,
    /// i3 is restarting or exiting.
    Shutdown = 6,
    /// A tick broadcast.
    Tick = 7,
}

static EVENT_TYPE_NAMES: [&str; 8] = [
    "workspace",
    "output",
    "mode",
    "window",
    "barconfig_update",
    "binding",
    "shutdown",
    "tick",
];

impl EventType {
    /// The name i3 uses for this event in the subscribe payload.
    pub fn name(self) -> &'static str {
        EVENT_TYPE_NAMES[self as usize]
    }

    /// The on-wire frame type: the event number with the high bit set.
    pub fn wire(self) -> u32 {
        self as u32 | EVENT_BIT
    }

    /// Recovers the event type from a frame type, if it is one.
    pub fn from_wire(ty: u32) -> Option<EventType> {
        if ty & EVENT_BIT == 0 {
            return None;
        }
        EventType::from_u32(ty & !EVENT_BIT)
    }
}

/// Renders a frame type for logs and error messages.
pub(crate) fn describe_type(ty: u32) -> &'static str {
    if let Some(event) = EventType::from_wire(ty) {
        return EVENT_TYPE_NAMES[event as usize];
    }
    match MessageType::from_u32(ty) {
        Some(msg) => msg.reply_name(),
        None => "invalid",
    }
}

/// What a receive operation is willing to accept.
#[derive(Debug, Clone, Copy)]
pub enum Expected {
    /// Exactly the reply to the given message type.
    Reply(MessageType),
    /// Any event, or a subscribe reply (which races with events).
    AnyEvent,
}

impl Expected {
    /// Whether a frame of type `ty` satisfies this expectation.
    pub fn matches(self, ty: u32) -> bool {
        match self {
            Expected::Reply(msg) => ty == msg as u32,
            Expected::AnyEvent => {
                ty == MessageType::Subscribe as u32 || EventType::from_wire(ty).is_some()
            }
        }
    }

    pub(crate) fn describe(self) -> &'static str {
        match self {
            Expected::Reply(msg) => msg.reply_name(),
            Expected::AnyEvent => "<any event or subscribe>",
        }
    }
}

/// One received frame: the raw type tag and the owned JSON payload.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw frame type (reply number, or event number with the high bit).
    pub ty: u32,
    /// JSON payload bytes. The scanner decodes escapes in place here.
    pub payload: Vec<u8>,
}

impl Frame {
    /// The event type of this frame, if it is an event.
    pub fn event_type(&self) -> Option<EventType> {
        EventType::from_wire(self.ty)
    }
}

/// Appends a complete frame (header + payload) to `buf`.
pub(crate) fn encode_frame(buf: &mut Vec<u8>, ty: u32, payload: &[u8]) {
    buf.reserve(HEADER_LEN + payload.len());
    buf.extend_from_slice(&MAGIC);
    let mut word = [0u8; 4];
    LittleEndian::write_i32(&mut word, payload.len() as i32);
    buf.extend_from_slice(&word);
    LittleEndian::write_u32(&mut word, ty);
    buf.extend_from_slice(&word);
    buf.extend_from_slice(payload);
}

/// Splits a received header into `(payload_length, frame_type)`.
///
/// The magic bytes of incoming frames are not checked; only the length is
/// validated by the caller. This matches the peer contract, which never
/// interleaves non-IPC data on the socket.
pub(crate) fn decode_header(head: &[u8; HEADER_LEN]) -> (i32, u32) {
    let length = LittleEndian::read_i32(&head[6..10]);
    let ty = LittleEndian::read_u32(&head[10..14]);
    (length, ty)
}
