//! Event records and the tagged union delivered by the event socket.
//!
//! The wire carries the event kind in the frame type, not in the JSON
//! payload, so [`Event`] is built from a whole frame; the enum
//! discriminant is the tag.

use crate::error::{Error, Result};
use crate::json::writer::JsonWriter;
use crate::json::TokenCursor;
use crate::message::{describe_type, EventType, Frame};
use crate::schema::bar::BarConfig;
use crate::schema::node::Node;
use crate::schema::{field_omit, field_opt, from_payload, string_enum, EmitJson, FromJson};

/// One event notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Workspace(WorkspaceEvent),
    Output(OutputEvent),
    Mode(ModeEvent),
    Window(WindowEvent),
    /// The updated configuration; the payload is the bar config object
    /// itself.
    BarconfigUpdate(BarConfig),
    Binding(BindingEvent),
    Shutdown(ShutdownEvent),
    Tick(TickEvent),
}

impl Event {
    /// The wire tag of this event.
    pub fn event_type(&self) -> EventType {
        match self {
            Event::Workspace(_) => EventType::Workspace,
            Event::Output(_) => EventType::Output,
            Event::Mode(_) => EventType::Mode,
            Event::Window(_) => EventType::Window,
            Event::BarconfigUpdate(_) => EventType::BarconfigUpdate,
            Event::Binding(_) => EventType::Binding,
            Event::Shutdown(_) => EventType::Shutdown,
            Event::Tick(_) => EventType::Tick,
        }
    }

    /// Materializes an event from a received frame, dispatching on the
    /// frame type. The payload is scanned destructively.
    pub fn from_frame(frame: &mut Frame) -> Result<Event> {
        let Some(kind) = frame.event_type() else {
            return Err(Error::Malformed(format!(
                "expected an event, got {}({:#x})",
                describe_type(frame.ty),
                frame.ty
            )));
        };
        let payload = &mut frame.payload;
        Ok(match kind {
            EventType::Workspace => Event::Workspace(from_payload(payload)?),
            EventType::Output => Event::Output(from_payload(payload)?),
            EventType::Mode => Event::Mode(from_payload(payload)?),
            EventType::Window => Event::Window(from_payload(payload)?),
            EventType::BarconfigUpdate => Event::BarconfigUpdate(from_payload(payload)?),
            EventType::Binding => Event::Binding(from_payload(payload)?),
            EventType::Shutdown => Event::Shutdown(from_payload(payload)?),
            EventType::Tick => Event::Tick(from_payload(payload)?),
        })
    }
}

impl EmitJson for Event {
    fn emit_json(&self, w: &mut JsonWriter) {
        match self {
            Event::Workspace(ev) => ev.emit_json(w),
            Event::Output(ev) => ev.emit_json(w),
            Event::Mode(ev) => ev.emit_json(w),
            Event::Window(ev) => ev.emit_json(w),
            Event::BarconfigUpdate(cfg) => cfg.emit_json(w),
            Event::Binding(ev) => ev.emit_json(w),
            Event::Shutdown(ev) => ev.emit_json(w),
            Event::Tick(ev) => ev.emit_json(w),
        }
    }
}

string_enum! {
    /// What happened to a workspace.
    pub enum WorkspaceChange {
        Focus = "focus",
        Init = "init",
        Empty = "empty",
        Urgent = "urgent",
        Reload = "reload",
        Rename = "rename",
        Restored = "restored",
        Move = "move",
    }
}

/// Workspace lifecycle notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceEvent {
    pub change: String,
    pub change_kind: Option<WorkspaceChange>,
    /// The workspace the event is about. Absent for `reload`.
    pub current: Option<Box<Node>>,
    /// The previously focused workspace, for `focus` changes.
    pub old: Option<Box<Node>>,
}

impl FromJson for WorkspaceEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<WorkspaceEvent> {
        let mut out = WorkspaceEvent::default();
        cur.object(|cur, key| {
            match key {
                "change" => {
                    out.change = String::from_json(cur)?;
                    out.change_kind = WorkspaceChange::from_name(&out.change);
                }
                "current" => out.current = FromJson::from_json(cur)?,
                "old" => out.old = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for WorkspaceEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("change").value_str(&self.change);
        field_omit(&mut obj, "current", &self.current);
        field_omit(&mut obj, "old", &self.old);
        obj.finish();
    }
}

string_enum! {
    /// What happened to an output.
    pub enum OutputChange {
        Unspecified = "unspecified",
    }
}

/// Output layout notification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputEvent {
    pub change: String,
    pub change_kind: Option<OutputChange>,
}

impl FromJson for OutputEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<OutputEvent> {
        let mut out = OutputEvent::default();
        cur.object(|cur, key| {
            match key {
                "change" => {
                    out.change = String::from_json(cur)?;
                    out.change_kind = OutputChange::from_name(&out.change);
                }
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for OutputEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("change").value_str(&self.change);
        obj.finish();
    }
}

/// Binding mode change. `change` is the mode name, which is free-form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeEvent {
    pub change: String,
    pub pango_markup: bool,
}

impl FromJson for ModeEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<ModeEvent> {
        let mut out = ModeEvent::default();
        cur.object(|cur, key| {
            match key {
                "change" => out.change = FromJson::from_json(cur)?,
                "pango_markup" => out.pango_markup = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for ModeEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("change").value_str(&self.change);
        obj.key("pango_markup").value_bool(self.pango_markup);
        obj.finish();
    }
}

string_enum! {
    /// What happened to a window.
    pub enum WindowChange {
        New = "new",
        Close = "close",
        Focus = "focus",
        Title = "title",
        FullscreenMode = "fullscreen_mode",
        Move = "move",
        Floating = "floating",
        Urgent = "urgent",
        Mark = "mark",
    }
}

/// Window lifecycle notification, carrying the affected container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowEvent {
    pub change: String,
    pub change_kind: Option<WindowChange>,
    pub container: Node,
}

impl FromJson for WindowEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<WindowEvent> {
        let mut out = WindowEvent::default();
        cur.object(|cur, key| {
            match key {
                "change" => {
                    out.change = String::from_json(cur)?;
                    out.change_kind = WindowChange::from_name(&out.change);
                }
                "container" => out.container = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for WindowEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("change").value_str(&self.change);
        self.container.emit_json(obj.key("container"));
        obj.finish();
    }
}

string_enum! {
    /// Why a binding event fired.
    pub enum BindingChange {
        Run = "run",
    }
}

string_enum! {
    /// Input device class of a binding.
    pub enum InputType {
        Keyboard = "keyboard",
        Mouse = "mouse",
    }
}

/// The binding that was triggered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingInfo {
    pub command: String,
    /// Modifier names that were part of the binding.
    pub event_state_mask: Vec<String>,
    pub input_code: i32,
    pub symbol: Option<String>,
    pub input_type: String,
    pub input_type_kind: Option<InputType>,
}

impl FromJson for BindingInfo {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<BindingInfo> {
        let mut out = BindingInfo::default();
        cur.object(|cur, key| {
            match key {
                "command" => out.command = FromJson::from_json(cur)?,
                "event_state_mask" => out.event_state_mask = FromJson::from_json(cur)?,
                "input_code" => out.input_code = FromJson::from_json(cur)?,
                "symbol" => out.symbol = FromJson::from_json(cur)?,
                "input_type" => {
                    out.input_type = String::from_json(cur)?;
                    out.input_type_kind = InputType::from_name(&out.input_type);
                }
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for BindingInfo {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("command").value_str(&self.command);
        self.event_state_mask.emit_json(obj.key("event_state_mask"));
        obj.key("input_code").value_i64(i64::from(self.input_code));
        field_opt(&mut obj, "symbol", &self.symbol);
        obj.key("input_type").value_str(&self.input_type);
        obj.finish();
    }
}

/// A binding was triggered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BindingEvent {
    pub change: String,
    pub change_kind: Option<BindingChange>,
    pub binding: BindingInfo,
}

impl FromJson for BindingEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<BindingEvent> {
        let mut out = BindingEvent::default();
        cur.object(|cur, key| {
            match key {
                "change" => {
                    out.change = String::from_json(cur)?;
                    out.change_kind = BindingChange::from_name(&out.change);
                }
                "binding" => out.binding = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for BindingEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("change").value_str(&self.change);
        self.binding.emit_json(obj.key("binding"));
        obj.finish();
    }
}

string_enum! {
    /// Whether i3 is restarting or exiting.
    pub enum ShutdownChange {
        Restart = "restart",
        Exit = "exit",
    }
}

/// i3 is going away.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShutdownEvent {
    pub change: String,
    pub change_kind: Option<ShutdownChange>,
}

impl FromJson for ShutdownEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<ShutdownEvent> {
        let mut out = ShutdownEvent::default();
        cur.object(|cur, key| {
            match key {
                "change" => {
                    out.change = String::from_json(cur)?;
                    out.change_kind = ShutdownChange::from_name(&out.change);
                }
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for ShutdownEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("change").value_str(&self.change);
        obj.finish();
    }
}

/// A tick broadcast, either the initial one after subscribing or a
/// payload sent through `send_tick`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvent {
    /// True for the synthetic first tick after subscribing.
    pub first: bool,
    pub payload: String,
}

impl FromJson for TickEvent {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<TickEvent> {
        let mut out = TickEvent::default();
        cur.object(|cur, key| {
            match key {
                "first" => out.first = FromJson::from_json(cur)?,
                "payload" => out.payload = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for TickEvent {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("first").value_bool(self.first);
        obj.key("payload").value_str(&self.payload);
        obj.finish();
    }
}
