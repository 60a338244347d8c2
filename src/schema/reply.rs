//! Reply records for the synchronous message types.
//!
//! Replies whose JSON form is a bare array (command results, workspaces,
//! outputs, marks, bar-config ids, binding modes) materialize directly as
//! vectors; the aliases below name them.

use crate::error::Result;
use crate::json::writer::JsonWriter;
use crate::json::TokenCursor;
use crate::schema::node::{Node, Rect};
use crate::schema::{field_omit, field_opt, EmitJson, FromJson};

/// Reply to `run_command`: one entry per semicolon-separated subcommand.
pub type CommandReply = Vec<CommandOutcome>;

/// Reply to `get_workspaces`.
pub type WorkspacesReply = Vec<Workspace>;

/// Reply to `get_outputs`.
pub type OutputsReply = Vec<Output>;

/// Reply to `get_tree`: the root of the container tree.
pub type TreeReply = Node;

/// Reply to `get_marks`.
pub type MarksReply = Vec<String>;

/// Reply to `get_bar_config` without a payload: the configured bar ids.
pub type BarConfigIdsReply = Vec<String>;

/// Reply to `get_binding_modes`.
pub type BindingModesReply = Vec<String>;

/// Result of one subcommand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutcome {
    pub success: bool,
    /// Human-readable error, present when `success` is false.
    pub error: Option<String>,
}

impl FromJson for CommandOutcome {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<CommandOutcome> {
        let mut out = CommandOutcome::default();
        cur.object(|cur, key| {
            match key {
                "success" => out.success = FromJson::from_json(cur)?,
                "error" => out.error = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for CommandOutcome {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("success").value_bool(self.success);
        field_omit(&mut obj, "error", &self.error);
        obj.finish();
    }
}

/// One workspace as listed by `get_workspaces`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub id: u64,
    /// The leading number of the name, or -1 for unnumbered workspaces.
    pub num: i32,
    pub name: String,
    pub visible: bool,
    pub focused: bool,
    pub urgent: bool,
    pub rect: Rect,
    /// Name of the output the workspace is on.
    pub output: String,
}

impl FromJson for Workspace {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Workspace> {
        let mut out = Workspace::default();
        cur.object(|cur, key| {
            match key {
                "id" => out.id = FromJson::from_json(cur)?,
                "num" => out.num = FromJson::from_json(cur)?,
                "name" => out.name = FromJson::from_json(cur)?,
                "visible" => out.visible = FromJson::from_json(cur)?,
                "focused" => out.focused = FromJson::from_json(cur)?,
                "urgent" => out.urgent = FromJson::from_json(cur)?,
                "rect" => out.rect = FromJson::from_json(cur)?,
                "output" => out.output = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for Workspace {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("id").value_u64(self.id);
        obj.key("num").value_i64(i64::from(self.num));
        obj.key("name").value_str(&self.name);
        obj.key("visible").value_bool(self.visible);
        obj.key("focused").value_bool(self.focused);
        obj.key("urgent").value_bool(self.urgent);
        self.rect.emit_json(obj.key("rect"));
        obj.key("output").value_str(&self.output);
        obj.finish();
    }
}

/// One output as listed by `get_outputs`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub name: String,
    pub active: bool,
    pub primary: bool,
    /// Workspace currently visible on this output; null when inactive.
    pub current_workspace: Option<String>,
    pub rect: Rect,
}

impl FromJson for Output {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Output> {
        let mut out = Output::default();
        cur.object(|cur, key| {
            match key {
                "name" => out.name = FromJson::from_json(cur)?,
                "active" => out.active = FromJson::from_json(cur)?,
                "primary" => out.primary = FromJson::from_json(cur)?,
                "current_workspace" => out.current_workspace = FromJson::from_json(cur)?,
                "rect" => out.rect = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for Output {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("name").value_str(&self.name);
        obj.key("active").value_bool(self.active);
        obj.key("primary").value_bool(self.primary);
        field_opt(&mut obj, "current_workspace", &self.current_workspace);
        self.rect.emit_json(obj.key("rect"));
        obj.finish();
    }
}

/// Reply to `get_version`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
    pub human_readable: String,
    pub loaded_config_file_name: String,
}

impl FromJson for Version {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Version> {
        let mut out = Version::default();
        cur.object(|cur, key| {
            match key {
                "major" => out.major = FromJson::from_json(cur)?,
                "minor" => out.minor = FromJson::from_json(cur)?,
                "patch" => out.patch = FromJson::from_json(cur)?,
                "human_readable" => out.human_readable = FromJson::from_json(cur)?,
                "loaded_config_file_name" => {
                    out.loaded_config_file_name = FromJson::from_json(cur)?;
                }
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for Version {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("major").value_i64(i64::from(self.major));
        obj.key("minor").value_i64(i64::from(self.minor));
        obj.key("patch").value_i64(i64::from(self.patch));
        obj.key("human_readable").value_str(&self.human_readable);
        obj.key("loaded_config_file_name").value_str(&self.loaded_config_file_name);
        obj.finish();
    }
}

/// Reply to `get_config`: the raw contents of the last loaded config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigReply {
    pub config: String,
}

impl FromJson for ConfigReply {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<ConfigReply> {
        let mut out = ConfigReply::default();
        cur.object(|cur, key| {
            match key {
                "config" => out.config = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for ConfigReply {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("config").value_str(&self.config);
        obj.finish();
    }
}

/// Shape of the subscribe, tick and sync replies: a lone success flag.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusReply {
    pub success: bool,
}

impl FromJson for StatusReply {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<StatusReply> {
        let mut out = StatusReply::default();
        cur.object(|cur, key| {
            match key {
                "success" => out.success = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for StatusReply {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("success").value_bool(self.success);
        obj.finish();
    }
}
