//! Bar configuration records, shared by the `get_bar_config` reply and the
//! `barconfig_update` event.

use crate::error::Result;
use crate::json::writer::JsonWriter;
use crate::json::TokenCursor;
use crate::schema::{field_omit, string_enum, EmitJson, FromJson};

string_enum! {
    /// Display mode of a bar.
    pub enum BarMode {
        Dock = "dock",
        Hide = "hide",
    }
}

string_enum! {
    /// Screen edge a bar is attached to.
    pub enum BarPosition {
        Bottom = "bottom",
        Top = "top",
    }
}

/// Color slots of a bar. i3 only reports colors that are configured, so
/// every slot is optional and unset slots stay out of the JSON form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarColors {
    pub background: Option<String>,
    pub statusline: Option<String>,
    pub separator: Option<String>,
    pub focused_background: Option<String>,
    pub focused_statusline: Option<String>,
    pub focused_separator: Option<String>,
    pub focused_workspace_text: Option<String>,
    pub focused_workspace_bg: Option<String>,
    pub focused_workspace_border: Option<String>,
    pub active_workspace_text: Option<String>,
    pub active_workspace_bg: Option<String>,
    pub active_workspace_border: Option<String>,
    pub inactive_workspace_text: Option<String>,
    pub inactive_workspace_bg: Option<String>,
    pub inactive_workspace_border: Option<String>,
    pub urgent_workspace_text: Option<String>,
    pub urgent_workspace_bg: Option<String>,
    pub urgent_workspace_border: Option<String>,
    pub binding_mode_text: Option<String>,
    pub binding_mode_bg: Option<String>,
    pub binding_mode_border: Option<String>,
}

impl FromJson for BarColors {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<BarColors> {
        let mut out = BarColors::default();
        cur.object(|cur, key| {
            match key {
                "background" => out.background = FromJson::from_json(cur)?,
                "statusline" => out.statusline = FromJson::from_json(cur)?,
                "separator" => out.separator = FromJson::from_json(cur)?,
                "focused_background" => out.focused_background = FromJson::from_json(cur)?,
                "focused_statusline" => out.focused_statusline = FromJson::from_json(cur)?,
                "focused_separator" => out.focused_separator = FromJson::from_json(cur)?,
                "focused_workspace_text" => {
                    out.focused_workspace_text = FromJson::from_json(cur)?;
                }
                "focused_workspace_bg" => out.focused_workspace_bg = FromJson::from_json(cur)?,
                "focused_workspace_border" => {
                    out.focused_workspace_border = FromJson::from_json(cur)?;
                }
                "active_workspace_text" => out.active_workspace_text = FromJson::from_json(cur)?,
                "active_workspace_bg" => out.active_workspace_bg = FromJson::from_json(cur)?,
                "active_workspace_border" => {
                    out.active_workspace_border = FromJson::from_json(cur)?;
                }
                "inactive_workspace_text" => {
                    out.inactive_workspace_text = FromJson::from_json(cur)?;
                }
                "inactive_workspace_bg" => out.inactive_workspace_bg = FromJson::from_json(cur)?,
                "inactive_workspace_border" => {
                    out.inactive_workspace_border = FromJson::from_json(cur)?;
                }
                "urgent_workspace_text" => out.urgent_workspace_text = FromJson::from_json(cur)?,
                "urgent_workspace_bg" => out.urgent_workspace_bg = FromJson::from_json(cur)?,
                "urgent_workspace_border" => {
                    out.urgent_workspace_border = FromJson::from_json(cur)?;
                }
                "binding_mode_text" => out.binding_mode_text = FromJson::from_json(cur)?,
                "binding_mode_bg" => out.binding_mode_bg = FromJson::from_json(cur)?,
                "binding_mode_border" => out.binding_mode_border = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for BarColors {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        field_omit(&mut obj, "background", &self.background);
        field_omit(&mut obj, "statusline", &self.statusline);
        field_omit(&mut obj, "separator", &self.separator);
        field_omit(&mut obj, "focused_background", &self.focused_background);
        field_omit(&mut obj, "focused_statusline", &self.focused_statusline);
        field_omit(&mut obj, "focused_separator", &self.focused_separator);
        field_omit(&mut obj, "focused_workspace_text", &self.focused_workspace_text);
        field_omit(&mut obj, "focused_workspace_bg", &self.focused_workspace_bg);
        field_omit(&mut obj, "focused_workspace_border", &self.focused_workspace_border);
        field_omit(&mut obj, "active_workspace_text", &self.active_workspace_text);
        field_omit(&mut obj, "active_workspace_bg", &self.active_workspace_bg);
        field_omit(&mut obj, "active_workspace_border", &self.active_workspace_border);
        field_omit(&mut obj, "inactive_workspace_text", &self.inactive_workspace_text);
        field_omit(&mut obj, "inactive_workspace_bg", &self.inactive_workspace_bg);
        field_omit(&mut obj, "inactive_workspace_border", &self.inactive_workspace_border);
        field_omit(&mut obj, "urgent_workspace_text", &self.urgent_workspace_text);
        field_omit(&mut obj, "urgent_workspace_bg", &self.urgent_workspace_bg);
        field_omit(&mut obj, "urgent_workspace_border", &self.urgent_workspace_border);
        field_omit(&mut obj, "binding_mode_text", &self.binding_mode_text);
        field_omit(&mut obj, "binding_mode_bg", &self.binding_mode_bg);
        field_omit(&mut obj, "binding_mode_border", &self.binding_mode_border);
        obj.finish();
    }
}

/// Configuration of one bar instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarConfig {
    pub id: String,
    pub mode: String,
    pub mode_kind: Option<BarMode>,
    pub position: String,
    pub position_kind: Option<BarPosition>,
    pub status_command: String,
    pub font: String,
    pub workspace_buttons: bool,
    pub binding_mode_indicator: bool,
    pub verbose: bool,
    pub colors: BarColors,
}

impl FromJson for BarConfig {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<BarConfig> {
        let mut out = BarConfig::default();
        cur.object(|cur, key| {
            match key {
                "id" => out.id = FromJson::from_json(cur)?,
                "mode" => {
                    out.mode = String::from_json(cur)?;
                    out.mode_kind = BarMode::from_name(&out.mode);
                }
                "position" => {
                    out.position = String::from_json(cur)?;
                    out.position_kind = BarPosition::from_name(&out.position);
                }
                "status_command" => out.status_command = FromJson::from_json(cur)?,
                "font" => out.font = FromJson::from_json(cur)?,
                "workspace_buttons" => out.workspace_buttons = FromJson::from_json(cur)?,
                "binding_mode_indicator" => out.binding_mode_indicator = FromJson::from_json(cur)?,
                "verbose" => out.verbose = FromJson::from_json(cur)?,
                "colors" => out.colors = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for BarConfig {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("id").value_str(&self.id);
        obj.key("mode").value_str(&self.mode);
        obj.key("position").value_str(&self.position);
        obj.key("status_command").value_str(&self.status_command);
        obj.key("font").value_str(&self.font);
        obj.key("workspace_buttons").value_bool(self.workspace_buttons);
        obj.key("binding_mode_indicator").value_bool(self.binding_mode_indicator);
        obj.key("verbose").value_bool(self.verbose);
        self.colors.emit_json(obj.key("colors"));
        obj.finish();
    }
}
