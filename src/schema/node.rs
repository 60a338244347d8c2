//! The container tree: [`Node`] and its satellite types.
//!
//! Nodes nest recursively through `nodes` and `floating_nodes`; the tree
//! reply is a single root node. Member names mirror the JSON keys, with
//! two renames forced by reserved words: the JSON `"type"` key is exposed
//! as `node_type`, and `window_properties.class` as `window_class`.

use crate::error::Result;
use crate::json::writer::JsonWriter;
use crate::json::TokenCursor;
use crate::schema::{field_omit, field_opt, string_enum, EmitJson, FromJson};

/// An x/y/width/height rectangle, used for every geometry field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FromJson for Rect {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Rect> {
        let mut out = Rect::default();
        cur.object(|cur, key| {
            match key {
                "x" => out.x = FromJson::from_json(cur)?,
                "y" => out.y = FromJson::from_json(cur)?,
                "width" => out.width = FromJson::from_json(cur)?,
                "height" => out.height = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for Rect {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("x").value_i64(i64::from(self.x));
        obj.key("y").value_i64(i64::from(self.y));
        obj.key("width").value_i64(i64::from(self.width));
        obj.key("height").value_i64(i64::from(self.height));
        obj.finish();
    }
}

string_enum! {
    /// What a tree node represents.
    pub enum NodeType {
        Root = "root",
        Output = "output",
        Con = "con",
        FloatingCon = "floating_con",
        Workspace = "workspace",
        Dockarea = "dockarea",
    }
}

string_enum! {
    /// Border style of a container.
    pub enum BorderStyle {
        Normal = "normal",
        None = "none",
        Pixel = "pixel",
    }
}

string_enum! {
    /// Layout of a split container.
    pub enum NodeLayout {
        SplitH = "splith",
        SplitV = "splitv",
        Stacked = "stacked",
        Tabbed = "tabbed",
        Dockarea = "dockarea",
        Output = "output",
    }
}

string_enum! {
    /// Orientation of a split container.
    pub enum Orientation {
        None = "none",
        Horizontal = "horizontal",
        Vertical = "vertical",
    }
}

/// The `_NET_WM_WINDOW_TYPE` of the window a node wraps.
///
/// Unlike the other tables, this one has a slot for an explicit JSON
/// `null` (i3 reports that for windows without the property), so it is not
/// declared through the wire-string macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowType {
    /// The peer sent an explicit `null`.
    Null,
    Normal,
    Dialog,
    Utility,
    Toolbar,
    Splash,
    Menu,
    DropdownMenu,
    PopupMenu,
    Tooltip,
    Notification,
    Dock,
    Unknown,
}

impl WindowType {
    /// Looks up a wire string; unknown strings yield `None`.
    pub fn from_name(name: &str) -> Option<WindowType> {
        Some(match name {
            "normal" => WindowType::Normal,
            "dialog" => WindowType::Dialog,
            "utility" => WindowType::Utility,
            "toolbar" => WindowType::Toolbar,
            "splash" => WindowType::Splash,
            "menu" => WindowType::Menu,
            "dropdown_menu" => WindowType::DropdownMenu,
            "popup_menu" => WindowType::PopupMenu,
            "tooltip" => WindowType::Tooltip,
            "notification" => WindowType::Notification,
            "dock" => WindowType::Dock,
            "unknown" => WindowType::Unknown,
            _ => return None,
        })
    }
}

/// X11 properties of the window a node wraps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowProperties {
    pub title: Option<String>,
    pub instance: Option<String>,
    /// The JSON key is `"class"`; renamed here because `class` is
    /// reserved.
    pub window_class: Option<String>,
    pub window_role: Option<String>,
    pub transient_for: Option<i32>,
}

impl FromJson for WindowProperties {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<WindowProperties> {
        let mut out = WindowProperties::default();
        cur.object(|cur, key| {
            match key {
                "title" => out.title = FromJson::from_json(cur)?,
                "instance" => out.instance = FromJson::from_json(cur)?,
                "class" => out.window_class = FromJson::from_json(cur)?,
                "window_role" => out.window_role = FromJson::from_json(cur)?,
                "transient_for" => out.transient_for = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for WindowProperties {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        field_opt(&mut obj, "title", &self.title);
        field_opt(&mut obj, "instance", &self.instance);
        field_opt(&mut obj, "class", &self.window_class);
        field_opt(&mut obj, "window_role", &self.window_role);
        field_opt(&mut obj, "transient_for", &self.transient_for);
        obj.finish();
    }
}

/// One container in the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub id: u64,
    pub name: Option<String>,
    /// Raw `"type"` value.
    pub node_type: String,
    /// Table lookup of `node_type`; `None` for unrecognized values.
    pub node_type_kind: Option<NodeType>,
    pub border: String,
    pub border_kind: Option<BorderStyle>,
    pub current_border_width: i32,
    pub layout: String,
    pub layout_kind: Option<NodeLayout>,
    pub orientation: String,
    pub orientation_kind: Option<Orientation>,
    /// Fraction of the parent this node occupies.
    pub percent: Option<f32>,
    pub rect: Rect,
    pub window_rect: Rect,
    pub deco_rect: Rect,
    pub geometry: Rect,
    /// X11 window id, for nodes that wrap a window.
    pub window: Option<i32>,
    pub window_properties: Option<Box<WindowProperties>>,
    pub window_type: Option<String>,
    /// `Some(WindowType::Null)` when the peer sent an explicit `null`,
    /// `None` when the field was absent or unrecognized.
    pub window_type_kind: Option<WindowType>,
    pub urgent: bool,
    pub marks: Option<Vec<String>>,
    pub focused: bool,
    /// Focus order: ids of child nodes, most recently focused first.
    pub focus: Vec<u64>,
    pub fullscreen_mode: i32,
    pub nodes: Vec<Node>,
    pub floating_nodes: Vec<Node>,
}

impl FromJson for Node {
    fn from_json(cur: &mut TokenCursor<'_>) -> Result<Node> {
        let mut out = Node::default();
        cur.object(|cur, key| {
            match key {
                "id" => out.id = FromJson::from_json(cur)?,
                "name" => out.name = FromJson::from_json(cur)?,
                "type" => {
                    out.node_type = String::from_json(cur)?;
                    out.node_type_kind = NodeType::from_name(&out.node_type);
                }
                "border" => {
                    out.border = String::from_json(cur)?;
                    out.border_kind = BorderStyle::from_name(&out.border);
                }
                "current_border_width" => out.current_border_width = FromJson::from_json(cur)?,
                "layout" => {
                    out.layout = String::from_json(cur)?;
                    out.layout_kind = NodeLayout::from_name(&out.layout);
                }
                "orientation" => {
                    out.orientation = String::from_json(cur)?;
                    out.orientation_kind = Orientation::from_name(&out.orientation);
                }
                "percent" => out.percent = FromJson::from_json(cur)?,
                "rect" => out.rect = FromJson::from_json(cur)?,
                "window_rect" => out.window_rect = FromJson::from_json(cur)?,
                "deco_rect" => out.deco_rect = FromJson::from_json(cur)?,
                "geometry" => out.geometry = FromJson::from_json(cur)?,
                "window" => out.window = FromJson::from_json(cur)?,
                "window_properties" => out.window_properties = FromJson::from_json(cur)?,
                "window_type" => {
                    out.window_type = FromJson::from_json(cur)?;
                    out.window_type_kind = match &out.window_type {
                        Some(name) => WindowType::from_name(name),
                        None => Some(WindowType::Null),
                    };
                }
                "urgent" => out.urgent = FromJson::from_json(cur)?,
                "marks" => out.marks = FromJson::from_json(cur)?,
                "focused" => out.focused = FromJson::from_json(cur)?,
                "focus" => out.focus = FromJson::from_json(cur)?,
                "fullscreen_mode" => out.fullscreen_mode = FromJson::from_json(cur)?,
                "nodes" => out.nodes = FromJson::from_json(cur)?,
                "floating_nodes" => out.floating_nodes = FromJson::from_json(cur)?,
                _ => cur.skip_value()?,
            }
            Ok(())
        })?;
        Ok(out)
    }
}

impl EmitJson for Node {
    fn emit_json(&self, w: &mut JsonWriter) {
        let mut obj = w.object();
        obj.key("id").value_u64(self.id);
        field_opt(&mut obj, "name", &self.name);
        obj.key("type").value_str(&self.node_type);
        obj.key("border").value_str(&self.border);
        obj.key("current_border_width").value_i64(i64::from(self.current_border_width));
        obj.key("layout").value_str(&self.layout);
        obj.key("orientation").value_str(&self.orientation);
        field_opt(&mut obj, "percent", &self.percent);
        self.rect.emit_json(obj.key("rect"));
        self.window_rect.emit_json(obj.key("window_rect"));
        self.deco_rect.emit_json(obj.key("deco_rect"));
        self.geometry.emit_json(obj.key("geometry"));
        field_opt(&mut obj, "window", &self.window);
        field_omit(&mut obj, "window_properties", &self.window_properties);
        field_opt(&mut obj, "window_type", &self.window_type);
        obj.key("urgent").value_bool(self.urgent);
        field_omit(&mut obj, "marks", &self.marks);
        obj.key("focused").value_bool(self.focused);
        self.focus.emit_json(obj.key("focus"));
        obj.key("fullscreen_mode").value_i64(i64::from(self.fullscreen_mode));
        self.nodes.emit_json(obj.key("nodes"));
        self.floating_nodes.emit_json(obj.key("floating_nodes"));
        obj.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderStyle, Node, NodeType, WindowType};
    use crate::schema::from_payload;

    #[test]
    fn test_window_properties_class_rename() {
        let mut payload = br#"{
            "id": 94558213, "type": "con",
            "window_properties": {"class": "XTerm", "instance": "xterm"}
        }"#
        .to_vec();

        let node: Node = from_payload(&mut payload).unwrap();
        let props = node.window_properties.as_deref().unwrap();
        assert_eq!(props.window_class.as_deref(), Some("XTerm"));
        assert_eq!(props.instance.as_deref(), Some("xterm"));
        assert_eq!(props.title, None);
        assert_eq!(node.node_type_kind, Some(NodeType::Con));
    }

    #[test]
    fn test_enum_lookup_and_unknown_values() {
        let mut payload =
            br#"{"border": "pixel", "layout": "wayland_magic", "orientation": "none"}"#.to_vec();
        let node: Node = from_payload(&mut payload).unwrap();
        assert_eq!(node.border_kind, Some(BorderStyle::Pixel));
        assert_eq!(node.layout, "wayland_magic");
        assert_eq!(node.layout_kind, None);
    }

    #[test]
    fn test_window_type_null_slot() {
        let mut payload = br#"{"window_type": null}"#.to_vec();
        let node: Node = from_payload(&mut payload).unwrap();
        assert_eq!(node.window_type, None);
        assert_eq!(node.window_type_kind, Some(WindowType::Null));

        let mut payload = br#"{"window_type": "dock"}"#.to_vec();
        let node: Node = from_payload(&mut payload).unwrap();
        assert_eq!(node.window_type_kind, Some(WindowType::Dock));

        let mut payload = br#"{"id": 1}"#.to_vec();
        let node: Node = from_payload(&mut payload).unwrap();
        assert_eq!(node.window_type_kind, None);
    }

    #[test]
    fn test_nested_tree_and_focus_order() {
        let mut payload = br#"{
            "id": 1, "type": "root", "focus": [3, 2],
            "nodes": [
                {"id": 2, "type": "output", "nodes": [{"id": 4, "type": "workspace"}]},
                {"id": 3, "type": "output"}
            ]
        }"#
        .to_vec();

        let node: Node = from_payload(&mut payload).unwrap();
        assert_eq!(node.focus, [3, 2]);
        assert_eq!(node.nodes.len(), 2);
        assert_eq!(node.nodes[0].nodes[0].id, 4);
        assert_eq!(node.nodes[0].nodes[0].node_type_kind, Some(NodeType::Workspace));
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let mut payload = br#"{"id": 9, "xyzzy": {"deep": [1, {"a": null}]}, "urgent": true}"#
            .to_vec();
        let node: Node = from_payload(&mut payload).unwrap();
        assert_eq!(node.id, 9);
        assert!(node.urgent);
    }
}
