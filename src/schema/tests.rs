//! Round-trip properties across the record schemas: parsing the emitted
//! form of a record reproduces the record, and emitting is idempotent on
//! its own output.

use crate::schema::bar::BarConfig;
use crate::schema::node::Node;
use crate::schema::reply::{CommandReply, OutputsReply, Version};
use crate::schema::{from_payload, to_json};

fn assert_round_trip<T>(payload: &str)
where
    T: crate::schema::FromJson + crate::schema::EmitJson + PartialEq + std::fmt::Debug,
{
    let mut bytes = payload.as_bytes().to_vec();
    let first: T = from_payload(&mut bytes).unwrap();

    let emitted = to_json(&first);
    let mut bytes = emitted.clone().into_bytes();
    let second: T = from_payload(&mut bytes).unwrap();

    assert_eq!(first, second, "parse(emit(x)) != x for {payload}");
    assert_eq!(to_json(&second), emitted, "emit not idempotent for {payload}");
}

#[test]
fn test_command_reply_round_trip() {
    assert_round_trip::<CommandReply>(r#"[{"success":true}]"#);
    assert_round_trip::<CommandReply>(
        r#"[{"success":false,"error":"Unknown command: frobnicate"},{"success":true}]"#,
    );
}

#[test]
fn test_canonicalization_of_whitespace() {
    let mut bytes = b" [ { \"success\" : true } ] ".to_vec();
    let reply: CommandReply = from_payload(&mut bytes).unwrap();
    assert_eq!(to_json(&reply), r#"[{"success":true}]"#);
}

#[test]
fn test_node_round_trip_with_optional_fields() {
    assert_round_trip::<Node>(
        r#"{"id":6875086,"name":"st","type":"con","border":"pixel",
            "current_border_width":2,"layout":"splith","orientation":"none",
            "percent":0.5,
            "rect":{"x":0,"y":0,"width":960,"height":1080},
            "window_rect":{"x":2,"y":2,"width":956,"height":1076},
            "deco_rect":{"x":0,"y":0,"width":0,"height":0},
            "geometry":{"x":0,"y":0,"width":644,"height":364},
            "window":23068674,
            "window_properties":{"title":"st","instance":"st","class":"St",
                "window_role":null,"transient_for":null},
            "window_type":"normal","urgent":false,"focused":true,
            "focus":[],"fullscreen_mode":0,"nodes":[],"floating_nodes":[]}"#,
    );
}

#[test]
fn test_node_round_trip_without_optional_fields() {
    // name null, marks and window_properties absent, window null.
    assert_round_trip::<Node>(
        r#"{"id":1,"name":null,"type":"root","border":"normal",
            "current_border_width":0,"layout":"splith","orientation":"horizontal",
            "percent":null,
            "rect":{"x":0,"y":0,"width":3200,"height":1080},
            "window_rect":{"x":0,"y":0,"width":0,"height":0},
            "deco_rect":{"x":0,"y":0,"width":0,"height":0},
            "geometry":{"x":0,"y":0,"width":0,"height":0},
            "window":null,"window_type":null,"urgent":false,"focused":false,
            "focus":[94404354598416],"fullscreen_mode":0,
            "nodes":[{"id":2,"type":"output","border":"normal","layout":"output",
                "current_border_width":0,"orientation":"none","percent":null,
                "rect":{"x":0,"y":0,"width":1920,"height":1080},
                "window_rect":{"x":0,"y":0,"width":0,"height":0},
                "deco_rect":{"x":0,"y":0,"width":0,"height":0},
                "geometry":{"x":0,"y":0,"width":0,"height":0},
                "window":null,"window_type":null,"urgent":false,"focused":false,
                "focus":[],"fullscreen_mode":0,"nodes":[],"floating_nodes":[]}],
            "floating_nodes":[]}"#,
    );
}

#[test]
fn test_marks_survive_round_trip() {
    let mut bytes = br#"{"id":4,"marks":["scratch","todo"]}"#.to_vec();
    let node: Node = from_payload(&mut bytes).unwrap();
    assert_eq!(node.marks.as_deref(), Some(&["scratch".to_string(), "todo".to_string()][..]));
    let json = to_json(&node);
    assert!(json.contains(r#""marks":["scratch","todo"]"#));

    // Absent marks stay absent in the emitted form.
    let mut bytes = br#"{"id":4}"#.to_vec();
    let node: Node = from_payload(&mut bytes).unwrap();
    assert!(!to_json(&node).contains("marks"));
}

#[test]
fn test_outputs_round_trip() {
    assert_round_trip::<OutputsReply>(
        r#"[{"name":"eDP-1","active":true,"primary":true,
             "current_workspace":"1",
             "rect":{"x":0,"y":0,"width":1920,"height":1080}},
            {"name":"DP-3","active":false,"primary":false,
             "current_workspace":null,
             "rect":{"x":0,"y":0,"width":0,"height":0}}]"#,
    );
}

#[test]
fn test_bar_config_round_trip() {
    assert_round_trip::<BarConfig>(
        r##"{"id":"bar-0","mode":"dock","position":"bottom",
            "status_command":"i3status","font":"pango:DejaVu Sans Mono 10",
            "workspace_buttons":true,"binding_mode_indicator":true,
            "verbose":false,
            "colors":{"background":"#000000","statusline":"#ffffff",
                "focused_workspace_text":"#4c7899"}}"##,
    );
}

#[test]
fn test_version_round_trip() {
    assert_round_trip::<Version>(
        r#"{"major":4,"minor":22,"patch":1,"human_readable":"4.22.1 (2022-11-03)",
            "loaded_config_file_name":"/home/u/.config/i3/config"}"#,
    );
}

#[test]
fn test_unknown_fields_parse_but_do_not_round_trip() {
    let mut bytes = br#"{"success":true,"xyzzy":5}"#.to_vec();
    let reply: crate::schema::reply::StatusReply = from_payload(&mut bytes).unwrap();
    assert!(reply.success);
    assert_eq!(to_json(&reply), r#"{"success":true}"#);
}

#[test]
fn test_escaped_strings_round_trip() {
    let mut bytes = br#"[{"success":false,"error":"line one\nline \"two\"\\"}]"#.to_vec();
    let reply: CommandReply = from_payload(&mut bytes).unwrap();
    assert_eq!(reply[0].error.as_deref(), Some("line one\nline \"two\"\\"));
    assert_round_trip::<CommandReply>(r#"[{"success":false,"error":"a\nb\"c\\d"}]"#);
}
