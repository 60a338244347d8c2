//! Transport tests against an in-process mock peer: a `UnixListener`
//! accepting the two connections the library opens and serving scripted
//! frames.

use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;

use i3ipc_client::{Connection, Error, ErrorKind, Event, EventType, MAGIC};

/// The two sockets the library opens, in connect order.
struct Peer {
    msg: UnixStream,
    evt: UnixStream,
}

fn encode_frame(ty: u32, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(14 + payload.len());
    out.extend_from_slice(&MAGIC[..]);
    out.extend_from_slice(&(payload.len() as i32).to_le_bytes());
    out.extend_from_slice(&ty.to_le_bytes());
    out.extend_from_slice(payload);
    out
}

fn read_frame(stream: &mut UnixStream) -> (u32, Vec<u8>) {
    let mut head = [0u8; 14];
    stream.read_exact(&mut head).unwrap();
    assert_eq!(&head[..6], &MAGIC[..]);
    let length = i32::from_le_bytes(head[6..10].try_into().unwrap());
    let ty = u32::from_le_bytes(head[10..14].try_into().unwrap());
    let mut payload = vec![0u8; length as usize];
    stream.read_exact(&mut payload).unwrap();
    (ty, payload)
}

fn write_frame(stream: &mut UnixStream, ty: u32, payload: &[u8]) {
    stream.write_all(&encode_frame(ty, payload)).unwrap();
}

/// Binds a listener in a fresh temp dir and runs `script` on a thread
/// once both sockets are accepted.
fn spawn_peer(
    script: impl FnOnce(Peer) + Send + 'static,
) -> (tempfile::TempDir, PathBuf, JoinHandle<()>) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ipc.sock");
    let listener = UnixListener::bind(&path).unwrap();
    let handle = std::thread::spawn(move || {
        let (msg, _) = listener.accept().unwrap();
        let (evt, _) = listener.accept().unwrap();
        script(Peer { msg, evt });
    });
    (dir, path, handle)
}

#[test]
fn test_get_version_round_trip() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, payload) = read_frame(&mut peer.msg);
        assert_eq!(ty, 7);
        assert!(payload.is_empty());
        write_frame(
            &mut peer.msg,
            7,
            br#"{"major":4,"minor":22,"patch":1,"human_readable":"4.22.1",
                "loaded_config_file_name":"/etc/i3/config"}"#,
        );
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    let version = conn.get_version().unwrap();
    assert_eq!((version.major, version.minor, version.patch), (4, 22, 1));
    assert_eq!(version.human_readable, "4.22.1");

    peer.join().unwrap();
}

#[test]
fn test_version_triple_convenience() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 7);
        write_frame(
            &mut peer.msg,
            7,
            br#"{"major":4,"minor":20,"patch":0,"human_readable":"4.20",
                "loaded_config_file_name":""}"#,
        );
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    assert_eq!(conn.version_triple().unwrap(), (4, 20, 0));
    peer.join().unwrap();
}

#[test]
fn test_failed_command_latches_until_reinitialize() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, payload) = read_frame(&mut peer.msg);
        assert_eq!(ty, 0);
        assert_eq!(payload, b"not_a_cmd");
        write_frame(
            &mut peer.msg,
            0,
            br#"[{"success":false,"error":"Expected one of these tokens: ..."}]"#,
        );

        // Reinitialize after a soft failure keeps the sockets; the next
        // request arrives on the same connection.
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 7);
        write_frame(
            &mut peer.msg,
            7,
            br#"{"major":4,"minor":22,"patch":1,"human_readable":"4.22.1",
                "loaded_config_file_name":""}"#,
        );
    });

    let mut conn = Connection::connect_to(&path).unwrap();

    let err = conn.run_command("not_a_cmd").unwrap_err();
    match err {
        Error::CommandFailed { index, ref message } => {
            assert_eq!(index, 0);
            assert!(message.starts_with("Expected one of"));
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
    assert_eq!(conn.error_kind(), Some(ErrorKind::Failed));

    // Latched: nothing is attempted until the error is cleared.
    assert!(matches!(conn.get_version(), Err(Error::BadState(ErrorKind::Failed))));
    assert!(matches!(conn.get_tree(), Err(Error::BadState(ErrorKind::Failed))));

    conn.reinitialize(false).unwrap();
    assert_eq!(conn.error_kind(), None);
    assert_eq!(conn.get_version().unwrap().major, 4);

    peer.join().unwrap();
}

#[test]
fn test_run_command_results_does_not_latch() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 0);
        write_frame(&mut peer.msg, 0, br#"[{"success":true},{"success":false,"error":"no"}]"#);
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    let results = conn.run_command_results("nop; bad").unwrap();
    assert!(results[0].success);
    assert!(!results[1].success);
    assert_eq!(conn.error_kind(), None);
    peer.join().unwrap();
}

#[test]
fn test_subscribe_skips_past_raced_events() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, payload) = read_frame(&mut peer.evt);
        assert_eq!(ty, 2);
        assert_eq!(payload, br#"["window"]"#);

        // Two events race the subscribe reply; none may be lost and
        // their order must survive.
        write_frame(
            &mut peer.evt,
            EventType::Window.wire(),
            br#"{"change":"new","container":{"id":101}}"#,
        );
        write_frame(
            &mut peer.evt,
            EventType::Window.wire(),
            br#"{"change":"focus","container":{"id":102}}"#,
        );
        write_frame(&mut peer.evt, 2, br#"{"success":true}"#);
        write_frame(
            &mut peer.evt,
            EventType::Window.wire(),
            br#"{"change":"title","container":{"id":103}}"#,
        );
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    conn.subscribe(&[EventType::Window]).unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        match conn.event_next(-1).unwrap() {
            Some(Event::Window(ev)) => ids.push(ev.container.id),
            other => panic!("expected a window event, got {other:?}"),
        }
    }
    assert_eq!(ids, [101, 102, 103]);
    peer.join().unwrap();
}

#[test]
fn test_event_next_timeout_returns_none() {
    let (tx, rx) = mpsc::channel::<()>();
    let (_dir, path, peer) = spawn_peer(move |mut peer| {
        let (ty, _) = read_frame(&mut peer.evt);
        assert_eq!(ty, 2);
        write_frame(&mut peer.evt, 2, br#"{"success":true}"#);
        // Hold both sockets open until the test is done polling.
        rx.recv().unwrap();
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    conn.subscribe(&[EventType::Tick]).unwrap();
    assert!(conn.event_next(0).unwrap().is_none());
    assert!(conn.event_next(20).unwrap().is_none());
    assert_eq!(conn.error_kind(), None);

    tx.send(()).unwrap();
    peer.join().unwrap();
}

#[test]
fn test_reply_type_mismatch_is_malformed() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 7);
        write_frame(&mut peer.msg, 1, b"[]");
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    let err = conn.get_version().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    assert!(err.to_string().contains("expected version"), "{err}");
    assert!(matches!(conn.get_marks(), Err(Error::BadState(ErrorKind::Malformed))));
    peer.join().unwrap();
}

#[test]
fn test_peer_disconnect_classifies_as_closed() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 4);
        // Drop both sockets without answering.
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    let err = conn.get_tree().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Closed);
    peer.join().unwrap();
}

#[test]
fn test_malformed_reply_payload() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 9);
        write_frame(&mut peer.msg, 9, br#"{"config": 3e8}"#);
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    let err = conn.get_config().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
    peer.join().unwrap();
}

#[test]
fn test_tick_and_sync_payloads() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, payload) = read_frame(&mut peer.msg);
        assert_eq!(ty, 10);
        assert_eq!(payload, b"hello ticks");
        write_frame(&mut peer.msg, 10, br#"{"success":true}"#);

        let (ty, payload) = read_frame(&mut peer.msg);
        assert_eq!(ty, 11);
        assert_eq!(payload, br#"{"rnd":17,"window":23068674}"#);
        write_frame(&mut peer.msg, 11, br#"{"success":true}"#);
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    conn.send_tick("hello ticks").unwrap();
    conn.sync(17, 23068674).unwrap();
    peer.join().unwrap();
}

#[test]
fn test_bar_config_listing_and_by_name() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, payload) = read_frame(&mut peer.msg);
        assert_eq!(ty, 6);
        assert!(payload.is_empty());
        write_frame(&mut peer.msg, 6, br#"["bar-0","bar-1"]"#);

        let (ty, payload) = read_frame(&mut peer.msg);
        assert_eq!(ty, 6);
        assert_eq!(payload, b"bar-0");
        write_frame(
            &mut peer.msg,
            6,
            br#"{"id":"bar-0","mode":"dock","position":"bottom",
                "status_command":"i3status","font":"monospace",
                "workspace_buttons":true,"binding_mode_indicator":true,
                "verbose":false,"colors":{}}"#,
        );
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    assert_eq!(conn.get_bar_config_ids().unwrap(), ["bar-0", "bar-1"]);
    let cfg = conn.get_bar_config("bar-0").unwrap();
    assert_eq!(cfg.id, "bar-0");
    assert_eq!(cfg.status_command, "i3status");
    peer.join().unwrap();
}

#[test]
fn test_simple_listing_replies() {
    let (_dir, path, peer) = spawn_peer(|mut peer| {
        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 5);
        write_frame(&mut peer.msg, 5, br#"["todo","scratch"]"#);

        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 8);
        write_frame(&mut peer.msg, 8, br#"["default","resize"]"#);

        let (ty, _) = read_frame(&mut peer.msg);
        assert_eq!(ty, 1);
        write_frame(
            &mut peer.msg,
            1,
            br#"[{"id":1,"num":1,"name":"1","visible":true,"focused":true,
                 "urgent":false,"rect":{"x":0,"y":0,"width":800,"height":600},
                 "output":"eDP-1"}]"#,
        );
    });

    let mut conn = Connection::connect_to(&path).unwrap();
    assert_eq!(conn.get_marks().unwrap(), ["todo", "scratch"]);
    assert_eq!(conn.get_binding_modes().unwrap(), ["default", "resize"]);
    let workspaces = conn.get_workspaces().unwrap();
    assert_eq!(workspaces[0].name, "1");
    assert!(workspaces[0].visible);
    peer.join().unwrap();
}
