//! Subscribes to window and workspace events and prints each change.

use std::path::PathBuf;

use clap::Parser;
use i3ipc_client::{Connection, Event, EventType};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Watch window and workspace events from i3")]
struct Args {
    /// Socket path; discovered via `i3 --get-socketpath` when omitted.
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Stop after this many milliseconds without an event; -1 waits
    /// forever.
    #[arg(long, default_value_t = -1)]
    timeout_ms: i32,
}

fn main() -> i3ipc_client::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let mut conn = match &args.socket {
        Some(path) => Connection::connect_to(path)?,
        None => Connection::connect()?,
    };
    conn.subscribe(&[EventType::Window, EventType::Workspace, EventType::Shutdown])?;

    while let Some(event) = conn.event_next(args.timeout_ms)? {
        match event {
            Event::Window(ev) => {
                let name = ev.container.name.as_deref().unwrap_or("<unnamed>");
                println!("window {}: {} (id {})", ev.change, name, ev.container.id);
            }
            Event::Workspace(ev) => {
                let name = ev
                    .current
                    .as_ref()
                    .and_then(|node| node.name.as_deref())
                    .unwrap_or("?");
                println!("workspace {}: {}", ev.change, name);
            }
            Event::Shutdown(ev) => {
                println!("shutdown: {}", ev.change);
                break;
            }
            other => println!("{other:?}"),
        }
    }
    Ok(())
}
