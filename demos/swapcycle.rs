//! Rotates the visible workspaces one output to the right, then restores
//! focus to the workspace sitting where the focused one used to be.

use i3ipc_client::{Connection, Result};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let mut conn = Connection::connect()?;

    let mut workspaces = conn.get_workspaces()?;
    workspaces.retain(|ws| ws.visible);
    workspaces.sort_by_key(|ws| ws.rect.x);
    if workspaces.len() < 2 {
        return Ok(());
    }

    let focused = workspaces.iter().position(|ws| ws.focused);

    for i in 0..workspaces.len() {
        let next_output = &workspaces[(i + 1) % workspaces.len()].output;
        let cmd = format!(
            "[con_id={}] focus; move workspace to output {}",
            workspaces[i].id, next_output
        );
        conn.run_command(&cmd)?;
    }

    if let Some(focused) = focused {
        let target = (focused + workspaces.len() - 1) % workspaces.len();
        conn.run_command(&format!("[con_id={}] focus", workspaces[target].id))?;
    }
    Ok(())
}
