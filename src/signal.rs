//! Ctrl-C handling for the blocking service loop.

use std::thread::JoinHandle;

use anyhow::Context;
use tracing::{error, info};

use crate::Result;
use crate::service::{Shutdown, StateCell, interrupt};

/// Spawn a thread that waits for Ctrl-C and stops the service.
///
/// The loop cannot be woken from a blocking read, so when it is parked on input the
/// watcher ends the process itself. Otherwise it only requests shutdown and the loop
/// stops after writing the in-flight response.
pub fn spawn_interrupt_watcher(shutdown: Shutdown, state: StateCell) -> Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    let handle = std::thread::Builder::new()
        .name("earshot-signal".to_owned())
        .spawn(move || {
            if let Err(err) = runtime.block_on(tokio::signal::ctrl_c()) {
                error!(error = %err, "failed to listen for interrupt signal");
                return;
            }

            if interrupt(&shutdown, &state) {
                info!("service interrupted");
                std::process::exit(0);
            }
            info!("interrupt received; stopping after the current frame");
        })
        .context("failed to spawn signal thread")?;

    Ok(handle)
}
