mod cli;
mod demo;
mod logging;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::{select, tick, unbounded};
use log::{error, info};

use padkit_gamepad::{
    Control, Gamepad, GamepadListener, GamepadManager, ManagerListener,
    ScriptedBackend,
};

use crate::cli::Cli;
use crate::demo::{demo_device, DemoDriver};

/// Logs every control change of a listening pad.
struct PadLogger;

impl GamepadListener for PadLogger {
    fn value_changed(&self, gamepad: &Gamepad, control: &Control) {
        info!(
            "{}: {:?} = {} [{}, {}]",
            gamepad.name(),
            control.kind(),
            control.value(),
            control.min_value(),
            control.max_value()
        );
    }
}

/// Starts listening on every attached pad and logs the lifecycle.
struct WatchLogger;

impl ManagerListener for WatchLogger {
    fn gamepad_attached(&self, gamepad: &Arc<Gamepad>) {
        info!(
            "attached: {} ({} controls)",
            gamepad.name(),
            gamepad.controls().len()
        );
        if let Err(e) = gamepad.start_listening(Arc::new(PadLogger)) {
            error!("failed to listen on {}: {e}", gamepad.name());
        }
    }

    fn gamepad_detached(&self, gamepad: &Arc<Gamepad>) {
        info!("detached: {}", gamepad.name());
    }
}

fn main() {
    let cli = Cli::parse();
    logging::setup(cli.verbose, cli.no_color);

    // Handle Ctrl+C to exit cleanly
    let (stop_tx, stop_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .expect("failed to set Ctrl+C handler");

    let backend = Arc::new(ScriptedBackend::new());
    let manager = GamepadManager::new(backend.clone());
    if let Err(e) = manager.start_watching(Arc::new(WatchLogger)) {
        error!("failed to start watching: {e}");
        return;
    }

    let device = backend.plug(demo_device());
    let mut driver = DemoDriver::new(backend, device);

    info!("padmon started. Press Ctrl+C to stop.");
    let ticker = tick(Duration::from_millis(cli.interval.max(1)));
    loop {
        select! {
            recv(stop_rx) -> _ => break,
            recv(ticker) -> _ => driver.tick(),
        }
    }

    manager.stop_watching();
    info!("padmon stopped.");
}
