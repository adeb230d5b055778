//! Door lock controller host binary.
//!
//! Runs the control cycle on the host: standard input plays the UART link,
//! the lock actuator and the heartbeat LED are reported through the log.
//!
//! ```text
//! printf '1234\r' | RUST_LOG=doorlock=debug doorlock
//! ```
//!
//! Credentials come from the JSON file named by `DOORLOCK_CONFIG`, or the
//! built-in defaults. The process exits once standard input is closed and
//! every received byte has been processed, or on Ctrl-C.

mod pins;
mod settings;

use std::time::Duration;

use anyhow::Context;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doorlock_controller::DoorController;
use doorlock_core::constants::{CONTROL_CYCLE_MS, UART_RING_BUFFER_SIZE};
use doorlock_hardware::{Clock, SharedRingBuffer, SystemClock, UartReceiver};

use crate::pins::LoggedPin;

/// Grace period for the runtime on exit. The stdin reader blocks in a worker
/// thread that cannot be cancelled.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doorlock=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting doorlock v{}", doorlock_core::VERSION);

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let result = runtime.block_on(run());
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    result
}

async fn run() -> anyhow::Result<()> {
    let config = settings::load()?;
    let credentials = config.credentials().context("invalid credentials")?;

    let mut rx = SharedRingBuffer::<UART_RING_BUFFER_SIZE>::new()?;
    let receiver = UartReceiver::new(rx.clone());
    let mut uart = tokio::spawn(async move { receiver.pump(tokio::io::stdin()).await });

    let clock = SystemClock::new();
    let mut controller = DoorController::with_credentials(
        credentials,
        LoggedPin::new("DOOR_STATUS"),
        LoggedPin::new("LD2").quiet(),
    );

    let mut ticker = tokio::time::interval(Duration::from_millis(CONTROL_CYCLE_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut uart_closed = false;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(error) = controller.run_cycle(&mut rx, clock.now_ms()) {
                    warn!(%error, "Control cycle failed to drive outputs");
                }
                if uart_closed && rx.is_empty() {
                    break;
                }
            }
            result = &mut uart, if !uart_closed => {
                uart_closed = true;
                let received = result.context("UART task failed")??;
                info!(received, "UART input closed");
            }
            _ = &mut shutdown => {
                info!("Interrupted");
                uart.abort();
                break;
            }
        }
    }

    info!(state = %controller.state(), "Stopping doorlock");
    Ok(())
}
