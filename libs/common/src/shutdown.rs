//! Signal handling for the operator tools
//!
//! A signal ends the process on the spot. Writes already issued stay
//! committed; nothing is rolled back or flushed.

use tokio::task::JoinHandle;
use tracing::warn;

/// Wait for Ctrl+C, or SIGTERM on Unix
pub async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let term_signal = match signal(SignalKind::terminate()) {
            Ok(sig) => Some(sig),
            Err(e) => {
                warn!("SIGTERM handler unavailable, Ctrl+C only: {}", e);
                None
            },
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = async {
                match term_signal {
                    Some(mut sig) => {
                        sig.recv().await;
                    },
                    None => std::future::pending::<()>().await,
                }
            } => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

/// Spawn a listener that prints `message` and exits with `exit_code` on the
/// first signal.
///
/// Needs a multi-threaded runtime when the main task blocks on terminal
/// input.
pub fn exit_on_signal(message: &'static str, exit_code: i32) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_shutdown().await;
        eprintln!("\n{}", message);
        std::process::exit(exit_code);
    })
}
