//! Orderly termination on process signals.
//!
//! SIGINT and SIGTERM both resolve the graceful-shutdown future handed to
//! `axum::serve`: the listener stops accepting, in-flight requests drain, and
//! the caller closes the pool. A watchdog force-exits if draining hangs.
//!
//! Uncaught fatal faults need no extra hook here: a panic inside a handler
//! is confined to its connection task by the runtime and only fails that
//! request, while a fault in the serve loop itself surfaces as an `Err`
//! from `api::new` and unwinds `main` through the normal exit path.

use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to install SIGINT handler: {err}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => error!("Failed to install SIGTERM handler: {err}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, draining in-flight requests");

    tokio::spawn(async {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
        warn!(
            "Graceful shutdown did not finish within {}s, forcing exit",
            SHUTDOWN_GRACE.as_secs()
        );
        std::process::exit(1);
    });
}
