//! Process signals

use tokio::{signal, sync::watch};
use tracing::{error, warn};

use crate::domain::campaign::Shutdown;

/// Resolves on Ctrl+C, or SIGTERM on Unix
#[mutants::skip]
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// A [`Shutdown`] requested by the first termination signal the process receives.
///
/// Must be called from within a Tokio runtime.
#[mutants::skip]
pub fn shutdown_on_signal() -> Shutdown {
    let (sender, receiver) = watch::channel(false);

    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("shutdown requested, stopping after the current recipient");
        sender.send_replace(true);
    });

    Shutdown::new(receiver)
}
