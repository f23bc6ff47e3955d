//! Shutdown signals.

use std::fmt;
use std::time::Duration;

use crate::TRACING_TARGET_SERVER_SHUTDOWN;

/// Signal that stopped the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        })
    }
}

async fn interrupt() -> Signal {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            %error,
            "Cannot listen for SIGINT"
        );
        std::future::pending::<()>().await;
    }
    Signal::Interrupt
}

#[cfg(unix)]
async fn terminate() -> Signal {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                %error,
                "Cannot listen for SIGTERM"
            );
            std::future::pending::<()>().await;
        }
    }
    Signal::Terminate
}

#[cfg(not(unix))]
async fn terminate() -> Signal {
    std::future::pending().await
}

/// Resolves on the first SIGINT or SIGTERM.
///
/// In-flight requests then get `drain` to finish.
pub async fn shutdown_signal(drain: Duration) {
    let signal = tokio::select! {
        signal = interrupt() => signal,
        signal = terminate() => signal,
    };

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        %signal,
        drain_secs = drain.as_secs(),
        "Stopping lore server"
    );
}
