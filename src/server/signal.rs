// Signal handling module
//
// SIGTERM and SIGINT (Ctrl+C) stop the accept loop. Connections already
// being served finish on their own tasks.

use std::io;

/// Resolve once a shutdown signal arrives
#[cfg(unix)]
pub async fn shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => println!("\n[SIGNAL] SIGTERM received, shutting down"),
        _ = sigint.recv() => println!("\n[SIGNAL] SIGINT received (Ctrl+C), shutting down"),
    }
    Ok(())
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await?;
    println!("\n[SIGNAL] Ctrl+C received, shutting down");
    Ok(())
}
