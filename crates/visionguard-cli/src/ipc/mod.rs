//! Control socket between the running daemon and the other subcommands.

pub mod client;
pub mod protocol;
pub mod server;

use std::path::{Path, PathBuf};

pub use client::{Client, ClientError};
pub use protocol::{Request, Response};

pub fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join("visionguard.sock")
}

/// Bind the control socket, replacing a stale socket file left by a crashed
/// daemon. Callers must check that no live daemon owns `path` first.
pub fn bind(path: &Path) -> std::io::Result<tokio::net::UnixListener> {
    match std::fs::remove_file(path) {
        Ok(()) => tracing::debug!(?path, "removed stale socket"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    let listener = tokio::net::UnixListener::bind(path)?;
    tracing::info!(?path, "control socket listening");
    Ok(listener)
}
