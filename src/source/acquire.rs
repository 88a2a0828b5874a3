//! Source acquisition
//!
//! Network sources retry forever at a fixed interval while the process is
//! alive; a missing capture file is fatal, not transient.

use std::net::SocketAddr;
use std::time::Duration;

use log::{info, warn};
use tokio::fs::File;
use tokio::net::{lookup_host, TcpSocket};

use super::Source;
use crate::domain::errors::SourceError;
use crate::domain::{SourceConfig, SourceTarget};
use crate::lifecycle::Shutdown;

/// Delay between connection attempts to the trace server.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of an acquisition attempt.
#[derive(Debug)]
pub enum Acquired {
    Source(Source),
    /// Shutdown was requested while (re)connecting; no handle was opened.
    Aborted,
}

/// Open a source handle per the configuration. Does not start reading.
///
/// # Errors
/// `SocketCreate` if a stream socket cannot be created or configured;
/// `FileOpen` if the capture file cannot be opened. Both are fatal —
/// connect and resolution failures are retried instead of surfacing here.
pub async fn acquire(config: &SourceConfig, shutdown: &Shutdown) -> Result<Acquired, SourceError> {
    match &config.target {
        SourceTarget::File { path, .. } => {
            let file = File::open(path)
                .await
                .map_err(|source| SourceError::FileOpen { path: path.clone(), source })?;
            info!("reading from {}", path.display());
            Ok(Acquired::Source(Source::File(file)))
        }
        SourceTarget::Network { server, port } => connect_with_retry(server, *port, shutdown).await,
    }
}

async fn connect_with_retry(
    server: &str,
    port: u16,
    shutdown: &Shutdown,
) -> Result<Acquired, SourceError> {
    loop {
        if shutdown.is_triggered() {
            return Ok(Acquired::Aborted);
        }

        let socket = TcpSocket::new_v4().map_err(SourceError::SocketCreate)?;
        socket.set_reuseaddr(true).map_err(SourceError::SocketCreate)?;
        socket.set_reuseport(true).map_err(SourceError::SocketCreate)?;

        // The socket drops (closes) on every retry path below
        let addr = match lookup_host((server, port)).await {
            Ok(mut addrs) => match addrs.find(SocketAddr::is_ipv4) {
                Some(addr) => addr,
                None => {
                    warn!("no IPv4 address for {server}");
                    retry_delay(shutdown).await;
                    continue;
                }
            },
            Err(e) => {
                warn!("cannot resolve {server}: {e}");
                retry_delay(shutdown).await;
                continue;
            }
        };

        match socket.connect(addr).await {
            Ok(stream) => {
                info!("connected to {addr}");
                return Ok(Acquired::Source(Source::Network(stream)));
            }
            Err(e) => {
                warn!("could not connect to {addr}: {e}");
                retry_delay(shutdown).await;
            }
        }
    }
}

/// Sleep one retry interval, returning early if shutdown triggers meanwhile.
async fn retry_delay(shutdown: &Shutdown) {
    tokio::select! {
        () = tokio::time::sleep(RETRY_INTERVAL) => {}
        () = shutdown.cancelled() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TRANSFER_SIZE;
    use std::io::Write;

    fn file_config(path: std::path::PathBuf) -> SourceConfig {
        SourceConfig {
            target: SourceTarget::File { path, terminate_on_exhaustion: true },
            chunk_size: TRANSFER_SIZE,
        }
    }

    #[tokio::test]
    async fn test_acquire_file_source() {
        let mut capture = tempfile::NamedTempFile::new().unwrap();
        capture.write_all(&[1, 2, 3]).unwrap();

        let shutdown = Shutdown::new();
        let acquired = acquire(&file_config(capture.path().to_path_buf()), &shutdown)
            .await
            .unwrap();
        assert!(matches!(acquired, Acquired::Source(Source::File(_))));
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let shutdown = Shutdown::new();
        let err = acquire(&file_config("/nonexistent/capture.bin".into()), &shutdown)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::FileOpen { .. }));
    }

    #[tokio::test]
    async fn test_acquire_connects_to_listening_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let shutdown = Shutdown::new();
        let config = SourceConfig {
            target: SourceTarget::Network { server: "127.0.0.1".to_string(), port },
            chunk_size: TRANSFER_SIZE,
        };

        let acquired = acquire(&config, &shutdown).await.unwrap();
        assert!(matches!(acquired, Acquired::Source(Source::Network(_))));
    }

    #[tokio::test]
    async fn test_acquire_aborts_when_shutdown_already_triggered() {
        let shutdown = Shutdown::new();
        shutdown.trigger();

        // Port 1 on loopback: nothing listens there, so without the abort
        // this would retry forever
        let config = SourceConfig {
            target: SourceTarget::Network { server: "127.0.0.1".to_string(), port: 1 },
            chunk_size: TRANSFER_SIZE,
        };

        let acquired = acquire(&config, &shutdown).await.unwrap();
        assert!(matches!(acquired, Acquired::Aborted));
    }

    #[tokio::test]
    async fn test_retry_delay_cut_short_by_shutdown() {
        let shutdown = Shutdown::new();
        let waiter = shutdown.clone();

        let started = std::time::Instant::now();
        let delay = tokio::spawn(async move { retry_delay(&waiter).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        shutdown.trigger();
        delay.await.unwrap();

        assert!(started.elapsed() < RETRY_INTERVAL);
    }
}
