//! The acquisition/dispatch loop
//!
//! Outer loop: acquire a source, with reconnect-on-failure for network
//! sources. Inner loop: timeout-bounded read cycles, dispatching every chunk
//! to the sink in order. End-of-stream on a file source terminates the loop
//! when configured to; a network source never self-terminates on
//! end-of-stream, it reconnects.

use std::time::Instant;

use log::{info, warn};

use crate::cadence::{CadenceClock, TICK_PERIOD};
use crate::domain::errors::SourceError;
use crate::domain::{SourceConfig, SourceTarget};
use crate::lifecycle::Shutdown;
use crate::sink::{dispatch, TraceSink};
use crate::source::{acquire, read_chunk, Acquired, ReadOutcome};

/// Why the loop stopped. Both variants are clean exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A file source hit end-of-stream with terminate-on-exhaustion set.
    SourceExhausted,
    /// The shutdown flag was observed at a loop checkpoint.
    ShutdownRequested,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::SourceExhausted => write!(f, "source exhausted"),
            StopReason::ShutdownRequested => write!(f, "shutdown requested"),
        }
    }
}

/// Drive the source lifecycle until exhaustion (file, when configured) or
/// shutdown.
///
/// # Errors
/// Only fatal acquisition failures surface here (socket creation, capture
/// file open); everything transient is retried inside.
pub async fn run<S: TraceSink>(
    config: &SourceConfig,
    sink: &mut S,
    shutdown: &Shutdown,
) -> Result<StopReason, SourceError> {
    let mut buf = vec![0u8; config.chunk_size];
    let mut clock = CadenceClock::new(TICK_PERIOD);

    loop {
        if shutdown.is_triggered() {
            return Ok(StopReason::ShutdownRequested);
        }

        let mut source = match acquire(config, shutdown).await? {
            Acquired::Source(source) => source,
            Acquired::Aborted => return Ok(StopReason::ShutdownRequested),
        };
        clock.anchor(Instant::now());

        loop {
            if shutdown.is_triggered() {
                break;
            }

            let remaining = clock.remaining_micros(Instant::now());
            let outcome = tokio::select! {
                outcome = read_chunk(&mut source, &mut buf, remaining) => outcome,
                () = shutdown.cancelled() => break,
            };

            match outcome {
                ReadOutcome::Tick => {}
                ReadOutcome::Data(len) => dispatch(sink, &buf[..len]),
                ReadOutcome::EndOfStream => {
                    info!("end of stream on {} source", source.kind());
                    break;
                }
                ReadOutcome::WaitError(e) => {
                    warn!("wait failed on {} source: {e}", source.kind());
                    break;
                }
            }
        }

        // Close the descriptor on every inner-loop exit, normal or not
        drop(source);

        if shutdown.is_triggered() {
            return Ok(StopReason::ShutdownRequested);
        }
        if let SourceTarget::File { terminate_on_exhaustion: true, .. } = config.target {
            return Ok(StopReason::SourceExhausted);
        }
    }
}
