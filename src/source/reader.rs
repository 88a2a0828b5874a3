//! One timeout-bounded wait-then-read cycle against the active source
//!
//! This is a pure boundary between the OS-level source and the downstream
//! sink: no interpretation of the bytes happens here, and the tagged
//! [`ReadOutcome`] keeps the collector's branches exhaustive instead of
//! relying on sentinel return values.

use std::time::Duration;

use log::debug;
use tokio::time::timeout;

use super::Source;

/// Classified result of one read cycle.
#[derive(Debug)]
pub enum ReadOutcome {
    /// The remaining tick time elapsed with no data ready; no bytes delivered.
    Tick,
    /// That many bytes were read into the caller's buffer.
    Data(usize),
    /// The source has nothing more to deliver (peer closed, file exhausted,
    /// or device error on the read itself).
    EndOfStream,
    /// The readiness wait failed at the descriptor level; the source is
    /// unusable and must be torn down.
    WaitError(std::io::Error),
}

/// Perform one wait-then-read cycle.
///
/// With positive `remaining_micros` the readiness wait is bounded by it;
/// otherwise the wait is skipped and the read happens immediately. Reads
/// deliver at most `buf.len()` bytes.
pub async fn read_chunk(source: &mut Source, buf: &mut [u8], remaining_micros: i64) -> ReadOutcome {
    if remaining_micros > 0 {
        let wait = Duration::from_micros(remaining_micros.unsigned_abs());
        match timeout(wait, source.wait_readable()).await {
            Err(_elapsed) => return ReadOutcome::Tick,
            Ok(Err(e)) => return ReadOutcome::WaitError(e),
            Ok(Ok(())) => {}
        }
    }

    match source.read_some(buf).await {
        Ok(0) => ReadOutcome::EndOfStream,
        Ok(len) => ReadOutcome::Data(len),
        Err(e) => {
            debug!("read failed, treating as end of stream: {e}");
            ReadOutcome::EndOfStream
        }
    }
}
