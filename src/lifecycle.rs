//! Process lifecycle: shutdown flag, signal dispositions, one-shot cleanup
//!
//! The only state shared with the asynchronous termination path is the
//! [`Shutdown`] flag itself; it transitions false→true exactly once per
//! process lifetime and never resets. Cleanup runs through a drop guard so it
//! executes once no matter which path leaves the main loop.

use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use log::info;
use tokio::sync::Notify;

use crate::sink::TraceSink;

/// Grace period allowed for outstanding downstream work before final exit.
pub const SHUTDOWN_GRACE: Duration = Duration::from_micros(200);

/// Process-wide shutdown flag with an async wakeup for pending waits.
#[derive(Debug, Default)]
pub struct Shutdown {
    triggered: AtomicBool,
    notify: Notify,
}

impl Shutdown {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Shutdown::default())
    }

    /// Set the flag and wake pending waits. Returns true only for the call
    /// that actually flipped it; later calls are no-ops.
    pub fn trigger(&self) -> bool {
        let first = !self.triggered.swap(true, Ordering::SeqCst);
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    /// Resolves once the flag is set. The waiter is registered before the
    /// flag is checked, so a trigger can never slip between check and sleep.
    pub async fn cancelled(&self) {
        let mut notified = pin!(self.notify.notified());
        notified.as_mut().enable();
        if self.is_triggered() {
            return;
        }
        notified.await;
    }
}

/// Install signal dispositions: an interrupt requests an orderly exit via the
/// shutdown flag, and SIGPIPE is ignored because downstream readers attaching
/// and detaching is a normal occurrence, not a fault.
pub fn install_signal_handlers(shutdown: Arc<Shutdown>) -> Result<()> {
    // SAFETY: SIG_IGN installs no handler code, it only changes the
    // disposition for this process.
    #[allow(unsafe_code)]
    let previous = unsafe { libc::signal(libc::SIGPIPE, libc::SIG_IGN) };
    if previous == libc::SIG_ERR {
        bail!("failed to ignore SIGPIPE");
    }

    tokio::spawn(async move {
        loop {
            if tokio::signal::ctrl_c().await.is_err() {
                return;
            }
            // A second interrupt while cleanup is pending is a no-op
            if shutdown.trigger() {
                info!("interrupt received, shutting down");
            }
        }
    });

    Ok(())
}

/// Scoped cleanup around the sink.
///
/// On drop — exactly once, regardless of which path exits the main loop —
/// sets the shutdown flag, asks the downstream subsystem to shut down, and
/// allows a short grace period for outstanding work.
pub struct CleanupGuard<S: TraceSink> {
    sink: S,
    shutdown: Arc<Shutdown>,
}

impl<S: TraceSink> CleanupGuard<S> {
    pub fn new(sink: S, shutdown: Arc<Shutdown>) -> Self {
        CleanupGuard { sink, shutdown }
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

impl<S: TraceSink> Drop for CleanupGuard<S> {
    fn drop(&mut self) {
        self.shutdown.trigger();
        self.sink.shutdown();
        std::thread::sleep(SHUTDOWN_GRACE);
    }
}
