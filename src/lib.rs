//! # tracefifo - Trace stream acquisition and dispatch
//!
//! Establishes a byte stream from exactly one active source — a TCP trace
//! server or a local capture file — paces reads on a ~1 s tick cadence, and
//! pumps every received byte, strictly in order, into a downstream trace
//! sink (the protocol decoder / channel fan-out subsystem).
//!
//! ```text
//! ┌──────────────┐   acquire/retry   ┌──────────────┐   bytes, in order
//! │ trace server │ ────────────────▶ │  collector   │ ─────────────────▶ TraceSink
//! │ or capture   │   wait+read       │  (main loop) │                    (decoder)
//! └──────────────┘                   └──────┬───────┘
//!                                           │ shutdown flag / signals
//!                                    ┌──────▼───────┐
//!                                    │  lifecycle   │
//!                                    └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`collector`]: the outer acquire/reconnect loop wrapping the inner
//!   read/dispatch loop
//! - [`source`]: source handle, acquisition (connect-with-retry, file open)
//!   and the timeout-bounded read cycle
//! - [`cadence`]: tick cadence bookkeeping with a fixed anchor so drift does
//!   not accumulate
//! - [`sink`]: the trace-sink capability and the in-order byte dispatcher
//! - [`lifecycle`]: shutdown flag, signal dispositions, one-shot cleanup
//! - [`cli`]: command-line argument parsing
//! - [`domain`]: configuration types and structured errors
//!
//! The loop is single-threaded and cooperative: the only suspension point is
//! the timeout-bounded readiness wait, and the only state shared with the
//! asynchronous termination path is the shutdown flag.

// Expose modules for testing
pub mod cadence;
pub mod cli;
pub mod collector;
pub mod domain;
pub mod lifecycle;
pub mod sink;
pub mod source;
