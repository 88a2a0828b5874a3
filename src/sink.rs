//! Trace-sink capability and the byte dispatcher feeding it
//!
//! The protocol decoder and per-channel fan-out live behind [`TraceSink`];
//! this crate only guarantees that every received byte reaches the sink
//! exactly once and in order.

use std::io::Write;

use log::debug;

/// Capability exposed by the downstream decoder/channel subsystem.
pub trait TraceSink {
    /// Accept one byte of the trace stream.
    fn pump(&mut self, byte: u8);

    /// Request orderly shutdown of the downstream subsystem. Called exactly
    /// once, during process cleanup.
    fn shutdown(&mut self);
}

/// Push every byte of `chunk`, in the exact order received, into the sink.
/// Returns only once the whole chunk has been delivered; the sink is treated
/// as never failing at this layer.
pub fn dispatch<S: TraceSink + ?Sized>(sink: &mut S, chunk: &[u8]) {
    debug!("rxed packet of {} bytes", chunk.len());

    for &byte in chunk {
        sink.pump(byte);
    }
}

/// Raw pass-through sink: forwards the unmodified stream to a writer.
///
/// Write errors are deliberately swallowed: with SIGPIPE ignored, a
/// downstream reader detaching shows up here as EPIPE, and that is a normal
/// occurrence rather than a fault.
pub struct RawWriterSink<W: Write> {
    writer: W,
}

impl<W: Write> RawWriterSink<W> {
    pub fn new(writer: W) -> Self {
        RawWriterSink { writer }
    }
}

impl<W: Write> TraceSink for RawWriterSink<W> {
    fn pump(&mut self, byte: u8) {
        let _ = self.writer.write_all(&[byte]);
    }

    fn shutdown(&mut self) {
        let _ = self.writer.flush();
    }
}
