//! Domain model for tracefifo
//!
//! Core configuration types and structured errors shared across the
//! acquisition loop, the CLI layer, and the lifecycle machinery.

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{
    unescape, ChannelId, ChannelSpec, SourceConfig, SourceKind, SourceTarget, DEFAULT_SERVER,
    DEFAULT_SERVER_PORT, NUM_CHANNELS, TRANSFER_SIZE,
};

pub use errors::{ConfigError, SourceError};
