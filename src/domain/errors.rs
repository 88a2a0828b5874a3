//! Structured error types for tracefifo
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Configuration errors are fatal and never retried; everything transient
//! (connect/resolve failures, stream end) is handled inside the acquisition
//! loop and never surfaces as an error at all.

use std::path::PathBuf;

use thiserror::Error;

use super::types::ChannelId;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no channel index in spec \"{0}\"")]
    BadChannelIndex(String),

    #[error("channel index {index} out of range (maximum {max})")]
    ChannelIndexOutOfRange { index: u32, max: u8 },

    #[error("no name for channel {0}")]
    MissingChannelName(ChannelId),
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to create socket: {0}")]
    SocketCreate(#[source] std::io::Error),

    #[error("cannot open capture file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
