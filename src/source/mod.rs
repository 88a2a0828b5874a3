//! The active byte-stream source: a trace-server socket or a capture file
//!
//! At most one [`Source`] is open at any time. It is owned exclusively by the
//! collector loop and dropped (closing the descriptor) on every inner-loop
//! exit, normal or not.

pub mod acquire;
pub mod reader;

pub use acquire::{acquire, Acquired, RETRY_INTERVAL};
pub use reader::{read_chunk, ReadOutcome};

use std::io;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::domain::SourceKind;

/// An open source handle plus its kind.
#[derive(Debug)]
pub enum Source {
    Network(TcpStream),
    File(File),
}

impl Source {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Network(_) => SourceKind::Network,
            Source::File(_) => SourceKind::File,
        }
    }

    /// Wait until at least one byte can be read. A file is always ready;
    /// only the tick timeout paces it.
    pub(crate) async fn wait_readable(&self) -> io::Result<()> {
        match self {
            Source::Network(stream) => stream.readable().await,
            Source::File(_) => Ok(()),
        }
    }

    pub(crate) async fn read_some(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Source::Network(stream) => stream.read(buf).await,
            Source::File(file) => file.read(buf).await,
        }
    }
}
