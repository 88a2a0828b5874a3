//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

use crate::domain::{
    ChannelSpec, SourceConfig, SourceTarget, DEFAULT_SERVER, DEFAULT_SERVER_PORT, TRANSFER_SIZE,
};

#[derive(Parser, Debug)]
#[command(
    name = "tracefifo",
    about = "Split an ITM/TPIU trace byte stream from a trace server or capture file",
    after_help = "\
EXAMPLES:
    tracefifo -c 0,console                 Forward channel 0 under the name 'console'
    tracefifo -s remotehost -p 3443        Read from a remote trace server
    tracefifo -f capture.bin -e            Replay a capture file, exit at end of file"
)]
pub struct Args {
    /// Trace server to connect to
    #[arg(short, long, default_value = DEFAULT_SERVER)]
    pub server: String,

    /// TCP port of the trace server
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,

    /// Take input from the specified capture file instead of the network
    #[arg(short, long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// When reading from a file, terminate at end of file rather than waiting
    /// for further input
    #[arg(short = 'e', long = "eof-terminate", requires = "file")]
    pub file_terminate: bool,

    /// Channel to populate, as <index>,<name>[,<format>] (repeat per channel)
    #[arg(short, long = "channel", value_name = "SPEC")]
    pub channels: Vec<ChannelSpec>,

    /// Raise log verbosity (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Immutable source configuration for the collector loop.
    #[must_use]
    pub fn source_config(&self) -> SourceConfig {
        let target = match &self.file {
            Some(path) => SourceTarget::File {
                path: path.clone(),
                terminate_on_exhaustion: self.file_terminate,
            },
            None => SourceTarget::Network { server: self.server.clone(), port: self.port },
        };
        SourceConfig { target, chunk_size: TRANSFER_SIZE }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, SourceKind};

    #[test]
    fn test_defaults_select_network_source() {
        let args = Args::parse_from(["tracefifo"]);
        let config = args.source_config();
        assert_eq!(config.target.kind(), SourceKind::Network);
        match config.target {
            SourceTarget::Network { server, port } => {
                assert_eq!(server, DEFAULT_SERVER);
                assert_eq!(port, DEFAULT_SERVER_PORT);
            }
            SourceTarget::File { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_file_source_with_terminate() {
        let args = Args::parse_from(["tracefifo", "-f", "capture.bin", "-e"]);
        match args.source_config().target {
            SourceTarget::File { path, terminate_on_exhaustion } => {
                assert_eq!(path, PathBuf::from("capture.bin"));
                assert!(terminate_on_exhaustion);
            }
            SourceTarget::Network { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_eof_terminate_requires_file() {
        assert!(Args::try_parse_from(["tracefifo", "-e"]).is_err());
    }

    #[test]
    fn test_repeated_channel_specs() {
        let args =
            Args::parse_from(["tracefifo", "-c", "0,console", "-c", r"1,swo,%02x\n"]);
        assert_eq!(args.channels.len(), 2);
        assert_eq!(args.channels[0].id, ChannelId(0));
        assert_eq!(args.channels[1].format.as_deref(), Some("%02x\n"));
    }

    #[test]
    fn test_invalid_channel_spec_rejected() {
        assert!(Args::try_parse_from(["tracefifo", "-c", "99,too-high"]).is_err());
    }
}
