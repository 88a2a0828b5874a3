//! # tracefifo - Main Entry Point
//!
//! Wires the CLI configuration to the collector loop: one active trace
//! source in, every byte pumped in order into the downstream sink, with
//! reconnect-on-failure for network sources and a one-shot cleanup on exit.

use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use std::io::BufWriter;

use tracefifo::cli::Args;
use tracefifo::collector::{self, StopReason};
use tracefifo::domain::errors::SourceError;
use tracefifo::domain::{SourceConfig, SourceTarget};
use tracefifo::lifecycle::{install_signal_handlers, CleanupGuard, Shutdown};
use tracefifo::sink::RawWriterSink;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_SOCKET: i32 = 3;

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    std::process::exit(match run(args) {
        Ok(reason) => {
            info!("stopping: {reason}");
            EXIT_SUCCESS
        }
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e}");
            code
        }
    });
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env().filter_level(level).init();
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SourceError>() {
        Some(SourceError::SocketCreate(_)) => EXIT_SOCKET,
        Some(SourceError::FileOpen { .. }) => EXIT_CONFIG,
        None => EXIT_ERROR,
    }
}

/// Startup config dump, mirroring what the loop was actually given.
fn dump_config(args: &Args, config: &SourceConfig) {
    info!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    match &config.target {
        SourceTarget::Network { server, port } => info!("server      : {server}:{port}"),
        SourceTarget::File { path, terminate_on_exhaustion } => {
            let mode = if *terminate_on_exhaustion { "terminate on exhaustion" } else { "ongoing read" };
            info!("input file  : {} ({mode})", path.display());
        }
    }

    info!("channels    :");
    for spec in &args.channels {
        match &spec.format {
            Some(format) => info!("         {:02} [{}] [{}]", spec.id, format.escape_default(), spec.name),
            None => {
                warn!("no output format for channel {}, output raw", spec.id);
                info!("         {:02} [RAW] [{}]", spec.id, spec.name);
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn run(args: Args) -> Result<StopReason> {
    let config = args.source_config();
    dump_config(&args, &config);

    let shutdown = Shutdown::new();
    install_signal_handlers(shutdown.clone())?;

    // Raw pass-through sink; the decoder/channel subsystem plugs in behind
    // the same trait
    let sink = RawWriterSink::new(BufWriter::new(std::io::stdout()));
    let mut guard = CleanupGuard::new(sink, shutdown.clone());

    let reason = collector::run(&config, guard.sink_mut(), &shutdown).await?;
    Ok(reason)
}
