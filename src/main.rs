// In src/main.rs

// Declare modules
pub mod config;
pub mod emit;
pub mod hpgl;
pub mod protocol;

use crate::{config::Config, hpgl::Plotter};

use anyhow::Context;
use log::{debug, info};
use std::io::{self, Write};
use std::path::PathBuf;

/// Main entry point for the plotter emulator.
///
/// Reads framed commands from stdin and answers each one with a block of
/// output records on stdout, terminated by a status record and an
/// end-of-reply record.
fn main() -> anyhow::Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = Config::load(&path)?;
            info!("Configuration loaded from {}.", path.display());
            config
        }
        None => {
            info!("Configuration loaded (using default).");
            Config::default()
        }
    };
    info!("Paper size: {:?}", config.paper.size);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    // One version banner before the first reply.
    writeln!(out, "{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .context("Failed to write version banner")?;
    out.flush().context("Failed to flush version banner")?;

    let mut plotter = Plotter::new(&config);
    info!("Plotter initialized.");

    while let Some(frame) = protocol::read_frame(&mut input)? {
        debug!(
            "frame: status {:#04x}, {} command bytes",
            frame.status,
            frame.body.len()
        );
        plotter.process_line(frame.status, &frame.body);
        for record in plotter.take_records() {
            writeln!(out, "{record}").context("Failed to write output record")?;
        }
        out.flush().context("Failed to flush reply")?;
    }

    info!("End of input, exiting.");
    Ok(())
}
