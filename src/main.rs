//! CLI entry point for the byte-window file sensor

use bytecanvas::io::cli::{Cli, Sensor};
use clap::Parser;

fn main() -> bytecanvas::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();
    let sensor = Sensor::new(cli);
    sensor.process()?;
    Ok(())
}
