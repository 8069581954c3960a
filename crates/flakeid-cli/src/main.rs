#![doc = include_str!("../README.md")]

mod command;
mod config;
mod telemetry;

use std::io::{BufWriter, Write};

use clap::Parser;
use config::{CliArgs, Config};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = Config::try_from(args)?;

    init_telemetry()?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    command::run(&config, &mut out)?;
    out.flush()?;

    Ok(())
}
