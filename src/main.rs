// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use brewcop::Config;
use brewcop::application::{LogSink, PotChecker};
use brewcop::pot_monitor::PotMonitor;
use brewcop::weight::EcrScale;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(version, about = "Coffee pot monitor for a serial bench scale")]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "pot.toml")]
    config: PathBuf,

    /// OFF, ERROR, WARN, INFO, DEBUG or TRACE. RUST_LOG takes precedence.
    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,

    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Poll the scale and report pot events (the default)
    Monitor {
        /// Stop after this many polls
        #[arg(long)]
        polls: Option<u64>,
    },
    /// Print one weight reading in pounds
    Read,
    /// Re-zero the scale and print its status
    Zero,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level)
        .parse_default_env()
        .format_timestamp_millis()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = Config::load(&cli.config)?;

    log::info!(
        "Initializing {} using scale on {}",
        config.pot.name,
        config.scale.device.display()
    );
    let mut scale = EcrScale::open(&config.scale)?;

    match cli.mode.unwrap_or(Mode::Monitor { polls: None }) {
        Mode::Monitor { polls } => {
            let monitor = PotMonitor::new(config.pot.levels);
            let mut checker =
                PotChecker::new(config.pot.name, scale, monitor, LogSink, config.poll_interval);
            checker.run(polls);
            checker.into_weighing_system().close();
        }
        Mode::Read => {
            let result = scale.read();
            scale.close();
            println!("{:.3}", result?);
        }
        Mode::Zero => {
            let result = scale.zero();
            scale.close();
            println!("{}", result?);
        }
    }
    Ok(())
}
