//! PaintRegion CLI - Command-line interface
//!
//! Replays recorded brush sessions, prints single stamps, and manages the
//! brush configuration file.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use paintregion::logging::{init_logging, LogConfig};

use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;
use commands::stamp::StampArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "paintregion")]
#[command(version = paintregion::VERSION)]
#[command(about = "Paint geographic regions with a circular brush", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded session and export the painted region as GeoJSON
    Replay(ReplayArgs),

    /// Print a single brush stamp as GeoJSON
    Stamp(StampArgs),

    /// View or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    let mut log_config = LogConfig::default().with_verbose(cli.verbose);
    if let Some(path) = cli.log_file {
        log_config = log_config.with_log_file(path);
    }
    let _guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => CliError::from(e).exit(),
    };

    let result = match cli.command {
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Stamp(args) => commands::stamp::run(args),
        Commands::Config(command) => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_stamp_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "paintregion", "stamp", "--lng", "-73.98", "--lat", "40.75", "--radius", "25",
        ])
        .unwrap();

        let Commands::Stamp(args) = cli.command else {
            panic!("expected stamp");
        };
        assert_eq!(args.lng, -73.98);
        assert_eq!(args.zoom, 15);
        assert_eq!(args.radius, Some(25.0));
    }

    #[test]
    fn test_parse_replay_with_global_verbose() {
        let cli = Cli::try_parse_from([
            "paintregion",
            "replay",
            "session.json",
            "-o",
            "out.geojson",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Commands::Replay(args) = cli.command else {
            panic!("expected replay");
        };
        assert_eq!(args.recording, PathBuf::from("session.json"));
        assert_eq!(args.output, Some(PathBuf::from("out.geojson")));
    }
}
