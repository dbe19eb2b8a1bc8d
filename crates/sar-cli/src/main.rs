use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tracing::Level;

use sar_cli::{ArchiveCommand, CliConfig, handle};

#[derive(Parser)]
#[command(
    name = "sar",
    about = "Create, extend, list and extract SAR archives",
    version,
    long_about = "A command-line tool for SAR content-addressed archives. Entries are stored DEFLATE-compressed under their file name and looked up by name hash."
)]
struct Cli {
    /// Archive file to operate on
    archive: PathBuf,

    #[command(subcommand)]
    command: Option<ArchiveCommand>,

    /// Set the logging level
    #[arg(short, long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Treat format mismatches, long names and codec failures as errors
    #[arg(long, env = "SAR_STRICT", global = true)]
    strict: bool,

    /// DEFLATE level used when adding files (0-9)
    #[arg(long, env = "SAR_LEVEL", global = true, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: Option<u32>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn main() -> Result<()> {
    // Bad usage prints the diagnostic and usage but is not a failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            e.print()?;
            return Ok(());
        }
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::from(cli.log_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        eprintln!("No command given for {}", cli.archive.display());
        eprintln!();
        Cli::command().write_help(&mut std::io::stderr())?;
        return Ok(());
    };

    let config = CliConfig::load(cli.config.as_deref())?.with_overrides(cli.strict, cli.level);
    handle(&cli.archive, command, &config)
}
