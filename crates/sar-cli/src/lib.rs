//! SAR archive tool
//!
//! This library provides the command handlers behind the `sar` binary.

pub mod commands;
pub mod config;

pub use crate::commands::{
    create::run as create_archive, extract::run as extract_archive, handle,
    list::run as list_archive,
};
pub use crate::config::CliConfig;

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ArchiveCommand {
    /// Extract every entry into a directory
    #[command(visible_aliases = ["x", "e"])]
    Extract {
        /// Destination directory
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Create the archive, or add files to it if it already exists
    #[command(visible_aliases = ["c", "a", "add"])]
    Create {
        /// Files and directories to add; directories are walked recursively
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Description stored after the header
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Print the header and entry table
    #[command(visible_alias = "p")]
    List,
}
