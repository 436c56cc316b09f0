use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to the config file.
    /// Takes priority over `POWERLET_CONFIG`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the stylesheet.
    /// Takes priority over `POWERLET_CSS`.
    #[arg(short, long)]
    pub style: Option<PathBuf>,

    /// Print debug information to stderr
    #[arg(long)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Queries the power manager once,
    /// prints what the indicator would show,
    /// and exits.
    Status {
        /// Format to output the status as.
        #[arg(short, long, value_enum, default_value_t = Format::Plain)]
        format: Format,
    },
}

#[derive(Debug, Default, ValueEnum, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    #[default]
    Plain,
    Json,
}
