//! Command line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "hitscore")]
#[command(about = "Replay judgment scripts through the hitscore engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run an event script and print the final summary
    Simulate {
        /// Script file (JSON)
        script: PathBuf,

        /// Engine configuration file (JSON)
        #[arg(short, long, env = "HITSCORE_CONFIG")]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Tsv)]
        format: ExportFormat,

        /// Append the summary to this file instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show timing windows for an overall difficulty
    Windows {
        #[arg(long)]
        od: f32,

        /// Comma separated mods, e.g. HR,DT
        #[arg(long)]
        mods: Option<String>,
    },

    /// Compute accuracy and grade from hit counts
    Grade {
        #[arg(long, default_value_t = 0)]
        n300: u32,

        #[arg(long, default_value_t = 0)]
        n100: u32,

        #[arg(long, default_value_t = 0)]
        n50: u32,

        #[arg(long, default_value_t = 0)]
        miss: u32,

        /// Hidden or Flashlight was active
        #[arg(long)]
        silver: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Tsv,
    Json,
}
