use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod script;

use cli::{Cli, Command};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hitscore=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            script,
            config,
            format,
            output,
        } => commands::simulate::run(&script, config.as_deref(), format, output.as_deref()),
        Command::Windows { od, mods } => commands::windows::run(od, mods.as_deref()),
        Command::Grade {
            n300,
            n100,
            n50,
            miss,
            silver,
        } => commands::grade::run(n300, n100, n50, miss, silver),
    }
}
