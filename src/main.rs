//! Regen CLI - watch-triggered rebuild orchestrator
//!
//! Usage: regen <COMMAND>
//!
//! Commands:
//!   generate  Run the build once
//!   watch     Build, then rebuild whenever the input directory changes

mod cli;
mod commands;
mod ui;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, ColorWhen, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(&cli) {
        let caps = ui::terminal::detect_capabilities();
        let color = match cli.color {
            Some(ColorWhen::Always) => true,
            Some(ColorWhen::Never) => false,
            Some(ColorWhen::Auto) | None => caps.supports_color && !caps.is_ci,
        };
        eprintln!("{}", ui::output::format_error(&err, color && !cli.json));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Generate(args) => {
            commands::generate::cmd_generate(args, cli.json, cli.verbose, cli.color)
        }
        Commands::Watch(args) => commands::watch::cmd_watch(args, cli.json, cli.verbose, cli.color),
    }
}
