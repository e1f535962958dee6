mod cli;
mod commands;
mod config;
mod deployer;
mod progress;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Commands};
use config::Config;
use std::io;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Deploy(args) => commands::deploy::run(&ctx, &config, args),
        Commands::Status => commands::status::run(&ctx, &config),
        Commands::Outputs { json } => commands::outputs::run(&ctx, &config, json),
        Commands::Purge(args) => commands::purge::run(&ctx, &config, args),
        Commands::Process(args) => commands::process::run(&ctx, args),
        Commands::People(args) => commands::people::run(&ctx, &config, args),
        Commands::Schemas(cmd) => commands::schemas::run(&ctx, &config, cmd),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "docstack", &mut io::stdout());
            Ok(())
        }
    }
}
