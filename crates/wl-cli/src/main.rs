use std::path::Path;

use anyhow::Context;
use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod write_lock;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("workload error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    let command = cli.command;

    let config = bootstrap::load_config(&flags)?;
    if let cli::Commands::CheckExpression(args) = &command {
        return commands::check_expression::handle(args, &config, &flags);
    }

    let write_lock = if command_requires_write_lock(&command) && !config.database.is_in_memory() {
        let database = Path::new(&config.database.path);
        Some(write_lock::acquire_beside(database, command.name()).await?)
    } else {
        None
    };

    let service = bootstrap::open_service(&config)
        .await
        .context("failed to open workload database")?;

    let result = commands::dispatch::dispatch(command, &service, &flags).await;
    drop(write_lock);
    result
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("WORKLOAD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

const fn command_requires_write_lock(command: &cli::Commands) -> bool {
    match command {
        cli::Commands::Initialise
        | cli::Commands::NewYear(_)
        | cli::Commands::StandardLoad(_) => true,
        cli::Commands::Balances | cli::Commands::CheckExpression(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::command_requires_write_lock;
    use crate::cli::Cli;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("cli should parse")
    }

    #[test]
    fn mutating_commands_take_the_write_lock() {
        assert!(command_requires_write_lock(&parse(&["workload", "initialise"]).command));
        assert!(command_requires_write_lock(
            &parse(&["workload", "new-year", "--year", "2025"]).command
        ));
        assert!(command_requires_write_lock(
            &parse(&["workload", "standard-load", "--draft", "rates.toml"]).command
        ));
    }

    #[test]
    fn read_only_commands_skip_the_write_lock() {
        assert!(!command_requires_write_lock(&parse(&["workload", "balances"]).command));
        assert!(!command_requires_write_lock(
            &parse(&["workload", "check-expression", "2*s"]).command
        ));
    }
}
