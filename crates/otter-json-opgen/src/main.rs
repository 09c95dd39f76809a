//! Otter JSON encoder opcode tool.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

use commands::{
    list::ListCommand, show::ShowCommand, stats::StatsCommand, verify::VerifyCommand,
};

#[derive(Parser)]
#[command(
    name = "otter-json-opgen",
    version,
    about = "Inspect the Otter JSON encoder instruction catalog"
)]
struct Cli {
    /// Path to a config file (defaults to opgen.toml in this or a parent directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the instruction listing
    List(ListCommand),
    /// Describe one instruction and its transitions
    Show(ShowCommand),
    /// Count instructions per category and role
    Stats(StatsCommand),
    /// Rebuild the catalog and check its laws
    Verify(VerifyCommand),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::List(cmd) => cmd.run(&config),
        Commands::Show(cmd) => cmd.run(),
        Commands::Stats(cmd) => cmd.run(),
        Commands::Verify(cmd) => cmd.run(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_flags() {
        let cli = Cli::parse_from(["otter-json-opgen", "list", "--format", "json", "--no-indent"]);
        let Commands::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.format, Some(config::OutputFormat::Json));
        assert!(cmd.no_indent);
    }
}
