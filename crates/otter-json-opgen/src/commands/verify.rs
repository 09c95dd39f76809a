//! Verify command - rebuild the catalog and check its laws.

use anyhow::{Context, Result};
use clap::Args;
use otter_json_opcodes::{Catalog, TRANSITION_COUNT};

#[derive(Args)]
pub struct VerifyCommand {
    /// Only report failures
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl VerifyCommand {
    pub fn run(&self) -> Result<()> {
        // The shared catalog panics on failure; a fresh build reports it.
        let catalog = Catalog::build().context("Catalog verification failed")?;

        if !self.quiet {
            println!(
                "ok: {} instructions, {} transitions each, indent offset {}",
                catalog.len(),
                TRANSITION_COUNT,
                catalog.base_len()
            );
        }
        Ok(())
    }
}
