//! Stats command - instruction counts per category and role.

use anyhow::Result;
use clap::Args;
use otter_json_opcodes::{CatalogStats, catalog};
use std::fmt::Write;

#[derive(Args)]
pub struct StatsCommand {
    /// Print the counts as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub fn run(&self) -> Result<()> {
        let stats = catalog().stats();
        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        } else {
            print!("{}", summarize(&stats)?);
        }
        Ok(())
    }
}

/// Plain-text table of the counts
pub fn summarize(stats: &CatalogStats) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "instructions: {} ({} compact)", stats.total, stats.base)?;

    writeln!(out, "by category:")?;
    for (category, count) in &stats.by_category {
        writeln!(out, "  {category:<12} {count:>5}")?;
    }

    writeln!(out, "by role:")?;
    for (role, count) in &stats.by_role {
        writeln!(out, "  {:<12} {count:>5}", role.name())?;
    }

    Ok(out)
}
