//! List command - write the catalog listing.

use anyhow::Result;
use clap::Args;
use otter_json_opcodes::{Listing, catalog};
use std::path::PathBuf;

use crate::config::{Config, OutputFormat};

#[derive(Args)]
pub struct ListCommand {
    /// Listing format (defaults to the config file, then text)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the listing to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Leave out the indent twins
    #[arg(long)]
    pub no_indent: bool,
}

impl ListCommand {
    pub fn run(&self, config: &Config) -> Result<()> {
        let format = self.format.unwrap_or(config.output.format);
        let include_indent = config.output.include_indent && !self.no_indent;

        let listing = Listing::new(catalog(), include_indent);
        let rendered = render(&listing, format)?;

        match self.output.as_ref().or(config.output.path.as_ref()) {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, rendered)?;
                tracing::info!(
                    "Wrote {} instructions to {}",
                    listing.entries.len(),
                    path.display()
                );
            }
            None => print!("{rendered}"),
        }

        Ok(())
    }
}

/// Render a listing in the requested format
pub fn render(listing: &Listing, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(listing.to_string()),
        OutputFormat::Json => {
            let mut json = listing.to_json(true)?;
            json.push('\n');
            Ok(json)
        }
    }
}
