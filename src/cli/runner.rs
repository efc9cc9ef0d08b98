//! CLI runner - executes an export

use crate::cli::commands::Cli;
use crate::config::ExportConfig;
use crate::engine::{Collection, ExportOptions, ExportStats, Exporter};
use crate::error::Result;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the export
    pub async fn run(&self) -> Result<ExportStats> {
        let config = self.config()?;
        debug!("Effective config: {config:?}");

        let mut exporter = Exporter::from_config(&config)?;
        exporter
            .export(&self.collections(), &self.options(&config))
            .await
    }

    /// Config file (or defaults) with command-line overrides applied
    pub fn config(&self) -> Result<ExportConfig> {
        let mut config = match &self.cli.config {
            Some(path) => ExportConfig::from_file(path)?,
            None => ExportConfig::default(),
        };

        if let Some(per_page) = self.cli.per_page {
            config.per_page = per_page;
        }
        if let Some(country) = &self.cli.country {
            config.country.clone_from(country);
        }
        if let Some(dir) = &self.cli.output_dir {
            config.output_dir.clone_from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    /// Per-run options
    pub fn options(&self, config: &ExportConfig) -> ExportOptions {
        ExportOptions::new(&self.cli.user_id)
            .with_token(self.cli.token.clone().filter(|t| !t.trim().is_empty()))
            .with_per_page(config.per_page)
            .with_country(&config.country)
            .with_letterboxd(self.cli.letterboxd)
            .with_raw(self.cli.raw)
    }

    /// Requested collections in export order; all of them when none is named
    pub fn collections(&self) -> Vec<Collection> {
        if self.cli.collections.is_empty() {
            return Collection::ALL.to_vec();
        }
        let selected: Vec<Collection> = self
            .cli
            .collections
            .iter()
            .map(|arg| Collection::from(*arg))
            .collect();
        Collection::ALL
            .into_iter()
            .filter(|c| selected.contains(c))
            .collect()
    }
}
