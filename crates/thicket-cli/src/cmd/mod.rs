pub mod completions;
pub mod show;
pub mod stats;
pub mod tree;

use std::path::{Path, PathBuf};

use anyhow::Result;
use thicket_core::config::EffectiveConfig;
use thicket_core::export::{ExportError, load_export};
use thicket_core::graph::{Forest, GraphBuilder};
use tracing::debug;

use crate::output::{CliError, OutputMode, render_error};

/// Inputs shared by every command that reads the export.
pub struct Context<'a> {
    pub config: &'a EffectiveConfig,
    pub project_root: &'a Path,
    pub output: OutputMode,
}

impl Context<'_> {
    /// `--file` if given, else the configured export path.
    pub fn export_path(&self, file: Option<&Path>) -> PathBuf {
        file.map_or_else(
            || self.config.export_path(self.project_root),
            |f| self.project_root.join(f),
        )
    }

    /// Read the export and build the forest, reporting failures with their
    /// error codes before bailing.
    pub fn load_forest(&self, file: Option<&Path>) -> Result<Forest> {
        let path = self.export_path(file);
        let issues = match load_export(&path) {
            Ok(issues) => issues,
            Err(err) => {
                if let Some(cause) = err.downcast_ref::<ExportError>() {
                    let mut cli = CliError::from(cause);
                    cli.message = format!("{}: {cause}", path.display());
                    render_error(self.output, &cli)?;
                }
                return Err(err);
            }
        };

        let builder = GraphBuilder::new().auto_expand(self.config.project.tree.auto_expand);
        match builder.build(&issues) {
            Ok(forest) => {
                debug!(path = %path.display(), nodes = forest.len(), "forest ready");
                Ok(forest)
            }
            Err(err) => {
                render_error(self.output, &CliError::from(&err))?;
                Err(err.into())
            }
        }
    }
}
