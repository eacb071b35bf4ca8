//! List saved sessions

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;

use crate::utils;

/// List saved sessions
#[derive(Parser, Debug)]
pub struct Sessions {
    /// Custom save directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Sessions {
    pub fn execute(self) -> Result<()> {
        let catalog = utils::catalog(self.data_dir);
        let manifests = catalog.list()?;

        if manifests.is_empty() {
            println!(
                "{}",
                style(format!("No sessions in {}", catalog.base_dir().display())).dim()
            );
            return Ok(());
        }

        for manifest in manifests {
            let outcome = match (manifest.outcome, manifest.is_closed()) {
                (Some(outcome), _) => style(outcome.to_string()).green(),
                (None, true) => style("unresolved".to_owned()).yellow(),
                (None, false) => style("open".to_owned()).red(),
            };
            println!(
                "{}  {}  {:<18} {:>3} cmds  {}",
                style(&manifest.session_id).bold(),
                style(manifest.created_at.format("%Y-%m-%d %H:%M:%S")).dim(),
                manifest.scenario.as_deref().unwrap_or("-"),
                manifest.commands,
                outcome
            );
        }
        Ok(())
    }
}
