//! Replay a saved session
//!
//! Re-executes `commands.log` from the initial snapshot and verifies the
//! state root after every command.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;

use crate::utils;

/// Replay a saved session and verify state roots
#[derive(Parser, Debug)]
pub struct Replay {
    /// Session ID to replay (defaults to the most recent session)
    #[arg(short, long, value_name = "SESSION")]
    session: Option<String>,

    /// Custom save directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
}

impl Replay {
    pub fn execute(self) -> Result<()> {
        let catalog = utils::catalog(self.data_dir);
        let files = utils::resolve_session(&catalog, self.session)?;

        println!("{} {}", style("Replaying:").bold().cyan(), files.session_id());
        let report = combat_runtime::replay(&files)?;

        let outcome = report
            .outcome
            .map_or_else(|| "unresolved".to_owned(), |outcome| outcome.to_string());
        println!("{} {}", style("Commands:").bold().cyan(), report.commands);
        println!("{} {}", style("Outcome:").bold().cyan(), outcome);
        println!(
            "{} {}",
            style("State root:").bold().cyan(),
            hex::encode(report.state_root)
        );

        if report.final_root_verified {
            println!("{}", style("✓ Replay matches the saved session").green().bold());
        } else {
            println!(
                "{}",
                style("✓ Every command reproduced its recorded root (session was never closed)")
                    .green()
            );
        }
        Ok(())
    }
}
