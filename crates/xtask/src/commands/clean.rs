//! Remove saved sessions
//!
//! Deletes one session directory or the whole save directory.
//!
//! Safety: Always prompts for confirmation before deletion.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use crate::utils;

/// Remove saved sessions
#[derive(Parser, Debug)]
pub struct Clean {
    /// Specific session to remove (defaults to all sessions)
    #[arg(long)]
    pub session: Option<String>,

    /// Custom save directory (defaults to platform-specific location)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Skip confirmation prompt (dangerous!)
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl Clean {
    pub fn execute(self) -> Result<()> {
        let catalog = utils::catalog(self.data_dir.clone());

        let (label, target) = match &self.session {
            Some(session_id) => {
                let files = catalog.session(session_id);
                if !files.dir().exists() {
                    anyhow::bail!("Session not found: {}", session_id);
                }
                (format!("Session {}", session_id), files.dir().to_path_buf())
            }
            None => ("All sessions".to_owned(), catalog.base_dir().to_path_buf()),
        };

        if !target.exists() {
            println!("{}", style("Nothing to clean - no sessions saved yet").dim());
            return Ok(());
        }

        println!("The following will be deleted:");
        println!("  {} {}", style("→").cyan(), style(&label).bold());
        println!("    {}", style(target.display()).dim());
        println!();

        if !self.yes && !confirm()? {
            println!("{}", style("Cancelled").dim());
            return Ok(());
        }

        match &self.session {
            Some(session_id) => catalog.remove(session_id)?,
            None => std::fs::remove_dir_all(&target)
                .with_context(|| format!("Failed to delete: {}", target.display()))?,
        }

        println!("{}", style("✓ Cleanup complete!").green().bold());
        Ok(())
    }
}

/// Prompt user for confirmation
fn confirm() -> Result<bool> {
    print!("{} ", style("Proceed? [y/N]").yellow().bold());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
