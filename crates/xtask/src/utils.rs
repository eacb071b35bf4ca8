//! Utility functions for xtask commands

use std::path::PathBuf;

use anyhow::{Result, bail};
use combat_runtime::{SessionCatalog, SessionFiles};

/// Catalog rooted at `dir`, or at the default save directory.
pub fn catalog(dir: Option<PathBuf>) -> SessionCatalog {
    SessionCatalog::new(dir.unwrap_or_else(crate::dirs::data_dir))
}

/// Files of `session`, or of the most recent session when `None`.
pub fn resolve_session(catalog: &SessionCatalog, session: Option<String>) -> Result<SessionFiles> {
    let session_id = match session {
        Some(id) => id,
        None => match catalog.latest()? {
            Some(manifest) => manifest.session_id,
            None => bail!(
                "No sessions found in {}\nRun `cargo xtask simulate <scenario>` first.",
                catalog.base_dir().display()
            ),
        },
    };

    let files = catalog.session(&session_id);
    if !files.exists() {
        bail!("Session not found: {}", files.dir().display());
    }
    Ok(files)
}
