//! Session directories: manifest, snapshots and log locations.

use std::fs;
use std::path::{Path, PathBuf};

use combat_core::CombatState;

use crate::events::Event;
use crate::repository::types::{CommandLogEntry, SessionManifest};
use crate::repository::{RepositoryError, Result};

use super::log::read_all;

/// Files of one saved session.
#[derive(Debug, Clone)]
pub struct SessionFiles {
    dir: PathBuf,
}

impl SessionFiles {
    pub const MANIFEST: &'static str = "manifest.json";
    pub const COMMANDS: &'static str = "commands.log";
    pub const EVENTS: &'static str = "events.log";
    pub const INITIAL_STATE: &'static str = "initial.state";
    pub const FINAL_STATE: &'static str = "final.state";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn session_id(&self) -> &str {
        self.dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    pub fn exists(&self) -> bool {
        self.dir.join(Self::MANIFEST).exists()
    }

    /// Writes the manifest via a temp file and rename.
    pub fn save_manifest(&self, manifest: &SessionManifest) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::MANIFEST);
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(path = %path.display(), "saved manifest");
        Ok(())
    }

    pub fn load_manifest(&self) -> Result<SessionManifest> {
        let path = self.dir.join(Self::MANIFEST);
        if !path.exists() {
            return Err(RepositoryError::SessionNotFound(
                self.dir.display().to_string(),
            ));
        }
        let json = fs::read_to_string(&path)?;
        serde_json::from_str(&json).map_err(|e| RepositoryError::Json(e.to_string()))
    }

    /// Writes a bincode state snapshot via a temp file and rename.
    pub fn save_state(&self, name: &str, state: &CombatState) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let temp_path = path.with_extension("tmp");

        let bytes =
            bincode::serialize(state).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(path = %path.display(), nonce = state.nonce, "saved state snapshot");
        Ok(())
    }

    /// Returns `None` when the snapshot was never written.
    pub fn load_state(&self, name: &str) -> Result<Option<CombatState>> {
        let path = self.dir.join(name);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path)?;
        let state = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(Some(state))
    }

    pub fn read_commands(&self) -> Result<Vec<CommandLogEntry>> {
        read_all(&self.dir.join(Self::COMMANDS))
    }

    pub fn read_events(&self) -> Result<Vec<Event>> {
        read_all(&self.dir.join(Self::EVENTS))
    }
}

/// Directory holding one subdirectory per saved session.
#[derive(Debug, Clone)]
pub struct SessionCatalog {
    base_dir: PathBuf,
}

impl SessionCatalog {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn session(&self, session_id: &str) -> SessionFiles {
        SessionFiles::new(self.base_dir.join(session_id))
    }

    /// Manifests of all saved sessions, oldest first.
    pub fn list(&self) -> Result<Vec<SessionManifest>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut manifests = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let files = SessionFiles::new(path);
            if !files.exists() {
                continue;
            }
            match files.load_manifest() {
                Ok(manifest) => manifests.push(manifest),
                Err(e) => tracing::warn!(dir = %files.dir().display(), "skipping session: {e}"),
            }
        }
        manifests.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        Ok(manifests)
    }

    /// Most recently created session.
    pub fn latest(&self) -> Result<Option<SessionManifest>> {
        Ok(self.list()?.pop())
    }

    /// Deletes one session directory.
    pub fn remove(&self, session_id: &str) -> Result<()> {
        let files = self.session(session_id);
        if !files.dir().exists() {
            return Err(RepositoryError::SessionNotFound(session_id.to_owned()));
        }
        fs::remove_dir_all(files.dir())?;
        tracing::debug!(session_id, "removed session");
        Ok(())
    }
}
