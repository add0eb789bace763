// security/src/token_store.rs

// File-backed replacement for the browser's local storage: one JSON document
// holding the current session.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};

use crate::session::Session;

pub const SESSION_FILE_NAME: &str = "session.json";
pub const APP_DIR_NAME: &str = "hospital-portal";

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    /// Store under the platform config directory.
    pub fn default_location() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| anyhow!("No config directory on this platform"))?;
        Ok(TokenStore::new(base.join(APP_DIR_NAME).join(SESSION_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no session was saved. A corrupt file is discarded.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            debug!("No stored session at {}", self.path.display());
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file {}", self.path.display()))?;
        match serde_json::from_str::<Session>(&content) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                self.clear()?;
                Ok(None)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(session).context("Failed to serialise session")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        restrict_permissions(&self.path)?;
        info!("Saved session for {} to {}", session.user.email, self.path.display());
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file {}", self.path.display()))?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o600);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionUser;
    use models::Role;

    fn session() -> Session {
        Session::new(
            "abc.def.ghi",
            SessionUser {
                id: 1,
                email: "admin@clinic.vn".into(),
                full_name: None,
                role: Role::Admin,
                doctor_id: None,
            },
        )
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("nested").join(SESSION_FILE_NAME));
        assert_eq!(store.load().unwrap(), None);

        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join(SESSION_FILE_NAME));
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }
}
