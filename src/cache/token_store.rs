use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::cache::auth_payload::AuthPayload;
use crate::errors::{NewsApiError, Result};

/// distinguishes temp files of concurrent writers within one process
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

#[cfg(unix)]
const CACHE_DIR_MODE: u32 = 0o770;
#[cfg(unix)]
const CACHE_FILE_MODE: u32 = 0o660;

/// Single-record on-disk cache of the last fetched `AuthPayload`.
///
/// A store without a path is disabled: `load` always yields `None` and
/// `save` is a no-op.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: Option<PathBuf>,
}

impl TokenStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    /// Create the cache directory and an empty cache file when absent.
    pub async fn initialize(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            debug!("token cache disabled, skipping setup");
            return Ok(());
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.is_dir() {
                info!("creating token cache directory {}", dir.display());
                let mut builder = tokio::fs::DirBuilder::new();
                builder.recursive(true);
                #[cfg(unix)]
                builder.mode(CACHE_DIR_MODE);
                builder.create(dir).await.map_err(|err| NewsApiError::storage(dir, err))?;
            }
        }

        match tokio::fs::OpenOptions::new().write(true).create_new(true).open(path).await {
            Ok(_) => {
                debug!("created empty token cache file {}", path.display());
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(NewsApiError::storage(path, err)),
        }
    }

    /// Read the cached payload. Missing, empty or malformed files are `None`.
    pub async fn load(&self) -> Option<AuthPayload> {
        let path = self.path.as_deref()?;
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) => {
                debug!("token cache {} not readable: {}", path.display(), err);
                return None;
            }
        };
        if content.trim().is_empty() {
            debug!("token cache {} is empty", path.display());
            return None;
        }
        serde_json::from_str(&content)
            .inspect_err(|err| warn!("token cache {} is malformed, ignoring: {}", path.display(), err))
            .ok()
    }

    /// Replace the cached payload: write a temporary sibling, then rename it
    /// over the cache file.
    pub async fn save(&self, payload: &AuthPayload) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let content = serde_json::to_vec(payload).map_err(|err| NewsApiError::storage(path, err))?;

        let tmp = temp_path(path);
        tokio::fs::write(&tmp, &content)
            .await
            .map_err(|err| NewsApiError::storage(&tmp, err))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(CACHE_FILE_MODE);
            if let Err(err) = tokio::fs::set_permissions(&tmp, perms).await {
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(NewsApiError::storage(&tmp, err));
            }
        }
        if let Err(err) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(NewsApiError::storage(path, err));
        }
        debug!("token cache {} updated", path.display());
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
    name.push(format!(".{}.{}.tmp", std::process::id(), seq));
    path.with_file_name(name)
}
