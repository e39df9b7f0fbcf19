//! Cookie-jar file credential store
//!
//! The file holds one JSON object keyed by cookie name:
//!
//! ```json
//! { "access_token": { "value": "…", "path": "/" } }
//! ```
//!
//! Every write rewrites the whole jar through a temporary file and a rename,
//! so a crash never leaves a half-written jar behind. Disk IO runs on the
//! blocking pool; reads are served from memory. On unix the jar is created
//! owner-only (`0600`).

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use kanflow_core::{CredentialKey, CredentialStore};
use kanflow_domain::constants::CREDENTIAL_PATH;
use kanflow_domain::{KanflowError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::InfraError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CookieEntry {
    value: String,
    #[serde(default = "default_cookie_path")]
    path: String,
}

type Jar = BTreeMap<String, CookieEntry>;

/// Credential store persisted to a JSON cookie jar
#[derive(Debug)]
pub struct FileCredentialStore {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    path: PathBuf,
    jar: Mutex<Jar>,
    /// Serializes writers so the last one to run persists the latest jar.
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Open (or lazily create) the jar at `path`.
    ///
    /// A missing file is an empty jar. A malformed file is an error rather
    /// than silently discarded credentials.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let jar = read_jar(&path)?;
        debug!(path = %path.display(), entries = jar.len(), "opened credential file");
        let shared = Shared { path, jar: Mutex::new(jar), write_lock: Mutex::new(()) };
        Ok(Self { shared: Arc::new(shared) })
    }

    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    async fn mutate(&self, apply: impl FnOnce(&mut Jar) -> bool) -> Result<()> {
        let changed = apply(&mut self.shared.jar.lock());
        if !changed {
            return Ok(());
        }

        let shared = Arc::clone(&self.shared);
        tokio::task::spawn_blocking(move || {
            let _writer = shared.write_lock.lock();
            let snapshot = shared.jar.lock().clone();
            write_jar(&shared.path, &snapshot)
        })
        .await
        .map_err(|e| KanflowError::Internal(format!("credential file task failed: {e}")))?
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>> {
        Ok(self.shared.jar.lock().get(key.as_str()).map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<()> {
        let entry = CookieEntry { value: value.to_string(), path: default_cookie_path() };
        self.mutate(|jar| jar.insert(key.as_str().to_string(), entry.clone()).as_ref() != Some(&entry))
            .await
    }

    async fn delete(&self, key: CredentialKey) -> Result<()> {
        self.mutate(|jar| jar.remove(key.as_str()).is_some()).await
    }
}

fn read_jar(path: &Path) -> Result<Jar> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Jar::new()),
        Err(err) => return Err(InfraError::from(err).into()),
    };

    if contents.trim().is_empty() {
        return Ok(Jar::new());
    }

    let jar: Jar = serde_json::from_str(&contents).map_err(InfraError::from)?;
    Ok(jar)
}

fn write_jar(path: &Path, jar: &Jar) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(InfraError::from)?;
    }

    let json = serde_json::to_vec_pretty(jar)
        .map_err(|e| KanflowError::Internal(format!("failed to encode credential file: {e}")))?;

    let tmp = path.with_extension("json.tmp");
    write_private(&tmp, &json).map_err(InfraError::from)?;
    if let Err(err) = fs::rename(&tmp, path) {
        warn!(path = %path.display(), error = %err, "failed to replace credential file");
        let _ = fs::remove_file(&tmp);
        return Err(InfraError::from(err).into());
    }
    Ok(())
}

fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = open_private(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let file = OpenOptions::new().write(true).create(true).truncate(true).mode(0o600).open(path)?;
    // A stale temporary file keeps its old mode; reset it.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(file)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    OpenOptions::new().write(true).create(true).truncate(true).open(path)
}

fn default_cookie_path() -> String {
    CREDENTIAL_PATH.to_string()
}
