use std::{
    fs, io,
    path::{Path, PathBuf},
};

#[cfg(feature = "tracing")]
use tracing::warn;

use crate::{IdentityKey, IdentityStore};

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct StoredIdentity {
    #[serde(rename = "workerId", default, skip_serializing_if = "Option::is_none")]
    worker_id: Option<i64>,
    #[serde(rename = "datacenterId", default, skip_serializing_if = "Option::is_none")]
    datacenter_id: Option<i64>,
}

impl StoredIdentity {
    fn slot(&mut self, key: IdentityKey) -> &mut Option<i64> {
        match key {
            IdentityKey::WorkerId => &mut self.worker_id,
            IdentityKey::DatacenterId => &mut self.datacenter_id,
        }
    }
}

/// An [`IdentityStore`] backed by a small JSON file.
///
/// The file holds a single object:
///
/// ```json
/// {"workerId": 3, "datacenterId": 17}
/// ```
///
/// A missing, unreadable or malformed file reads as empty. Writes rewrite the
/// whole file; concurrent writers from separate processes race and the last
/// one wins.
///
/// # Example
/// ```no_run
/// use flakeid::{FileStore, NodeIdentity, ThreadRandom};
///
/// let store = FileStore::new("/var/lib/myapp/node-identity.json");
/// let identity = NodeIdentity::resolve(&store, &ThreadRandom).unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoredIdentity {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|_e| {
                #[cfg(feature = "tracing")]
                warn!(path = %self.path.display(), error = %_e, "ignoring malformed identity file");
                StoredIdentity::default()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => StoredIdentity::default(),
            Err(_e) => {
                #[cfg(feature = "tracing")]
                warn!(path = %self.path.display(), error = %_e, "failed to read identity file");
                StoredIdentity::default()
            }
        }
    }

    fn save(&self, stored: &StoredIdentity) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec(stored).map_err(io::Error::other)?;
        fs::write(&self.path, bytes)
    }
}

impl IdentityStore for FileStore {
    fn get(&self, key: IdentityKey) -> Option<i64> {
        *self.load().slot(key)
    }

    fn set(&self, key: IdentityKey, value: i64) {
        let mut stored = self.load();
        *stored.slot(key) = Some(value);
        if let Err(_e) = self.save(&stored) {
            #[cfg(feature = "tracing")]
            warn!(path = %self.path.display(), error = %_e, "failed to persist node identity");
        }
    }
}
