//! Local credential cache
//!
//! A flat `{ "<logical key>": "<secret>" }` JSON map persisted under the
//! cache root. Missing or unparseable content reads as an empty map; only
//! I/O failures are errors.

use crate::error::{SecureApiError, SecureApiResult};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// File-backed key to secret cache
#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    /// Name of the cache file inside the cache root
    pub const FILE_NAME: &'static str = "api_keys.json";

    /// Create a cache backed by an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a cache stored as `FILE_NAME` inside `root`
    pub fn in_root(root: impl AsRef<Path>) -> Self {
        Self::new(root.as_ref().join(Self::FILE_NAME))
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the cached value for `key`
    pub async fn get(&self, key: &str) -> SecureApiResult<Option<String>> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    /// All cached entries, sorted by key
    pub async fn entries(&self) -> SecureApiResult<BTreeMap<String, String>> {
        self.load().await
    }

    /// Store `value` under `key`, replacing the file atomically
    ///
    /// An existing file that cannot be read is left in place and reported
    /// as `CacheWrite`.
    pub async fn put(&self, key: &str, value: &str) -> SecureApiResult<()> {
        self.ensure_parent_dir().await?;

        let mut entries = self.load().await.map_err(|e| match e {
            SecureApiError::CacheRead { path, source } => {
                SecureApiError::CacheWrite { path, source }
            }
            other => other,
        })?;
        entries.insert(key.to_string(), value.to_string());

        let content = serde_json::to_string_pretty(&entries)?;
        self.write_atomic(content.as_bytes()).await?;

        debug!("Cached credential {} in {}", key, self.path.display());
        Ok(())
    }

    async fn load(&self) -> SecureApiResult<BTreeMap<String, String>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(
                    "Ignoring credential cache {} (not valid UTF-8)",
                    self.path.display()
                );
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(SecureApiError::CacheRead {
                    path: self.path.clone(),
                    source: e,
                })
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                warn!(
                    "Ignoring unreadable credential cache {}: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    async fn ensure_parent_dir(&self) -> SecureApiResult<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        builder.mode(0o700);

        builder
            .create(parent)
            .await
            .map_err(|e| SecureApiError::CacheWrite {
                path: parent.to_path_buf(),
                source: e,
            })
    }

    async fn write_atomic(&self, content: &[u8]) -> SecureApiResult<()> {
        let tmp = self.temp_path();

        if let Err(e) = Self::write_file(&tmp, content).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(SecureApiError::CacheWrite {
                path: tmp,
                source: e,
            });
        }

        if let Err(e) = fs::rename(&tmp, &self.path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(SecureApiError::CacheWrite {
                path: self.path.clone(),
                source: e,
            });
        }

        Ok(())
    }

    async fn write_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(path).await?;
        file.write_all(content).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }

    // Sibling of the target so the rename stays on one filesystem; unique
    // per process and per write so concurrent writers never share one
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| Self::FILE_NAME.to_string());
        let seq = TEMP_SEQ.fetch_add(1, Ordering::Relaxed);
        self.path
            .with_file_name(format!(".{}.{}.{}.tmp", name, std::process::id(), seq))
    }
}
