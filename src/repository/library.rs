//! JSON document store for the catalog and the borrow ledger

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};

use crate::{error::AppResult, models::LibraryData};

/// Whole-document store: every write rewrites the file.
///
/// Writes are serialized through `write_lock` and land through a sibling
/// temp file that is renamed over the target, so readers only ever see a
/// complete document.
#[derive(Clone)]
pub struct LibraryStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document. A missing or empty file is an empty library.
    pub async fn load(&self) -> AppResult<LibraryData> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No library file at {}, starting empty", self.path.display());
                return Ok(LibraryData::default());
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(LibraryData::default());
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Replace the stored document
    pub async fn save(&self, data: &LibraryData) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        self.write(data).await
    }

    /// Load, mutate and save under the write lock.
    ///
    /// Nothing is written when `apply` fails.
    pub async fn update<T, F>(&self, apply: F) -> AppResult<T>
    where
        F: FnOnce(&mut LibraryData) -> AppResult<T>,
    {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load().await?;
        let outcome = apply(&mut data)?;
        self.write(&data).await?;
        Ok(outcome)
    }

    /// Whether the document can currently be read and parsed
    pub async fn is_readable(&self) -> bool {
        match self.load().await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Library file {} is not readable: {}", self.path.display(), e);
                false
            }
        }
    }

    async fn write(&self, data: &LibraryData) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let bytes = to_pretty_json(data)?;
        let tmp_path = self.temp_path();

        if let Err(e) = replace_with(&tmp_path, &self.path, &bytes).await {
            if let Err(cleanup) = fs::remove_file(&tmp_path).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
                }
            }
            return Err(e.into());
        }

        tracing::debug!(
            "Saved library ({} books, {} borrowed) to {}",
            data.books.len(),
            data.borrowed_books.len(),
            self.path.display()
        );
        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "library.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Write `bytes` to `tmp_path`, fsync, then rename it over `target`
async fn replace_with(tmp_path: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(tmp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(tmp_path, target).await
}

/// JSON with 4-space indentation, the layout the data file has always used
fn to_pretty_json<T: Serialize>(value: &T) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}
