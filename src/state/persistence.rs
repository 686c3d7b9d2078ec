use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during snapshot persistence operations
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize snapshot metadata: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access snapshot file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to encode or decode snapshot image: {0}")]
    ImageError(#[from] image::ImageError),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Describes a canvas snapshot; stored next to the PNG as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub document_id: Uuid,
    pub width: u32,
    pub height: u32,
    /// Seconds since the UNIX epoch
    pub timestamp: u64,
    /// Version of the application that took the snapshot
    pub version: String,
    /// Commands on the canvas when the snapshot was taken
    pub command_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSnapshot {
    pub metadata: SnapshotMetadata,
    pub image: RgbaImage,
}

/// Receives the committed canvas after every history change.
///
/// Fire-and-forget: implementations handle their own failures.
pub trait SnapshotSink {
    fn store(&self, snapshot: &CanvasSnapshot);
}

/// Keeps the most recent snapshot in memory, shareable between owners.
#[derive(Debug, Clone, Default)]
pub struct LatestSnapshot {
    inner: Arc<Mutex<Option<CanvasSnapshot>>>,
}

impl LatestSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<CanvasSnapshot> {
        self.inner.lock().clone()
    }

    pub fn metadata(&self) -> Option<SnapshotMetadata> {
        self.inner.lock().as_ref().map(|snapshot| snapshot.metadata.clone())
    }
}

impl SnapshotSink for LatestSnapshot {
    fn store(&self, snapshot: &CanvasSnapshot) {
        *self.inner.lock() = Some(snapshot.clone());
    }
}

/// Writes `<document id>.png` and `<document id>.json` into a directory,
/// keeping at most `max_documents` documents.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
    max_documents: usize,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            max_documents: 5,
        }
    }

    pub fn with_max_documents(mut self, max_documents: usize) -> Self {
        self.max_documents = max_documents.max(1);
        self
    }

    fn image_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.png"))
    }

    fn metadata_path(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    pub fn write(&self, snapshot: &CanvasSnapshot) -> PersistenceResult<()> {
        fs::create_dir_all(&self.dir)?;

        let id = snapshot.metadata.document_id;
        snapshot.image.save(self.image_path(id))?;
        let json = serde_json::to_string_pretty(&snapshot.metadata)?;
        fs::write(self.metadata_path(id), json)?;
        debug!("snapshot of {id} written to {}", self.dir.display());

        self.cleanup_old_documents()
    }

    pub fn load(&self, id: Uuid) -> PersistenceResult<CanvasSnapshot> {
        let json = fs::read_to_string(self.metadata_path(id))?;
        let metadata = serde_json::from_str(&json)?;
        let image = image::open(self.image_path(id))?.to_rgba8();
        Ok(CanvasSnapshot { metadata, image })
    }

    /// The metadata of the most recently written snapshot, if any.
    pub fn find_latest(&self) -> PersistenceResult<Option<SnapshotMetadata>> {
        let mut latest: Option<SnapshotMetadata> = None;
        for path in self.metadata_files()? {
            let json = fs::read_to_string(&path)?;
            let metadata: SnapshotMetadata = serde_json::from_str(&json)?;
            if latest.as_ref().is_none_or(|current| metadata.timestamp >= current.timestamp) {
                latest = Some(metadata);
            }
        }
        Ok(latest)
    }

    fn metadata_files(&self) -> PersistenceResult<Vec<PathBuf>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let files = fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        Ok(files)
    }

    fn cleanup_old_documents(&self) -> PersistenceResult<()> {
        let mut files = self.metadata_files()?;
        if files.len() <= self.max_documents {
            return Ok(());
        }

        // Oldest first
        files.sort_by_key(|path| {
            fs::metadata(path)
                .and_then(|meta| meta.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        let excess = files.len() - self.max_documents;
        for path in files.into_iter().take(excess) {
            remove_if_present(&path.with_extension("png"))?;
            remove_if_present(&path)?;
        }
        Ok(())
    }
}

fn remove_if_present(path: &Path) -> PersistenceResult<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
        _ => Ok(()),
    }
}

impl SnapshotSink for FileSnapshotStore {
    fn store(&self, snapshot: &CanvasSnapshot) {
        if let Err(err) = self.write(snapshot) {
            warn!("failed to persist canvas snapshot: {err}");
        }
    }
}
