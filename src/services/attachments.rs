//! Attachment storage
//!
//! Receives uploaded files during the design flow and stores them in a
//! per-user directory next to the submission records. File counts and
//! listings are always recomputed by scanning the directory rather than
//! tracked incrementally.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use chrono::Utc;
use tracing::debug;

use crate::state::FileSlot;
use crate::utils::errors::Result;

/// Per-user attachment area under the data directory
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    data_dir: PathBuf,
}

impl AttachmentStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Name of a user's photo directory relative to the data directory.
    /// Recorded verbatim in the submission's `files_info.photos_dir`.
    pub fn photos_dir_name(user_id: i64) -> String {
        format!("user_{user_id}_photos")
    }

    fn user_dir(&self, user_id: i64) -> PathBuf {
        self.data_dir.join(Self::photos_dir_name(user_id))
    }

    /// Store an uploaded payload for the given slot.
    ///
    /// The directory is created on first use; the file is named
    /// `{slot}_{timestamp}.{ext}` with the extension defaulting to a
    /// generic binary marker. A failed write leaves no usable reference.
    pub async fn store(
        &self,
        user_id: i64,
        slot: FileSlot,
        payload: &[u8],
        suggested_extension: Option<&str>,
    ) -> Result<PathBuf> {
        let dir = self.user_dir(user_id);
        tokio::fs::create_dir_all(&dir).await?;

        let ext = suggested_extension.filter(|e| !e.is_empty()).unwrap_or("bin");
        let name = format!("{}_{}.{}", slot.as_str(), Utc::now().format("%Y%m%d_%H%M%S"), ext);
        let path = dir.join(name);

        tokio::fs::write(&path, payload).await?;
        debug!(user_id = user_id, path = %path.display(), bytes = payload.len(), "Stored attachment");

        Ok(path)
    }

    /// Count the files in the user's attachment area (top level only,
    /// matching the persisted record format). Missing directory counts
    /// as zero.
    pub async fn count(&self, user_id: i64) -> Result<usize> {
        let dir = self.user_dir(user_id);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut count = 0;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Collect every file in the user's attachment area regardless of
    /// subfolder depth, most recently modified first. Missing directory
    /// yields an empty list.
    pub fn collect(&self, user_id: i64) -> Result<Vec<PathBuf>> {
        let dir = self.user_dir(user_id);
        let mut files = Vec::new();

        match walk(&dir, &mut files) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        }

        let mut stamped: Vec<(PathBuf, SystemTime)> = files
            .into_iter()
            .map(|path| {
                let mtime = std::fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (path, mtime)
            })
            .collect();

        stamped.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(stamped.into_iter().map(|(path, _)| path).collect())
    }
}

fn walk(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            walk(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
