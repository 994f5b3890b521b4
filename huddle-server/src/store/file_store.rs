use crate::room::RoomState;
use crate::store::{RoomStore, StoreError};
use async_trait::async_trait;
use huddle_core::RoomId;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

const RECORD_PREFIX: &str = "room-";
const RECORD_EXT: &str = ".json";
const SCRATCH_EXT: &str = ".tmp";

/// One JSON file per room inside a directory.
///
/// A record is written to a scratch file and renamed over the old one, so readers
/// see either the previous record or the new one, never a mix.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates `dir` if needed and clears scratch files left by an interrupted save.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;

        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.starts_with('.') && name.ends_with(SCRATCH_EXT) {
                debug!("Removing stale scratch file {}", name);
                fs::remove_file(entry.path()).await?;
            }
        }

        Ok(Self { dir })
    }

    /// Room ids are arbitrary strings, so file names use their hex encoding.
    fn record_path(&self, room_id: &RoomId) -> PathBuf {
        let mut name = String::with_capacity(RECORD_PREFIX.len() + room_id.as_str().len() * 2 + 5);
        name.push_str(RECORD_PREFIX);
        for byte in room_id.as_str().bytes() {
            let _ = write!(name, "{:02x}", byte);
        }
        name.push_str(RECORD_EXT);
        self.dir.join(name)
    }

    /// Flushes directory entries so a finished rename or unlink survives a crash.
    #[cfg(unix)]
    async fn sync_dir(&self) -> Result<(), StoreError> {
        fs::File::open(&self.dir).await?.sync_all().await?;
        Ok(())
    }

    #[cfg(not(unix))]
    async fn sync_dir(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn read_record(path: &Path) -> Result<RoomState, StoreError> {
        let bytes = fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RoomStore for FileStore {
    async fn load_all(&self) -> Result<Vec<RoomState>, StoreError> {
        let mut rooms = Vec::new();
        let mut entries = fs::read_dir(&self.dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !name.starts_with(RECORD_PREFIX) || !name.ends_with(RECORD_EXT) {
                continue;
            }

            match Self::read_record(&entry.path()).await {
                Ok(room) => rooms.push(room),
                Err(e) => warn!("Skipping unreadable room record {}: {}", name, e),
            }
        }

        debug!("Loaded {} room records from {}", rooms.len(), self.dir.display());
        Ok(rooms)
    }

    async fn save(&self, room: &RoomState) -> Result<(), StoreError> {
        let json = serde_json::to_vec(room)?;
        let path = self.record_path(room.id());
        let scratch = self.dir.join(format!(".{}{}", Uuid::new_v4(), SCRATCH_EXT));

        let mut file = fs::File::create(&scratch).await?;
        let written = async {
            file.write_all(&json).await?;
            file.sync_all().await
        }
        .await;
        drop(file);

        if let Err(e) = written {
            let _ = fs::remove_file(&scratch).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&scratch, &path).await {
            let _ = fs::remove_file(&scratch).await;
            return Err(e.into());
        }
        self.sync_dir().await
    }

    async fn remove(&self, room_id: &RoomId) -> Result<(), StoreError> {
        match fs::remove_file(self.record_path(room_id)).await {
            Ok(()) => self.sync_dir().await,
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
