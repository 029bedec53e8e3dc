use crate::errors::AppError;
use crate::records::RecordStoreSnapshot;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> Option<PathBuf> {
    env::var("JOURNAL_DATA_PATH")
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

/// JSON snapshot of the record store.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file is an empty journal. Unreadable or corrupt files are
    /// logged and also start empty.
    pub async fn load(&self) -> RecordStoreSnapshot {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<RecordStoreSnapshot>(&bytes) {
                Ok(snapshot) => {
                    info!(path = %self.path.display(), days = snapshot.days.len(), "snapshot loaded");
                    snapshot
                }
                Err(err) => {
                    error!("failed to parse snapshot file: {err}");
                    RecordStoreSnapshot::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => RecordStoreSnapshot::default(),
            Err(err) => {
                error!("failed to read snapshot file: {err}");
                RecordStoreSnapshot::default()
            }
        }
    }

    pub async fn save(&self, snapshot: &RecordStoreSnapshot) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let payload = serde_json::to_vec_pretty(snapshot).map_err(AppError::internal)?;
        fs::write(&self.path, payload).await.map_err(|err| {
            error!("failed to write snapshot file: {err}");
            AppError::internal(err)
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{MistakeRecord, RecordStore};

    fn unique_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("mistake_journal_{name}_{}_{nanos}", std::process::id()));
        path.push("journal.json");
        path
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let file = SnapshotFile::new(unique_path("missing"));
        assert!(file.load().await.days.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let path = unique_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        fs::write(&path, b"{ not json").await.unwrap();
        assert!(SnapshotFile::new(path).load().await.days.is_empty());
    }

    #[tokio::test]
    async fn saved_snapshot_reloads() {
        let mut store = RecordStore::new();
        store.append(MistakeRecord {
            id: 1_704_103_200_000,
            category: "Other".to_string(),
            start_time: 1_704_103_200_000,
            end_time: Some(1_704_103_260_000),
            duration: Some(60),
            summary: "kept".to_string(),
        });

        let file = SnapshotFile::new(unique_path("roundtrip"));
        file.save(&store.snapshot()).await.unwrap();

        let restored = RecordStore::from_snapshot(file.load().await);
        assert_eq!(restored.total_count(), 1);
        assert_eq!(restored.all_records_flat()[0].summary, "kept");
    }
}
