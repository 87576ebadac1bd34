use std::collections::BTreeMap;
use std::fs;
use std::io::Write;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::ArtworkId;
use crate::error::DownloadError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub file_path: String,
    pub download_time: String,
}

#[derive(Debug)]
pub struct CompletionStore {
    path: Utf8PathBuf,
    records: BTreeMap<String, CompletionRecord>,
}

impl CompletionStore {
    pub fn open(path: Utf8PathBuf) -> Result<Self, DownloadError> {
        let records = if path.as_std_path().exists() {
            let content = fs::read_to_string(path.as_std_path())
                .map_err(|err| DownloadError::StoreOpen(format!("{path}: {err}")))?;
            serde_json::from_str(&content)
                .map_err(|err| DownloadError::StoreOpen(format!("{path}: {err}")))?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, records })
    }

    pub fn is_complete(&self, id: &ArtworkId) -> bool {
        self.records.contains_key(id.as_str())
    }

    pub fn get(&self, id: &ArtworkId) -> Option<&CompletionRecord> {
        self.records.get(id.as_str())
    }

    pub fn mark_complete(
        &mut self,
        id: &ArtworkId,
        representative_path: &str,
    ) -> Result<(), DownloadError> {
        self.records.insert(
            id.as_str().to_string(),
            CompletionRecord {
                file_path: representative_path.to_string(),
                download_time: chrono::Utc::now().to_rfc3339(),
            },
        );
        self.persist()
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    fn persist(&self) -> Result<(), DownloadError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| DownloadError::StoreWrite("store path has no parent".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;

        let content = serde_json::to_vec_pretty(&self.records)
            .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;

        let mut temp = tempfile::Builder::new()
            .prefix("downloaded")
            .suffix(".json.tmp")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;
        temp.write_all(&content)
            .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;
        // mark_complete must be durable before it returns
        temp.as_file()
            .sync_all()
            .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;
        if self.path.as_std_path().exists() {
            fs::remove_file(self.path.as_std_path())
                .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;
        }
        temp.persist(self.path.as_std_path())
            .map_err(|err| DownloadError::StoreWrite(err.to_string()))?;
        Ok(())
    }
}
