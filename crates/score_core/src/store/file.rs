use std::fs::{self, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sha2::{Digest, Sha256};

use super::format::{decompress_and_deserialize, serialize_and_compress, MatchRecord};
use super::{MatchCallback, MatchStore, StoreError, StoreResult, SubscriberRegistry, Subscription};
use crate::models::Match;

const EXTENSION: &str = "match";

/// One compressed, checksummed record per match under a directory.
pub struct FileMatchStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
    subscribers: SubscriberRegistry,
}

impl FileMatchStore {
    pub fn open(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::info!("Match store opened at {:?}", dir);
        Ok(Self { dir, write_lock: Mutex::new(()), subscribers: SubscriberRegistry::default() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record file for `id`, named by the SHA-256 of the id so that every id
    /// gets its own file whatever characters it contains.
    pub fn path_for(&self, id: &str) -> PathBuf {
        let name = format!("{:x}", Sha256::digest(id.as_bytes()));
        self.dir.join(format!("{name}.{EXTENSION}"))
    }

    /// Full record including version and write time.
    pub fn load_record(&self, id: &str) -> StoreResult<MatchRecord> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.to_string() });
        }

        let mut data = Vec::new();
        File::open(&path)?.read_to_end(&mut data)?;
        let record = decompress_and_deserialize(&data)?;

        if record.state.id != id {
            return Err(StoreError::Corrupted);
        }

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(record)
    }

    pub fn delete_match(&self, id: &str) -> StoreResult<()> {
        let path = self.path_for(id);
        if path.exists() {
            fs::remove_file(&path)?;
            log::info!("Deleted match {}", id);
        }
        Ok(())
    }

    fn write_record(&self, path: &Path, record: &MatchRecord) -> StoreResult<()> {
        let data = serialize_and_compress(record)?;
        let temp_path = path.with_extension("tmp");

        let _guard = self.write_lock.lock().map_err(|_| StoreError::LockPoisoned)?;
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }
}

impl MatchStore for FileMatchStore {
    fn get_match(&self, id: &str) -> StoreResult<Option<Match>> {
        match self.load_record(id) {
            Ok(record) => Ok(Some(record.state)),
            Err(StoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn update_match(&self, state: &Match) -> StoreResult<()> {
        let record = MatchRecord::new(state.clone());
        self.write_record(&self.path_for(&state.id), &record)?;
        self.subscribers.notify(state);
        Ok(())
    }

    fn subscribe(&self, id: &str, callback: MatchCallback) -> Subscription {
        self.subscribers.subscribe(id, callback)
    }
}
