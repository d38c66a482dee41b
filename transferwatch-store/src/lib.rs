//! JSON-backed store of transfer records.
//!
//! The store is the pipeline's only durable state: loaded once at cycle
//! start, mutated in memory, then rewritten wholesale at cycle end. The
//! on-disk document is a single JSON array of records. Writes go to a temp
//! file first and are renamed into place, so a kill mid-write never leaves
//! a truncated document behind.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use transferwatch_core::record::{RawRecord, TransferRecord};
use transferwatch_core::resolution::Resolution;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The backing file exists but is not a valid record array. This is a
    /// hard error, not an empty store: silently starting over would discard
    /// history.
    #[error("corrupt store {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("failed to persist {path}: {source}")]
    Persist {
        path: String,
        source: std::io::Error,
    },
}

/// Which fields identify a player for deduplication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupKey {
    /// Display name only. Two real players sharing a name collide.
    #[default]
    Name,
    /// Display name plus the listing site's player id.
    NameAndId,
}

fn key_of(key: DedupKey, name: &str, id: Option<&str>) -> String {
    match key {
        DedupKey::Name => name.to_string(),
        DedupKey::NameAndId => format!("{}\t{}", name, id.unwrap_or("")),
    }
}

/// The full record set plus a dedup index.
pub struct TransferStore {
    path: PathBuf,
    key: DedupKey,
    records: Vec<TransferRecord>,
    index: HashSet<String>,
}

impl TransferStore {
    /// Load the store from `path`. An absent file is a normal empty store;
    /// a present but unparsable file is [`StoreError::Parse`].
    pub fn load(path: &Path, key: DedupKey) -> Result<Self, StoreError> {
        let records: Vec<TransferRecord> = match std::fs::read_to_string(path) {
            Ok(contents) => {
                serde_json::from_str(&contents).map_err(|e| StoreError::Parse {
                    path: path.display().to_string(),
                    source: e,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source: e,
                });
            }
        };

        let index = records
            .iter()
            .map(|r| key_of(key, &r.player, r.transfermarkt_id.as_deref()))
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            key,
            records,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    pub fn get(&self, idx: usize) -> Option<&TransferRecord> {
        self.records.get(idx)
    }

    /// Whether a raw row is already present under the active dedup key.
    /// Nameless rows are never considered present.
    pub fn contains_raw(&self, raw: &RawRecord) -> bool {
        raw.player
            .as_deref()
            .is_some_and(|name| self.contains(name, raw.transfermarkt_id.as_deref()))
    }

    pub fn contains(&self, name: &str, id: Option<&str>) -> bool {
        self.index.contains(&key_of(self.key, name, id))
    }

    /// Append a record. Returns `false` (and appends nothing) if a record
    /// with the same key is already present.
    pub fn append(&mut self, record: TransferRecord) -> bool {
        let k = key_of(self.key, &record.player, record.transfermarkt_id.as_deref());
        if !self.index.insert(k) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Apply one enrichment result to the record at `idx`.
    pub fn apply(&mut self, idx: usize, resolution: Resolution) -> bool {
        match self.records.get_mut(idx) {
            Some(rec) => {
                rec.apply(resolution);
                true
            }
            None => false,
        }
    }

    /// Rewrite the whole document atomically: serialize to a temp file next
    /// to the target, then rename over it.
    pub fn persist(&self) -> Result<(), StoreError> {
        let persist_err = |source| StoreError::Persist {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(persist_err)?;
            }
        }

        let serialized = serde_json::to_string_pretty(&self.records)
            .map_err(std::io::Error::other)
            .map_err(persist_err)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized).map_err(persist_err)?;
        std::fs::rename(&tmp, &self.path).map_err(persist_err)?;

        Ok(())
    }
}
