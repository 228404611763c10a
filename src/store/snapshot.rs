use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Storage, StoreError};
use crate::util;

/// Key prefix shared by every snapshot entry.
pub const KEY_PREFIX: &str = "analysis:";

/// Discriminator that marks a stored value as a snapshot.
pub const SNAPSHOT_KIND: &str = "cloud-footprint-analysis";

/// A named, timestamped analysis result. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "__kind")]
    pub kind: String,
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    pub metrics: Value,
    #[serde(default)]
    pub meta: Value,
}

pub fn storage_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

/// Outcome of reading one stored value.
#[derive(Debug)]
pub enum Parsed {
    Snapshot(Snapshot),
    /// Valid JSON without the snapshot discriminator.
    Foreign,
    /// Not JSON, or tagged as a snapshot but missing required fields.
    Malformed(String),
}

pub fn parse_entry(raw: &str) -> Parsed {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return Parsed::Malformed(e.to_string()),
    };

    if value.get("__kind").and_then(Value::as_str) != Some(SNAPSHOT_KIND) {
        return Parsed::Foreign;
    }

    match serde_json::from_value::<Snapshot>(value) {
        Ok(mut snapshot) => {
            if snapshot.name.trim().is_empty() {
                snapshot.name = util::format_timestamp_ms(snapshot.created_at);
            }
            Parsed::Snapshot(snapshot)
        }
        Err(e) => Parsed::Malformed(e.to_string()),
    }
}

type Clock = Box<dyn FnMut() -> i64>;

/// Snapshot persistence over any `Storage` backend.
pub struct SnapshotStore<S: Storage> {
    storage: S,
    clock: Clock,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, util::now_ms)
    }

    /// Use a custom millisecond clock for `createdAt`.
    pub fn with_clock(storage: S, clock: impl FnMut() -> i64 + 'static) -> Self {
        SnapshotStore {
            storage,
            clock: Box::new(clock),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Save an analysis result and return the new snapshot's id.
    ///
    /// An empty `name` falls back to the creation time; a missing `meta`
    /// is stored as an empty object.
    pub fn save(&mut self, name: &str, metrics: Value, meta: Option<Value>) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = (self.clock)();

        let name = if name.trim().is_empty() {
            util::format_timestamp_ms(created_at)
        } else {
            name.to_string()
        };

        let snapshot = Snapshot {
            kind: SNAPSHOT_KIND.to_string(),
            id: id.clone(),
            name,
            created_at,
            metrics,
            meta: meta.unwrap_or_else(|| Value::Object(Default::default())),
        };

        let key = storage_key(&id);
        let written = serde_json::to_string(&snapshot)
            .map_err(StoreError::from)
            .and_then(|encoded| self.storage.set(&key, &encoded));

        if let Err(e) = written {
            return Err(StoreError::Write {
                key,
                source: Box::new(e),
            });
        }

        log::info!("saved snapshot {id} ({})", snapshot.name);
        Ok(id)
    }

    /// Every readable snapshot, newest first. Ties are ordered by id.
    ///
    /// Foreign or corrupt entries are skipped. If the backend cannot list
    /// its keys at all the result is empty.
    pub fn load_all(&self) -> Vec<Snapshot> {
        let keys = match self.storage.keys() {
            Ok(keys) => keys,
            Err(e) => {
                log::warn!("snapshot listing unavailable: {e}");
                return Vec::new();
            }
        };

        let mut snapshots: Vec<Snapshot> = keys
            .iter()
            .filter(|key| key.starts_with(KEY_PREFIX))
            .filter_map(|key| self.read_key(key))
            .collect();

        snapshots.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        snapshots
    }

    /// Load a snapshot by exact id.
    pub fn get(&self, id: &str) -> Option<Snapshot> {
        self.read_key(&storage_key(id))
    }

    /// Load a snapshot by exact id or by a unique id prefix.
    pub fn resolve(&self, id_or_prefix: &str) -> Option<Snapshot> {
        if let Some(snapshot) = self.get(id_or_prefix) {
            return Some(snapshot);
        }

        let mut matches = self
            .load_all()
            .into_iter()
            .filter(|s| s.id.starts_with(id_or_prefix));

        match (matches.next(), matches.next()) {
            (Some(only), None) if !id_or_prefix.is_empty() => Some(only),
            _ => None,
        }
    }

    /// The two most recent snapshots as `(older, newer)`.
    pub fn latest_pair(&self) -> Option<(Snapshot, Snapshot)> {
        let mut all = self.load_all().into_iter();
        let newer = all.next()?;
        let older = all.next()?;
        Some((older, newer))
    }

    fn read_key(&self, key: &str) -> Option<Snapshot> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::debug!("skipping {key}: read failed: {e}");
                return None;
            }
        };

        match parse_entry(&raw) {
            Parsed::Snapshot(snapshot) => Some(snapshot),
            Parsed::Foreign => {
                log::debug!("skipping {key}: not a snapshot");
                None
            }
            Parsed::Malformed(reason) => {
                log::debug!("skipping {key}: {reason}");
                None
            }
        }
    }
}
