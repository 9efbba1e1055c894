//! Keyed JSON record persistence.
//!
//! Records live under four logical keys: `userProfile`, `userGoals`,
//! `customFoods` and one `userLog_<YYYY-MM-DD>` per touched day. The raw
//! [`RecordStore`] only moves bytes; [`Records`] does the JSON encoding and
//! applies the best-effort policy: a record that can't be read or decoded is
//! treated as absent, and a write that fails is logged and dropped.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use chrono::{Duration, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{DailyLog, FoodItem, NutritionGoals, UserProfile};

const GOALS_KEY: &str = "userGoals";
const PROFILE_KEY: &str = "userProfile";
const CUSTOM_FOODS_KEY: &str = "customFoods";
const LOG_KEY_PREFIX: &str = "userLog_";

pub const DEFAULT_RESET_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Profile,
    Goals,
    CustomFoods,
    Log(NaiveDate),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Profile => f.write_str(PROFILE_KEY),
            RecordKey::Goals => f.write_str(GOALS_KEY),
            RecordKey::CustomFoods => f.write_str(CUSTOM_FOODS_KEY),
            RecordKey::Log(date) => write!(f, "{}{}", LOG_KEY_PREFIX, date.format("%Y-%m-%d")),
        }
    }
}

/// Raw byte storage addressed by record key.
pub trait RecordStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Stores each record as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating data directory {}", dir.display()))?;
        info!(dir = %dir.display(), "opened file record store");
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl RecordStore for FileStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        // Write beside the target and rename so readers never see a torn record.
        let tmp = self.dir.join(format!("{}.json.tmp", key));
        fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}

/// In-process store, mainly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = match self.records.lock() {
            Ok(records) => records.keys().cloned().collect(),
            Err(_) => Vec::new(),
        };
        keys.sort();
        keys
    }
}

impl RecordStore for MemoryStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        records.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let records = self
            .records
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(records.get(key).cloned())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        records.remove(key);
        Ok(())
    }
}

/// Typed access to the record namespaces over a shared [`RecordStore`].
#[derive(Clone)]
pub struct Records {
    store: Arc<dyn RecordStore>,
    reset_window_days: u32,
}

impl Records {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            reset_window_days: DEFAULT_RESET_WINDOW_DAYS,
        }
    }

    /// Number of day logs, ending today, that [`Records::delete_all`] clears.
    pub fn with_reset_window(mut self, days: u32) -> Self {
        self.reset_window_days = days;
        self
    }

    pub fn try_save<T: Serialize>(&self, key: RecordKey, record: &T) -> Result<()> {
        let key = key.to_string();
        let bytes =
            serde_json::to_vec(record).with_context(|| format!("encoding record {}", key))?;
        self.store.put(&key, &bytes)?;
        debug!(key = %key, bytes = bytes.len(), "saved record");
        Ok(())
    }

    pub fn try_load<T: DeserializeOwned>(&self, key: RecordKey) -> Result<Option<T>> {
        let key = key.to_string();
        let Some(bytes) = self.store.get(&key)? else {
            return Ok(None);
        };
        let record =
            serde_json::from_slice(&bytes).with_context(|| format!("decoding record {}", key))?;
        Ok(Some(record))
    }

    /// Best-effort save: failures are logged and dropped.
    pub fn save<T: Serialize>(&self, key: RecordKey, record: &T) {
        if let Err(e) = self.try_save(key, record) {
            warn!(key = %key, error = %format!("{:#}", e), "dropping record write");
        }
    }

    /// Best-effort load: unreadable or undecodable records are `None`.
    pub fn load<T: DeserializeOwned>(&self, key: RecordKey) -> Option<T> {
        match self.try_load(key) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %key, error = %format!("{:#}", e), "treating record as absent");
                None
            }
        }
    }

    pub fn save_profile(&self, profile: &UserProfile) {
        self.save(RecordKey::Profile, profile);
    }

    pub fn load_profile(&self) -> Option<UserProfile> {
        self.load(RecordKey::Profile)
    }

    pub fn save_goals(&self, goals: &NutritionGoals) {
        self.save(RecordKey::Goals, goals);
    }

    pub fn load_goals(&self) -> Option<NutritionGoals> {
        self.load(RecordKey::Goals)
    }

    pub fn save_custom_foods(&self, foods: &[FoodItem]) {
        self.save(RecordKey::CustomFoods, &foods);
    }

    pub fn load_custom_foods(&self) -> Vec<FoodItem> {
        self.load(RecordKey::CustomFoods).unwrap_or_default()
    }

    pub fn save_log(&self, log: &DailyLog) {
        self.save(RecordKey::Log(log.date), log);
    }

    /// The log stored for `date`, or an empty one.
    pub fn load_log(&self, date: NaiveDate) -> DailyLog {
        match self.load::<DailyLog>(RecordKey::Log(date)) {
            // The key is authoritative for the day.
            Some(mut log) => {
                log.date = date;
                log
            }
            None => DailyLog::empty(date),
        }
    }

    /// Clear profile, goals, custom foods and the day logs of the reset window
    /// ending at `today`.
    pub fn delete_all(&self, today: NaiveDate) {
        let fixed = [RecordKey::Goals, RecordKey::Profile, RecordKey::CustomFoods];
        let logs = (0..self.reset_window_days)
            .map(|i| RecordKey::Log(today - Duration::days(i64::from(i))));

        let mut failures = 0usize;
        for key in fixed.into_iter().chain(logs) {
            if let Err(e) = self.store.remove(&key.to_string()) {
                failures += 1;
                warn!(key = %key, error = %format!("{:#}", e), "failed to remove record");
            }
        }
        info!(
            window_days = self.reset_window_days,
            failures, "deleted all records"
        );
    }
}
