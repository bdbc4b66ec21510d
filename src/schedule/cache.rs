//! Last-known-good snapshot storage. The view model only sees the
//! [`KeyValueCache`] capability; the file-backed implementation below is what
//! the binary wires in.

use std::{
    collections::BTreeMap,
    fs::File,
    io::BufReader,
    path::PathBuf,
};

use log::{info, warn};

pub const USER_NAME_KEY: &str = "userName";
pub const LEADER_DATA_KEY: &str = "leaderData";
pub const SCHEDULE_DATA_KEY: &str = "scheduleData";

/// Minimal get/set capability over string keys and values. Failures on
/// write are the implementation's problem to log; callers never block on
/// the cache.
pub trait KeyValueCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// One JSON file holding a string map. Read fresh on every get so an
/// external edit between runs is picked up; written whole on every set.
pub struct JsonFileCache {
    path: PathBuf,
}

impl JsonFileCache {
    pub fn new(path: PathBuf) -> Self {
        JsonFileCache { path }
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        if !self.path.exists() {
            return BTreeMap::new();
        }
        let file = match File::open(&self.path) {
            Ok(file) => BufReader::new(file),
            Err(err) => {
                warn!("Could not open cache {}: {}", self.path.display(), err);
                return BTreeMap::new();
            }
        };
        match serde_json::from_reader(file) {
            Ok(map) => map,
            Err(err) => {
                warn!("Corrupt cache {}: {}", self.path.display(), err);
                BTreeMap::new()
            }
        }
    }
}

impl KeyValueCache for JsonFileCache {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set(&self, key: &str, value: &str) {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        let file = match File::create(&self.path) {
            Ok(file) => file,
            Err(err) => {
                warn!("Could not write cache {}: {}", self.path.display(), err);
                return;
            }
        };
        if let Err(err) = serde_json::to_writer_pretty(file, &map) {
            warn!("Could not serialize cache {}: {}", self.path.display(), err);
        } else {
            info!("Cached {} in {}", key, self.path.display());
        }
    }
}
