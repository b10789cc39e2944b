use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::rollcall::io_common::{read_json_or_default, write_json_document};
use crate::rollcall::*;

pub const CONFIG_FILE: &str = "config.json";

/// The user settings. Keys missing from the file take their default value.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many names a draw picks.
    pub num_students: u32,
    /// Draw without repeating a name.
    pub prevent_duplicate: bool,
    /// `[x, y, width, height]` of the main window.
    pub window_geometry: [i32; 4],
}

impl Config {
    pub const DEFAULT_CONFIG: Config = Config {
        num_students: 1,
        prevent_duplicate: true,
        window_geometry: [100, 100, 800, 600],
    };
}

impl Default for Config {
    fn default() -> Self {
        Config::DEFAULT_CONFIG
    }
}

#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    pub fn open(data_dir: &Path) -> ConfigStore {
        let path = data_dir.join(CONFIG_FILE);
        let mut config: Config = read_json_or_default(&path);
        if config.num_students == 0 {
            warn!(
                "Invalid number of students 0 in {:?}, using {}",
                path,
                Config::DEFAULT_CONFIG.num_students
            );
            config.num_students = Config::DEFAULT_CONFIG.num_students;
        }
        debug!("ConfigStore::open: {:?}", config);
        ConfigStore { path, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Applies a change and writes the whole config back.
    pub fn update<F: FnOnce(&mut Config)>(&mut self, f: F) -> RollCallResult<()> {
        f(&mut self.config);
        self.save()
    }

    pub fn save(&self) -> RollCallResult<()> {
        write_json_document(&self.path, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::open(dir.path());
        assert_eq!(store.config(), &Config::DEFAULT_CONFIG);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), r#"{"num_students": 3}"#).unwrap();
        let store = ConfigStore::open(dir.path());
        assert_eq!(store.config().num_students, 3);
        assert!(store.config().prevent_duplicate);
        assert_eq!(store.config().window_geometry, [100, 100, 800, 600]);
    }

    #[test]
    fn corrupt_or_zero_count_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not json").unwrap();
        assert_eq!(ConfigStore::open(dir.path()).config(), &Config::DEFAULT_CONFIG);
        fs::write(&path, r#"{"num_students": 0, "prevent_duplicate": false}"#).unwrap();
        let store = ConfigStore::open(dir.path());
        assert_eq!(store.config().num_students, 1);
        assert!(!store.config().prevent_duplicate);
    }

    #[test]
    fn update_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ConfigStore::open(dir.path());
        store
            .update(|c| {
                c.num_students = 4;
                c.prevent_duplicate = false;
                c.window_geometry = [0, 0, 1024, 768];
            })
            .unwrap();
        let reopened = ConfigStore::open(dir.path());
        assert_eq!(reopened.config(), store.config());

        let raw = fs::read_to_string(dir.path().join(CONFIG_FILE)).unwrap();
        let js: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(js["num_students"], 4);
        assert_eq!(js["window_geometry"][2], 1024);
    }
}
