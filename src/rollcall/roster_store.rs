use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use roll_call::classes::Classes;
use roll_call::merge_names;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::rollcall::io_common::{now_iso, read_json_document, write_json_document};
use crate::rollcall::*;

pub const CLASSES_FILE: &str = "classes.json";
pub const LEGACY_STUDENTS_FILE: &str = "students.json";

/// The multi-class roster document.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RosterDocument {
    #[serde(default)]
    pub classes: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub current_class: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// The single roster written by older versions. Only read, for migration.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct LegacyRosterDocument {
    #[serde(default)]
    pub students: Vec<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// The classes of the data directory. Every change is written back at once.
#[derive(Debug)]
pub struct RosterStore {
    path: PathBuf,
    classes: Classes,
}

impl RosterStore {
    /// Loads `classes.json`. Without a readable one, the legacy
    /// `students.json` is migrated into the default class, and the result is
    /// saved so that the migration only happens once.
    pub fn open(data_dir: &Path) -> RollCallResult<RosterStore> {
        let path = data_dir.join(CLASSES_FILE);
        let loaded = match read_json_document::<RosterDocument>(&path) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Cannot load the classes, starting over: {}", e);
                None
            }
        };
        match loaded {
            Some(doc) => {
                debug!("RosterStore::open: {} classes", doc.classes.len());
                Ok(RosterStore {
                    path,
                    classes: Classes::from_parts(doc.classes, doc.current_class),
                })
            }
            None => {
                let store = RosterStore {
                    path,
                    classes: migrate_legacy(data_dir),
                };
                store.save()?;
                Ok(store)
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn classes(&self) -> &Classes {
        &self.classes
    }

    pub fn class_names(&self) -> Vec<&str> {
        self.classes.class_names()
    }

    pub fn current_class(&self) -> &str {
        self.classes.current_class()
    }

    pub fn current_roster(&self) -> &[String] {
        self.classes.current_roster()
    }

    pub fn set_current_roster(&mut self, names: Vec<String>) -> RollCallResult<()> {
        self.classes.set_current_roster(names);
        self.save()
    }

    pub fn add_class(&mut self, name: &str) -> RollCallResult<()> {
        self.classes.add_class(name).context(RosterSnafu {})?;
        self.save()
    }

    pub fn rename_class(&mut self, old: &str, new: &str) -> RollCallResult<()> {
        self.classes.rename_class(old, new).context(RosterSnafu {})?;
        self.save()
    }

    pub fn delete_class(&mut self, name: &str) -> RollCallResult<()> {
        self.classes.delete_class(name).context(RosterSnafu {})?;
        self.save()
    }

    pub fn switch_class(&mut self, name: &str) -> RollCallResult<()> {
        self.classes.switch_class(name).context(RosterSnafu {})?;
        self.save()
    }

    /// Appends names to the current roster, duplicates included.
    pub fn add_names(&mut self, names: &[String]) -> RollCallResult<()> {
        self.classes
            .current_roster_mut()
            .extend(names.iter().cloned());
        self.save()
    }

    /// Removes the first occurrence of each name. Returns how many were found.
    pub fn remove_names(&mut self, names: &[String]) -> RollCallResult<usize> {
        let roster = self.classes.current_roster_mut();
        let mut removed = 0;
        for name in names {
            if let Some(pos) = roster.iter().position(|n| n == name) {
                roster.remove(pos);
                removed += 1;
            }
        }
        self.save()?;
        Ok(removed)
    }

    pub fn clear_current(&mut self) -> RollCallResult<()> {
        self.classes.current_roster_mut().clear();
        self.save()
    }

    pub fn merge(existing: &[String], incoming: &[String], keep_duplicates: bool) -> Vec<String> {
        merge_names(existing, incoming, keep_duplicates)
    }

    pub fn save(&self) -> RollCallResult<()> {
        let doc = RosterDocument {
            classes: self.classes.classes().clone(),
            current_class: Some(self.classes.current_class().to_string()),
            timestamp: Some(now_iso()),
        };
        write_json_document(&self.path, &doc)
    }
}

fn migrate_legacy(data_dir: &Path) -> Classes {
    let legacy_path = data_dir.join(LEGACY_STUDENTS_FILE);
    match read_json_document::<LegacyRosterDocument>(&legacy_path) {
        Ok(Some(doc)) if !doc.students.is_empty() => {
            info!(
                "Migrating {} students from {:?} into the default class",
                doc.students.len(),
                legacy_path
            );
            Classes::with_default_roster(doc.students)
        }
        Ok(_) => Classes::new(),
        Err(e) => {
            warn!("Cannot migrate the legacy roster: {}", e);
            Classes::new()
        }
    }
}
