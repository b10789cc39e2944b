use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, NaiveDateTime};
use log::debug;
use roll_call::tally_appearances;
use serde::{Deserialize, Serialize};

use crate::rollcall::io_common::{now_iso, read_json_or_default, write_json_document};
use crate::rollcall::*;

pub const HISTORY_FILE: &str = "history.json";

/// One completed draw.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub names: Vec<String>,
    #[serde(default)]
    pub timestamp: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// `HH:MM:SS`
    #[serde(default)]
    pub time: String,
}

impl SelectionEvent {
    pub fn new(names: Vec<String>, at: NaiveDateTime) -> SelectionEvent {
        SelectionEvent {
            names,
            timestamp: at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub history: Vec<SelectionEvent>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct HistoryStats {
    pub total: usize,
    pub today: usize,
    /// Appearances per name, most frequent first.
    pub tally: Vec<(String, u64)>,
}

/// The draws made so far, newest first.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    events: Vec<SelectionEvent>,
}

impl HistoryStore {
    pub fn open(data_dir: &Path) -> HistoryStore {
        let path = data_dir.join(HISTORY_FILE);
        let doc: HistoryDocument = read_json_or_default(&path);
        debug!("HistoryStore::open: {} events", doc.history.len());
        HistoryStore {
            path,
            events: doc.history,
        }
    }

    pub fn events(&self) -> &[SelectionEvent] {
        &self.events
    }

    pub fn recent(&self, limit: usize) -> &[SelectionEvent] {
        &self.events[..limit.min(self.events.len())]
    }

    pub fn append(&mut self, event: SelectionEvent) -> RollCallResult<()> {
        self.events.insert(0, event);
        self.save()
    }

    pub fn clear(&mut self) -> RollCallResult<()> {
        self.events.clear();
        self.save()
    }

    pub fn stats(&self, today: NaiveDate) -> HistoryStats {
        let today = today.format("%Y-%m-%d").to_string();
        HistoryStats {
            total: self.events.len(),
            today: self.events.iter().filter(|e| e.date == today).count(),
            tally: tally_appearances(self.events.iter().map(|e| e.names.as_slice())),
        }
    }

    pub fn stats_today(&self) -> HistoryStats {
        self.stats(Local::now().date_naive())
    }

    fn save(&self) -> RollCallResult<()> {
        let doc = HistoryDocument {
            history: self.events.clone(),
            timestamp: Some(now_iso()),
        };
        write_json_document(&self.path, &doc)
    }
}
