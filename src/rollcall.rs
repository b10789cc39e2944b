use log::{debug, info};

use roll_call::*;
use snafu::{prelude::*, Snafu};

use std::path::Path;

use chrono::Local;
use rand::Rng;

use crate::rollcall::config_store::ConfigStore;
use crate::rollcall::history_store::{HistoryStore, SelectionEvent};
use crate::rollcall::io_excel::ImportOptions;
use crate::rollcall::roster_store::RosterStore;

pub mod config_store;
pub mod history_store;
mod io_common;
pub mod io_excel;
pub mod roster_store;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum RollCallError {
    #[snafu(display("File not found: {path}"))]
    NotFound { path: String },
    #[snafu(display(
        "Unsupported file type '{extension}' for {path}: only .xlsx and .xls are supported"
    ))]
    InvalidFile { path: String, extension: String },
    #[snafu(display("Error opening spreadsheet {path}: {source}"))]
    OpeningExcel {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("No usable data in {path}"))]
    EmptyData { path: String },
    #[snafu(display("Error reading {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Malformed JSON in {path}: {source}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing {path}: {source}"))]
    SerializingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}: {source}"))]
    WritingJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("{source}"))]
    Roster { source: RosterError },
    #[snafu(display("The names contain errors:\n{}", errors.join("\n")))]
    ValidationFailed { errors: Vec<String> },
    #[snafu(display(
        "The names raised warnings (pass --yes to import anyway):\n{}",
        warnings.join("\n")
    ))]
    WarningsNotConfirmed { warnings: Vec<String> },
    #[snafu(display("No valid student name found in {source_name}"))]
    NothingToImport { source_name: String },
}

pub type RollCallResult<T> = Result<T, RollCallError>;

/// What to do when validation raises warnings or finds names the roster
/// already holds.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct MergePolicy {
    pub accept_warnings: bool,
    pub keep_duplicates: bool,
}

impl Default for MergePolicy {
    fn default() -> Self {
        MergePolicy {
            accept_warnings: false,
            keep_duplicates: true,
        }
    }
}

/// The result of adding names to the current roster.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ImportSummary {
    pub report: ValidationReport,
    pub added: usize,
    pub total: usize,
}

/// The state of the application: the rosters, the history and the settings,
/// all backed by JSON documents in one data directory.
#[derive(Debug)]
pub struct RollCall {
    pub rosters: RosterStore,
    pub history: HistoryStore,
    pub config: ConfigStore,
}

impl RollCall {
    pub fn open(data_dir: &Path) -> RollCallResult<RollCall> {
        info!("Opening data directory {:?}", data_dir);
        Ok(RollCall {
            rosters: RosterStore::open(data_dir)?,
            history: HistoryStore::open(data_dir),
            config: ConfigStore::open(data_dir),
        })
    }

    /// Imports the first column of a spreadsheet into the current class.
    pub fn import_file(
        &mut self,
        path: &str,
        options: &ImportOptions,
        policy: MergePolicy,
    ) -> RollCallResult<ImportSummary> {
        let names = io_excel::import_names(path, options)?;
        self.merge_into_current(&names, policy, path)
    }

    /// Adds names typed by hand, separated by commas.
    pub fn add_manual(&mut self, text: &str, policy: MergePolicy) -> RollCallResult<ImportSummary> {
        let names = parse_name_list(text);
        ensure!(
            !names.is_empty(),
            NothingToImportSnafu {
                source_name: "the input"
            }
        );
        self.merge_into_current(&names, policy, "the input")
    }

    fn merge_into_current(
        &mut self,
        names: &[String],
        policy: MergePolicy,
        source_name: &str,
    ) -> RollCallResult<ImportSummary> {
        let existing = self.rosters.current_roster().to_vec();
        let report = validate_names(names, Some(&existing));
        debug!("merge_into_current: report: {:?}", report);
        ensure!(
            report.valid,
            ValidationFailedSnafu {
                errors: report.errors.clone()
            }
        );
        ensure!(
            !report.has_warnings() || policy.accept_warnings,
            WarningsNotConfirmedSnafu {
                warnings: report.warnings.clone()
            }
        );
        ensure!(!names.is_empty(), NothingToImportSnafu { source_name });

        if policy.keep_duplicates {
            self.rosters.add_names(names)?;
        } else {
            let merged = RosterStore::merge(&existing, names, false);
            self.rosters.set_current_roster(merged)?;
        }
        let total = self.rosters.current_roster().len();
        let added = total - existing.len();
        info!(
            "Added {} names from {} to class {:?} ({} in total, saved to {:?})",
            added,
            source_name,
            self.rosters.current_class(),
            total,
            self.rosters.path()
        );
        Ok(ImportSummary {
            report,
            added,
            total,
        })
    }

    /// Draws from the current class. Missing parameters come from the config.
    pub fn draw(
        &mut self,
        count: Option<usize>,
        mode: Option<DrawMode>,
    ) -> RollCallResult<SelectionEvent> {
        self.draw_with_rng(count, mode, &mut rand::thread_rng())
    }

    pub fn draw_with_rng<R: Rng + ?Sized>(
        &mut self,
        count: Option<usize>,
        mode: Option<DrawMode>,
        rng: &mut R,
    ) -> RollCallResult<SelectionEvent> {
        let settings = self.config.config();
        let count = count.unwrap_or(settings.num_students as usize);
        let mode = mode.unwrap_or_else(|| DrawMode::from_prevent_duplicate(settings.prevent_duplicate));
        let names = select_names(self.rosters.current_roster(), count, mode, rng)
            .context(RosterSnafu {})?;
        let event = SelectionEvent::new(names, Local::now().naive_local());
        self.history.append(event.clone())?;
        Ok(event)
    }
}
