// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// How names are drawn from a roster.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum DrawMode {
    /// Sampling without replacement: a name position is drawn at most once.
    Unique,
    /// Every position of the result is an independent uniform pick.
    WithReplacement,
}

impl DrawMode {
    /// Maps the persisted `prevent_duplicate` flag to a mode.
    pub fn from_prevent_duplicate(prevent_duplicate: bool) -> DrawMode {
        if prevent_duplicate {
            DrawMode::Unique
        } else {
            DrawMode::WithReplacement
        }
    }
}

// ******** Output data structures *********

/// A name that appears more than once in a candidate list.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DuplicateName {
    pub name: String,
    /// 0-based positions of every occurrence, in increasing order.
    pub positions: Vec<usize>,
}

/// The outcome of checking a list of names before it joins a roster.
///
/// Errors block the import. Warnings only require a confirmation.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub count: usize,
    /// Duplicates inside the candidate list, in first-seen order.
    pub duplicates: Vec<DuplicateName>,
    /// Candidate names that the existing roster already holds.
    pub existing_duplicates: Vec<String>,
}

impl ValidationReport {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn duplicate_names(&self) -> Vec<&str> {
        self.duplicates.iter().map(|d| d.name.as_str()).collect()
    }
}

/// Errors raised by the roster collection and the selector.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RosterError {
    EmptyRoster,
    InvalidCount,
    InsufficientRoster { available: usize, requested: usize },
    AlreadyExists(String),
    LastClass,
    UnknownClass(String),
    EmptyClassName,
}

impl Error for RosterError {}

impl Display for RosterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterError::EmptyRoster => write!(f, "the roster is empty, import some names first"),
            RosterError::InvalidCount => write!(f, "at least one name must be drawn"),
            RosterError::InsufficientRoster {
                available,
                requested,
            } => write!(
                f,
                "cannot draw {} distinct names from a roster of {}",
                requested, available
            ),
            RosterError::AlreadyExists(name) => write!(f, "class '{}' already exists", name),
            RosterError::LastClass => write!(f, "the last remaining class cannot be deleted"),
            RosterError::UnknownClass(name) => write!(f, "class '{}' does not exist", name),
            RosterError::EmptyClassName => write!(f, "a class name cannot be empty"),
        }
    }
}
