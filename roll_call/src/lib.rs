/*!

Core logic of the `rollcall` classroom tool.

This crate knows nothing about files. It checks candidate names before they
join a roster ([validate_names]), merges rosters ([merge_names]), keeps the
collection of classes consistent ([classes::Classes]), draws names at random
([select_names]) and counts how often each name was drawn
([tally_appearances]).

```
use roll_call::{select_names, DrawMode};
# use roll_call::RosterError;

let roster = vec!["Anna".to_string(), "Bob".to_string(), "Clara".to_string()];
let mut rng = rand::thread_rng();
let picked = select_names(&roster, 2, DrawMode::Unique, &mut rng)?;

assert_eq!(picked.len(), 2);
assert_ne!(picked[0], picked[1]);
# Ok::<(), RosterError>(())
```
*/
pub mod classes;
mod config;

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

/// Longer names are suspicious but accepted.
pub const MAX_NAME_LENGTH: usize = 50;

/// Above this many names, an import is flagged as unusually large.
pub const MAX_ROSTER_SIZE: usize = 1000;

/// Characters that may not appear in a name.
pub const FORBIDDEN_CHARACTERS: &[char] = &[
    '!', '@', '#', '$', '%', '^', '&', '*', '(', ')', '+', '=', '[', ']', '{', '}', '|', '\\',
    ':', '"', ';', '\'', '<', '>', '?', ',', '.', '/',
];

/// Draws `count` names from the roster.
///
/// With [DrawMode::Unique], every subset of `count` positions is equally likely and
/// the result comes back in random order. With [DrawMode::WithReplacement], each
/// position of the result is an independent uniform pick, so repeats are expected.
pub fn select_names<R: Rng + ?Sized>(
    roster: &[String],
    count: usize,
    mode: DrawMode,
    rng: &mut R,
) -> Result<Vec<String>, RosterError> {
    if count == 0 {
        return Err(RosterError::InvalidCount);
    }
    if roster.is_empty() {
        return Err(RosterError::EmptyRoster);
    }
    let res: Vec<String> = match mode {
        DrawMode::Unique => {
            if roster.len() < count {
                return Err(RosterError::InsufficientRoster {
                    available: roster.len(),
                    requested: count,
                });
            }
            roster.choose_multiple(rng, count).cloned().collect()
        }
        DrawMode::WithReplacement => (0..count)
            .map(|_| roster[rng.gen_range(0..roster.len())].clone())
            .collect(),
    };
    debug!(
        "select_names: roster size: {:?} mode: {:?} selected: {:?}",
        roster.len(),
        mode,
        res
    );
    Ok(res)
}

/// Merges incoming names into an existing roster.
///
/// When duplicates are kept, this is a plain concatenation. Otherwise an incoming
/// name is appended only if the result does not hold it yet, which also removes
/// repeats inside `incoming`. Duplicates already present in `existing` stay.
pub fn merge_names(existing: &[String], incoming: &[String], keep_duplicates: bool) -> Vec<String> {
    let mut res: Vec<String> = existing.to_vec();
    if keep_duplicates {
        res.extend(incoming.iter().cloned());
    } else {
        let mut seen: HashSet<&str> = existing.iter().map(|s| s.as_str()).collect();
        for name in incoming {
            if seen.insert(name.as_str()) {
                res.push(name.clone());
            }
        }
    }
    debug!(
        "merge_names: existing: {} incoming: {} result: {}",
        existing.len(),
        incoming.len(),
        res.len()
    );
    res
}

/// Checks a list of candidate names, optionally against the names of the
/// roster they are going to join.
pub fn validate_names(names: &[String], existing: Option<&[String]>) -> ValidationReport {
    let mut report = ValidationReport {
        valid: true,
        count: names.len(),
        ..ValidationReport::default()
    };

    // Duplicates within the list.
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for (idx, name) in names.iter().enumerate() {
        let entry = positions.entry(name.as_str()).or_default();
        if entry.is_empty() {
            first_seen.push(name.as_str());
        }
        entry.push(idx);
    }
    for name in first_seen {
        let occurrences = positions.get(name).cloned().unwrap_or_default();
        if occurrences.len() > 1 {
            let rows: Vec<String> = occurrences.iter().map(|i| (i + 1).to_string()).collect();
            report.warnings.push(format!(
                "Duplicate name '{}' on rows {}",
                name,
                rows.join(", ")
            ));
            report.duplicates.push(DuplicateName {
                name: name.to_string(),
                positions: occurrences,
            });
        }
    }

    // Names the roster already holds.
    if let Some(existing) = existing {
        let existing_set: HashSet<&str> = existing.iter().map(|s| s.as_str()).collect();
        let mut reported: HashSet<&str> = HashSet::new();
        for name in names {
            if existing_set.contains(name.as_str()) && reported.insert(name.as_str()) {
                report.existing_duplicates.push(name.clone());
            }
        }
        if !report.existing_duplicates.is_empty() {
            report.warnings.push(format!(
                "{} name(s) already in the roster: {}",
                report.existing_duplicates.len(),
                abbreviated_list(&report.existing_duplicates, 5)
            ));
        }
    }

    for (idx, name) in names.iter().enumerate() {
        let row = idx + 1;
        let trimmed = name.trim();
        if trimmed.is_empty() {
            report.errors.push(format!("Row {}: the name is empty", row));
            continue;
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            let head: String = trimmed.chars().take(20).collect();
            report
                .warnings
                .push(format!("Row {}: the name is too long: {}...", row, head));
        }
        if !trimmed.chars().any(is_name_letter) {
            report
                .warnings
                .push(format!("Row {}: the name contains no letter: {}", row, name));
        }
        if name.contains(FORBIDDEN_CHARACTERS) {
            report.errors.push(format!(
                "Row {}: the name contains invalid characters: {}",
                row, name
            ));
        }
    }

    if names.len() > MAX_ROSTER_SIZE {
        report.warnings.push(format!(
            "{} names is a very large roster (more than {})",
            names.len(),
            MAX_ROSTER_SIZE
        ));
    }

    report.valid = report.errors.is_empty();
    info!(
        "validate_names: {} names, {} errors, {} warnings",
        report.count,
        report.errors.len(),
        report.warnings.len()
    );
    report
}

/// Counts how many times each name appears across the given draws.
///
/// The result is sorted by decreasing count. Names with the same count keep the
/// order in which they were first met.
pub fn tally_appearances<'a, I>(draws: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut tally: Vec<(String, u64)> = Vec::new();
    for draw in draws {
        for name in draw {
            match index.get(name.as_str()) {
                Some(&pos) => tally[pos].1 += 1,
                None => {
                    index.insert(name.as_str(), tally.len());
                    tally.push((name.clone(), 1));
                }
            }
        }
    }
    // Stable sort: ties keep their first-appearance order.
    tally.sort_by(|a, b| b.1.cmp(&a.1));
    tally
}

/// Splits names typed by hand. Both the ASCII comma and the full-width comma
/// separate names; blanks are dropped.
pub fn parse_name_list(text: &str) -> Vec<String> {
    text.split([',', '，'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Joins the first `max` entries, with an ellipsis when some were left out.
pub fn abbreviated_list(names: &[String], max: usize) -> String {
    let head: Vec<&str> = names.iter().take(max).map(|s| s.as_str()).collect();
    if names.len() > max {
        format!("{}...", head.join(", "))
    } else {
        head.join(", ")
    }
}

// Latin letters (including accented ones) and CJK ideographs.
fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || (('\u{00C0}'..='\u{024F}').contains(&c) && c != '\u{00D7}' && c != '\u{00F7}')
        || ('\u{3400}'..='\u{4DBF}').contains(&c)
        || ('\u{4E00}'..='\u{9FFF}').contains(&c)
        || ('\u{F900}'..='\u{FAFF}').contains(&c)
}
