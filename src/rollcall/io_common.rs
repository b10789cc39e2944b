// Primitives for reading and writing the JSON documents of the data directory.

use std::fs;
use std::path::Path;

use chrono::Local;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use snafu::ResultExt;

use crate::rollcall::*;

pub fn display_path(path: &Path) -> String {
    path.display().to_string()
}

/// The local time in the ISO-8601 form used by the `timestamp` fields.
pub fn now_iso() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// Reads a document. A missing file is not an error.
pub fn read_json_document<T: DeserializeOwned>(path: &Path) -> RollCallResult<Option<T>> {
    let p = display_path(path);
    if !path.exists() {
        debug!("read_json_document: {:?} does not exist", p);
        return Ok(None);
    }
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path: p.clone() })?;
    let doc: T = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path: p })?;
    Ok(Some(doc))
}

/// Reads a document, falling back to the default when it is missing or
/// unreadable.
pub fn read_json_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match read_json_document(path) {
        Ok(Some(doc)) => doc,
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Ignoring unreadable document: {}", e);
            T::default()
        }
    }
}

/// Replaces the whole document on disk.
pub fn write_json_document<T: Serialize>(path: &Path, doc: &T) -> RollCallResult<()> {
    let p = display_path(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(WritingJsonSnafu { path: p.clone() })?;
    }
    let contents = serde_json::to_string_pretty(doc).context(SerializingJsonSnafu { path: p.clone() })?;
    fs::write(path, contents).context(WritingJsonSnafu { path: p.clone() })?;
    info!("Wrote {:?}", p);
    Ok(())
}
