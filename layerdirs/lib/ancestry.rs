//! Ancestry record reading.
//!
//! Each layer has a record at `root/layers/<id>` listing its ancestor ids one per line. The order
//! is whatever the producer wrote and is returned verbatim. Referenced ids are not checked for
//! existence and cycles are not detected; both belong to a caller that holds every record.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::{paths, LayerdirsError, LayerdirsResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Reads the ancestry record of `id` under `root` and returns its non-empty lines in file order.
///
/// An empty record (or one with only blank lines) means the layer has no parent and yields an
/// empty list.
///
/// # Errors
/// * [`LayerdirsError::NotFound`] if the record does not exist
/// * [`LayerdirsError::Unreadable`] if opening or reading it fails part way; no partial chain is
///   returned
pub fn parent_ids(root: impl AsRef<Path>, id: &str) -> LayerdirsResult<Vec<String>> {
    let record = paths::record_path(root, id);
    let file = File::open(&record).map_err(|e| LayerdirsError::read(&record, e))?;

    let parents = read_parent_ids(BufReader::new(file)).map_err(|e| LayerdirsError::Unreadable {
        path: record,
        source: e,
    })?;

    tracing::debug!("layer {id} has {} ancestors", parents.len());
    Ok(parents)
}

/// Collects the non-empty lines of an ancestry record.
///
/// Both `\n` and `\r\n` line endings are accepted.
pub fn read_parent_ids(reader: impl BufRead) -> std::io::Result<Vec<String>> {
    reader
        .lines()
        .filter(|line| !matches!(line, Ok(l) if l.is_empty()))
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
