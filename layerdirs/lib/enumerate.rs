//! Layer id discovery.
//!
//! A storage root exposes its layers in two ways: as directories under `mnt/` and `diff/`, and as
//! record files under `layers/`. [`load_ids`] lists the former and [`load_record_ids`] the latter.

use std::{fs, path::Path};

use crate::{utils::STAGING_PREFIX, LayerdirsError, LayerdirsResult};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the names of every directory directly under `dir`, sorted.
///
/// Entries are classified without following symlinks, so a symlink pointing at a directory is
/// not reported as a layer. Names that are not valid UTF-8 and leftover `.staging-*` directories
/// from an interrupted atomic copy are skipped.
///
/// # Errors
/// Returns [`LayerdirsError::Unreadable`] if `dir` cannot be listed, whether it is missing, not a
/// directory or not permitted, or if any of its entries cannot be read. Nothing is returned on
/// failure.
pub fn load_ids(dir: impl AsRef<Path>) -> LayerdirsResult<Vec<String>> {
    load_entries(dir.as_ref(), |file_type| file_type.is_dir())
}

/// Returns the names of every regular file directly under `dir`, sorted.
///
/// This is the view used for `layers/`, where each layer is represented by its ancestry record.
pub fn load_record_ids(dir: impl AsRef<Path>) -> LayerdirsResult<Vec<String>> {
    load_entries(dir.as_ref(), |file_type| file_type.is_file())
}

fn load_entries(dir: &Path, keep: impl Fn(&fs::FileType) -> bool) -> LayerdirsResult<Vec<String>> {
    let unreadable = |path: &Path, source| LayerdirsError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let entries = fs::read_dir(dir).map_err(|e| unreadable(dir, e))?;

    let mut ids = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| unreadable(dir, e))?;
        let file_type = entry
            .file_type()
            .map_err(|e| unreadable(&entry.path(), e))?;

        if !keep(&file_type) {
            continue;
        }

        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!("skipping non-utf-8 entry: {}", entry.path().display());
            continue;
        };

        if name.starts_with(STAGING_PREFIX) {
            tracing::debug!("skipping staging entry: {}", entry.path().display());
            continue;
        }

        ids.push(name);
    }

    ids.sort();
    tracing::debug!("found {} entries in {}", ids.len(), dir.display());

    Ok(ids)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
