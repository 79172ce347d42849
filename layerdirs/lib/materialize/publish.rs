use std::{fs, path::Path};

use crate::{utils::STAGING_PREFIX, LayerdirsError, LayerdirsResult};

use super::copy::{copy_contents, ensure_label_dir, path_exists};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Name of the tree inside a staging directory, renamed onto the destination when complete.
const STAGED_TREE: &str = "tree";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Copies the tree at `source` to `destination` so that `destination` either appears complete or
/// not at all.
///
/// Follows the same rules as [`copy_tree`](super::copy_tree) for an existing destination and for
/// `label_dir`. The tree is built inside a staging directory created next to `destination` and
/// then moved into place with a single rename. If the copy fails the staging directory is
/// removed and `destination` is never created.
///
/// Staged directories stay writable until the rename, so a read-only source root can still be
/// moved and a discarded copy can still be deleted. Directory modes are applied to the published
/// tree right after the rename.
///
/// Staging directories are named with a `.staging-` prefix. If the process dies mid-copy one is
/// left next to `destination`; [`enumerate`](crate::enumerate) skips such names so they are
/// never reported as layers.
///
/// If another writer publishes `destination` while this copy is running, the rename loses and
/// the call returns success without touching the other writer's tree.
///
/// # Errors
/// Returns the same errors as [`copy_tree`](super::copy_tree), plus
/// [`LayerdirsError::WriteFailed`] if the staging directory cannot be created or the final rename
/// fails for a reason other than a concurrent publish. A
/// [`LayerdirsError::PermissionCopyFailed`] after the rename leaves `destination` in place with
/// some directory modes unapplied.
pub fn copy_tree_atomic(
    source: impl AsRef<Path>,
    destination: impl AsRef<Path>,
    label_dir: Option<&Path>,
) -> LayerdirsResult<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    if path_exists(destination)? {
        tracing::debug!("{} already exists, skipping copy", destination.display());
        return Ok(());
    }

    ensure_label_dir(label_dir)?;

    let parent = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
        .map_err(|e| LayerdirsError::write(parent, e))?;
    let staged = staging.path().join(STAGED_TREE);

    tracing::info!(
        "staging {} -> {} via {}",
        source.display(),
        destination.display(),
        staging.path().display()
    );
    let modes = copy_contents(source, &staged)?;

    if let Err(e) = fs::rename(&staged, destination) {
        if path_exists(destination)? {
            tracing::debug!(
                "{} was published concurrently, discarding staged copy",
                destination.display()
            );
            return Ok(());
        }
        return Err(LayerdirsError::write(destination, e));
    }

    if !modes.is_empty() {
        tracing::debug!(
            "applying {} directory modes under {}",
            modes.len(),
            destination.display()
        );
    }
    modes.rebase(&staged, destination).apply()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
