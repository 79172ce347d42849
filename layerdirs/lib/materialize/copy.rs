use std::{
    fs::{self, File},
    io,
    os::unix::fs::{FileTypeExt, PermissionsExt},
    path::Path,
};

use nix::{libc, sys::stat::Mode, unistd};
use walkdir::WalkDir;

use crate::{utils, LayerdirsError, LayerdirsResult};

use super::DeferredModes;

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Copies the tree at `source` to `destination`, unless `destination` already exists.
///
/// The copy proceeds as follows:
/// 1. If `destination` exists (as anything, including a dangling symlink) nothing happens
/// 2. If `label_dir` is given and missing, it is created (single level, not recursive)
/// 3. Every entry under `source` is recreated under `destination`:
///    - Directories are created and get their source mode once the walk is done
///    - Regular files are copied, given their source mode and synced to disk
///    - FIFOs are recreated with their source mode
///    - Symlinks are skipped, as are sockets and device nodes
///
/// `source` itself may be a regular file, in which case `destination` becomes a copy of it.
///
/// # Arguments
/// * `source` - Tree to copy from
/// * `destination` - Path to create; its parent must exist
/// * `label_dir` - Directory to create before copying, usually `diff/<label>`
///
/// # Errors
/// Returns the first failure encountered. Entries copied before it remain on disk.
/// * [`LayerdirsError::Unreadable`] if the destination cannot be checked or the source walked
/// * [`LayerdirsError::NotFound`] if `source` does not exist
/// * [`LayerdirsError::WriteFailed`] if a directory or file cannot be created, written or synced
/// * [`LayerdirsError::PermissionCopyFailed`] if a mode cannot be read or applied
pub fn copy_tree(
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

    tracing::info!("copying {} -> {}", source.display(), destination.display());
    copy_contents(source, destination)?.apply()
}

/// Copies a single regular file, replacing `destination` if it exists.
///
/// The steps run in order and the first failing one aborts the copy: open the source, create the
/// destination, copy the bytes, apply the source permission bits, flush to stable storage.
///
/// # Errors
/// * [`LayerdirsError::NotFound`] or [`LayerdirsError::Unreadable`] if the source cannot be opened
/// * [`LayerdirsError::WriteFailed`] if creating, writing or syncing the destination fails
/// * [`LayerdirsError::PermissionCopyFailed`] if the source mode cannot be read or applied
pub fn copy_file(source: impl AsRef<Path>, destination: impl AsRef<Path>) -> LayerdirsResult<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();

    let mut input = File::open(source).map_err(|e| LayerdirsError::read(source, e))?;
    let mut output = File::create(destination).map_err(|e| LayerdirsError::write(destination, e))?;

    io::copy(&mut input, &mut output).map_err(|e| LayerdirsError::write(destination, e))?;

    let permissions = input
        .metadata()
        .map_err(|e| LayerdirsError::permission(source, e))?
        .permissions();
    output
        .set_permissions(permissions.clone())
        .map_err(|e| LayerdirsError::permission(destination, e))?;

    output
        .sync_all()
        .map_err(|e| LayerdirsError::write(destination, e))?;

    tracing::debug!(
        "copied file {} -> {} ({})",
        source.display(),
        destination.display(),
        utils::format_mode(permissions.mode())
    );

    Ok(())
}

/// Returns whether anything exists at `path`, without following a final symlink.
pub(crate) fn path_exists(path: &Path) -> LayerdirsResult<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(LayerdirsError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Creates `label_dir` if it is given, non-empty and missing.
pub(crate) fn ensure_label_dir(label_dir: Option<&Path>) -> LayerdirsResult<()> {
    let Some(label_dir) = label_dir.filter(|dir| !dir.as_os_str().is_empty()) else {
        return Ok(());
    };

    if path_exists(label_dir)? {
        return Ok(());
    }

    tracing::debug!("creating label directory {}", label_dir.display());
    fs::create_dir(label_dir).map_err(|e| LayerdirsError::write(label_dir, e))
}

/// Recreates everything under `source` at `destination`. `destination` must not exist.
///
/// Directories are left writable; their source modes are returned for the caller to apply.
pub(crate) fn copy_contents(
    source: &Path,
    destination: &Path,
) -> LayerdirsResult<DeferredModes> {
    let mut modes = DeferredModes::new();

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|e| walk_error(source, e))?;
        let path = entry.path();
        let relative = path.strip_prefix(source).map_err(LayerdirsError::custom)?;

        // Joining an empty path would append a trailing separator
        let target = if relative.as_os_str().is_empty() {
            destination.to_path_buf()
        } else {
            destination.join(relative)
        };
        let file_type = entry.file_type();

        if file_type.is_dir() {
            let mode = entry
                .metadata()
                .map_err(|e| walk_error(path, e))?
                .permissions()
                .mode();

            tracing::debug!("creating directory: {}", target.display());
            fs::create_dir(&target).map_err(|e| LayerdirsError::write(&target, e))?;
            modes.defer(target, mode);
        } else if file_type.is_file() {
            copy_file(path, &target)?;
        } else if file_type.is_symlink() {
            tracing::debug!("skipping symlink: {}", path.display());
        } else if file_type.is_fifo() {
            copy_fifo(path, &target)?;
        } else {
            tracing::warn!("skipping special file: {}", path.display());
        }
    }

    Ok(modes)
}

/// Recreates the FIFO at `source` as `destination` with the same mode.
fn copy_fifo(source: &Path, destination: &Path) -> LayerdirsResult<()> {
    let mode = fs::symlink_metadata(source)
        .map_err(|e| LayerdirsError::permission(source, e))?
        .permissions()
        .mode();

    tracing::debug!("creating fifo: {}", destination.display());
    unistd::mkfifo(
        destination,
        Mode::from_bits_truncate((mode & 0o777) as libc::mode_t),
    )
    .map_err(|e| LayerdirsError::write(destination, io::Error::from(e)))?;

    // mkfifo is subject to the umask
    fs::set_permissions(destination, fs::Permissions::from_mode(mode))
        .map_err(|e| LayerdirsError::permission(destination, e))
}

fn walk_error(fallback: &Path, err: walkdir::Error) -> LayerdirsError {
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| fallback.to_path_buf());
    let message = err.to_string();

    match err.into_io_error() {
        Some(source) => LayerdirsError::read(path, source),
        None => LayerdirsError::Unreadable {
            path,
            source: io::Error::other(message),
        },
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
