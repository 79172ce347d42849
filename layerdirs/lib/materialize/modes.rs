use std::{
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

use crate::{utils, LayerdirsError, LayerdirsResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Collects directory permission bits during a copy and applies them once the copy is done.
///
/// Directories are created with the default mode so they stay writable while being populated.
/// Their source modes are recorded here and applied in reverse order of creation, which puts
/// children before parents, so a read-only parent never blocks finishing its children.
#[derive(Debug, Default)]
pub struct DeferredModes {
    /// Directories in the order they were created, with their source modes
    pending: Vec<(PathBuf, u32)>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl DeferredModes {
    /// Creates an empty set of deferred modes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `path` should receive `mode` once [`apply`](Self::apply) is called.
    pub fn defer(&mut self, path: impl Into<PathBuf>, mode: u32) {
        self.pending.push((path.into(), mode));
    }

    /// Returns the number of directories still waiting for their mode.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves every recorded path from under `from` to the same place under `to`.
    ///
    /// Used when a tree is built in one place and renamed into another before its modes land.
    /// Paths outside `from` are kept as they are.
    pub fn rebase(self, from: &Path, to: &Path) -> Self {
        let pending = self
            .pending
            .into_iter()
            .map(|(path, mode)| match path.strip_prefix(from) {
                Ok(relative) if relative.as_os_str().is_empty() => (to.to_path_buf(), mode),
                Ok(relative) => (to.join(relative), mode),
                Err(_) => (path, mode),
            })
            .collect();

        Self { pending }
    }

    /// Applies every recorded mode, deepest directory first.
    ///
    /// # Errors
    /// Returns [`LayerdirsError::PermissionCopyFailed`] for the first directory whose mode cannot
    /// be set. Directories after it in the order are left untouched.
    pub fn apply(mut self) -> LayerdirsResult<()> {
        while let Some((path, mode)) = self.pending.pop() {
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode))
                .map_err(|e| LayerdirsError::permission(&path, e))?;

            tracing::debug!(
                "applied directory mode to {}: {} ({:#o})",
                path.display(),
                utils::format_mode(mode),
                mode
            );
        }

        Ok(())
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test_log::test]
    fn test_deferred_modes_apply_children_first() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let parent = temp.path().join("parent");
        let child = parent.join("child");
        fs::create_dir(&parent)?;
        fs::create_dir(&child)?;

        let mut modes = DeferredModes::new();
        modes.defer(&parent, 0o555);
        modes.defer(&child, 0o700);
        assert_eq!(modes.len(), 2);

        modes.apply()?;

        assert_eq!(fs::metadata(&parent)?.permissions().mode() & 0o777, 0o555);
        assert_eq!(fs::metadata(&child)?.permissions().mode() & 0o777, 0o700);

        fs::set_permissions(&parent, fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[test_log::test]
    fn test_deferred_modes_missing_directory_fails() -> anyhow::Result<()> {
        let temp = tempdir()?;

        let mut modes = DeferredModes::new();
        modes.defer(temp.path().join("gone"), 0o755);

        let err = modes.apply().unwrap_err();
        assert!(matches!(err, LayerdirsError::PermissionCopyFailed { .. }));
        Ok(())
    }

    #[test_log::test]
    fn test_deferred_modes_rebase_onto_renamed_tree() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let staged = temp.path().join("staged");
        let published = temp.path().join("published");
        fs::create_dir_all(staged.join("sub"))?;

        let mut modes = DeferredModes::new();
        assert!(modes.is_empty());
        modes.defer(&staged, 0o555);
        modes.defer(staged.join("sub"), 0o700);

        fs::rename(&staged, &published)?;
        modes.rebase(&staged, &published).apply()?;

        assert_eq!(fs::metadata(&published)?.permissions().mode() & 0o777, 0o555);
        assert_eq!(
            fs::metadata(published.join("sub"))?.permissions().mode() & 0o777,
            0o700
        );

        fs::set_permissions(&published, fs::Permissions::from_mode(0o755))?;
        Ok(())
    }
}
