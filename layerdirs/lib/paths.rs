//! Pure path composition for a layer storage root.
//!
//! None of these functions touch the filesystem. The same arguments always produce the same
//! path, so callers are free to cache results or hand them straight to
//! [`copy_tree`](crate::materialize::copy_tree).

use std::path::{Path, PathBuf};

use crate::utils::{DIFF_SUBDIR, LAYERS_SUBDIR, MNT_SUBDIR};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns `root/mnt`.
pub fn mount_root(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(MNT_SUBDIR)
}

/// Returns the mount point of a layer, `root/mnt/<id>`.
pub fn mount_path(root: impl AsRef<Path>, id: &str) -> PathBuf {
    mount_root(root).join(id)
}

/// Returns `root/diff`.
pub fn diff_root(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(DIFF_SUBDIR)
}

/// Returns the unlabeled diff directory of a layer, `root/diff/<id>`.
pub fn diff_path(root: impl AsRef<Path>, id: &str) -> PathBuf {
    diff_root(root).join(id)
}

/// Returns the directory holding every diff copied under `label`, `root/diff/<label>`.
pub fn label_diff_root(root: impl AsRef<Path>, label: &str) -> PathBuf {
    diff_root(root).join(label)
}

/// Returns the label-scoped diff directory of a layer, `root/diff/<label>/<id>`.
pub fn label_diff_path(root: impl AsRef<Path>, id: &str, label: &str) -> PathBuf {
    label_diff_root(root, label).join(id)
}

/// Returns `root/layers`.
pub fn layers_root(root: impl AsRef<Path>) -> PathBuf {
    root.as_ref().join(LAYERS_SUBDIR)
}

/// Returns the ancestry record of a layer, `root/layers/<id>`.
pub fn record_path(root: impl AsRef<Path>, id: &str) -> PathBuf {
    layers_root(root).join(id)
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_layout() {
        let root = Path::new("/r");

        assert_eq!(mount_path(root, "x"), PathBuf::from("/r/mnt/x"));
        assert_eq!(diff_root(root), PathBuf::from("/r/diff"));
        assert_eq!(diff_path(root, "x"), PathBuf::from("/r/diff/x"));
        assert_eq!(label_diff_root(root, "lbl"), PathBuf::from("/r/diff/lbl"));
        assert_eq!(
            label_diff_path(root, "x", "lbl"),
            PathBuf::from("/r/diff/lbl/x")
        );
        assert_eq!(record_path(root, "x"), PathBuf::from("/r/layers/x"));
    }

    #[test]
    fn test_paths_are_stable() {
        let root = PathBuf::from("/var/lib/layerdirs");

        assert_eq!(mount_path(&root, "abc"), mount_path(&root, "abc"));
        assert_eq!(
            label_diff_path(&root, "abc", "svirt"),
            label_diff_path(&root, "abc", "svirt")
        );
        assert_eq!(
            mount_path(&root, "abc").to_str(),
            Some("/var/lib/layerdirs/mnt/abc")
        );
    }

    #[test]
    fn test_paths_label_diff_nests_under_label_root() {
        let root = Path::new("relative/root");
        let path = label_diff_path(root, "id", "label");

        assert!(path.starts_with(label_diff_root(root, "label")));
        assert!(path.starts_with(diff_root(root)));
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("id"));
    }
}
