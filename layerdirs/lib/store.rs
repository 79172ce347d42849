//! A storage root bound to the enumeration, ancestry, path and materialization functions.

use std::path::{Path, PathBuf};

use getset::Getters;

use crate::{ancestry, config::StoreConfig, enumerate, materialize, paths, LayerdirsResult};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A layer storage root.
///
/// The store holds no state besides its root and a flag choosing how diffs are materialized.
/// Every call goes to the filesystem, so results reflect whatever the layer creator has written
/// so far.
///
/// ## Examples
///
/// ```
/// use std::path::PathBuf;
/// use layerdirs::LayerStore;
///
/// let store = LayerStore::new("/r");
/// assert_eq!(store.mount_path("x"), PathBuf::from("/r/mnt/x"));
/// assert_eq!(store.label_diff_path("x", "lbl"), PathBuf::from("/r/diff/lbl/x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub with_prefix")]
pub struct LayerStore {
    /// The storage root.
    root: PathBuf,

    /// Whether [`materialize_label`](LayerStore::materialize_label) publishes atomically.
    atomic: bool,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl LayerStore {
    /// Creates a store rooted at `root` that materializes with a plain recursive copy.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            atomic: false,
        }
    }

    /// Creates a store from a configuration.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            root: config.get_root().clone(),
            atomic: *config.get_atomic(),
        }
    }

    /// Sets whether materialization stages the copy and publishes it with a rename.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Returns the ids of every layer with a mount point directory under `mnt/`.
    pub fn ids(&self) -> LayerdirsResult<Vec<String>> {
        enumerate::load_ids(paths::mount_root(&self.root))
    }

    /// Returns the ids of every layer with an ancestry record under `layers/`.
    pub fn record_ids(&self) -> LayerdirsResult<Vec<String>> {
        enumerate::load_record_ids(self.layers_root())
    }

    /// Returns the ancestor ids recorded for `id`, in record order.
    pub fn parent_ids(&self, id: &str) -> LayerdirsResult<Vec<String>> {
        ancestry::parent_ids(&self.root, id)
    }

    /// Returns the diff directories of every ancestor of `id`, in record order.
    ///
    /// This is the list of lower directories a union mount of `id` stacks beneath its own diff.
    pub fn parent_diff_paths(&self, id: &str) -> LayerdirsResult<Vec<PathBuf>> {
        Ok(self
            .parent_ids(id)?
            .iter()
            .map(|parent| self.diff_path(parent))
            .collect())
    }

    /// Returns `root/mnt/<id>`.
    pub fn mount_path(&self, id: &str) -> PathBuf {
        paths::mount_path(&self.root, id)
    }

    /// Returns `root/diff`.
    pub fn diff_root(&self) -> PathBuf {
        paths::diff_root(&self.root)
    }

    /// Returns `root/diff/<id>`.
    pub fn diff_path(&self, id: &str) -> PathBuf {
        paths::diff_path(&self.root, id)
    }

    /// Returns `root/diff/<label>`.
    pub fn label_diff_root(&self, label: &str) -> PathBuf {
        paths::label_diff_root(&self.root, label)
    }

    /// Returns `root/diff/<label>/<id>`.
    pub fn label_diff_path(&self, id: &str, label: &str) -> PathBuf {
        paths::label_diff_path(&self.root, id, label)
    }

    /// Returns `root/layers`.
    pub fn layers_root(&self) -> PathBuf {
        paths::layers_root(&self.root)
    }

    /// Returns `root/layers/<id>`.
    pub fn record_path(&self, id: &str) -> PathBuf {
        paths::record_path(&self.root, id)
    }

    /// Copies the diff of `id` into `diff/<label>/<id>`, creating `diff/<label>` if needed.
    ///
    /// Does nothing if the labeled copy already exists. Returns the path of the labeled copy.
    pub fn materialize_label(&self, id: &str, label: &str) -> LayerdirsResult<PathBuf> {
        let source = self.diff_path(id);
        let destination = self.label_diff_path(id, label);
        let label_dir = self.label_diff_root(label);

        self.copy(&source, &destination, Some(&label_dir))?;
        Ok(destination)
    }

    /// Copies an arbitrary tree using this store's materialization mode.
    pub fn copy(
        &self,
        source: &Path,
        destination: &Path,
        label_dir: Option<&Path>,
    ) -> LayerdirsResult<()> {
        if self.atomic {
            materialize::copy_tree_atomic(source, destination, label_dir)
        } else {
            materialize::copy_tree(source, destination, label_dir)
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
