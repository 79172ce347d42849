use std::{fs, os::unix::fs::PermissionsExt, path::Path};

use layerdirs::{
    ancestry, enumerate,
    materialize::{copy_tree, copy_tree_atomic},
    paths, LayerStore, LayerdirsError,
};
use tempfile::tempdir;

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[test_log::test]
/// Builds a two layer root and walks it the way a driver does at startup.
///
/// Test Structure:
/// ```text
/// root/
/// ├── mnt/
/// │   ├── L0/
/// │   └── L1/
/// ├── diff/
/// │   ├── L0/etc/os-release
/// │   └── L1/app/run.sh     (rwxr-xr-x)
/// └── layers/
///     ├── L0                ""
///     └── L1                "L0\n"
/// ```
fn test_layer_store_end_to_end() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let root = temp.path();
    helper::create_root(root)?;

    let store = LayerStore::new(root);

    assert_eq!(store.ids()?, vec!["L0", "L1"]);
    assert_eq!(store.record_ids()?, vec!["L0", "L1"]);

    assert_eq!(ancestry::parent_ids(root, "L1")?, vec!["L0"]);
    assert!(ancestry::parent_ids(root, "L0")?.is_empty());
    assert_eq!(store.parent_diff_paths("L1")?, vec![root.join("diff/L0")]);

    let labeled = store.materialize_label("L1", "svirt")?;
    assert_eq!(labeled, root.join("diff/svirt/L1"));
    assert_eq!(
        fs::metadata(labeled.join("app/run.sh"))?.permissions().mode() & 0o777,
        0o755
    );

    // diff/ now mixes layer and label directories, mnt/ still lists layers only
    assert_eq!(enumerate::load_ids(store.diff_root())?, vec!["L0", "L1", "svirt"]);
    assert_eq!(store.ids()?, vec!["L0", "L1"]);
    Ok(())
}

#[test_log::test]
fn test_layer_store_enumerates_exactly_the_layer_directories() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let dir = temp.path().join("mnt");
    fs::create_dir(&dir)?;

    let ids: Vec<String> = (0..8).map(|i| format!("layer-{i:02}")).collect();
    for id in &ids {
        fs::create_dir(dir.join(id))?;
    }
    fs::write(dir.join(".lock"), "")?;
    fs::write(dir.join("README"), "not a layer")?;

    let mut found = enumerate::load_ids(&dir)?;
    found.sort();
    assert_eq!(found, ids);
    Ok(())
}

#[test_log::test]
fn test_layer_store_missing_record_is_not_found() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let store = LayerStore::new(temp.path());
    fs::create_dir_all(store.layers_root())?;

    let err = store.parent_ids("absent").unwrap_err();
    assert!(matches!(err, LayerdirsError::NotFound { .. }));
    Ok(())
}

#[test_log::test]
fn test_layer_store_crlf_records() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let store = LayerStore::new(temp.path());
    fs::create_dir_all(store.layers_root())?;
    fs::write(store.record_path("top"), "b\r\n\r\na\r\n")?;

    assert_eq!(store.parent_ids("top")?, vec!["b", "a"]);
    Ok(())
}

#[test_log::test]
fn test_layer_store_copy_twice_leaves_destination_unchanged() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("src");
    let dest = temp.path().join("dst");
    fs::create_dir_all(source.join("a/b"))?;
    fs::write(source.join("a/b/file"), "v1")?;

    copy_tree(&source, &dest, None)?;
    let before = helper::snapshot(&dest)?;

    fs::write(source.join("a/b/file"), "v2")?;
    copy_tree(&source, &dest, None)?;
    copy_tree_atomic(&source, &dest, None)?;

    assert_eq!(helper::snapshot(&dest)?, before);
    Ok(())
}

#[test_log::test]
fn test_layer_store_label_dir_is_not_created_recursively() -> anyhow::Result<()> {
    let temp = tempdir()?;
    let root = temp.path().join("root");
    fs::create_dir_all(paths::diff_path(&root, "L0"))?;

    // diff/<label> can be created, but not a label nested two levels deep
    let label_dir = paths::label_diff_root(&root, "outer/inner");
    let dest = label_dir.join("L0");

    let err = copy_tree(paths::diff_path(&root, "L0"), &dest, Some(&label_dir)).unwrap_err();
    assert!(matches!(err, LayerdirsError::WriteFailed { .. }));
    assert!(!dest.exists());
    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Helpers
//--------------------------------------------------------------------------------------------------

mod helper {
    use super::*;

    pub(super) fn create_root(root: &Path) -> anyhow::Result<()> {
        for id in ["L0", "L1"] {
            fs::create_dir_all(paths::mount_path(root, id))?;
        }

        let l0 = paths::diff_path(root, "L0");
        fs::create_dir_all(l0.join("etc"))?;
        fs::write(l0.join("etc/os-release"), "ID=test\n")?;

        let l1 = paths::diff_path(root, "L1");
        fs::create_dir_all(l1.join("app"))?;
        fs::write(l1.join("app/run.sh"), "#!/bin/sh\nexec true\n")?;
        fs::set_permissions(l1.join("app/run.sh"), fs::Permissions::from_mode(0o755))?;

        fs::create_dir_all(paths::layers_root(root))?;
        fs::write(paths::record_path(root, "L0"), "")?;
        fs::write(paths::record_path(root, "L1"), "L0\n")?;

        Ok(())
    }

    /// Lists every path under `dir` with its contents, for before/after comparison.
    pub(super) fn snapshot(dir: &Path) -> anyhow::Result<Vec<(String, Option<String>)>> {
        let mut entries = Vec::new();
        for entry in walkdir::WalkDir::new(dir).sort_by_file_name() {
            let entry = entry?;
            let relative = entry.path().strip_prefix(dir)?.display().to_string();
            let contents = if entry.file_type().is_file() {
                Some(fs::read_to_string(entry.path())?)
            } else {
                None
            };
            entries.push((relative, contents));
        }
        Ok(entries)
    }
}
