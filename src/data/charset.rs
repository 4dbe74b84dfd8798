// ============================================================
// Layer 4 — Character-Set Resolver
// ============================================================
// A dataset side is laid out ImageFolder-style:
//
//   <data_dir>/<char_type>/<character_class>/<image files>
//
// The character set of a side is the set of its class
// subdirectory names. A BTreeSet keeps them sorted, so the
// derived character list (and therefore which classes
// `test_num` holds out) is the same on every machine.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{DataError, DataResult};

/// `<data_dir>/<char_type>`
pub fn dataset_path(data_dir: &Path, char_type: &str) -> PathBuf {
    data_dir.join(char_type)
}

/// Names of the non-hidden subdirectories of `dataset_dir`.
pub fn character_set(dataset_dir: &Path) -> DataResult<BTreeSet<String>> {
    let entries = fs::read_dir(dataset_dir).map_err(|e| DataError::io(dataset_dir, e))?;

    let mut set = BTreeSet::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::io(dataset_dir, e))?;
        let path  = entry.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if !name.starts_with('.') {
                set.insert(name.to_string());
            }
        }
    }

    tracing::debug!("{} character classes in '{}'", set.len(), dataset_dir.display());
    Ok(set)
}

/// Classes present on one side only, as (only_first, only_second).
pub fn set_difference(
    first:  &BTreeSet<String>,
    second: &BTreeSet<String>,
) -> (Vec<String>, Vec<String>) {
    (
        first.difference(second).cloned().collect(),
        second.difference(first).cloned().collect(),
    )
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_only_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("b")).unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();
        fs::create_dir(tmp.path().join(".hidden")).unwrap();
        fs::write(tmp.path().join("notes.txt"), "x").unwrap();

        let set = character_set(tmp.path()).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_directory_gives_empty_set() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(character_set(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = character_set(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_set_difference() {
        let a: BTreeSet<String> = ["x", "y"].iter().map(|s| s.to_string()).collect();
        let b: BTreeSet<String> = ["y", "z"].iter().map(|s| s.to_string()).collect();
        assert_eq!(set_difference(&a, &b), (vec!["x".to_string()], vec!["z".to_string()]));
    }
}
