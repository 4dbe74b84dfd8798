// ============================================================
// Layer 6 — Keyed Cache Store
// ============================================================
// Persists assembled datasets between runs.
//
// Every artifact lives under one cache directory, named by a
// namespace and a key derived from the parameters that produced
// it:
//
//   <cache_dir>/
//     char_list-<hex16>.bin       ← Vec<String> of classes
//     dataset_batch-<hex16>.bin   ← PairedData
//
// The key is the SHA-256 of the JSON encoding of the parameter
// tuple, so two runs with different character types, level,
// test_num, labeling, or transform never read each other's data.
//
// Artifacts are bincode. Writes go to a temporary sibling file
// which is then renamed over the target, so a reader never sees
// a half-written blob. A blob that fails to decode is reported
// as CacheCorrupt.

use std::fs;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::{DataError, DataResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    namespace: String,
    digest:    String,
}

impl CacheKey {
    /// Hash `params` under `namespace`. Parameters that cannot be
    /// encoded (e.g. a non-UTF-8 `PathBuf`) are an error, never a
    /// shared empty key.
    pub fn compute<T: Serialize>(namespace: &str, params: &T) -> DataResult<Self> {
        let bytes = serde_json::to_vec(params).map_err(|source| DataError::CacheKey {
            namespace: namespace.to_string(),
            source,
        })?;
        let digest = format!("{:x}", Sha256::digest(bytes));
        Ok(Self { namespace: namespace.to_string(), digest })
    }

    pub fn file_name(&self) -> String {
        format!("{}-{}.bin", self.namespace, &self.digest[..16])
    }
}

pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.path(key).is_file()
    }

    /// Load the artifact for `key`, or `None` when it was never written.
    pub fn load<T: DeserializeOwned>(&self, key: &CacheKey) -> DataResult<Option<T>> {
        let path = self.path(key);
        if !path.is_file() {
            return Ok(None);
        }

        let bytes = fs::read(&path).map_err(|e| DataError::io(&path, e))?;
        let value = bincode::deserialize(&bytes)
            .map_err(|source| DataError::CacheCorrupt { path: path.clone(), source })?;

        tracing::info!("Loaded cached '{}'", path.display());
        Ok(Some(value))
    }

    pub fn store<T: Serialize>(&self, key: &CacheKey, value: &T) -> DataResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| DataError::io(&self.dir, e))?;

        let path  = self.path(key);
        let bytes = bincode::serialize(value)
            .map_err(|source| DataError::Serialize { path: path.clone(), source })?;

        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, &bytes).map_err(|e| DataError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| DataError::io(&path, e))?;

        tracing::debug!("Cached {} bytes to '{}'", bytes.len(), path.display());
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_depends_on_params() {
        let a = CacheKey::compute("dataset_batch", &("jia", "jin", 100)).unwrap();
        let b = CacheKey::compute("dataset_batch", &("jia", "jin", 100)).unwrap();
        let c = CacheKey::compute("dataset_batch", &("jia", "jin", 0)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a.file_name(), c.file_name());
        assert!(a.file_name().starts_with("dataset_batch-"));
    }

    #[test]
    fn test_missing_entry_loads_none() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = CacheStore::new(tmp.path());
        let key   = CacheKey::compute("char_list", &"x").unwrap();
        assert!(store.load::<Vec<String>>(&key).unwrap().is_none());
    }

    #[test]
    fn test_store_then_load() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = CacheStore::new(tmp.path().join("nested"));
        let key   = CacheKey::compute("char_list", &"x").unwrap();
        let value = vec!["a".to_string(), "b".to_string()];

        store.store(&key, &value).unwrap();
        assert!(store.contains(&key));
        assert_eq!(store.load::<Vec<String>>(&key).unwrap(), Some(value));
    }

    #[test]
    fn test_garbage_is_reported_corrupt() {
        let tmp   = tempfile::tempdir().unwrap();
        let store = CacheStore::new(tmp.path());
        let key   = CacheKey::compute("dataset_batch", &1).unwrap();
        fs::write(store.path(&key), [0xff, 0xff, 0xff]).unwrap();

        let err = store.load::<Vec<String>>(&key).unwrap_err();
        assert!(matches!(err, DataError::CacheCorrupt { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_unencodable_params_are_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = PathBuf::from(OsStr::from_bytes(b"/data/\xffone"));
        let err = CacheKey::compute("dataset_batch", &dir).unwrap_err();
        assert!(matches!(err, DataError::CacheKey { .. }));
    }
}
