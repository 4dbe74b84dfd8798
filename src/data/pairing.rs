// ============================================================
// Layer 4 — Paired-Dataset Assembler
// ============================================================
// Builds index-aligned sequences from two dataset sides (e.g.
// "jia" and "jin") so that entry i of both sides shows the same
// character class.
//
// Steps:
//   1. Resolve the character list. Cached per pair of side
//      directories; computed otherwise, in which case both
//      character sets must be equal or nothing is written.
//   2. Return the cached PairedData for this parameter set
//      unless `debug` asks for a rebuild.
//   3. For each class after the first `test_num`, load both
//      sides and pair their batches:
//        All  → flatten into single images, one label each
//        Char → keep whole batches (size 1 doubled), one
//               label list per batch
//   4. Cache the result and return it.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::data::charset::{dataset_path, set_difference};
use crate::domain::error::{DataError, DataResult};
use crate::domain::paired::{Labels, Level, PairedData};
use crate::domain::tensor::ImageTensor;
use crate::domain::traits::ImageSource;
use crate::domain::transform::ImageTransform;
use crate::data::loader::CHAR_BATCH_SIZE;
use crate::infra::cache::{CacheKey, CacheStore};

pub const CHAR_LIST_NAMESPACE: &str = "char_list";
pub const DATASET_NAMESPACE:   &str = "dataset_batch";

#[derive(Debug, Clone)]
pub struct PairedDataRequest {
    /// The two character types, e.g. ["jia", "jin"].
    pub chars:      [String; 2],
    /// Classes held out for testing (skipped from the front of the list).
    pub test_num:   usize,
    pub level:      Level,
    pub labeled:    bool,
    pub transform:  ImageTransform,
    /// Rebuild even when a cached dataset exists.
    pub debug:      bool,
    /// Root holding one directory per character type.
    pub data_dir:   PathBuf,
    pub batch_size: usize,
}

impl Default for PairedDataRequest {
    fn default() -> Self {
        Self {
            chars:      ["jia".to_string(), "jin".to_string()],
            test_num:   100,
            level:      Level::All,
            labeled:    false,
            transform:  ImageTransform::default(),
            debug:      true,
            data_dir:   PathBuf::from("data"),
            batch_size: CHAR_BATCH_SIZE,
        }
    }
}

impl PairedDataRequest {
    pub fn dataset_dirs(&self) -> (PathBuf, PathBuf) {
        (
            dataset_path(&self.data_dir, &self.chars[0]),
            dataset_path(&self.data_dir, &self.chars[1]),
        )
    }

    pub fn char_list_key(&self) -> DataResult<CacheKey> {
        let (first, second) = self.dataset_dirs();
        CacheKey::compute(CHAR_LIST_NAMESPACE, &(path_bytes(&first), path_bytes(&second)))
    }

    pub fn dataset_key(&self) -> DataResult<CacheKey> {
        #[derive(Serialize)]
        struct KeyTuple<'a> {
            chars:      &'a [String; 2],
            data_dir:   &'a [u8],
            test_num:   usize,
            level:      Level,
            labeled:    bool,
            transform:  &'a ImageTransform,
            batch_size: usize,
        }
        CacheKey::compute(
            DATASET_NAMESPACE,
            &KeyTuple {
                chars:      &self.chars,
                data_dir:   path_bytes(&self.data_dir),
                test_num:   self.test_num,
                level:      self.level,
                labeled:    self.labeled,
                transform:  &self.transform,
                batch_size: self.batch_size,
            },
        )
    }
}

/// Raw path bytes, so roots that are not valid UTF-8 still key apart.
fn path_bytes(path: &Path) -> &[u8] {
    path.as_os_str().as_encoded_bytes()
}

/// Sorted list of classes shared by both sides, cached per side pair.
pub fn character_list<S: ImageSource + ?Sized>(
    source: &S,
    cache:  &CacheStore,
    req:    &PairedDataRequest,
) -> DataResult<Vec<String>> {
    let key = req.char_list_key()?;
    if let Some(list) = cache.load::<Vec<String>>(&key)? {
        return Ok(list);
    }

    let (first_dir, second_dir) = req.dataset_dirs();
    let first  = source.character_set(&first_dir)?;
    let second = source.character_set(&second_dir)?;

    if first != second {
        let (only_first, only_second) = set_difference(&first, &second);
        return Err(DataError::CharacterSetMismatch {
            first: first_dir,
            second: second_dir,
            only_first,
            only_second,
        });
    }

    let list: Vec<String> = first.into_iter().collect();
    if list.is_empty() {
        tracing::warn!("No character classes under '{}'", first_dir.display());
    }
    cache.store(&key, &list)?;
    Ok(list)
}

pub fn get_paired_data<S: ImageSource + ?Sized>(
    source: &S,
    cache:  &CacheStore,
    req:    &PairedDataRequest,
) -> DataResult<PairedData> {
    let characters = character_list(source, cache, req)?;

    let key = req.dataset_key()?;
    if !req.debug {
        if let Some(data) = cache.load::<PairedData>(&key)? {
            return Ok(data);
        }
    }

    let (first_dir, second_dir) = req.dataset_dirs();
    let mut data = PairedData::new(req.level, req.labeled);

    let selected = characters.get(req.test_num..).unwrap_or(&[]);
    tracing::info!(
        "Pairing {} of {} classes ({} held out) at '{}' level",
        selected.len(),
        characters.len(),
        req.test_num.min(characters.len()),
        req.level.as_str()
    );

    for class in selected {
        let first  = source.load_batches(&first_dir.join(class), req.batch_size, &req.transform)?;
        let second = source.load_batches(&second_dir.join(class), req.batch_size, &req.transform)?;
        if first.len() != second.len() {
            tracing::warn!(
                "Class '{}' has {} vs {} batches; pairing the first {}",
                class,
                first.len(),
                second.len(),
                first.len().min(second.len())
            );
        }

        for (b1, b2) in first.into_iter().zip(second) {
            match req.level {
                Level::All  => push_images(&mut data, class, &b1, &b2),
                Level::Char => push_batch(&mut data, class, b1, b2),
            }
        }
    }

    cache.store(&key, &data)?;
    tracing::info!("Built {} paired entries", data.len());
    Ok(data)
}

/// Flatten a pair of batches into individual images. Uneven batches
/// are cut to the shorter one so both sides stay the same length.
fn push_images(data: &mut PairedData, class: &str, b1: &ImageTensor, b2: &ImageTensor) {
    let first  = b1.unstack();
    let second = b2.unstack();
    let n      = first.len().min(second.len());
    if first.len() != second.len() {
        tracing::warn!(
            "Class '{}' batch holds {} vs {} images; keeping {}",
            class,
            first.len(),
            second.len(),
            n
        );
    }

    data.first.extend(first.into_iter().take(n));
    data.second.extend(second.into_iter().take(n));
    if let Some(Labels::PerImage(labels)) = data.labels.as_mut() {
        labels.extend(std::iter::repeat(class.to_string()).take(n));
    }
}

fn push_batch(data: &mut PairedData, class: &str, b1: ImageTensor, b2: ImageTensor) {
    let b1 = b1.pad_singleton();
    let b2 = b2.pad_singleton();
    let n  = b1.batch_len();

    data.first.push(b1);
    data.second.push(b2);
    if let Some(Labels::PerBatch(labels)) = data.labels.as_mut() {
        labels.push(vec![class.to_string(); n]);
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::write_class;
    use crate::data::loader::FolderImageSource;
    use std::cell::Cell;
    use std::collections::BTreeSet;

    /// Wraps the folder source and counts load_batches calls.
    struct CountingSource {
        inner: FolderImageSource,
        loads: Cell<usize>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self { inner: FolderImageSource::default(), loads: Cell::new(0) }
        }
    }

    impl ImageSource for CountingSource {
        fn character_set(&self, dir: &Path) -> DataResult<BTreeSet<String>> {
            self.inner.character_set(dir)
        }

        fn load_batches(
            &self,
            dir:        &Path,
            batch_size: usize,
            transform:  &ImageTransform,
        ) -> DataResult<Vec<ImageTensor>> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load_batches(dir, batch_size, transform)
        }
    }

    fn request(data_dir: &Path, level: Level, labeled: bool) -> PairedDataRequest {
        PairedDataRequest {
            test_num: 0,
            level,
            labeled,
            data_dir: data_dir.to_path_buf(),
            ..PairedDataRequest::default()
        }
    }

    fn two_sides(root: &Path, counts: &[(&str, usize)]) {
        for (class, n) in counts {
            write_class(root, "jia", class, *n);
            write_class(root, "jin", class, *n);
        }
    }

    #[test]
    fn test_all_level_flattens_and_labels_every_image() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 3), ("b", 3)]);

        let data = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &request(data_dir.path(), Level::All, true),
        )
        .unwrap();

        assert_eq!(data.first.len(), 6);
        assert_eq!(data.second.len(), 6);
        let Some(Labels::PerImage(labels)) = data.labels else {
            panic!("expected per-image labels");
        };
        assert_eq!(labels, vec!["a", "a", "a", "b", "b", "b"]);
        assert_eq!(data.first[0].shape(), &[1, 4, 4]);
    }

    #[test]
    fn test_char_level_pads_singleton_class() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 1), ("b", 3)]);

        let data = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &request(data_dir.path(), Level::Char, true),
        )
        .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.first[0].batch_len(), 2);
        assert_eq!(data.second[0].batch_len(), 2);
        assert_eq!(data.first[1].batch_len(), 3);
        assert_eq!(
            data.labels,
            Some(Labels::PerBatch(vec![
                vec!["a".to_string(); 2],
                vec!["b".to_string(); 3],
            ]))
        );
    }

    #[test]
    fn test_test_num_holds_out_leading_classes() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 2), ("b", 2), ("c", 2)]);

        let mut req = request(data_dir.path(), Level::All, true);
        req.test_num = 2;
        let data = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &req,
        )
        .unwrap();

        assert_eq!(data.labels, Some(Labels::PerImage(vec!["c".to_string(); 2])));
    }

    #[test]
    fn test_test_num_beyond_classes_gives_empty_output() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 2)]);

        let mut req = request(data_dir.path(), Level::All, false);
        req.test_num = 100;
        let data = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &req,
        )
        .unwrap();

        assert!(data.is_empty());
        assert!(data.labels.is_none());
    }

    #[test]
    fn test_mismatched_sides_fail_without_cache() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        write_class(data_dir.path(), "jia", "a", 1);
        write_class(data_dir.path(), "jia", "b", 1);
        write_class(data_dir.path(), "jin", "a", 1);
        write_class(data_dir.path(), "jin", "c", 1);

        let err = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &request(data_dir.path(), Level::All, false),
        )
        .unwrap_err();

        match err {
            DataError::CharacterSetMismatch { only_first, only_second, .. } => {
                assert_eq!(only_first, vec!["b"]);
                assert_eq!(only_second, vec!["c"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(std::fs::read_dir(cache_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_second_call_is_served_from_cache() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 2), ("b", 1)]);

        let source = CountingSource::new();
        let cache  = CacheStore::new(cache_dir.path());
        let mut req = request(data_dir.path(), Level::All, true);
        req.debug = false;

        let built = get_paired_data(&source, &cache, &req).unwrap();
        let loads = source.loads.get();
        assert_eq!(loads, 4);

        let cached = get_paired_data(&source, &cache, &req).unwrap();
        assert_eq!(source.loads.get(), loads);
        assert_eq!(cached, built);
    }

    #[test]
    fn test_debug_always_rebuilds() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 2)]);

        let source = CountingSource::new();
        let cache  = CacheStore::new(cache_dir.path());
        let req    = request(data_dir.path(), Level::All, false);

        get_paired_data(&source, &cache, &req).unwrap();
        get_paired_data(&source, &cache, &req).unwrap();
        assert_eq!(source.loads.get(), 4);
    }

    #[test]
    fn test_different_levels_do_not_share_cache() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 3)]);

        let source = FolderImageSource::default();
        let cache  = CacheStore::new(cache_dir.path());

        let mut all = request(data_dir.path(), Level::All, false);
        all.debug = false;
        let mut chr = all.clone();
        chr.level = Level::Char;

        assert_eq!(get_paired_data(&source, &cache, &all).unwrap().len(), 3);
        assert_eq!(get_paired_data(&source, &cache, &chr).unwrap().len(), 1);
    }

    #[test]
    fn test_uneven_class_sizes_keep_sides_equal() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        write_class(data_dir.path(), "jia", "a", 4);
        write_class(data_dir.path(), "jin", "a", 2);

        let data = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &request(data_dir.path(), Level::All, true),
        )
        .unwrap();

        assert_eq!(data.first.len(), 2);
        assert_eq!(data.second.len(), 2);
        assert_eq!(data.labels.map(|l| l.len()), Some(2));
    }

    #[test]
    fn test_stray_non_image_files_are_ignored() {
        let data_dir  = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        two_sides(data_dir.path(), &[("a", 2)]);
        std::fs::write(data_dir.path().join("jia/a/Thumbs.db"), b"\0\0").unwrap();
        std::fs::write(data_dir.path().join("jin/a/labels.txt"), b"a").unwrap();

        let data = get_paired_data(
            &FolderImageSource::default(),
            &CacheStore::new(cache_dir.path()),
            &request(data_dir.path(), Level::All, false),
        )
        .unwrap();

        assert_eq!(data.first.len(), 2);
        assert_eq!(data.second.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_roots_get_distinct_keys() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let one = request(Path::new(OsStr::from_bytes(b"/data/\xffone")), Level::All, false);
        let two = request(Path::new(OsStr::from_bytes(b"/data/\xfetwo")), Level::All, false);

        assert_ne!(
            one.dataset_key().unwrap().file_name(),
            two.dataset_key().unwrap().file_name()
        );
        assert_ne!(
            one.char_list_key().unwrap().file_name(),
            two.char_list_key().unwrap().file_name()
        );
    }
}
