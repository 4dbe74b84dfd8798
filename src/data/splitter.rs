// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Turns a flat directory of character images into two manifests.
//
// File names carry their class:
//
//   "X123_foo.png"
//    │└┬┘
//    │ └── label 123  (digits after the first character
//    │                 of the first "_"-separated segment)
//    └──── one-letter prefix, ignored
//
// The split itself shuffles row indices with a seeded StdRng:
//   - the first round(fraction * N) shuffled rows → train,
//     kept in shuffled order
//   - every other row → test, kept in listing order
//
// The same seed over the same directory always gives the same
// two manifests.

use std::fs;
use std::path::Path;

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::error::{DataError, DataResult};

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;
pub const DEFAULT_SPLIT_SEED:     u64 = 233;

/// One manifest row: image file name and its integer class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub image:  String,
    pub target: i64,
}

/// Parse the numeric label encoded in an image file name.
pub fn parse_label(name: &str) -> DataResult<i64> {
    let invalid = || DataError::InvalidFilenameFormat { name: name.to_string() };

    let segment = name.split('_').next().unwrap_or_default();
    let mut chars = segment.chars();
    chars.next().ok_or_else(invalid)?;

    chars.as_str().trim().parse::<i64>().map_err(|_| invalid())
}

/// Sorted names of the regular, non-hidden files in `dir`.
///
/// A name that is not valid UTF-8 cannot carry a label and fails
/// the listing.
pub fn list_images(dir: &Path) -> DataResult<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| DataError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| DataError::io(dir, e))?;
        if !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().into_string().map_err(|raw| {
            DataError::InvalidFilenameFormat { name: raw.to_string_lossy().into_owned() }
        })?;
        if name.starts_with('.') {
            tracing::warn!("Skipping hidden file '{}'", name);
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}

/// Label every listed image; the first bad name aborts the whole build.
pub fn build_manifest(names: &[String]) -> DataResult<Vec<ManifestRow>> {
    names
        .iter()
        .map(|name| {
            Ok(ManifestRow {
                image:  name.clone(),
                target: parse_label(name)?,
            })
        })
        .collect()
}

/// Seeded split into (train, test).
///
/// Train holds `round(total * train_fraction)` samples in shuffled
/// order; test holds the rest in their original order.
pub fn split_train_test<T>(samples: Vec<T>, train_fraction: f64, seed: u64) -> (Vec<T>, Vec<T>) {
    let total    = samples.len();
    let split_at = ((total as f64) * train_fraction.clamp(0.0, 1.0)).round() as usize;
    let split_at = split_at.min(total);

    let mut indices: Vec<usize> = (0..total).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut test_idx = indices.split_off(split_at);
    test_idx.sort_unstable();

    let mut slots: Vec<Option<T>> = samples.into_iter().map(Some).collect();
    let mut take  = |idx: &[usize]| -> Vec<T> {
        idx.iter().filter_map(|&i| slots[i].take()).collect()
    };
    let train = take(&indices[..]);
    let test  = take(&test_idx[..]);

    tracing::debug!(
        "Dataset split: {} train, {} test ({}% / {}%)",
        train.len(),
        test.len(),
        (train.len() * 100) / total.max(1),
        (test.len() * 100) / total.max(1),
    );

    (train, test)
}
