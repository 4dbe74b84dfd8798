// ============================================================
// Layer 4 — Image Folder Loader
// ============================================================
// Three pieces live here:
//
//   FolderImageSource  — the ImageSource used in production.
//                        Walks a class directory, decodes every
//                        image file with the `image` crate,
//                        applies the transform, and stacks the
//                        results into batches.
//
//   load_split         — the same folder walk, divided into
//                        train / val / test batches by two
//                        ratios and a seed.
//
//   load_by_type       — the per-character loader. For every
//                        class of one dataset side it returns
//                        the class batches (size-1 batches are
//                        doubled) with one label per batch.
//
// Files are visited in sorted path order so batches are
// reproducible. Only files with a known image extension are
// read. With num_workers > 0 decoding runs on one rayon pool of
// that size, built with the source; results keep listing order.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use rayon::prelude::*;

use crate::data::charset::{self, dataset_path};
use crate::data::splitter::split_train_test;
use crate::data::transform::to_tensor;
use crate::domain::error::{DataError, DataResult};
use crate::domain::paired::CharacterData;
use crate::domain::tensor::ImageTensor;
use crate::domain::traits::ImageSource;
use crate::domain::transform::ImageTransform;

/// Images per batch used by the per-character loader.
pub const CHAR_BATCH_SIZE: usize = 512;

/// Seed for `load_split` when the caller has none.
pub const DEFAULT_FOLDER_SEED: u64 = 42;

#[derive(Default)]
pub struct FolderImageSource {
    /// Decode pool; `None` decodes on the calling thread.
    pool: Option<rayon::ThreadPool>,
}

impl FolderImageSource {
    pub fn new(num_workers: usize) -> DataResult<Self> {
        if num_workers == 0 {
            return Ok(Self::default());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_workers)
            .build()?;
        Ok(Self { pool: Some(pool) })
    }

    /// Decode threads in use; 0 when decoding inline.
    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(0, |p| p.current_num_threads())
    }

    fn decode_all(
        &self,
        files:     &[PathBuf],
        transform: &ImageTransform,
    ) -> DataResult<Vec<ImageTensor>> {
        match &self.pool {
            None => files.iter().map(|p| decode(p, transform)).collect(),
            Some(pool) => {
                pool.install(|| files.par_iter().map(|p| decode(p, transform)).collect())
            }
        }
    }

    fn batch_files(
        &self,
        files:      &[PathBuf],
        batch_size: usize,
        transform:  &ImageTransform,
    ) -> DataResult<Vec<ImageTensor>> {
        let mut batches = Vec::with_capacity(files.len().div_ceil(batch_size));
        for chunk in files.chunks(batch_size) {
            let images = self.decode_all(chunk, transform)?;
            batches.push(ImageTensor::stack(&images)?);
        }
        Ok(batches)
    }

    /// Divide the images under `dir` into train / val / test batches.
    ///
    /// `train_test_split` is the share kept for training (the rest is
    /// test); `train_val_split` is the share of that training part
    /// moved to validation. Which parts come back depends on the
    /// ratios, see [`FolderSplit`].
    pub fn load_split(
        &self,
        dir:              &Path,
        train_test_split: f64,
        train_val_split:  f64,
        batch_size:       usize,
        transform:        &ImageTransform,
        seed:             u64,
    ) -> DataResult<FolderSplit> {
        if batch_size == 0 {
            return Err(DataError::InvalidBatchSize);
        }
        check_ratio("train_test_split", train_test_split)?;
        check_ratio("train_val_split", train_val_split)?;

        let files         = image_files(dir)?;
        let (train, test) = split_train_test(files, train_test_split, seed);
        let (train, val)  = split_train_test(train, 1.0 - train_val_split, seed);
        let keep_test     = train_test_split < 1.0;
        let keep_val      = train_val_split > 0.0;

        tracing::info!(
            "Split '{}' into {} train, {} val, {} test images",
            dir.display(),
            train.len(),
            val.len(),
            test.len()
        );

        let train = self.batch_files(&train, batch_size, transform)?;
        Ok(match (keep_val, keep_test) {
            (false, false) => FolderSplit::Train(train),
            (false, true)  => FolderSplit::TrainTest {
                train,
                test: self.batch_files(&test, batch_size, transform)?,
            },
            (true, false)  => FolderSplit::TrainVal {
                train,
                val: self.batch_files(&val, batch_size, transform)?,
            },
            (true, true)   => FolderSplit::TrainValTest {
                train,
                val:  self.batch_files(&val, batch_size, transform)?,
                test: self.batch_files(&test, batch_size, transform)?,
            },
        })
    }
}

/// Batches of one folder after `load_split`. A part is present only
/// when its ratio asks for it.
#[derive(Debug, Clone, PartialEq)]
pub enum FolderSplit {
    Train(Vec<ImageTensor>),
    TrainTest { train: Vec<ImageTensor>, test: Vec<ImageTensor> },
    TrainVal { train: Vec<ImageTensor>, val: Vec<ImageTensor> },
    TrainValTest {
        train: Vec<ImageTensor>,
        val:   Vec<ImageTensor>,
        test:  Vec<ImageTensor>,
    },
}

impl FolderSplit {
    pub fn train(&self) -> &[ImageTensor] {
        match self {
            FolderSplit::Train(train)
            | FolderSplit::TrainTest { train, .. }
            | FolderSplit::TrainVal { train, .. }
            | FolderSplit::TrainValTest { train, .. } => train,
        }
    }

    pub fn val(&self) -> Option<&[ImageTensor]> {
        match self {
            FolderSplit::TrainVal { val, .. } | FolderSplit::TrainValTest { val, .. } => Some(val),
            _ => None,
        }
    }

    pub fn test(&self) -> Option<&[ImageTensor]> {
        match self {
            FolderSplit::TrainTest { test, .. } | FolderSplit::TrainValTest { test, .. } => {
                Some(test)
            }
            _ => None,
        }
    }
}

fn check_ratio(name: &'static str, value: f64) -> DataResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(DataError::InvalidSplitRatio { name, value })
    }
}

impl ImageSource for FolderImageSource {
    fn character_set(&self, dataset_dir: &Path) -> DataResult<std::collections::BTreeSet<String>> {
        charset::character_set(dataset_dir)
    }

    fn load_batches(
        &self,
        class_dir:  &Path,
        batch_size: usize,
        transform:  &ImageTransform,
    ) -> DataResult<Vec<ImageTensor>> {
        if batch_size == 0 {
            return Err(DataError::InvalidBatchSize);
        }

        let files   = image_files(class_dir)?;
        let batches = self.batch_files(&files, batch_size, transform)?;

        tracing::debug!(
            "Loaded {} images in {} batches from '{}'",
            files.len(),
            batches.len(),
            class_dir.display()
        );
        Ok(batches)
    }
}

/// Sorted image files under `dir`, at any depth.
fn image_files(dir: &Path) -> DataResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> DataResult<()> {
    let entries = fs::read_dir(dir).map_err(|e| DataError::io(dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| DataError::io(dir, e))?;
        let path  = entry.path();

        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with('.'))
            .unwrap_or(false);
        if hidden {
            continue;
        }

        if path.is_dir() {
            collect_files(&path, out)?;
        } else if path.is_file() {
            if ImageFormat::from_path(&path).is_ok() {
                out.push(path);
            } else {
                tracing::debug!("Skipping non-image file '{}'", path.display());
            }
        }
    }
    Ok(())
}

fn decode(path: &Path, transform: &ImageTransform) -> DataResult<ImageTensor> {
    let img = image::open(path).map_err(|source| DataError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    to_tensor(img, transform)
}

/// Load every included class of one dataset side.
///
/// `included` defaults to the full character set of
/// `<data_dir>/<char_type>`. Each returned batch carries the
/// class it came from as its label.
pub fn load_by_type<S: ImageSource + ?Sized>(
    source:    &S,
    data_dir:  &Path,
    char_type: &str,
    included:  Option<&[String]>,
    transform: &ImageTransform,
) -> DataResult<CharacterData> {
    let root = dataset_path(data_dir, char_type);

    let classes: Vec<String> = match included {
        Some(list) => list.to_vec(),
        None       => source.character_set(&root)?.into_iter().collect(),
    };

    let mut out = CharacterData::default();
    for class in &classes {
        let batches = source.load_batches(&root.join(class), CHAR_BATCH_SIZE, transform)?;
        for batch in batches {
            out.batches.push(batch.pad_singleton());
            out.labels.push(class.clone());
        }
    }

    tracing::info!(
        "Loaded {} batches across {} '{}' classes",
        out.batches.len(),
        classes.len(),
        char_type
    );
    Ok(out)
}
