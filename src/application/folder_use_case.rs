// ============================================================
// Layer 2 — FolderUseCase
// ============================================================
// Loads one image folder as train / val / test batches:
//
//   Step 1: Resolve the folder, either given directly or as
//           <cur_data_dir>/<char_type>           (Layer 6 - infra)
//   Step 2: Seeded split and batch decode        (Layer 4 - data)
//
// Returns per-part counts; the CLI prints them.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::data::charset::dataset_path;
use crate::data::loader::{FolderImageSource, FolderSplit};
use crate::domain::tensor::ImageTensor;
use crate::domain::transform::ImageTransform;
use crate::infra::config::DataConfig;

#[derive(Debug, Clone)]
pub struct FolderConfig {
    /// Folder to load; `<cur_data_dir>/<char_type>` when `None`.
    pub dir:              Option<PathBuf>,
    pub char_type:        String,
    pub train_test_split: f64,
    pub train_val_split:  f64,
    pub batch_size:       usize,
    pub seed:             u64,
    pub num_workers:      usize,
    pub transform:        ImageTransform,
    pub data:             DataConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartStats {
    pub batches: usize,
    pub images:  usize,
}

impl PartStats {
    fn of(batches: &[ImageTensor]) -> Self {
        Self {
            batches: batches.len(),
            images:  batches.iter().map(ImageTensor::batch_len).sum(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSummary {
    pub dir:   PathBuf,
    pub train: PartStats,
    pub val:   Option<PartStats>,
    pub test:  Option<PartStats>,
}

pub struct FolderUseCase {
    config: FolderConfig,
}

impl FolderUseCase {
    pub fn new(config: FolderConfig) -> Self {
        Self { config }
    }

    fn folder(&self) -> PathBuf {
        let cfg = &self.config;
        match &cfg.dir {
            Some(dir) => dir.clone(),
            None      => dataset_path(&cfg.data.cur_data_dir, &cfg.char_type),
        }
    }

    pub fn execute(&self) -> Result<FolderSummary> {
        let cfg    = &self.config;
        let dir    = self.folder();
        let source = FolderImageSource::new(cfg.num_workers)?;

        let split: FolderSplit = source
            .load_split(
                &dir,
                cfg.train_test_split,
                cfg.train_val_split,
                cfg.batch_size,
                &cfg.transform,
                cfg.seed,
            )
            .with_context(|| format!("Cannot load image folder '{}'", dir.display()))?;

        Ok(FolderSummary {
            train: PartStats::of(split.train()),
            val:   split.val().map(PartStats::of),
            test:  split.test().map(PartStats::of),
            dir,
        })
    }
}
