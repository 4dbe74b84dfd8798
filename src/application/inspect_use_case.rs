// ============================================================
// Layer 2 — InspectUseCase
// ============================================================
// Runs the per-character loader over one dataset side and
// reports how many batches and images each class produced.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::data::loader::{load_by_type, FolderImageSource};
use crate::domain::transform::ImageTransform;
use crate::infra::config::DataConfig;

#[derive(Debug, Clone)]
pub struct InspectConfig {
    pub char_type:   String,
    /// Restrict to these classes; all classes when `None`.
    pub classes:     Option<Vec<String>>,
    pub num_workers: usize,
    pub transform:   ImageTransform,
    pub data:        DataConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub batches: usize,
    /// Images after singleton padding.
    pub images:  usize,
}

pub struct InspectUseCase {
    config: InspectConfig,
}

impl InspectUseCase {
    pub fn new(config: InspectConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<BTreeMap<String, ClassStats>> {
        let cfg    = &self.config;
        let source = FolderImageSource::new(cfg.num_workers)?;
        let loaded = load_by_type(
            &source,
            &cfg.data.cur_data_dir,
            &cfg.char_type,
            cfg.classes.as_deref(),
            &cfg.transform,
        )?;

        let mut stats: BTreeMap<String, ClassStats> = BTreeMap::new();
        for (batch, label) in loaded.batches.iter().zip(loaded.labels) {
            let entry = stats.entry(label).or_default();
            entry.batches += 1;
            entry.images  += batch.batch_len();
        }
        Ok(stats)
    }
}
