// ============================================================
// Layer 2 — PairUseCase
// ============================================================
// Builds the paired dataset and prepares it for training:
//
//   Step 1: Resolve data root and cache dir  (Layer 6 - infra)
//   Step 2: Assemble or load paired data     (Layer 4 - data)
//   Step 3: Seeded shuffle into batches      (Layer 4 - data)
//   Step 4: Wrap the shuffled pairs as a Burn
//           dataset and batch the first pairs
//           on the CPU                       (Layer 4 - data)
//
// Returns a summary; the CLI prints it.

use anyhow::Result;
use burn::backend::{ndarray::NdArrayDevice, NdArray};
use burn::data::dataloader::batcher::Batcher;
use burn::data::dataset::Dataset;

use crate::data::batcher::{random_data, PairedBatch, PairedBatcher, Shuffled};
use crate::data::dataset::PairedDataset;
use crate::data::loader::FolderImageSource;
use crate::data::pairing::{get_paired_data, PairedDataRequest};
use crate::domain::paired::{Labels, Level, PairedData};
use crate::domain::transform::ImageTransform;
use crate::infra::cache::CacheStore;
use crate::infra::config::DataConfig;

#[derive(Debug, Clone)]
pub struct PairConfig {
    pub chars:       [String; 2],
    pub test_num:    usize,
    pub level:       Level,
    pub labeled:     bool,
    pub batch_size:  usize,
    pub seed:        u64,
    pub num_workers: usize,
    pub rebuild:     bool,
    pub transform:   ImageTransform,
    pub data:        DataConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairSummary {
    pub entries:      usize,
    pub batches:      usize,
    pub labeled:      bool,
    /// Dimensions of the first Burn batch, when there is one.
    pub sample_shape: Option<[usize; 4]>,
    /// Labels of the first Burn batch, in shuffled order.
    pub first_labels: Vec<Option<String>>,
}

pub struct PairUseCase {
    config: PairConfig,
}

impl PairUseCase {
    pub fn new(config: PairConfig) -> Self {
        Self { config }
    }

    fn request(&self) -> PairedDataRequest {
        let cfg = &self.config;
        PairedDataRequest {
            chars:     cfg.chars.clone(),
            test_num:  cfg.test_num,
            level:     cfg.level,
            labeled:   cfg.labeled,
            transform: cfg.transform.clone(),
            debug:     cfg.rebuild,
            data_dir:  cfg.data.cur_data_dir.clone(),
            ..PairedDataRequest::default()
        }
    }

    pub fn execute(&self) -> Result<PairSummary> {
        let cfg = &self.config;
        tracing::info!(
            "Pairing '{}' with '{}' under '{}'",
            cfg.chars[0],
            cfg.chars[1],
            cfg.data.cur_data_dir.display()
        );

        let source = FolderImageSource::new(cfg.num_workers)?;
        let cache  = CacheStore::new(cfg.data.cache_dir.clone());
        let data   = get_paired_data(&source, &cache, &self.request())?;

        let (shuffled, batches) = shuffle(&data, cfg.batch_size, cfg.seed)?;
        tracing::info!("{} entries reshuffled into {} batches", shuffled.len(), batches);

        let dataset = PairedDataset::from_paired(&shuffled);
        let preview = preview_batch(&dataset, cfg.batch_size);

        Ok(PairSummary {
            entries:      shuffled.len(),
            batches,
            labeled:      shuffled.labels.is_some(),
            sample_shape: preview.as_ref().map(|b| b.first.dims()),
            first_labels: preview.map(|b| b.labels).unwrap_or_default(),
        })
    }
}

/// Reshuffle with the matching label layout. Returns the data in
/// shuffled batch order together with the batch count.
fn shuffle(data: &PairedData, batch_size: usize, seed: u64) -> Result<(PairedData, usize)> {
    let (first, second, labels) = match &data.labels {
        None => {
            let out: Shuffled<String> =
                random_data(&data.first, &data.second, None, batch_size, data.level, seed)?;
            (out.first, out.second, None)
        }
        Some(Labels::PerImage(l)) => {
            let out = random_data(&data.first, &data.second, Some(l.as_slice()), batch_size, data.level, seed)?;
            let labels = out.labels.map(|b| Labels::PerImage(b.into_iter().flatten().collect()));
            (out.first, out.second, labels)
        }
        Some(Labels::PerBatch(l)) => {
            let out = random_data(&data.first, &data.second, Some(l.as_slice()), batch_size, data.level, seed)?;
            let labels = out.labels.map(|b| Labels::PerBatch(b.into_iter().flatten().collect()));
            (out.first, out.second, labels)
        }
    };

    let batches = first.len();
    let shuffled = PairedData {
        level:  data.level,
        first:  first.into_entries(),
        second: second.into_entries(),
        labels,
    };
    Ok((shuffled, batches))
}

fn preview_batch(dataset: &PairedDataset, batch_size: usize) -> Option<PairedBatch<NdArray>> {
    let items: Vec<_> = (0..batch_size.min(dataset.len()))
        .filter_map(|i| dataset.get(i))
        .collect();
    if items.is_empty() {
        return None;
    }

    let device = NdArrayDevice::Cpu;
    let batch: PairedBatch<NdArray> = PairedBatcher.batch(items, &device);
    tracing::debug!("First training batch: {:?}", batch.first.dims());
    Some(batch)
}
