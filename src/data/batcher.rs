// ============================================================
// Layer 4 — Random Batcher and Burn Batcher
// ============================================================
// random_data
//   Shuffles two paired sequences (and their labels) with ONE
//   seeded permutation, then re-slices them into batches:
//
//     indices  = 0..N, shuffled by StdRng(seed)
//     batch i  = indices[i*bs .. (i+1)*bs]       (last may be short)
//     count    = ceil(N / bs)
//
//   At the All level each batch is stacked into a single
//   [B, C, H, W] tensor. At the Char level entries are already
//   batches, so they are only grouped.
//
// PairedBatcher
//   Implements Burn's Batcher trait so a Burn DataLoader can
//   turn PairedItems into device tensors for training.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::data::dataset::PairedItem;
use crate::domain::error::{DataError, DataResult};
use crate::domain::paired::Level;
use crate::domain::tensor::ImageTensor;

pub const DEFAULT_BATCH_SIZE: usize = 16;
pub const DEFAULT_SEED:       u64   = 42;

#[derive(Debug, Clone, PartialEq)]
pub enum Batches {
    /// One stacked tensor per batch.
    Stacked(Vec<ImageTensor>),
    /// One list of entries per batch.
    Grouped(Vec<Vec<ImageTensor>>),
}

impl Batches {
    pub fn len(&self) -> usize {
        match self {
            Batches::Stacked(b) => b.len(),
            Batches::Grouped(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries in batch order: stacked batches are split back into
    /// images, grouped batches are concatenated.
    pub fn into_entries(self) -> Vec<ImageTensor> {
        match self {
            Batches::Stacked(b) => b.iter().flat_map(ImageTensor::unstack).collect(),
            Batches::Grouped(b) => b.into_iter().flatten().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shuffled<L> {
    pub first:  Batches,
    pub second: Batches,
    pub labels: Option<Vec<Vec<L>>>,
}

pub fn random_data<L: Clone>(
    first:      &[ImageTensor],
    second:     &[ImageTensor],
    labels:     Option<&[L]>,
    batch_size: usize,
    level:      Level,
    seed:       u64,
) -> DataResult<Shuffled<L>> {
    if batch_size == 0 {
        return Err(DataError::InvalidBatchSize);
    }
    if first.len() != second.len() {
        return Err(DataError::LengthMismatch {
            what:   "paired dataset",
            first:  first.len(),
            second: second.len(),
        });
    }
    if let Some(l) = labels {
        if l.len() != first.len() {
            return Err(DataError::LengthMismatch {
                what:   "labels",
                first:  first.len(),
                second: l.len(),
            });
        }
    }

    let mut indices: Vec<usize> = (0..first.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let first  = rebatch(first, &indices, batch_size, level)?;
    let second = rebatch(second, &indices, batch_size, level)?;
    let labels = labels.map(|l| {
        indices
            .chunks(batch_size)
            .map(|chunk| chunk.iter().map(|&i| l[i].clone()).collect())
            .collect()
    });

    tracing::debug!(
        "Shuffled {} entries into {} batches (seed {})",
        indices.len(),
        first.len(),
        seed
    );
    Ok(Shuffled { first, second, labels })
}

fn rebatch(
    items:      &[ImageTensor],
    indices:    &[usize],
    batch_size: usize,
    level:      Level,
) -> DataResult<Batches> {
    let groups: Vec<Vec<ImageTensor>> = indices
        .chunks(batch_size)
        .map(|chunk| chunk.iter().map(|&i| items[i].clone()).collect())
        .collect();

    match level {
        Level::All => groups
            .iter()
            .map(|g| ImageTensor::stack(g))
            .collect::<DataResult<Vec<_>>>()
            .map(Batches::Stacked),
        Level::Char => Ok(Batches::Grouped(groups)),
    }
}

// ─── PairedBatch ──────────────────────────────────────────────────────────────
/// Both sides of a batch as [batch, channels, height, width].
#[derive(Debug, Clone)]
pub struct PairedBatch<B: Backend> {
    pub first:  Tensor<B, 4>,
    pub second: Tensor<B, 4>,
    pub labels: Vec<Option<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct PairedBatcher;

impl<B: Backend> Batcher<B, PairedItem, PairedBatch<B>> for PairedBatcher {
    fn batch(&self, items: Vec<PairedItem>, device: &B::Device) -> PairedBatch<B> {
        let first: Vec<Tensor<B, 3>> = items
            .iter()
            .map(|item| image_tensor(&item.first, device))
            .collect();
        let second: Vec<Tensor<B, 3>> = items
            .iter()
            .map(|item| image_tensor(&item.second, device))
            .collect();

        PairedBatch {
            first:  Tensor::stack(first, 0),
            second: Tensor::stack(second, 0),
            labels: items.into_iter().map(|item| item.label).collect(),
        }
    }
}

/// PairedDataset only yields [C, H, W] images, so the rank is fixed.
fn image_tensor<B: Backend>(image: &ImageTensor, device: &B::Device) -> Tensor<B, 3> {
    let data = TensorData::new(image.data().to_vec(), image.shape().to_vec());
    Tensor::<B, 3>::from_data(data, device)
}
