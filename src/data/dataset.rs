use burn::data::dataset::Dataset;

use crate::domain::paired::{Labels, Level, PairedData};
use crate::domain::tensor::ImageTensor;

/// One aligned image pair, [C, H, W] on both sides.
#[derive(Debug, Clone)]
pub struct PairedItem {
    pub first:  ImageTensor,
    pub second: ImageTensor,
    pub label:  Option<String>,
}

/// Image pairs exposed through Burn's Dataset trait.
pub struct PairedDataset {
    items: Vec<PairedItem>,
}

impl PairedDataset {
    /// Per-image entries are taken as they are. Per-batch entries are
    /// split back into images, pairing index-wise within each batch.
    pub fn from_paired(data: &PairedData) -> Self {
        let pairs = data.first.iter().zip(&data.second).enumerate();

        let items = match data.level {
            Level::All => pairs
                .map(|(i, (first, second))| PairedItem {
                    first:  first.clone(),
                    second: second.clone(),
                    label:  match &data.labels {
                        Some(Labels::PerImage(l)) => l.get(i).cloned(),
                        _ => None,
                    },
                })
                .collect(),

            Level::Char => {
                let mut items = Vec::new();
                for (i, (b1, b2)) in pairs {
                    let batch_labels = match &data.labels {
                        Some(Labels::PerBatch(l)) => l.get(i),
                        _ => None,
                    };
                    let images = b1.unstack().into_iter().zip(b2.unstack());
                    for (j, (first, second)) in images.enumerate() {
                        items.push(PairedItem {
                            first,
                            second,
                            label: batch_labels.and_then(|l| l.get(j).cloned()),
                        });
                    }
                }
                items
            }
        };

        Self { items }
    }

    pub fn sample_count(&self) -> usize { self.items.len() }
}

impl Dataset<PairedItem> for PairedDataset {
    fn get(&self, index: usize) -> Option<PairedItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
