// ============================================================
// Layer 3 — Host Image Tensor
// ============================================================
// A plain, framework-free f32 tensor. Decoded images are
// [C, H, W]; stacked batches are [N, C, H, W]. Data is stored
// row-major, so stacking is concatenation of the item buffers
// and unstacking is slicing them back apart.
//
// Serialisable so paired datasets can be cached with bincode.

use serde::{Deserialize, Serialize};

use crate::domain::error::{DataError, DataResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTensor {
    shape: Vec<usize>,
    data:  Vec<f32>,
}

impl ImageTensor {
    /// Build a tensor, checking that `data` fills `shape` exactly.
    pub fn new(shape: Vec<usize>, data: Vec<f32>) -> DataResult<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return Err(DataError::ShapeMismatch {
                expected: shape,
                found:    vec![data.len()],
            });
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Size of the leading dimension (the batch size for stacked tensors).
    pub fn batch_len(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// Stack equally shaped tensors along a new leading dimension.
    /// An empty input yields a `[0]` tensor.
    pub fn stack(items: &[ImageTensor]) -> DataResult<Self> {
        let Some(head) = items.first() else {
            return Ok(Self { shape: vec![0], data: Vec::new() });
        };

        let mut data = Vec::with_capacity(head.data.len() * items.len());
        for item in items {
            if item.shape != head.shape {
                return Err(DataError::ShapeMismatch {
                    expected: head.shape.clone(),
                    found:    item.shape.clone(),
                });
            }
            data.extend_from_slice(&item.data);
        }

        let mut shape = Vec::with_capacity(head.shape.len() + 1);
        shape.push(items.len());
        shape.extend_from_slice(&head.shape);
        Ok(Self { shape, data })
    }

    /// Split along the leading dimension into its items.
    pub fn unstack(&self) -> Vec<ImageTensor> {
        let n = self.batch_len();
        if n == 0 {
            return Vec::new();
        }
        let item_shape = self.shape[1..].to_vec();
        let stride     = self.data.len() / n;

        (0..n)
            .map(|i| ImageTensor {
                shape: item_shape.clone(),
                data:  self.data[i * stride..(i + 1) * stride].to_vec(),
            })
            .collect()
    }

    /// A batch holding a single item is repeated to size 2 so that
    /// downstream batch statistics never see a singleton batch.
    pub fn pad_singleton(self) -> Self {
        if self.batch_len() != 1 {
            return self;
        }
        let mut shape = self.shape;
        shape[0] = 2;
        let mut data = self.data.clone();
        data.extend_from_slice(&self.data);
        Self { shape, data }
    }
}
