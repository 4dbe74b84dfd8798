use serde::{Deserialize, Serialize};

/// How a decoded image becomes a tensor.
///
/// The default matches the usual character pipeline: convert to a
/// single grayscale channel, keep the native size, scale to [0, 1].
/// Part of the cache key, so changing it never reuses stale batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTransform {
    pub grayscale: bool,
    /// Exact output size as (width, height), if any.
    pub resize: Option<(u32, u32)>,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self { grayscale: true, resize: None }
    }
}
