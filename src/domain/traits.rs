// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The pairing and loading code never touches an image library
// directly. It talks to an ImageSource, which knows how to list
// the character classes of a dataset side and how to turn one
// class directory into stacked tensor batches.
//
// Implementations:
//   - FolderImageSource → decodes files with the `image` crate
//   - test doubles      → count calls, serve synthetic tensors

use std::collections::BTreeSet;
use std::path::Path;

use crate::domain::transform::ImageTransform;
use crate::domain::error::DataResult;
use crate::domain::tensor::ImageTensor;

pub trait ImageSource {
    /// Names of the character-class subdirectories of `dataset_dir`.
    fn character_set(&self, dataset_dir: &Path) -> DataResult<BTreeSet<String>>;

    /// All images under `class_dir`, transformed and stacked into
    /// batches of at most `batch_size` images, in listing order.
    fn load_batches(
        &self,
        class_dir:  &Path,
        batch_size: usize,
        transform:  &ImageTransform,
    ) -> DataResult<Vec<ImageTensor>>;
}
