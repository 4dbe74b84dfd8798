// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types and traits describing what the pipeline
// works with: tensors, paired sequences, errors, and the
// ImageSource abstraction.
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO clap types
//   - NO file I/O

/// Typed errors and the DataResult alias
pub mod error;

/// Framework-free f32 tensor used for images and batches
pub mod tensor;

/// Level, labels, and paired sequence containers
pub mod paired;

/// The ImageSource abstraction over image decoding
pub mod traits;

/// Image preprocessing settings (grayscale, resize)
pub mod transform;
