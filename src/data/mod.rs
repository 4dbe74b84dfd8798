// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from image folders to paired, batched tensors.
//
//   <data_dir>/<char_type>/<class>/*.png
//       │
//       ▼
//   charset      → which classes exist on each side
//       │
//       ▼
//   loader       → decode + transform + stack per class
//       │
//       ▼
//   pairing      → align both sides, cache the result
//       │
//       ▼
//   batcher      → seeded shuffle + re-batch, Burn Batcher
//       │
//       ▼
//   dataset      → Burn Dataset over aligned image pairs
//
// The splitter is separate: it turns a flat image directory
// into train/test manifests.

/// Character-class discovery for one dataset side
pub mod charset;

/// Image → CHW tensor conversion
pub mod transform;

/// Folder-backed ImageSource and the per-character loader
pub mod loader;

/// Paired-dataset assembler with keyed caching
pub mod pairing;

/// Seeded re-batching and Burn's Batcher implementation
pub mod batcher;

/// Burn's Dataset trait over paired images
pub mod dataset;

/// File-name labels and the seeded train/test split
pub mod splitter;
