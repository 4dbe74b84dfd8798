// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by several layers:
//
//   config.rs    — where datasets and caches live (JSON file
//                  plus command-line overrides)
//
//   cache.rs     — keyed bincode store for character lists and
//                  assembled paired datasets
//
//   manifest.rs  — CSV writer for the train/test manifests

/// Data root and cache directory configuration
pub mod config;

/// Parameter-keyed on-disk cache
pub mod cache;

/// train.csv / test.csv writer
pub mod manifest;
