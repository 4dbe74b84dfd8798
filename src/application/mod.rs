// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers for one command each.
//
// Rules for this layer:
//   - No image decoding or tensor code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination

// train.csv / test.csv generation
pub mod split_use_case;

// Paired dataset assembly and reshuffling
pub mod pair_use_case;

// Per-character loader report for one dataset side
pub mod inspect_use_case;

// Train / val / test batches of one image folder
pub mod folder_use_case;
