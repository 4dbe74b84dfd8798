// ============================================================
// Layer 3 — Paired Dataset Types
// ============================================================
// The shapes of data that flow out of the assembler:
//
//   Level::All   → first/second hold single images [C, H, W],
//                  labels are one class name per image
//   Level::Char  → first/second hold whole batches [N, C, H, W],
//                  labels are one list of class names per batch
//
// The label layouts differ between levels on purpose: callers
// of each level consume them differently, so both are kept.

use serde::{Deserialize, Serialize};

use crate::domain::tensor::ImageTensor;

/// Granularity of pairing and batching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// One entry per individual image.
    All,
    /// One entry per per-character batch.
    Char,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::All  => "all",
            Level::Char => "char",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Labels {
    PerImage(Vec<String>),
    PerBatch(Vec<Vec<String>>),
}

impl Labels {
    pub fn len(&self) -> usize {
        match self {
            Labels::PerImage(l) => l.len(),
            Labels::PerBatch(l) => l.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Two index-aligned sequences, plus labels when requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairedData {
    pub level:  Level,
    pub first:  Vec<ImageTensor>,
    pub second: Vec<ImageTensor>,
    pub labels: Option<Labels>,
}

impl PairedData {
    pub fn new(level: Level, labeled: bool) -> Self {
        let labels = labeled.then(|| match level {
            Level::All  => Labels::PerImage(Vec::new()),
            Level::Char => Labels::PerBatch(Vec::new()),
        });
        Self { level, first: Vec::new(), second: Vec::new(), labels }
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Output of the per-character loader: one label per batch.
#[derive(Debug, Clone, Default)]
pub struct CharacterData {
    pub batches: Vec<ImageTensor>,
    pub labels:  Vec<String>,
}
