// ============================================================
// Layer 2 — SplitUseCase
// ============================================================
// Produces the train/test manifests for a flat image folder:
//
//   Step 1: List image files            (Layer 4 - data)
//   Step 2: Parse a label per file name (Layer 4 - data)
//   Step 3: Seeded 80/20 split          (Layer 4 - data)
//   Step 4: Write both CSV manifests    (Layer 6 - infra)
//
// A single malformed file name aborts before anything is written.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::splitter::{
    build_manifest, list_images, split_train_test, DEFAULT_SPLIT_SEED, DEFAULT_TRAIN_FRACTION,
};
use crate::infra::manifest::write_manifest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    pub images_dir:     PathBuf,
    pub train_csv:      PathBuf,
    pub test_csv:       PathBuf,
    pub train_fraction: f64,
    pub seed:           u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            images_dir:     PathBuf::from("single_character/png/oracle_inscriptions/"),
            train_csv:      PathBuf::from("train.csv"),
            test_csv:       PathBuf::from("test.csv"),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            seed:           DEFAULT_SPLIT_SEED,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitSummary {
    pub total: usize,
    pub train: usize,
    pub test:  usize,
}

pub struct SplitUseCase {
    config: SplitConfig,
}

impl SplitUseCase {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<SplitSummary> {
        let cfg = &self.config;

        let names = list_images(&cfg.images_dir)
            .with_context(|| format!("Cannot list images in '{}'", cfg.images_dir.display()))?;
        tracing::info!("The dataset contains {} images", names.len());

        let rows = build_manifest(&names)?;
        let (train, test) = split_train_test(rows, cfg.train_fraction, cfg.seed);

        write_manifest(&cfg.train_csv, &train)?;
        write_manifest(&cfg.test_csv, &test)?;
        tracing::info!(
            "Created '{}' ({} rows) and '{}' ({} rows)",
            cfg.train_csv.display(),
            train.len(),
            cfg.test_csv.display(),
            test.len()
        );

        Ok(SplitSummary { total: names.len(), train: train.len(), test: test.len() })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config(root: &std::path::Path) -> SplitConfig {
        SplitConfig {
            images_dir: root.join("images"),
            train_csv:  root.join("out/train.csv"),
            test_csv:   root.join("out/test.csv"),
            ..SplitConfig::default()
        }
    }

    #[test]
    fn test_manifests_cover_every_image() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        fs::create_dir_all(&cfg.images_dir).unwrap();
        for i in 0..25 {
            fs::write(cfg.images_dir.join(format!("X{:03}_{i}.png", i % 7)), b"").unwrap();
        }

        let summary = SplitUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(summary, SplitSummary { total: 25, train: 20, test: 5 });

        let train = fs::read_to_string(&cfg.train_csv).unwrap();
        let test  = fs::read_to_string(&cfg.test_csv).unwrap();
        assert!(train.starts_with("image,target\n"));
        assert_eq!(train.lines().count() - 1 + test.lines().count() - 1, 25);
    }

    #[test]
    fn test_rerun_is_identical() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        fs::create_dir_all(&cfg.images_dir).unwrap();
        for i in 0..10 {
            fs::write(cfg.images_dir.join(format!("X{i}_s.png")), b"").unwrap();
        }

        SplitUseCase::new(cfg.clone()).execute().unwrap();
        let first = fs::read_to_string(&cfg.train_csv).unwrap();
        SplitUseCase::new(cfg.clone()).execute().unwrap();
        assert_eq!(fs::read_to_string(&cfg.train_csv).unwrap(), first);
    }

    #[test]
    fn test_bad_name_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = config(tmp.path());
        fs::create_dir_all(&cfg.images_dir).unwrap();
        fs::write(cfg.images_dir.join("X1_ok.png"), b"").unwrap();
        fs::write(cfg.images_dir.join("broken.png"), b"").unwrap();

        assert!(SplitUseCase::new(cfg.clone()).execute().is_err());
        assert!(!cfg.train_csv.exists());
        assert!(!cfg.test_csv.exists());
    }
}
