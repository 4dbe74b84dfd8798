// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Four subcommands:
//   split    — write train.csv / test.csv for a flat image folder
//   pair     — build (or load) the paired dataset and reshuffle it
//   inspect  — per-class batch counts for one dataset side
//   folder   — train / val / test batches of one image folder
//
// Each Args struct converts into its application-layer config,
// so the application layer never sees clap types.

use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::application::split_use_case::SplitConfig;
use crate::data::batcher::{DEFAULT_BATCH_SIZE, DEFAULT_SEED};
use crate::data::loader::{CHAR_BATCH_SIZE, DEFAULT_FOLDER_SEED};
use crate::data::splitter::{DEFAULT_SPLIT_SEED, DEFAULT_TRAIN_FRACTION};
use crate::domain::paired::Level;
use crate::domain::transform::ImageTransform;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a flat image directory into train/test CSV manifests
    Split(SplitArgs),

    /// Build the paired dataset of two character types and reshuffle it
    Pair(PairArgs),

    /// Load one character type class by class and report batch counts
    Inspect(InspectArgs),

    /// Split one image folder into train/val/test batches and report them
    Folder(FolderArgs),
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Directory of images named like `X123_name.png`
    #[arg(long, default_value = "single_character/png/oracle_inscriptions/")]
    pub images_dir: PathBuf,

    #[arg(long, default_value = "train.csv")]
    pub train_csv: PathBuf,

    #[arg(long, default_value = "test.csv")]
    pub test_csv: PathBuf,

    /// Share of images that go to the training manifest
    #[arg(long, default_value_t = DEFAULT_TRAIN_FRACTION)]
    pub train_fraction: f64,

    #[arg(long, default_value_t = DEFAULT_SPLIT_SEED)]
    pub seed: u64,
}

impl From<SplitArgs> for SplitConfig {
    fn from(a: SplitArgs) -> Self {
        SplitConfig {
            images_dir:     a.images_dir,
            train_csv:      a.train_csv,
            test_csv:       a.test_csv,
            train_fraction: a.train_fraction,
            seed:           a.seed,
        }
    }
}

/// Granularity of pairing
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelArg {
    /// One entry per image
    All,
    /// One entry per character batch
    Char,
}

impl From<LevelArg> for Level {
    fn from(l: LevelArg) -> Self {
        match l {
            LevelArg::All  => Level::All,
            LevelArg::Char => Level::Char,
        }
    }
}

/// Where the data lives; shared by `pair`, `inspect` and `folder`.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// JSON file with `cur_data_dir` and `cache_dir`
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dataset root, overriding the config file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Decode images on this many worker threads (0 = current thread)
    #[arg(long, default_value_t = 0)]
    pub num_workers: usize,

    /// Resize every image to WIDTHxHEIGHT before conversion
    #[arg(long, value_parser = parse_size)]
    pub resize: Option<(u32, u32)>,

    /// Keep three colour channels instead of converting to grayscale
    #[arg(long)]
    pub color: bool,
}

impl DataArgs {
    pub fn transform(&self) -> ImageTransform {
        ImageTransform { grayscale: !self.color, resize: self.resize }
    }
}

#[derive(Args, Debug)]
pub struct PairArgs {
    /// The two character types to pair
    #[arg(long, num_args = 2, value_names = ["FIRST", "SECOND"], default_values = ["jia", "jin"])]
    pub chars: Vec<String>,

    /// Number of leading classes held out for testing
    #[arg(long, default_value_t = 100)]
    pub test_num: usize,

    #[arg(long, value_enum, default_value_t = LevelArg::All)]
    pub level: LevelArg,

    /// Also produce class labels
    #[arg(long)]
    pub labeled: bool,

    /// Batch size used when reshuffling
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Seed for the shared shuffle
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Ignore any cached paired dataset and rebuild it
    #[arg(long)]
    pub rebuild: bool,

    /// Cache directory, overriding the config file
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Character type to load, e.g. `jia`
    #[arg(long, default_value = "jia")]
    pub char_type: String,

    /// Only these classes (default: every class found)
    #[arg(long, num_args = 1..)]
    pub classes: Option<Vec<String>>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug)]
pub struct FolderArgs {
    /// Image folder; defaults to `<data_dir>/<char_type>`
    #[arg(long)]
    pub dir: Option<PathBuf>,

    #[arg(long, default_value = "jia")]
    pub char_type: String,

    /// Share of images kept for training; the rest is test
    #[arg(long, default_value_t = 1.0)]
    pub train_test_split: f64,

    /// Share of the training images moved to validation
    #[arg(long, default_value_t = 0.0)]
    pub train_val_split: f64,

    #[arg(long, default_value_t = CHAR_BATCH_SIZE)]
    pub batch_size: usize,

    #[arg(long, default_value_t = DEFAULT_FOLDER_SEED)]
    pub seed: u64,

    #[command(flatten)]
    pub data: DataArgs,
}

/// Parse `WIDTHxHEIGHT`, e.g. `64x64`.
pub fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("invalid width in '{s}'"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("invalid height in '{s}'"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got '{s}'"));
    }
    Ok((w, h))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("64x32"), Ok((64, 32)));
        assert_eq!(parse_size("28X28"), Ok((28, 28)));
        assert!(parse_size("64").is_err());
        assert!(parse_size("0x4").is_err());
    }

    #[test]
    fn test_pair_defaults() {
        let cli = Cli::try_parse_from(["char-pair-data", "pair"]).unwrap();
        let Commands::Pair(args) = cli.command else {
            panic!("expected pair");
        };
        assert_eq!(args.chars, vec!["jia", "jin"]);
        assert_eq!(args.test_num, 100);
        assert_eq!(args.level, LevelArg::All);
        assert_eq!(args.batch_size, 16);
        assert_eq!(args.seed, 42);
        assert!(!args.rebuild);
        assert_eq!(args.data.transform(), ImageTransform::default());
    }

    #[test]
    fn test_pair_flags() {
        let cli = Cli::try_parse_from([
            "char-pair-data", "pair", "--chars", "jin", "chu", "--level", "char",
            "--labeled", "--resize", "32x32", "--test-num", "0",
        ])
        .unwrap();
        let Commands::Pair(args) = cli.command else {
            panic!("expected pair");
        };
        assert_eq!(args.chars, vec!["jin", "chu"]);
        assert_eq!(Level::from(args.level), Level::Char);
        assert!(args.labeled);
        assert_eq!(args.data.resize, Some((32, 32)));
    }

    #[test]
    fn test_split_defaults() {
        let cli = Cli::try_parse_from(["char-pair-data", "split"]).unwrap();
        let Commands::Split(args) = cli.command else {
            panic!("expected split");
        };
        let cfg: SplitConfig = args.into();
        assert_eq!(cfg.seed, 233);
        assert_eq!(cfg.train_fraction, 0.8);
        assert_eq!(cfg.train_csv, PathBuf::from("train.csv"));
    }

    #[test]
    fn test_folder_flags() {
        let cli = Cli::try_parse_from([
            "char-pair-data", "folder", "--dir", "imgs", "--train-test-split", "0.8",
            "--train-val-split", "0.1",
        ])
        .unwrap();
        let Commands::Folder(args) = cli.command else {
            panic!("expected folder");
        };
        assert_eq!(args.dir, Some(PathBuf::from("imgs")));
        assert_eq!(args.train_test_split, 0.8);
        assert_eq!(args.train_val_split, 0.1);
        assert_eq!(args.batch_size, 512);
    }
}
