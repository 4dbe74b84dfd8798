// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes each subcommand to its
// use case in Layer 2. Printing happens here and nowhere else.

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use commands::{Commands, FolderArgs, InspectArgs, PairArgs, SplitArgs};

use crate::application::folder_use_case::{FolderConfig, FolderUseCase};
use crate::application::inspect_use_case::{InspectConfig, InspectUseCase};
use crate::application::pair_use_case::{PairConfig, PairUseCase};
use crate::application::split_use_case::SplitUseCase;
use crate::infra::config::DataConfig;

#[derive(Parser, Debug)]
#[command(
    name = "char-pair-data",
    version,
    about = "Prepare paired jia/jin character-image datasets for transfer learning."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Split(args)   => run_split(args),
            Commands::Pair(args)    => run_pair(args),
            Commands::Inspect(args) => run_inspect(args),
            Commands::Folder(args)  => run_folder(args),
        }
    }
}

fn run_split(args: SplitArgs) -> Result<()> {
    let summary = SplitUseCase::new(args.into()).execute()?;
    println!(
        "Create train test dataset csv file: {} train / {} test of {} images",
        summary.train, summary.test, summary.total
    );
    Ok(())
}

fn run_pair(args: PairArgs) -> Result<()> {
    let [first, second]: [String; 2] = match args.chars.clone().try_into() {
        Ok(pair) => pair,
        Err(_)   => bail!("--chars takes exactly two character types"),
    };

    let data = DataConfig::load(args.data.config.as_deref())?
        .with_overrides(args.data.data_dir.clone(), args.cache_dir.clone());

    let config = PairConfig {
        chars:       [first, second],
        test_num:    args.test_num,
        level:       args.level.into(),
        labeled:     args.labeled,
        batch_size:  args.batch_size,
        seed:        args.seed,
        num_workers: args.data.num_workers,
        rebuild:     args.rebuild,
        transform:   args.data.transform(),
        data,
    };

    let summary = PairUseCase::new(config).execute()?;
    println!(
        "Paired {} entries into {} batches{}",
        summary.entries,
        summary.batches,
        if summary.labeled { " (labeled)" } else { "" }
    );
    if let Some(shape) = summary.sample_shape {
        println!("First batch tensor shape: {:?}", shape);
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    let data = DataConfig::load(args.data.config.as_deref())?
        .with_overrides(args.data.data_dir.clone(), None);

    let stats = InspectUseCase::new(InspectConfig {
        char_type:   args.char_type.clone(),
        classes:     args.classes.clone(),
        num_workers: args.data.num_workers,
        transform:   args.data.transform(),
        data,
    })
    .execute()?;

    println!("{} classes in '{}':", stats.len(), args.char_type);
    for (class, s) in &stats {
        println!("  {class:<12} {:>4} batches {:>6} images", s.batches, s.images);
    }
    Ok(())
}

fn run_folder(args: FolderArgs) -> Result<()> {
    let data = DataConfig::load(args.data.config.as_deref())?
        .with_overrides(args.data.data_dir.clone(), None);

    let summary = FolderUseCase::new(FolderConfig {
        dir:              args.dir.clone(),
        char_type:        args.char_type.clone(),
        train_test_split: args.train_test_split,
        train_val_split:  args.train_val_split,
        batch_size:       args.batch_size,
        seed:             args.seed,
        num_workers:      args.data.num_workers,
        transform:        args.data.transform(),
        data,
    })
    .execute()?;

    println!("Loaded '{}':", summary.dir.display());
    println!("  train {:>4} batches {:>6} images", summary.train.batches, summary.train.images);
    if let Some(val) = summary.val {
        println!("  val   {:>4} batches {:>6} images", val.batches, val.images);
    }
    if let Some(test) = summary.test {
        println!("  test  {:>4} batches {:>6} images", test.batches, test.images);
    }
    Ok(())
}
