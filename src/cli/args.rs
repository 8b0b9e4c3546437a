// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::path::PathBuf;

use crate::config::{DEFAULT_DATA_DIR, DEFAULT_SAMPLE_INDEX};
use crate::dataloader::DEFAULT_BATCH_SIZE;
use clap::{Args, Parser, Subcommand};

/// CLI arguments parser.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = r#"Preview Options:
    --data, -d <DIR>       Folder holding the four FLIC .npz files [default: ./data/]
    --index, -i <INDEX>    Sample index shown for each split [default: 10]
    --batch <BATCH>        Batch size of the data loaders [default: 10]
    --no-shuffle           Keep samples in storage order
    --full-res             Upscale heatmaps instead of shrinking the image
    --save-dir <DIR>       Save figures to <DIR>/images/{train,test}_<INDEX>.png
    --font <FONT>          TrueType font used for figure titles
    --show                 Display figures in a window
    --verbose              Show verbose output

Examples:
    flic-heatmaps preview
    flic-heatmaps preview --data ./data/ --index 3
    flic-heatmaps preview --save-dir runs/preview --full-res
    flic-heatmaps preview -i 0 --show --verbose false"#)]
pub struct Cli {
    #[command(subcommand)]
    /// Subcommand to execute.
    pub command: Commands,
}

/// Commands for the CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load the dataset and visualize one sample of each split
    Preview(PreviewArgs),
}

/// Arguments for the preview command.
#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
pub struct PreviewArgs {
    /// Folder holding the four FLIC .npz files
    #[arg(short, long, default_value = DEFAULT_DATA_DIR)]
    pub data: PathBuf,

    /// Sample index shown for each split
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_INDEX)]
    pub index: usize,

    /// Batch size of the data loaders
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch: usize,

    /// Keep samples in storage order
    #[arg(long, default_value_t = false)]
    pub no_shuffle: bool,

    /// Upscale heatmaps to 480x720 instead of shrinking the image to 60x90
    #[arg(long, default_value_t = false)]
    pub full_res: bool,

    /// Save figures under <DIR>/images
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// TrueType font used for figure titles
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Display figures in a window
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Show verbose output
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub verbose: bool,
}
