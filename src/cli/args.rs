use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scene_parsing_prep")]
#[command(about = "Prepare a semantic segmentation dataset: boundary masks and metadata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive a binary edge mask for every label image in a split directory
    BuildEdges {
        /// Directory holding the split's label images
        split_directory: PathBuf,

        /// Number of semantic classes in the label encoding
        #[arg(short, long)]
        classes: usize,

        /// Boundary neighborhood radius in pixels (Euclidean)
        #[arg(short, long, default_value = "2")]
        radius: u32,

        /// Number of parallel workers (0 = number of logical CPUs)
        #[arg(short, long, default_value = "4")]
        workers: usize,

        /// Write the batch report as JSON to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Convert the objectInfo statistics text table to typed JSON
    ConvertInfo {
        /// Input text table (header row + id/ratio/train/val/names columns)
        input: PathBuf,

        /// Output JSON path
        output: PathBuf,
    },

    /// Convert a color palette text/CSV matrix to validated JSON
    ConvertPalette {
        /// Input palette (one R,G,B row per class, background excluded)
        input: PathBuf,

        /// Output JSON path
        output: PathBuf,

        /// Expected number of class rows (background excluded)
        #[arg(short, long)]
        classes: usize,
    },

    /// Pick a random example pair and optionally render its colorized label
    Inspect {
        /// Directory holding the input photographs
        images: PathBuf,

        /// Directory holding the label images
        annotations: PathBuf,

        /// Palette JSON (from convert-palette) for colorizing the label
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Class table JSON (from convert-info) for printing a legend
        #[arg(long, requires = "palette")]
        info: Option<PathBuf>,

        /// Where to write the colorized label image
        #[arg(short, long, requires = "palette")]
        out: Option<PathBuf>,
    },

    /// Print an indented tree of the dataset directory
    Tree {
        /// Dataset root directory
        directory: PathBuf,
    },
}
