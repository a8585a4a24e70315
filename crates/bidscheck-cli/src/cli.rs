//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// bidscheck: validator for BIDS neuroimaging datasets
#[derive(Parser)]
#[command(name = "bidscheck")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a dataset directory
    Validate {
        /// Root directory of the dataset
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Do not report warnings
        #[arg(long)]
        ignore_warnings: bool,

        /// Skip reading NIfTI headers
        #[arg(long)]
        ignore_nifti_headers: bool,

        /// Number of worker threads (default: one per core)
        #[arg(short, long)]
        threads: Option<usize>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show how paths are classified by the naming grammar
    Classify {
        /// Dataset-relative paths, e.g. /sub-01/anat/sub-01_T1w.nii.gz
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<String>,
    },
}
