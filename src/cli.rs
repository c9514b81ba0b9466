use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::prompt::DEFAULT_MAX_WORDS;

#[derive(Parser, Debug)]
#[command(
    name = "ectd-corpus",
    version,
    about = "Build and reformat eCTD section-labelling training corpora from PDFs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Inventory(InventoryArgs),
    Extract(ExtractArgs),
    Reformat(ReformatArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InventoryArgs {
    #[arg(long, default_value = "dataset-raw")]
    pub source_dir: PathBuf,

    #[arg(long)]
    pub catalog_path: Option<PathBuf>,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ExtractorBackend {
    Pdftotext,
    Native,
}

impl ExtractorBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdftotext => "pdftotext",
            Self::Native => "native",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long, default_value = "dataset-raw")]
    pub source_dir: PathBuf,

    #[arg(long, default_value = "dataset-processed.csv")]
    pub output: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long)]
    pub catalog_path: Option<PathBuf>,

    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    #[arg(long, value_enum, default_value_t = ExtractorBackend::Pdftotext)]
    pub extractor: ExtractorBackend,

    #[arg(long, default_value_t = DEFAULT_MAX_WORDS)]
    pub max_words: usize,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ReformatArgs {
    #[arg(long, default_value = "restructured_train.csv")]
    pub input: PathBuf,

    #[arg(long, default_value = "train.csv")]
    pub output: PathBuf,

    #[arg(long, default_value = "content")]
    pub column: String,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}
