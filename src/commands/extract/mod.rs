use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use crate::catalog::{MIN_SAMPLE_SIZE, SectionCatalog, describe_source};
use crate::cli::{ExtractArgs, ExtractorBackend};
use crate::commands::inventory::{discover_documents, label_for};
use crate::model::{ExtractCounts, ExtractPaths, ExtractRunManifest};
use crate::prompt::{BOT_MARKER, HUMAN_PREFIX, STRUCTURE_LEAD_IN, TEXT_CHUNK_MARKER};
use crate::util::{
    ensure_parent_directory, now_utc_string, sidecar_manifest_path, utc_compact_string,
    write_json_pretty,
};

mod pipeline;
mod record;
mod run;
mod sampler;
mod text_source;

pub use run::run;

use pipeline::*;
use record::*;
use sampler::*;
use text_source::*;
