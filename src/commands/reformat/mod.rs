use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cli::ReformatArgs;
use crate::model::{ReformatCounts, ReformatRunManifest};
use crate::prompt::{HUMAN_PREFIX, STRUCTURE_LEAD_IN, TEXT_CHUNK_MARKER};
use crate::util::{
    ensure_parent_directory, now_utc_string, sidecar_manifest_path, utc_compact_string,
    write_json_pretty,
};

mod normalizer;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;

use normalizer::*;
