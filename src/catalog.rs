use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::info;

/// Smallest structure sample handed to a record; a catalog must hold at least this many labels.
pub const MIN_SAMPLE_SIZE: usize = 10;

/// eCTD section numbering for modules 1 through 5, in catalog order.
const BUILTIN_ECTD_LABELS: &[&str] = &[
    "1.1", "1.2", "1.3", "1.3.1", "1.3.1.1", "1.3.1.2", "1.3.1.3", "1.3.1.4", "1.3.1.5",
    "1.3.2", "1.3.3", "1.3.4", "1.3.5", "1.3.5.1", "1.3.5.2", "1.3.5.3", "1.3.6", "1.4",
    "1.4.1", "1.4.2", "1.4.3", "1.4.4", "1.5", "1.5.1", "1.5.2", "1.5.3", "1.5.4", "1.5.5",
    "1.5.6", "1.5.7", "1.6", "1.6.1", "1.6.2", "1.6.3", "1.7", "1.7.1", "1.7.2", "1.7.3",
    "1.7.4", "1.8", "1.8.1", "1.8.2", "1.8.3", "1.8.4", "1.9", "1.9.1", "1.9.2", "1.9.3",
    "1.9.4", "1.9.5", "1.9.6", "1.10", "1.10.1", "1.10.2", "1.11", "1.11.1", "1.11.2",
    "1.11.3", "1.11.4", "1.12", "1.12.1", "1.12.2", "1.12.3", "1.12.4", "1.12.5", "1.12.6",
    "1.12.7", "1.12.8", "1.12.9", "1.12.10", "1.12.11", "1.12.12", "1.12.13", "1.12.14",
    "1.12.15", "1.12.16", "1.12.17", "1.13", "1.13.1", "1.13.2", "1.13.3", "1.13.4", "1.13.5",
    "1.13.6", "1.13.7", "1.13.8", "1.13.9", "1.13.10", "1.13.11", "1.13.12", "1.13.13",
    "1.13.14", "1.13.15", "1.14", "1.14.1", "1.14.1.1", "1.14.1.2", "1.14.1.3", "1.14.1.4",
    "1.14.1.5", "1.14.2", "1.14.2.1", "1.14.2.2", "1.14.2.3", "1.14.3", "1.14.3.1", "1.14.3.2",
    "1.14.3.3", "1.14.4", "1.14.4.1", "1.14.4.2", "1.14.5", "1.14.6", "1.15", "1.15.1",
    "1.15.1.1", "1.15.1.2", "1.15.1.3", "1.15.1.4", "1.15.1.5", "1.15.1.6", "1.15.1.7",
    "1.15.1.8", "1.15.1.9", "1.15.1.10", "1.15.1.11", "1.15.2", "1.15.2.1", "1.15.2.1.1",
    "1.15.2.1.2", "1.15.2.1.3", "1.15.2.1.4", "1.16", "1.16.1", "1.16.2", "1.16.2.1",
    "1.16.2.2", "1.16.2.3", "1.16.2.4", "1.16.2.5", "1.16.2.6", "1.17", "1.17.1", "1.17.2",
    "1.18", "1.19", "1.20", "2.2", "2.3", "2.4", "2.5", "2.6", "2.6.1", "2.6.2", "2.6.3",
    "2.6.4", "2.6.5", "2.6.6", "2.6.7", "2.7", "2.7.1", "2.7.2", "2.7.3", "2.7.4", "2.7.5",
    "2.7.6", "3.2.P", "3.2.R", "3.2", "3.2.A", "3.2.S", "3.2.S.1", "3.2.P.1", "3.2.A.1",
    "3.2.S.2", "3.2.P.2", "3.2.A.2", "3.2.A.3", "3.2.S.3", "3.2.P.3", "3.2.S.4", "3.2.P.4",
    "3.2.S.4.1", "3.2.S.4.2", "3.2.S.4.3", "3.2.S.4.4", "3.2.S.4.5", "3.2.S.5", "3.2.P.5",
    "3.2.P.5.1", "3.2.P.5.2", "3.2.P.5.3", "3.2.P.5.4", "3.2.P.5.5", "3.2.P.5.6", "3.2.S.6",
    "3.2.P.6", "3.2.P.7", "3.2.S.7", "3.2.P.8", "3.3", "4.2", "4.2.1", "4.2.1.1", "4.2.1.2",
    "4.2.1.3", "4.2.1.4", "4.2.2", "4.2.2.1", "4.2.2.2", "4.2.2.3", "4.2.2.4", "4.2.2.5",
    "4.2.2.6", "4.2.2.7", "4.2.3", "4.2.3.1", "4.2.3.2", "4.2.3.3", "4.2.3.4", "4.2.3.5",
    "4.2.3.6", "4.2.3.7", "4.2.3.8", "4.2.3.9", "4.2.3.10", "4.2.3.11", "4.2.3.12", "4.2.3.13",
    "4.2.3.14", "4.2.3.15", "4.2.3.16", "4.2.3.17", "4.2.3.18", "4.2.3.19", "4.2.3.20",
    "4.2.3.21", "4.2.3.22", "4.2.3.23", "4.3", "5.2", "5.3", "5.3.1", "5.3.1.1", "5.3.1.2",
    "5.3.1.3", "5.3.1.4", "5.3.2", "5.3.2.1", "5.3.2.2", "5.3.2.3", "5.3.3", "5.3.3.1",
    "5.3.3.2", "5.3.3.3", "5.3.3.4", "5.3.3.5", "5.3.4", "5.3.4.1", "5.3.4.2", "5.3.5",
    "5.3.5.1", "5.3.5.2", "5.3.5.3", "5.3.5.4", "5.3.6", "5.4",
];

/// Ordered, duplicate-free list of section labels. Position in the list is the
/// only ordering used when rendering a structure sample.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl SectionCatalog {
    pub fn new<I, S>(labels: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        if labels.is_empty() {
            bail!("section catalog is empty");
        }

        let mut positions = HashMap::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                bail!("section catalog entry {index} is blank");
            }
            if label.trim() != label {
                bail!("section catalog entry {index} has surrounding whitespace: {label:?}");
            }
            if let Some(previous) = positions.insert(label.clone(), index) {
                bail!("section catalog lists {label} twice (entries {previous} and {index})");
            }
        }

        if labels.len() < MIN_SAMPLE_SIZE {
            bail!(
                "section catalog has {} labels; at least {MIN_SAMPLE_SIZE} are required",
                labels.len()
            );
        }

        Ok(Self { labels, positions })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_ECTD_LABELS.iter().copied())
    }

    /// Reads a JSON array of label strings.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw =
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let labels: Vec<String> = serde_json::from_slice(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Self::new(labels).with_context(|| format!("invalid section catalog {}", path.display()))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let catalog = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::builtin()?,
        };

        info!(
            source = %describe_source(path),
            labels = catalog.len(),
            "loaded section catalog"
        );

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.positions.contains_key(label)
    }
}

pub fn describe_source(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| "builtin".to_string())
}

#[cfg(test)]
pub(crate) fn numbered_catalog(count: usize) -> SectionCatalog {
    SectionCatalog::new((1..=count).map(|n| format!("1.{n}"))).unwrap()
}
