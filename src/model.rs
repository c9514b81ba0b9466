use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub relative_path: String,
    pub label: String,
    pub in_catalog: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub catalog_source: String,
    pub catalog_size: usize,
    pub document_count: usize,
    pub known_label_count: usize,
    pub unknown_label_count: usize,
    pub documents: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractPaths {
    pub source_dir: String,
    pub output_path: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractCounts {
    pub discovered: usize,
    pub processed: usize,
    pub written: usize,
    pub skipped_empty_text: usize,
    pub skipped_unknown_label: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub extractor: String,
    pub extractor_version: Option<String>,
    pub workers: usize,
    pub max_words: usize,
    pub seed: Option<u64>,
    pub catalog_source: String,
    pub catalog_size: usize,
    pub paths: ExtractPaths,
    pub counts: ExtractCounts,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReformatCounts {
    pub rows_read: usize,
    pub rows_written: usize,
    pub normalized: usize,
    pub missing_lead_in: usize,
    pub missing_trailer: usize,
    pub missing_column: usize,
    pub invalid_utf8_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReformatRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub input_path: String,
    pub output_path: String,
    pub column: String,
    pub counts: ReformatCounts,
}
