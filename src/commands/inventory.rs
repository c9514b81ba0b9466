use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::catalog::{SectionCatalog, describe_source};
use crate::cli::InventoryArgs;
use crate::model::{DocumentEntry, DocumentInventoryManifest};
use crate::util::{now_utc_string, write_json_pretty};

const DOCUMENT_EXTENSION: &str = "pdf";

pub fn run(args: InventoryArgs) -> Result<()> {
    let catalog = SectionCatalog::load(args.catalog_path.as_deref())?;
    let manifest = build_manifest(
        &args.source_dir,
        &catalog,
        &describe_source(args.catalog_path.as_deref()),
    )?;

    if args.dry_run {
        info!(
            document_count = manifest.document_count,
            known_labels = manifest.known_label_count,
            unknown_labels = manifest.unknown_label_count,
            source = %manifest.source_directory,
            "inventory dry-run complete"
        );
        return Ok(());
    }

    let manifest_path = args
        .manifest_path
        .unwrap_or_else(|| args.source_dir.join("document_inventory.json"));

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote inventory manifest");
    info!(
        document_count = manifest.document_count,
        unknown_labels = manifest.unknown_label_count,
        "inventory completed"
    );

    Ok(())
}

pub fn build_manifest(
    source_dir: &Path,
    catalog: &SectionCatalog,
    catalog_source: &str,
) -> Result<DocumentInventoryManifest> {
    let mut paths = discover_documents(source_dir)?;
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(label) = label_for(&path) else {
            warn!(path = %path.display(), "document name is not valid UTF-8");
            continue;
        };

        let relative_path = path
            .strip_prefix(source_dir)
            .unwrap_or(&path)
            .display()
            .to_string();
        let in_catalog = catalog.contains(&label);
        if !in_catalog {
            warn!(path = %relative_path, label = %label, "label not found in section catalog");
        }

        documents.push(DocumentEntry {
            relative_path,
            label,
            in_catalog,
        });
    }

    let known_label_count = documents.iter().filter(|doc| doc.in_catalog).count();

    Ok(DocumentInventoryManifest {
        manifest_version: 1,
        generated_at: now_utc_string(),
        source_directory: source_dir.display().to_string(),
        catalog_source: catalog_source.to_string(),
        catalog_size: catalog.len(),
        document_count: documents.len(),
        known_label_count,
        unknown_label_count: documents.len() - known_label_count,
        documents,
    })
}

/// Recursively collects every `.pdf` file under `source_dir`. Directory order is
/// whatever the platform yields.
pub fn discover_documents(source_dir: &Path) -> Result<Vec<PathBuf>> {
    if !source_dir.is_dir() {
        bail!("source directory not found: {}", source_dir.display());
    }

    let mut documents = Vec::new();
    for entry in WalkDir::new(source_dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable directory entry");
                continue;
            }
        };

        if entry.file_type().is_file() && is_document(entry.path()) {
            documents.push(entry.into_path());
        }
    }

    Ok(documents)
}

fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
        .unwrap_or(false)
}

/// `dataset-raw/m1/1.3.1.pdf` -> `1.3.1`
pub fn label_for(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::catalog::numbered_catalog;

    #[test]
    fn label_is_file_name_without_extension() {
        assert_eq!(label_for(Path::new("raw/m3/3.2.S.4.1.pdf")).as_deref(), Some("3.2.S.4.1"));
        assert_eq!(label_for(Path::new("1.10.PDF")).as_deref(), Some("1.10"));
    }

    #[test]
    fn discovers_pdfs_recursively_and_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("module1").join("regional");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("1.1.pdf"), b"%PDF").unwrap();
        fs::write(nested.join("1.2.PDF"), b"%PDF").unwrap();
        fs::write(nested.join("notes.txt"), b"ignore").unwrap();
        fs::create_dir_all(dir.path().join("folder.pdf")).unwrap();

        let mut found = discover_documents(dir.path()).unwrap();
        found.sort();

        assert_eq!(found.len(), 2);
        assert!(found.iter().any(|p| p.ends_with("1.1.pdf")));
        assert!(found.iter().any(|p| p.ends_with("module1/regional/1.2.PDF")));
    }

    #[test]
    fn missing_source_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_documents(&dir.path().join("absent")).is_err());
    }

    #[test]
    fn manifest_flags_labels_outside_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("1.3.pdf"), b"%PDF").unwrap();
        fs::write(dir.path().join("9.9.pdf"), b"%PDF").unwrap();

        let manifest = build_manifest(dir.path(), &numbered_catalog(12), "builtin").unwrap();

        assert_eq!(manifest.document_count, 2);
        assert_eq!(manifest.known_label_count, 1);
        assert_eq!(manifest.unknown_label_count, 1);
        assert_eq!(manifest.documents[0].relative_path, "1.3.pdf");
        assert!(manifest.documents[0].in_catalog);
        assert_eq!(manifest.documents[1].label, "9.9");
        assert!(!manifest.documents[1].in_catalog);
    }
}
