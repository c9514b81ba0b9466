use std::panic;

use super::*;

/// Turns one document into plain text. Implementations are shared by every
/// extract worker.
pub(super) trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    fn extract_text(&self, path: &Path) -> Result<String>;
}

/// Poppler's `pdftotext`, run as a subprocess.
#[derive(Debug)]
pub(super) struct PdftotextExtractor {
    program: String,
}

impl PdftotextExtractor {
    /// Confirms `program` runs before any document is handed to it and
    /// returns the extractor with the tool's version line.
    pub(super) fn locate(program: &str) -> Result<(Self, String)> {
        let version = command_version(program, &["-v"])
            .with_context(|| format!("{program} is required for --extractor pdftotext"))?;
        Ok((
            Self {
                program: program.to_string(),
            },
            version,
        ))
    }
}

impl TextExtractor for PdftotextExtractor {
    fn name(&self) -> &'static str {
        "pdftotext"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("-enc")
            .arg("UTF-8")
            .arg(path)
            .arg("-")
            .output()
            .with_context(|| format!("failed to execute pdftotext for {}", path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "pdftotext returned non-zero exit status for {}: {}",
                path.display(),
                stderr.trim()
            );
        }

        Ok(clean_layer_text(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// In-process extraction through the `pdf-extract` crate.
#[derive(Debug, Default)]
pub(super) struct NativePdfExtractor;

impl TextExtractor for NativePdfExtractor {
    fn name(&self) -> &'static str {
        "native"
    }

    fn extract_text(&self, path: &Path) -> Result<String> {
        // pdf-extract panics on some malformed files; keep that inside this task.
        let text = panic::catch_unwind(|| pdf_extract::extract_text(path))
            .map_err(|_| anyhow!("pdf-extract panicked on {}", path.display()))?
            .with_context(|| format!("failed to extract text from {}", path.display()))?;
        Ok(clean_layer_text(&text))
    }
}

/// Builds the selected backend. External tools are checked here so a missing
/// binary aborts the run instead of skipping every document.
pub(super) fn extractor_for(
    backend: ExtractorBackend,
) -> Result<(Box<dyn TextExtractor>, Option<String>)> {
    match backend {
        ExtractorBackend::Pdftotext => {
            let (extractor, version) = PdftotextExtractor::locate("pdftotext")?;
            info!(version = %version, "found pdftotext");
            Ok((Box::new(extractor), Some(version)))
        }
        ExtractorBackend::Native => Ok((Box::new(NativePdfExtractor), None)),
    }
}

pub(super) fn command_version(program: &str, args: &[&str]) -> Result<String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .with_context(|| format!("failed to run {} {}", program, args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{} {} failed: {}", program, args.join(" "), stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    let source = if stdout.trim().is_empty() {
        stderr.trim()
    } else {
        stdout.trim()
    };

    let version_line = source
        .lines()
        .next()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .unwrap_or("unknown");

    Ok(version_line.to_string())
}

/// Page breaks become line breaks; NULs are dropped.
pub(super) fn clean_layer_text(raw: &str) -> String {
    raw.replace('\u{000C}', "\n").replace('\u{0000}', "")
}

/// Runs the extractor and downgrades any failure to empty text so one broken
/// document never stops the batch.
pub(super) fn extract_or_empty(extractor: &dyn TextExtractor, path: &Path) -> String {
    match extractor.extract_text(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(
                path = %path.display(),
                extractor = extractor.name(),
                error = %format!("{err:#}"),
                "text extraction failed; skipping document"
            );
            String::new()
        }
    }
}
