use std::io::Write;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum TaskOutcome {
    Record(String),
    SkippedEmptyText,
    SkippedUnknownLabel,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct PipelineSettings {
    pub workers: usize,
    pub max_words: usize,
    pub seed: Option<u64>,
}

pub(super) fn process_document<R: Rng + ?Sized>(
    path: &Path,
    catalog: &SectionCatalog,
    extractor: &dyn TextExtractor,
    max_words: usize,
    rng: &mut R,
) -> TaskOutcome {
    let Some(label) = label_for(path).filter(|label| catalog.contains(label)) else {
        warn!(path = %path.display(), "label not found in section catalog; skipping document");
        return TaskOutcome::SkippedUnknownLabel;
    };

    let text = extract_or_empty(extractor, path);
    if text.trim().is_empty() {
        debug!(path = %path.display(), "no text extracted");
        return TaskOutcome::SkippedEmptyText;
    }

    match sample_structure(&label, catalog, rng) {
        Some(sample) => TaskOutcome::Record(format_record(&sample, &text, &label, max_words)),
        None => TaskOutcome::SkippedUnknownLabel,
    }
}

/// Seeded runs derive one generator per document index so output does not
/// depend on which worker picked the document up.
fn document_rng(seed: Option<u64>, index: usize) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64)),
        None => StdRng::from_entropy(),
    }
}

/// Fans `paths` out over `settings.workers` threads and writes each record as
/// its task completes. Only the calling thread touches `writer`.
pub(super) fn run_pipeline<W: Write>(
    paths: &[PathBuf],
    catalog: &SectionCatalog,
    extractor: &dyn TextExtractor,
    settings: PipelineSettings,
    writer: &mut csv::Writer<W>,
) -> Result<ExtractCounts> {
    let mut counts = ExtractCounts {
        discovered: paths.len(),
        ..ExtractCounts::default()
    };
    if paths.is_empty() {
        return Ok(counts);
    }

    let worker_count = settings.workers.clamp(1, paths.len());
    let cursor = AtomicUsize::new(0);
    let (sender, receiver) = mpsc::channel::<TaskOutcome>();

    thread::scope(|scope| -> Result<()> {
        for worker in 0..worker_count {
            let sender = sender.clone();
            let cursor = &cursor;
            scope.spawn(move || {
                loop {
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(path) = paths.get(index) else {
                        break;
                    };

                    let mut rng = document_rng(settings.seed, index);
                    let outcome =
                        process_document(path, catalog, extractor, settings.max_words, &mut rng);
                    if sender.send(outcome).is_err() {
                        break;
                    }
                }
                debug!(worker, "extract worker finished");
            });
        }
        drop(sender);

        for outcome in receiver {
            counts.processed += 1;
            match outcome {
                TaskOutcome::Record(record) => {
                    writer
                        .write_record([record.as_str()])
                        .context("failed to write corpus row")?;
                    counts.written += 1;
                }
                TaskOutcome::SkippedEmptyText => counts.skipped_empty_text += 1,
                TaskOutcome::SkippedUnknownLabel => counts.skipped_unknown_label += 1,
            }

            if counts.processed % 100 == 0 {
                info!(
                    processed = counts.processed,
                    total = counts.discovered,
                    written = counts.written,
                    "extract progress"
                );
            }
        }

        Ok(())
    })?;

    writer.flush().context("failed to flush corpus output")?;
    Ok(counts)
}
