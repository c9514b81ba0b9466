use super::*;

const OUTPUT_HEADER: &str = "text";

pub fn run(args: ExtractArgs) -> Result<()> {
    if args.workers == 0 {
        bail!("--workers must be at least 1");
    }
    if args.max_words == 0 {
        bail!("--max-words must be at least 1");
    }

    let (extractor, extractor_version) = extractor_for(args.extractor)?;
    run_with_extractor(&args, extractor.as_ref(), extractor_version)?;

    Ok(())
}

pub(super) fn run_with_extractor(
    args: &ExtractArgs,
    extractor: &dyn TextExtractor,
    extractor_version: Option<String>,
) -> Result<ExtractCounts> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("extract-{}", utc_compact_string(started_ts));

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| sidecar_manifest_path(&args.output));

    info!(
        source_dir = %args.source_dir.display(),
        output = %args.output.display(),
        run_id = %run_id,
        "starting extract"
    );

    let catalog = SectionCatalog::load(args.catalog_path.as_deref())?;

    // Sorted so `--limit` and seeded sampling do not depend on directory order.
    let mut paths = discover_documents(&args.source_dir)?;
    paths.sort();
    if let Some(limit) = args.limit {
        paths.truncate(limit);
    }
    info!(documents = paths.len(), "discovered source documents");

    ensure_parent_directory(&args.output)?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    writer
        .write_record([OUTPUT_HEADER])
        .with_context(|| format!("failed to write header to {}", args.output.display()))?;

    let settings = PipelineSettings {
        workers: args.workers,
        max_words: args.max_words,
        seed: args.seed,
    };
    let counts = run_pipeline(&paths, &catalog, extractor, settings, &mut writer)
        .with_context(|| format!("extract into {} failed", args.output.display()))?;

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(args),
        extractor: extractor.name().to_string(),
        extractor_version,
        workers: args.workers,
        max_words: args.max_words,
        seed: args.seed,
        catalog_source: describe_source(args.catalog_path.as_deref()),
        catalog_size: catalog.len(),
        paths: ExtractPaths {
            source_dir: args.source_dir.display().to_string(),
            output_path: args.output.display().to_string(),
            manifest_path: manifest_path.display().to_string(),
        },
        counts: counts.clone(),
        notes: vec![
            "Rows are written in task completion order, not discovery order.".to_string(),
        ],
    };

    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote extract run manifest");
    info!(
        written = counts.written,
        skipped_empty_text = counts.skipped_empty_text,
        skipped_unknown_label = counts.skipped_unknown_label,
        "extract completed"
    );

    Ok(counts)
}

pub(super) fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "ectd-corpus".to_string(),
        "extract".to_string(),
        "--source-dir".to_string(),
        args.source_dir.display().to_string(),
        "--output".to_string(),
        args.output.display().to_string(),
        "--workers".to_string(),
        args.workers.to_string(),
        "--extractor".to_string(),
        args.extractor.as_str().to_string(),
        "--max-words".to_string(),
        args.max_words.to_string(),
    ];

    if let Some(path) = &args.catalog_path {
        command.push("--catalog-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }
    if let Some(seed) = args.seed {
        command.push("--seed".to_string());
        command.push(seed.to_string());
    }
    if let Some(limit) = args.limit {
        command.push("--limit".to_string());
        command.push(limit.to_string());
    }

    command.join(" ")
}
