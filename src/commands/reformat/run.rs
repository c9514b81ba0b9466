use super::*;

pub fn run(args: ReformatArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("reformat-{}", utc_compact_string(started_ts));

    let manifest_path = args
        .manifest_path
        .clone()
        .unwrap_or_else(|| sidecar_manifest_path(&args.output));

    info!(
        input = %args.input.display(),
        output = %args.output.display(),
        column = %args.column,
        run_id = %run_id,
        "starting reformat"
    );

    let normalizer = StructureNormalizer::new()?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(&args.input)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    // Rows go to a staging file first so a failed run never leaves a partial output.
    ensure_parent_directory(&args.output)?;
    let staging_path = staging_path_for(&args.output);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_path(&staging_path)
        .with_context(|| format!("failed to create {}", staging_path.display()))?;

    let counts = match reformat_rows(&mut reader, &mut writer, &args.column, &normalizer) {
        Ok(counts) => counts,
        Err(err) => {
            drop(writer);
            if let Err(remove_err) = fs::remove_file(&staging_path) {
                warn!(path = %staging_path.display(), error = %remove_err, "failed to remove staging file");
            }
            return Err(err.context(format!("failed to reformat {}", args.input.display())));
        }
    };
    drop(writer);
    fs::rename(&staging_path, &args.output).with_context(|| {
        format!(
            "failed to move {} to {}",
            staging_path.display(),
            args.output.display()
        )
    })?;

    let manifest = ReformatRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_reformat_command(&args),
        input_path: args.input.display().to_string(),
        output_path: args.output.display().to_string(),
        column: args.column.clone(),
        counts: counts.clone(),
    };
    write_json_pretty(&manifest_path, &manifest)?;

    info!(path = %manifest_path.display(), "wrote reformat run manifest");
    info!(
        rows = counts.rows_written,
        normalized = counts.normalized,
        missing_lead_in = counts.missing_lead_in,
        missing_trailer = counts.missing_trailer,
        missing_column = counts.missing_column,
        invalid_utf8_rows = counts.invalid_utf8_rows,
        "reformat completed"
    );

    Ok(())
}

/// Streams `column` of every input row through the normalizer into a
/// single-column, headerless output.
pub(super) fn reformat_rows<R: Read, W: Write>(
    reader: &mut csv::Reader<R>,
    writer: &mut csv::Writer<W>,
    column: &str,
    normalizer: &StructureNormalizer,
) -> Result<ReformatCounts> {
    let headers = reader.headers().context("failed to read CSV header")?.clone();
    let Some(column_index) = headers.iter().position(|name| name.trim() == column) else {
        bail!(
            "input has no `{column}` column (found: {})",
            headers.iter().collect::<Vec<_>>().join(", ")
        );
    };

    let mut counts = ReformatCounts::default();
    for (row, record) in reader.byte_records().enumerate() {
        let row = row + 1;
        let record = record.with_context(|| format!("failed to read CSV row {row}"))?;
        counts.rows_read += 1;

        let Some(raw) = record.get(column_index) else {
            counts.missing_column += 1;
            warn!(row, "row has no `{column}` field; writing an empty record");
            writer
                .write_record([""])
                .with_context(|| format!("failed to write output row {row}"))?;
            counts.rows_written += 1;
            continue;
        };

        let content = String::from_utf8_lossy(raw);
        if let Cow::Owned(_) = content {
            counts.invalid_utf8_rows += 1;
            warn!(row, "invalid UTF-8 replaced with U+FFFD");
        }

        let normalized = normalizer.normalize(&content);
        match normalized.outcome {
            NormalizeOutcome::Normalized => counts.normalized += 1,
            NormalizeOutcome::MissingLeadIn => {
                counts.missing_lead_in += 1;
                debug!(row, "no structure list found; passing record through");
            }
            NormalizeOutcome::MissingTrailer => {
                counts.missing_trailer += 1;
                warn!(
                    row,
                    "structure list is not closed by the text-chunk marker; passing record through"
                );
            }
        }

        writer
            .write_record([normalized.text.as_str()])
            .with_context(|| format!("failed to write output row {row}"))?;
        counts.rows_written += 1;
    }

    writer.flush().context("failed to flush reformat output")?;
    Ok(counts)
}

/// `train.csv` -> `train.csv.partial`
fn staging_path_for(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("reformat"));
    name.push(".partial");
    output.with_file_name(name)
}

fn render_reformat_command(args: &ReformatArgs) -> String {
    let mut command = vec![
        "ectd-corpus".to_string(),
        "reformat".to_string(),
        "--input".to_string(),
        args.input.display().to_string(),
        "--output".to_string(),
        args.output.display().to_string(),
        "--column".to_string(),
        args.column.clone(),
    ];

    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}
