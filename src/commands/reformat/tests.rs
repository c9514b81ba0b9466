use super::*;
use super::run::reformat_rows;

fn normalizer() -> StructureNormalizer {
    StructureNormalizer::new().unwrap()
}

#[test]
fn rewrites_structure_list_as_sorted_set() {
    let normalized = normalizer().normalize(
        "Given the user's current eCTD structure: [1.10, 1.2, 1.2] and the provided text chunk: X",
    );

    assert_eq!(normalized.outcome, NormalizeOutcome::Normalized);
    assert_eq!(
        normalized.text,
        "human: Given the user's current eCTD structure: {1.2, 1.10} and the provided text chunk: X"
    );
}

#[test]
fn normalizing_twice_is_stable() {
    let normalizer = normalizer();
    let inputs = [
        "human: Given the user's current eCTD structure: [3.2.S, 1.3.1, 3.2.A.1, 3.2] and the provided text chunk: Stability data bot: 3.2.S",
        "Given the user's current eCTD structure: [5.3.1.1,\n 1.12.10, 1.12.9] and the provided text chunk: multi\nline body",
    ];

    for input in inputs {
        let once = normalizer.normalize(input);
        let twice = normalizer.normalize(&once.text);
        assert_eq!(once, twice);
    }
}

#[test]
fn extractor_records_keep_a_single_human_prefix() {
    let normalized = normalizer().normalize(
        "human: Given the user's current eCTD structure: [1.1, 1.2] and the provided text chunk: Drug substance bot: 1.2",
    );

    assert_eq!(
        normalized.text,
        "human: Given the user's current eCTD structure: {1.1, 1.2} and the provided text chunk: Drug substance bot: 1.2"
    );
}

#[test]
fn structure_list_may_span_lines_and_odd_delimiters() {
    let normalized = normalizer().normalize(
        "Given the user's current eCTD structure:\n- 3.2.P.5.1\n- 3.2.P.5.10; (2.7.1)\nand the provided text chunk: body",
    );

    assert_eq!(
        normalized.text,
        "human: Given the user's current eCTD structure: {2.7.1, 3.2.P.5.1, 3.2.P.5.10} and the provided text chunk: body"
    );
}

#[test]
fn record_without_lead_in_passes_through() {
    let normalized = normalizer().normalize("plain row, no structure");

    assert_eq!(normalized.outcome, NormalizeOutcome::MissingLeadIn);
    assert_eq!(normalized.text, "human: plain row, no structure");
}

#[test]
fn record_without_trailer_is_flagged_not_duplicated() {
    let input = "Given the user's current eCTD structure: [1.1, 1.2] but the chunk marker is gone";
    let normalized = normalizer().normalize(input);

    assert_eq!(normalized.outcome, NormalizeOutcome::MissingTrailer);
    assert_eq!(normalized.text, format!("human: {input}"));
    assert_eq!(normalized.text.matches(STRUCTURE_LEAD_IN).count(), 1);
}

#[test]
fn empty_structure_list_becomes_empty_set() {
    let normalized = normalizer()
        .normalize("Given the user's current eCTD structure: [] and the provided text chunk: X");
    assert_eq!(
        normalized.text,
        "human: Given the user's current eCTD structure: {} and the provided text chunk: X"
    );
}

#[test]
fn label_tokens_follow_digit_and_letter_groups() {
    let labels = normalizer().structure_labels("[3.2.S.4.1, 3.2.AB, 12, v1.0, 1.x]");
    assert_eq!(labels, vec!["1.0", "3.2.A", "3.2.S.4.1"]);
}

#[test]
fn label_order_puts_numbers_before_letters_and_prefixes_first() {
    let mut labels = vec![
        "3.2.S", "3.2.P.1", "3.2.A", "3.2.10", "3.2", "3.2.1", "1.10", "1.9", "2.7.6",
    ];
    labels.sort_by(|a, b| compare_labels(a, b));

    assert_eq!(
        labels,
        vec!["1.9", "1.10", "2.7.6", "3.2", "3.2.1", "3.2.10", "3.2.A", "3.2.P.1", "3.2.S"]
    );
    assert_eq!(compare_labels("1.01", "1.1"), Ordering::Less);
}

#[test]
fn reformat_rows_writes_quoted_headerless_column() {
    let input = "id,content\n\
        1,\"Given the user's current eCTD structure: [1.3, 1.1] and the provided text chunk: a, \"\"quoted\"\"\nbody\"\n\
        2,no structure here\n\
        3\n";
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(input.as_bytes());
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    let counts = reformat_rows(&mut reader, &mut writer, "content", &normalizer()).unwrap();

    assert_eq!(
        counts,
        ReformatCounts {
            rows_read: 3,
            rows_written: 3,
            normalized: 1,
            missing_lead_in: 1,
            missing_trailer: 0,
            missing_column: 1,
            invalid_utf8_rows: 0,
        }
    );

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(
        output,
        "\"human: Given the user's current eCTD structure: {1.1, 1.3} and the provided text chunk: a, \"\"quoted\"\"\nbody\"\n\
         \"human: no structure here\"\n\
         \"\"\n"
    );
}

#[test]
fn reformat_rows_requires_the_content_column() {
    let mut reader = csv::Reader::from_reader("text\nhello\n".as_bytes());
    let mut writer = csv::Writer::from_writer(Vec::new());

    let err = reformat_rows(&mut reader, &mut writer, "content", &normalizer()).unwrap_err();
    assert!(err.to_string().contains("`content`"));
}

#[test]
fn reformat_rows_replaces_invalid_utf8_and_keeps_going() {
    let mut input = b"content\n".to_vec();
    input.extend_from_slice(b"caf\xe9 notes\n");
    input.extend_from_slice(
        b"\"Given the user's current eCTD structure: [2.2, 2.1] and the provided text chunk: ok\"\n",
    );
    let mut reader = csv::Reader::from_reader(input.as_slice());
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(Vec::new());

    let counts = reformat_rows(&mut reader, &mut writer, "content", &normalizer()).unwrap();

    assert_eq!(counts.rows_read, 2);
    assert_eq!(counts.rows_written, 2);
    assert_eq!(counts.invalid_utf8_rows, 1);
    assert_eq!(counts.normalized, 1);

    let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();
    assert_eq!(
        output,
        "\"human: caf\u{FFFD} notes\"\n\
         \"human: Given the user's current eCTD structure: {2.1, 2.2} and the provided text chunk: ok\"\n"
    );
}

#[test]
fn run_writes_train_csv_and_sidecar_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("restructured_train.csv");
    let output = dir.path().join("out").join("train.csv");
    fs::write(
        &input,
        "content\n\
         \"Given the user's current eCTD structure: [3.2.S, 1.10, 1.2] and the provided text chunk: body\"\n\
         plain row\n",
    )
    .unwrap();

    run(ReformatArgs {
        input: input.clone(),
        output: output.clone(),
        column: "content".to_string(),
        manifest_path: None,
    })
    .unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "\"human: Given the user's current eCTD structure: {1.2, 1.10, 3.2.S} and the provided text chunk: body\"\n\
         \"human: plain row\"\n"
    );
    assert!(!dir.path().join("out").join("train.csv.partial").exists());

    let manifest_path = dir.path().join("out").join("train.csv.manifest.json");
    let manifest: serde_json::Value =
        serde_json::from_slice(&fs::read(manifest_path).unwrap()).unwrap();
    assert_eq!(manifest["status"], "completed");
    assert_eq!(manifest["column"], "content");
    assert_eq!(manifest["counts"]["rows_read"], 2);
    assert_eq!(manifest["counts"]["rows_written"], 2);
    assert_eq!(manifest["counts"]["normalized"], 1);
    assert_eq!(manifest["counts"]["missing_lead_in"], 1);
    assert_eq!(manifest["counts"]["invalid_utf8_rows"], 0);
}

#[test]
fn run_leaves_no_output_when_the_column_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("train.csv");
    fs::write(&input, "text\nhello\n").unwrap();

    let err = run(ReformatArgs {
        input,
        output: output.clone(),
        column: "content".to_string(),
        manifest_path: None,
    })
    .unwrap_err();

    assert!(format!("{err:#}").contains("`content`"));
    assert!(!output.exists());
    assert!(!dir.path().join("train.csv.partial").exists());
    assert!(!dir.path().join("train.csv.manifest.json").exists());
}
