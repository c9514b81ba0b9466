use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NormalizeOutcome {
    Normalized,
    MissingLeadIn,
    MissingTrailer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct NormalizedRecord {
    pub text: String,
    pub outcome: NormalizeOutcome,
}

/// One component of a dotted section label, ordered numbers-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LabelPart<'a> {
    Number(u64),
    Letter(&'a str),
}

#[derive(Debug)]
pub(super) struct StructureNormalizer {
    label_token: Regex,
}

impl StructureNormalizer {
    pub(super) fn new() -> Result<Self> {
        Ok(Self {
            label_token: Regex::new(r"[0-9]+(?:\.(?:[0-9]+|[A-Z]))+")
                .context("failed to compile section label regex")?,
        })
    }

    /// Rewrites the structure list of `record` as a sorted `{a, b, ...}` set and
    /// prefixes the result with `human: `. Records without both delimiters are
    /// returned unchanged apart from the prefix.
    pub(super) fn normalize(&self, record: &str) -> NormalizedRecord {
        let Some(lead_in_at) = record.find(STRUCTURE_LEAD_IN) else {
            return pass_through(record, NormalizeOutcome::MissingLeadIn);
        };
        let after_lead_in = &record[lead_in_at + STRUCTURE_LEAD_IN.len()..];

        let Some(trailer_at) = after_lead_in.find(TEXT_CHUNK_MARKER) else {
            return pass_through(record, NormalizeOutcome::MissingTrailer);
        };
        let structure = &after_lead_in[..trailer_at];
        let chunk = &after_lead_in[trailer_at + TEXT_CHUNK_MARKER.len()..];

        let labels = self.structure_labels(structure);

        NormalizedRecord {
            text: format!(
                "{HUMAN_PREFIX}{STRUCTURE_LEAD_IN} {{{}}} {TEXT_CHUNK_MARKER}{chunk}",
                labels.join(", ")
            ),
            outcome: NormalizeOutcome::Normalized,
        }
    }

    /// Unique section labels found in `structure`, in section order.
    pub(super) fn structure_labels<'a>(&self, structure: &'a str) -> Vec<&'a str> {
        let unique: BTreeSet<&str> = self
            .label_token
            .find_iter(structure)
            .map(|token| token.as_str())
            .collect();

        let mut labels: Vec<&str> = unique.into_iter().collect();
        labels.sort_by(|a, b| compare_labels(a, b));
        labels
    }
}

fn pass_through(record: &str, outcome: NormalizeOutcome) -> NormalizedRecord {
    NormalizedRecord {
        text: format!("{HUMAN_PREFIX}{record}"),
        outcome,
    }
}

fn label_parts(label: &str) -> Vec<LabelPart<'_>> {
    label
        .split('.')
        .map(|part| match part.parse::<u64>() {
            Ok(number) => LabelPart::Number(number),
            Err(_) => LabelPart::Letter(part),
        })
        .collect()
}

/// `3.2 < 3.2.1 < 3.2.10 < 3.2.A < 3.2.P.1 < 3.2.S`; ties (e.g. `1.01` vs
/// `1.1`) fall back to plain string order.
pub(super) fn compare_labels(a: &str, b: &str) -> Ordering {
    label_parts(a).cmp(&label_parts(b)).then_with(|| a.cmp(b))
}
