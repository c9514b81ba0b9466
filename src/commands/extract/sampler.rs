use super::*;

/// Draws a random structure view around `label`: between `MIN_SAMPLE_SIZE` and
/// `catalog.len()` labels, always including `label`, returned in catalog order.
///
/// Returns `None` when `label` is not part of the catalog.
pub(super) fn sample_structure<'a, R: Rng + ?Sized>(
    label: &str,
    catalog: &'a SectionCatalog,
    rng: &mut R,
) -> Option<Vec<&'a str>> {
    let target = catalog.position(label)?;
    let total = catalog.len();
    let size = rng.gen_range(MIN_SAMPLE_SIZE..=total);

    // Indices into the catalog with `target` removed; shift past the gap.
    let mut picked: Vec<usize> = rand::seq::index::sample(rng, total - 1, size - 1)
        .into_iter()
        .map(|index| if index >= target { index + 1 } else { index })
        .collect();
    picked.push(target);
    picked.sort_unstable();

    Some(
        picked
            .into_iter()
            .map(|index| catalog.labels()[index].as_str())
            .collect(),
    )
}
