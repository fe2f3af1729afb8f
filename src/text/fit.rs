use crate::text::measure::TextMeasure;

/// Largest size from `candidates` (descending) at which `text` fits one line within
/// `width_budget`. Falls back to `min_size` when nothing fits; the text may then
/// overflow, which callers accept rather than wrapping.
pub fn fit_one_line(
    measure: &dyn TextMeasure,
    text: &str,
    width_budget: f64,
    candidates: &[f32],
    min_size: f32,
) -> f32 {
    candidates
        .iter()
        .copied()
        .find(|&size| f64::from(measure.width(text, size)) <= width_budget)
        .unwrap_or(min_size)
}

#[cfg(test)]
#[path = "../../tests/unit/text/fit.rs"]
mod tests;
