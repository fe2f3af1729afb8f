use crate::text::measure::TextMeasure;

/// Greedy, character-granular line breaking.
///
/// Breaks may fall between any two characters; CJK text has no spaces to break on and
/// source strings mix scripts freely. A character wider than `max_width` on its own
/// still gets a line to itself, so concatenating the result always reproduces `text`.
pub fn wrap(measure: &dyn TextMeasure, text: &str, size_px: f32, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for ch in text.chars() {
        line.push(ch);
        if f64::from(measure.width(&line, size_px)) <= max_width {
            continue;
        }
        line.pop();
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        line.push(ch);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// [`wrap`], keeping only the first `max_lines` lines.
pub fn wrap_capped(
    measure: &dyn TextMeasure,
    text: &str,
    size_px: f32,
    max_width: f64,
    max_lines: usize,
) -> Vec<String> {
    let mut lines = wrap(measure, text, size_px, max_width);
    lines.truncate(max_lines);
    lines
}

/// First wrapped segment of `text`, or the empty string.
pub fn first_line(measure: &dyn TextMeasure, text: &str, size_px: f32, max_width: f64) -> String {
    wrap(measure, text, size_px, max_width)
        .into_iter()
        .next()
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
