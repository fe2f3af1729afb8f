//! Heuristic extraction of a [`ReleaseRecord`] from the visible text of a release page.
//!
//! The caller strips markup and hands over the page text; this module only looks at
//! lines. Pages differ between labels, so every rule has a fallback and a miss leaves
//! the field empty instead of failing.

use crate::model::record::{ReleaseRecord, Track, TrackNumber};

const TITLE_MARKER: &str = "THE IDOLM@STER";
const DATE_LABEL: &str = "発売日";
const ARTIST_MARKER: &str = "CV.";
const ARTIST_LABEL: &str = "アーティスト";
const STAFF_KEYWORDS: [&str; 3] = ["作詞", "作曲", "編曲"];
const STOP_PREFIXES: [&str; 3] = ["text", "-->", "■"];

/// Visible text of a release page, as produced by the page collaborator.
#[derive(Clone, Debug, Default)]
pub struct ReleaseText {
    /// Main heading of the page, if the collaborator found one.
    pub heading: Option<String>,
    /// Resolved cover image URL, if any.
    pub cover_url: Option<String>,
    /// Page text split into lines. Blank lines are ignored.
    pub lines: Vec<String>,
}

impl ReleaseText {
    /// Page text with no heading or cover URL.
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
            ..Self::default()
        }
    }
}

/// Build a record from page text. Never fails; unknown fields stay empty.
pub fn extract_release(page: &ReleaseText) -> ReleaseRecord {
    let lines: Vec<&str> = page
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let title = page
        .heading
        .as_deref()
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_string)
        .or_else(|| {
            lines
                .iter()
                .find(|l| l.contains(TITLE_MARKER) && !l.contains("RELEASE"))
                .map(|l| l.to_string())
        })
        .unwrap_or_default();

    let artist_line = lines
        .iter()
        .find(|l| l.contains(ARTIST_MARKER))
        .or_else(|| lines.iter().find(|l| l.starts_with(ARTIST_LABEL)))
        .map(|l| l.to_string())
        .unwrap_or_default();

    ReleaseRecord {
        title,
        release_date: release_date(&lines),
        artist_line,
        cover_ref: page.cover_url.clone(),
        tracks: tracks(&lines),
    }
}

fn release_date(lines: &[&str]) -> String {
    if let Some(labelled) = lines.iter().find(|l| l.starts_with(DATE_LABEL))
        && let Some((_, rest)) = labelled.split_once('：')
    {
        let rest = rest.trim();
        if !rest.is_empty() {
            return rest.to_string();
        }
    }
    lines
        .iter()
        .find_map(|l| parse_release_stamp(l))
        .unwrap_or_default()
}

/// `YYYY.M.D RELEASE` (also `/` or `-` separated) to `YYYY/M/D`.
fn parse_release_stamp(line: &str) -> Option<String> {
    let (date, rest) = line.split_once(char::is_whitespace)?;
    let rest = rest.trim_start();
    let tail = rest.strip_prefix("RELEASE")?;
    if tail
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        return None;
    }

    let mut parts = date.split(['.', '/', '-']);
    let year = parts.next()?;
    let month = parts.next()?;
    let day = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    let digits = |s: &str, lo: usize, hi: usize| {
        (lo..=hi).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
    };
    if !digits(year, 4, 4) || !digits(month, 1, 2) || !digits(day, 1, 2) {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    Some(format!("{year}/{month}/{day}"))
}

fn tracks(lines: &[&str]) -> Vec<Track> {
    let mut out = Vec::new();
    let mut current: Option<Track> = None;
    for line in lines {
        if let Some((number, title)) = parse_track_line(line) {
            if let Some(done) = current.take() {
                out.push(done);
            }
            current = Some(Track::new(number, title));
            continue;
        }
        let Some(track) = current.as_mut() else {
            continue;
        };
        if STOP_PREFIXES.iter().any(|p| line.starts_with(p)) {
            continue;
        }
        if STAFF_KEYWORDS.iter().any(|k| line.contains(k)) {
            track.staff.push(line.to_string());
        }
    }
    out.extend(current);
    out
}

/// Track rows look like `01：Title`, `01:Title`, `1．Title` or `０１：Title`.
fn parse_track_line(line: &str) -> Option<(TrackNumber, String)> {
    let mut value: u16 = 0;
    let mut count = 0;
    let mut digits_end = line.len();
    for (i, c) in line.char_indices() {
        let Some(d) = digit_value(c) else {
            digits_end = i;
            break;
        };
        value = value * 10 + u16::from(d);
        count += 1;
    }
    if count == 0 || count > 2 {
        return None;
    }
    let number = TrackNumber::new(u8::try_from(value).ok()?)?;

    let rest = line[digits_end..].trim_start();
    let mut chars = rest.chars();
    let sep = chars.next()?;
    if !matches!(sep, '：' | ':' | '.' | '．') {
        return None;
    }
    let title = chars.as_str().trim();
    if title.is_empty() {
        return None;
    }
    Some((number, title.to_string()))
}

/// ASCII and full-width decimal digits.
fn digit_value(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        '\u{FF10}'..='\u{FF19}' => u8::try_from(u32::from(c) - 0xFF10).ok(),
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/extract.rs"]
mod tests;
