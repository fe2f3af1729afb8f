use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One release as handed to the renderer by the metadata collaborator.
///
/// Every text field may be empty; empty fields render as empty regions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseRecord {
    /// Release title, wrapped in the left panel.
    pub title: String,
    /// Display text, already formatted (for example `2024/3/6`).
    pub release_date: String,
    /// Credited artists, at most two lines on the card.
    pub artist_line: String,
    /// Where the cover image came from; informational only.
    pub cover_ref: Option<String>,
    /// Tracklist in disc order.
    pub tracks: Vec<Track>,
}

/// Tracklist entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Number shown in front of the title.
    pub number: TrackNumber,
    /// Track title.
    pub title: String,
    /// Credit lines in source order.
    #[serde(default)]
    pub staff: Vec<String>,
}

impl Track {
    /// Track without staff lines.
    pub fn new(number: TrackNumber, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            staff: Vec::new(),
        }
    }

    /// Append staff lines.
    pub fn with_staff<I, S>(mut self, staff: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.staff.extend(staff.into_iter().map(Into::into));
        self
    }

    /// Main row text, `"{number} {title}"`.
    pub fn display_line(&self) -> String {
        format!("{} {}", self.number, self.title)
    }

    /// Staff lines joined into the single string that gets wrapped under the main row.
    pub fn joined_staff(&self, separator: &str) -> Option<String> {
        if self.staff.is_empty() {
            None
        } else {
            Some(self.staff.join(separator))
        }
    }
}

/// Two-digit, zero-padded track number.
///
/// JSON accepts an integer (`3`) or a one/two-digit string (`"3"`, `"03"`); both
/// normalize to `"03"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackNumber(u8);

impl TrackNumber {
    /// `None` above 99.
    pub fn new(n: u8) -> Option<Self> {
        (n <= 99).then_some(Self(n))
    }

    /// Parse one or two ASCII digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse::<u8>().ok().and_then(Self::new)
    }

    /// Numeric value.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Zero-padded display form, e.g. `"03"`.
    pub fn as_padded(self) -> String {
        format!("{:02}", self.0)
    }
}

impl fmt::Display for TrackNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl Serialize for TrackNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_padded())
    }
}

impl<'de> Deserialize<'de> for TrackNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(u64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => u8::try_from(n)
                .ok()
                .and_then(Self::new)
                .ok_or_else(|| serde::de::Error::custom(format!("track number {n} out of range"))),
            Raw::Str(s) => Self::parse(&s).ok_or_else(|| {
                serde::de::Error::custom(format!("track number '{s}' is not one or two digits"))
            }),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/record.rs"]
mod tests;
