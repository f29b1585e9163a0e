use std::fmt;

/// Row of `megadisp_source`, the operator's preferred feed.
#[derive(Debug, Clone, Default, PartialEq, sqlx::FromRow)]
pub struct SourcePreferenceRow {
    pub source: Option<String>,
}

/// Upstream feed a reading snapshot is taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SourceTag {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "ABT"))]
    Abt,
    #[cfg_attr(feature = "serde", serde(rename = "YOKOGAWA"))]
    Yokogawa,
}

impl SourceTag {
    /// Maps a stored preference onto a tag.
    ///
    /// Only a case-insensitive `YOKOGAWA` selects the logger feed; null,
    /// empty and unknown values all mean ABT.
    pub fn from_preference(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.eq_ignore_ascii_case("YOKOGAWA") => SourceTag::Yokogawa,
            _ => SourceTag::Abt,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::Abt => "ABT",
            SourceTag::Yokogawa => "YOKOGAWA",
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
