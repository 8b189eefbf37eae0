//! Whitespace configuration shared by the rewrite engines

use serde::{Deserialize, Serialize};

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces(usize),
    /// Use tabs for indentation
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// Get the indentation string for one level
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }

    /// Get the number of columns one level occupies
    pub fn width(&self) -> usize {
        match self {
            IndentStyle::Spaces(n) => *n,
            IndentStyle::Tabs => 4, // Tab width for calculation purposes
        }
    }

    /// Parse from a config string
    /// e.g., "    " -> Spaces(4), "\t" -> Tabs, "2" -> Spaces(2)
    pub fn from_config(s: &str) -> Self {
        if s == "\t" || s == "\\t" || s.eq_ignore_ascii_case("tabs") {
            return IndentStyle::Tabs;
        }
        if let Ok(n) = s.trim().parse::<usize>() {
            return IndentStyle::Spaces(n);
        }
        let spaces = s.chars().filter(|c| *c == ' ').count();
        IndentStyle::Spaces(if spaces > 0 { spaces } else { 4 })
    }
}

/// Line ending style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,
    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Get the line ending string
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Detect the delimiter of the first line break in `source`, falling back to `fallback`
    pub fn detect(source: &str, fallback: LineEnding) -> LineEnding {
        match source.find('\n') {
            Some(i) if i > 0 && source.as_bytes()[i - 1] == b'\r' => LineEnding::CrLf,
            Some(_) => LineEnding::Lf,
            None => fallback,
        }
    }
}

/// Combined whitespace configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitespaceConfig {
    pub indent: IndentStyle,
    pub line_ending: LineEnding,
}

impl WhitespaceConfig {
    pub fn new(indent: IndentStyle, line_ending: LineEnding) -> Self {
        Self { indent, line_ending }
    }
}
