//! Formatting options for freshly created code
//!
//! Only new and replacement subtrees are printed with these options; text
//! taken from the original source is never reformatted.

use jrewrite_core::{IndentStyle, LineEnding, WhitespaceConfig};
use serde::{Deserialize, Serialize};

/// Options consumed by the printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    #[serde(flatten)]
    pub whitespace: WhitespaceConfig,
    /// `a + b` rather than `a+b`
    pub space_around_binary_operators: bool,
    /// `a = b` rather than `a=b`
    pub space_around_assignment_operators: bool,
    pub space_after_comma: bool,
    /// `@Annotation (x)` rather than `@Annotation(x)`
    pub space_before_annotation_paren: bool,
    /// Blank lines inserted between type members
    pub blank_lines_between_members: usize,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            whitespace: WhitespaceConfig::default(),
            space_around_binary_operators: true,
            space_around_assignment_operators: true,
            space_after_comma: true,
            space_before_annotation_paren: false,
            blank_lines_between_members: 1,
        }
    }
}

impl FormattingConfig {
    pub fn indent_unit(&self) -> String {
        self.whitespace.indent.unit()
    }

    /// Line delimiter for a source: the one it already uses, else the configured one
    pub fn line_delimiter(&self, source: &str) -> &'static str {
        LineEnding::detect(source, self.whitespace.line_ending).as_str()
    }

    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.whitespace.indent = indent;
        self
    }

    pub(crate) fn binary(&self, op: &str) -> String {
        if self.space_around_binary_operators {
            format!(" {} ", op)
        } else {
            op.to_string()
        }
    }

    pub(crate) fn assignment(&self, op: &str) -> String {
        if self.space_around_assignment_operators {
            format!(" {} ", op)
        } else {
            op.to_string()
        }
    }

    pub(crate) fn comma(&self) -> &'static str {
        if self.space_after_comma {
            ", "
        } else {
            ","
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormattingConfig::default();
        assert_eq!(config.binary("+"), " + ");
        assert_eq!(config.assignment("+="), " += ");
        assert_eq!(config.comma(), ", ");
        assert_eq!(config.indent_unit(), "    ");
    }

    #[test]
    fn test_compact_operators() {
        let config = FormattingConfig {
            space_around_binary_operators: false,
            space_after_comma: false,
            ..Default::default()
        };
        assert_eq!(config.binary("*"), "*");
        assert_eq!(config.comma(), ",");
    }

    #[test]
    fn test_line_delimiter_follows_source() {
        let config = FormattingConfig::default();
        assert_eq!(config.line_delimiter("a\r\nb"), "\r\n");
        assert_eq!(config.line_delimiter("single line"), "\n");
    }
}
