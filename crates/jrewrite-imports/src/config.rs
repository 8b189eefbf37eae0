//! Import ordering and folding options

use jrewrite_core::LineEnding;
use serde::{Deserialize, Serialize};

/// Options of an import rewrite, loadable from the `[imports]` table of a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Group prefixes in output order. `#` marks a static group, an empty
    /// entry (or `#` alone) is the catch-all for its kind.
    pub order: Vec<String>,
    /// Distinct single imports of one container that trigger an on-demand import
    pub on_demand_threshold: usize,
    pub static_on_demand_threshold: usize,
    pub blank_lines_between_groups: usize,
    /// Skip `java.lang` types and types of the unit's own package
    pub filter_implicit_imports: bool,
    /// Line delimiter for sources that have none yet
    pub line_ending: LineEnding,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            on_demand_threshold: 99,
            static_on_demand_threshold: 99,
            blank_lines_between_groups: 1,
            filter_implicit_imports: true,
            line_ending: LineEnding::Lf,
        }
    }
}

impl ImportConfig {
    /// Parse a semicolon or comma separated order (`java;javax;;#`).
    ///
    /// Empty entries are kept: they name the non-static catch-all group.
    pub fn parse_order(list: &str) -> Vec<String> {
        if list.trim().is_empty() {
            return Vec::new();
        }
        list.split([';', ',']).map(|s| s.trim().to_string()).collect()
    }
}
