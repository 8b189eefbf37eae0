//! Names of import declarations

use serde::Serialize;
use std::fmt;

/// What one import declaration imports
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportName {
    /// Dotted name; for on-demand imports the container, without `.*`
    pub name: String,
    pub is_static: bool,
    pub on_demand: bool,
}

impl ImportName {
    pub fn single(name: &str, is_static: bool) -> Self {
        Self {
            name: name.to_string(),
            is_static,
            on_demand: false,
        }
    }

    pub fn on_demand(container: &str, is_static: bool) -> Self {
        Self {
            name: container.to_string(),
            is_static,
            on_demand: true,
        }
    }

    /// `a.b.C` or `a.b.*`
    pub fn parse(text: &str, is_static: bool) -> Self {
        match text.strip_suffix(".*") {
            Some(container) => Self::on_demand(container, is_static),
            None => Self::single(text, is_static),
        }
    }

    /// Package or type the import draws from
    pub fn container(&self) -> &str {
        if self.on_demand {
            &self.name
        } else {
            self.name.rsplit_once('.').map(|(c, _)| c).unwrap_or("")
        }
    }

    /// Simple name made visible, `*` for on-demand imports
    pub fn simple_name(&self) -> &str {
        if self.on_demand {
            "*"
        } else {
            self.name.rsplit_once('.').map(|(_, s)| s).unwrap_or(&self.name)
        }
    }

    /// Name as written after `import [static]`
    pub fn qualified(&self) -> String {
        if self.on_demand {
            format!("{}.*", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Whether this import makes `other` visible (itself, or its container on demand)
    pub fn covers(&self, other: &ImportName) -> bool {
        self.is_static == other.is_static
            && (self == other || (self.on_demand && !other.on_demand && other.container() == self.name))
    }

    /// Declaration text without trailing delimiter
    pub fn declaration(&self) -> String {
        if self.is_static {
            format!("import static {};", self.qualified())
        } else {
            format!("import {};", self.qualified())
        }
    }
}

impl fmt::Display for ImportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static {}", self.qualified())
        } else {
            f.write_str(&self.qualified())
        }
    }
}
