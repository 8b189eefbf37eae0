//! Type information consulted while reconciling imports
//!
//! Import rewriting needs only two answers from the project model: whether
//! the unit can resolve anything at all, and which simple names a container
//! exports. Everything else is decided from the source text.

use std::collections::{HashMap, HashSet};

pub trait TypeOracle: Send + Sync {
    /// Whether the unit belongs to a resolvable project; when it does not,
    /// additions are dropped and removals still apply
    fn is_on_classpath(&self) -> bool {
        true
    }

    /// Simple names of the types (or static members) of a package or type,
    /// `None` when unknown
    fn container_types(&self, container: &str) -> Option<Vec<String>>;
}

/// Oracle for units without project information: always resolvable, no
/// known container contents
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypeInfo;

impl TypeOracle for NoTypeInfo {
    fn container_types(&self, _container: &str) -> Option<Vec<String>> {
        None
    }
}

/// Oracle backed by a fixed table of container contents
#[derive(Debug, Clone, Default)]
pub struct KnownTypes {
    containers: HashMap<String, HashSet<String>>,
    on_classpath: bool,
}

impl KnownTypes {
    pub fn new() -> Self {
        Self {
            containers: HashMap::new(),
            on_classpath: true,
        }
    }

    /// A unit outside any project
    pub fn detached() -> Self {
        Self {
            containers: HashMap::new(),
            on_classpath: false,
        }
    }

    pub fn with_container<I, S>(mut self, container: &str, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.containers
            .entry(container.to_string())
            .or_default()
            .extend(types.into_iter().map(Into::into));
        self
    }
}

impl TypeOracle for KnownTypes {
    fn is_on_classpath(&self) -> bool {
        self.on_classpath
    }

    fn container_types(&self, container: &str) -> Option<Vec<String>> {
        self.containers.get(container).map(|types| {
            let mut names: Vec<String> = types.iter().cloned().collect();
            names.sort();
            names
        })
    }
}
