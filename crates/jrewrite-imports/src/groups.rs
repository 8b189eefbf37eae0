//! Import groups
//!
//! The configured order lists name prefixes; `#` marks static groups. An
//! import joins the group with the longest matching prefix of its kind.
//! Static imports without a group land in an implicit leading group, other
//! imports in an implicit trailing one.

use crate::name::ImportName;

#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupSpec {
    prefix: String,
    is_static: bool,
}

impl GroupSpec {
    fn matches(&self, name: &ImportName) -> bool {
        self.is_static == name.is_static
            && (self.prefix.is_empty()
                || name.name == self.prefix
                || name
                    .name
                    .strip_prefix(&self.prefix)
                    .is_some_and(|rest| rest.starts_with('.')))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Groups {
    specs: Vec<GroupSpec>,
}

impl Groups {
    pub fn new(order: &[String]) -> Self {
        let mut specs: Vec<GroupSpec> = order
            .iter()
            .map(|entry| match entry.strip_prefix('#') {
                Some(prefix) => GroupSpec {
                    prefix: prefix.to_string(),
                    is_static: true,
                },
                None => GroupSpec {
                    prefix: entry.clone(),
                    is_static: false,
                },
            })
            .collect();
        if !specs.iter().any(|s| s.is_static && s.prefix.is_empty()) {
            specs.insert(
                0,
                GroupSpec {
                    prefix: String::new(),
                    is_static: true,
                },
            );
        }
        if !specs.iter().any(|s| !s.is_static && s.prefix.is_empty()) {
            specs.push(GroupSpec {
                prefix: String::new(),
                is_static: false,
            });
        }
        Self { specs }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Index of the group `name` belongs to, in output order
    pub fn group_of(&self, name: &ImportName) -> usize {
        let mut best: Option<(usize, usize)> = None;
        for (index, spec) in self.specs.iter().enumerate() {
            if spec.matches(name) && best.map_or(true, |(_, len)| spec.prefix.len() > len) {
                best = Some((index, spec.prefix.len()));
            }
        }
        // every kind has a catch-all
        best.map_or(self.specs.len() - 1, |(index, _)| index)
    }

    /// Names bucketed by group, each bucket sorted by qualified name
    pub fn arrange<T>(&self, items: Vec<T>, name: impl Fn(&T) -> &ImportName) -> Vec<Vec<T>> {
        let mut buckets: Vec<Vec<T>> = (0..self.len()).map(|_| Vec::new()).collect();
        for item in items {
            let group = self.group_of(name(&item));
            buckets[group].push(item);
        }
        for bucket in &mut buckets {
            bucket.sort_by_key(|item| name(item).qualified());
        }
        buckets.retain(|b| !b.is_empty());
        buckets
    }
}
