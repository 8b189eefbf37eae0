//! Import rewrite sessions
//!
//! A session reads the import header of one compilation unit, collects
//! additions and removals, and computes the edit that turns the existing
//! import block into the requested one.

use crate::config::ImportConfig;
use crate::emit::{minimal_edit, render_block, Entry};
use crate::error::Result;
use crate::groups::Groups;
use crate::name::ImportName;
use crate::oracle::{NoTypeInfo, TypeOracle};
use crate::record::{build_records, ImportRecord};
use crate::section::{scan, Header};
use crate::trivia::{blank_line_between, classify, Trivia};
use jrewrite_core::{logging, Edit, LineEnding, Span};
use jrewrite_syntax::{leaves, parse_tree};

const SESSION: &str = "import-rewrite";

pub struct ImportRewrite<'a> {
    source: &'a str,
    header: Header,
    trivia: Vec<Trivia>,
    records: Vec<ImportRecord>,
    config: ImportConfig,
    oracle: Box<dyn TypeOracle>,
    restore_existing: bool,
    added: Vec<ImportName>,
    removed: Vec<ImportName>,
}

impl<'a> ImportRewrite<'a> {
    /// Open a session on a unit.
    ///
    /// With `restore_existing` false the existing imports are dropped and the
    /// block is rebuilt from the additions alone.
    pub fn create(source: &'a str, restore_existing: bool) -> Result<Self> {
        let tree = parse_tree(source)?;
        let lexed = leaves(&tree, source);
        let header = scan(source, tree.root_node())?;
        let trivia = classify(source, &lexed.tokens, &lexed.comments);
        let records = build_records(source, &header, &trivia);
        Ok(Self {
            source,
            header,
            trivia,
            records,
            config: ImportConfig::default(),
            oracle: Box::new(NoTypeInfo),
            restore_existing,
            added: Vec::new(),
            removed: Vec::new(),
        })
    }

    pub fn with_oracle(mut self, oracle: Box<dyn TypeOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn with_config(mut self, config: ImportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn set_import_order(&mut self, order: Vec<String>) {
        self.config.order = order;
    }

    pub fn set_on_demand_threshold(&mut self, threshold: usize) {
        self.config.on_demand_threshold = threshold;
    }

    pub fn set_static_on_demand_threshold(&mut self, threshold: usize) {
        self.config.static_on_demand_threshold = threshold;
    }

    pub fn set_restore_existing(&mut self, restore: bool) {
        self.restore_existing = restore;
    }

    pub fn set_filter_implicit_imports(&mut self, filter: bool) {
        self.config.filter_implicit_imports = filter;
    }

    pub fn set_blank_lines_between_groups(&mut self, lines: usize) {
        self.config.blank_lines_between_groups = lines;
    }

    /// Imports declared in the unit, in source order
    pub fn existing_imports(&self) -> Vec<ImportName> {
        self.records.iter().map(|r| r.name.clone()).collect()
    }

    pub fn added_imports(&self) -> &[ImportName] {
        &self.added
    }

    pub fn removed_imports(&self) -> &[ImportName] {
        &self.removed
    }

    /// Package of the unit, if it declares one
    pub fn package(&self) -> Option<&str> {
        self.header.package.as_ref().map(|p| p.name.as_str())
    }

    // ==================== Requests ====================

    /// Request an import of a type (or `pkg.*`).
    ///
    /// Returns the name code should use: the simple name when the type is
    /// or becomes visible, the qualified name when another import already
    /// claims the simple name or nothing can be imported.
    pub fn add_import(&mut self, qualified: &str) -> String {
        self.add(ImportName::parse(qualified.trim(), false))
    }

    /// Request a static import of `member` of `declaring_type`
    pub fn add_static_import(&mut self, declaring_type: &str, member: &str, is_field: bool) -> String {
        logging::log(&format!(
            "static {} import {}.{}",
            if is_field { "field" } else { "method" },
            declaring_type,
            member
        ));
        self.add(ImportName::parse(&format!("{}.{}", declaring_type, member), true))
    }

    /// Remove an import (or `pkg.*`); false when there is no such import
    pub fn remove_import(&mut self, qualified: &str) -> bool {
        self.remove(ImportName::parse(qualified.trim(), false))
    }

    /// Remove a static import given as `Type.member` or `Type.*`
    pub fn remove_static_import(&mut self, qualified: &str) -> bool {
        self.remove(ImportName::parse(qualified.trim(), true))
    }

    fn add(&mut self, name: ImportName) -> String {
        let visible = if name.on_demand {
            name.qualified()
        } else {
            name.simple_name().to_string()
        };
        if name.container().is_empty() {
            return visible;
        }
        // A single import of another type with this simple name hides even
        // java.lang and same-package types
        if let Some(conflict) = self.single_import_conflict(&name) {
            logging::log_rejected(SESSION, &format!("{} conflicts with {}", name, conflict));
            return name.name;
        }
        if !name.is_static && !name.on_demand && self.is_implicit(&name) {
            return visible;
        }
        if let Some(pos) = self.removed.iter().position(|r| *r == name) {
            self.removed.remove(pos);
        }
        if self.current_names().iter().any(|c| c.covers(&name)) {
            return visible;
        }
        if !self.oracle.is_on_classpath() {
            logging::log_rejected(SESSION, &format!("{} cannot be resolved outside a project", name));
            return name.name;
        }
        self.added.push(name);
        visible
    }

    /// Single import of the same kind that binds the simple name of `name`
    /// to a different type
    fn single_import_conflict(&self, name: &ImportName) -> Option<ImportName> {
        if name.on_demand {
            return None;
        }
        self.current_names().into_iter().find(|c| {
            !c.on_demand && c.is_static == name.is_static && c != name && c.simple_name() == name.simple_name()
        })
    }

    fn remove(&mut self, name: ImportName) -> bool {
        if let Some(pos) = self.added.iter().position(|a| *a == name) {
            self.added.remove(pos);
            return true;
        }
        if self.records.iter().any(|r| r.name == name) && !self.removed.contains(&name) {
            self.removed.push(name);
            return true;
        }
        false
    }

    /// Types visible without an import
    fn is_implicit(&self, name: &ImportName) -> bool {
        self.config.filter_implicit_imports
            && (name.container() == "java.lang" || self.package() == Some(name.container()))
    }

    /// Imports the block would hold if it were written now, before folding
    fn current_names(&self) -> Vec<ImportName> {
        let mut names: Vec<ImportName> = Vec::new();
        if self.restore_existing {
            names.extend(
                self.records
                    .iter()
                    .filter(|r| !self.removed.contains(&r.name))
                    .map(|r| r.name.clone()),
            );
        }
        names.extend(self.added.iter().cloned());
        names
    }

    // ==================== Reconciliation ====================

    /// Edits turning the import block into the requested one; empty when
    /// nothing changes
    pub fn rewrite_imports(&self) -> Result<Vec<Edit>> {
        let (entries, changed) = self.plan();
        if !changed {
            return Ok(Vec::new());
        }
        let ld = LineEnding::detect(self.source, self.config.line_ending).as_str();
        let groups = Groups::new(&self.config.order);
        let arranged = groups.arrange(entries, |e| &e.name);
        let block = render_block(
            self.source,
            &self.records,
            &arranged,
            ld,
            self.config.blank_lines_between_groups,
        );
        let edits: Vec<Edit> = self.block_edit(&block, ld).into_iter().collect();
        logging::log_edits_emitted(SESSION, edits.len());
        Ok(edits)
    }

    /// Source text with the import edits applied
    pub fn rewrite_source(&self) -> Result<String> {
        let edits = self.rewrite_imports()?;
        Ok(jrewrite_core::apply_edits(self.source, &edits)?)
    }

    /// Entries of the new block and whether it differs from the old one
    fn plan(&self) -> (Vec<Entry>, bool) {
        let mut entries: Vec<Entry> = Vec::new();
        let mut changed = false;
        if self.restore_existing {
            for (i, record) in self.records.iter().enumerate() {
                if self.removed.contains(&record.name) {
                    changed = true;
                } else {
                    entries.push(Entry::new(record.name.clone(), Some(i)));
                }
            }
        } else {
            changed = !self.records.is_empty();
        }

        let mut containers: Vec<(String, bool)> = Vec::new();
        for name in &self.added {
            if entries.iter().any(|e| e.name.covers(name)) {
                continue;
            }
            let record = if self.restore_existing {
                None
            } else {
                self.records.iter().position(|r| r.name == *name)
            };
            entries.push(Entry::new(name.clone(), record));
            if !name.on_demand {
                containers.push((name.container().to_string(), name.is_static));
            }
            changed = true;
        }

        if !self.restore_existing {
            self.unfold(&mut entries);
            containers = entries
                .iter()
                .filter(|e| !e.name.on_demand)
                .map(|e| (e.name.container().to_string(), e.name.is_static))
                .collect();
        }
        containers.sort();
        containers.dedup();
        for (container, is_static) in containers {
            self.fold(&mut entries, &container, is_static);
        }
        (entries, changed)
    }

    /// Hand the comments of dropped on-demand imports to the first single
    /// import of the same container
    fn unfold(&self, entries: &mut [Entry]) {
        for (i, record) in self.records.iter().enumerate() {
            if !record.name.on_demand || !record.has_comments() || entries.iter().any(|e| e.comment_owners().contains(&i)) {
                continue;
            }
            let heir = entries.iter_mut().find(|e| {
                !e.name.on_demand
                    && e.name.is_static == record.name.is_static
                    && e.name.container() == record.name.name
            });
            if let Some(heir) = heir {
                logging::log(&format!("unfold {} into {}", record.name, heir.name));
                heir.absorbed.push(i);
            }
        }
    }

    /// Replace the single imports of a container by an on-demand import once
    /// enough distinct ones exist
    fn fold(&self, entries: &mut Vec<Entry>, container: &str, is_static: bool) {
        let threshold = if is_static {
            self.config.static_on_demand_threshold
        } else {
            self.config.on_demand_threshold
        }
        .max(1);

        let shadowed = self.shadowed_names(entries, container, is_static);
        let foldable = |e: &Entry| {
            !e.name.on_demand
                && e.name.is_static == is_static
                && e.name.container() == container
                && !shadowed.iter().any(|s| s == e.name.simple_name())
        };
        let mut distinct: Vec<&str> = entries.iter().filter(|e| foldable(e)).map(|e| e.name.name.as_str()).collect();
        distinct.sort_unstable();
        distinct.dedup();
        let count = distinct.len();
        if count < threshold {
            return;
        }

        let mut owners: Vec<usize> = Vec::new();
        entries.retain(|e| {
            if foldable(e) {
                owners.extend(e.comment_owners());
                false
            } else {
                true
            }
        });
        logging::log(&format!("fold {} imports of {} into an on-demand import", count, container));

        let on_demand = ImportName::on_demand(container, is_static);
        match entries.iter_mut().find(|e| e.name == on_demand) {
            Some(existing) => existing.absorbed.extend(owners),
            None => {
                let record = self.records.iter().position(|r| r.name == on_demand);
                entries.push(Entry {
                    name: on_demand,
                    record,
                    absorbed: owners,
                });
            }
        }
    }

    /// Simple names of `container` that another on-demand import in the block
    /// also exports; those imports must stay explicit
    fn shadowed_names(&self, entries: &[Entry], container: &str, is_static: bool) -> Vec<String> {
        let mut shadowed = Vec::new();
        for other in entries
            .iter()
            .filter(|e| e.name.on_demand && e.name.is_static == is_static && e.name.name != container)
        {
            if let Some(types) = self.oracle.container_types(&other.name.name) {
                shadowed.extend(types);
            }
        }
        shadowed
    }

    // ==================== Placement ====================

    fn block_edit(&self, block: &str, ld: &str) -> Option<Edit> {
        let source = self.source;
        if let (Some(first), Some(last)) = (self.records.first(), self.records.last()) {
            let region = Span::new(first.extended().start, last.extended().end);
            if block.is_empty() {
                let rest = &source[region.end..];
                let end = source.len() - rest.trim_start().len();
                return Some(Edit::delete(Span::new(region.start, end), "remove imports"));
            }
            return minimal_edit(source, region, block);
        }

        if block.is_empty() {
            return None;
        }
        if let Some(package) = &self.header.package {
            return Some(Edit::insert(
                self.line_end_after(package.span.end),
                format!("{ld}{ld}{block}"),
                "add imports",
            ));
        }
        match self.header.body_start {
            Some(body) => Some(Edit::insert(
                self.attached_start(body),
                format!("{block}{ld}{ld}"),
                "add imports",
            )),
            None => {
                let text = if source.trim().is_empty() {
                    format!("{block}{ld}")
                } else {
                    format!("{ld}{block}{ld}")
                };
                Some(Edit::insert(source.len(), text, "add imports"))
            }
        }
    }

    /// End of the comments that trail `offset` on its own line
    fn line_end_after(&self, offset: usize) -> usize {
        let mut end = offset;
        for trivia in self.trivia.iter().filter(|t| t.span.start >= offset) {
            if self.source[end..trivia.span.start].contains('\n') {
                break;
            }
            end = trivia.span.end;
        }
        end
    }

    /// Start of the comments directly attached to the token at `offset`
    fn attached_start(&self, offset: usize) -> usize {
        let mut start = offset;
        for trivia in self.trivia.iter().rev().filter(|t| t.span.end <= offset) {
            if blank_line_between(self.source, trivia.span.end, start) {
                break;
            }
            start = trivia.span.start;
        }
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::KnownTypes;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_add_returns_visible_name() {
        let source = "package p;\n\nimport java.util.List;\n\nclass A {}\n";
        let mut rewrite = ImportRewrite::create(source, true).unwrap();
        assert_eq!(rewrite.add_import("java.util.List"), "List");
        assert_eq!(rewrite.add_import("java.awt.List"), "java.awt.List");
        assert_eq!(rewrite.add_import("java.lang.String"), "String");
        assert_eq!(rewrite.add_import("p.Sibling"), "Sibling");
        assert_eq!(rewrite.add_import("java.util.Map"), "Map");
        assert_eq!(rewrite.added_imports(), &[ImportName::single("java.util.Map", false)]);
    }

    #[test]
    fn test_explicit_import_hides_implicit_type() {
        let source = "package p;\n\nimport q.String;\nimport r.Sibling;\n\nclass A {}\n";
        let mut rewrite = ImportRewrite::create(source, true).unwrap();
        assert_eq!(rewrite.add_import("java.lang.String"), "java.lang.String");
        assert_eq!(rewrite.add_import("p.Sibling"), "p.Sibling");
        assert_eq!(rewrite.add_import("q.String"), "String");
        assert_eq!(rewrite.add_import("java.lang.Integer"), "Integer");
        assert!(rewrite.added_imports().is_empty());
    }

    #[test]
    fn test_imports_go_below_package_line_comment() {
        let source = "package p; // pkg\n\nclass A {}\n";
        let mut rewrite = ImportRewrite::create(source, true).unwrap();
        rewrite.add_import("java.util.List");
        assert_eq!(
            rewrite.rewrite_source().unwrap(),
            "package p; // pkg\n\nimport java.util.List;\n\nclass A {}\n"
        );
    }

    #[test]
    fn test_remove_then_add_restores() {
        let source = "import a.A;\n\nclass X {}\n";
        let mut rewrite = ImportRewrite::create(source, true).unwrap();
        assert!(rewrite.remove_import("a.A"));
        assert!(!rewrite.remove_import("a.A"));
        assert!(!rewrite.remove_import("b.B"));
        assert_eq!(rewrite.add_import("a.A"), "A");
        assert!(rewrite.removed_imports().is_empty());
        assert!(rewrite.added_imports().is_empty());
        assert!(rewrite.rewrite_imports().unwrap().is_empty());
    }

    #[test]
    fn test_detached_unit_is_left_alone() {
        let source = "package p;\n\nclass A {}\n";
        let mut rewrite = ImportRewrite::create(source, true)
            .unwrap()
            .with_oracle(Box::new(KnownTypes::detached()));
        assert_eq!(rewrite.add_import("java.util.List"), "java.util.List");
        assert!(rewrite.rewrite_imports().unwrap().is_empty());
    }

    #[test]
    fn test_attached_start_includes_javadoc() {
        let source = "/* license */\n\n/** Doc */\nclass A {}\n";
        let mut rewrite = ImportRewrite::create(source, true).unwrap();
        rewrite.add_import("java.util.List");
        assert_eq!(
            rewrite.rewrite_source().unwrap(),
            "/* license */\n\nimport java.util.List;\n\n/** Doc */\nclass A {}\n"
        );
    }
}
