//! Import header scanner
//!
//! Reads the package declaration and the import declarations from the top
//! level of the tree-sitter tree and stops at the first node of the body.
//! Errors in the body are never looked at, so a unit with a broken body
//! still has a readable header.

use crate::error::{ImportError, Result};
use crate::name::ImportName;
use jrewrite_core::Span;
use jrewrite_syntax::first_error;
use tree_sitter::Node;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PackageHeader {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScannedImport {
    pub name: ImportName,
    pub span: Span,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Header {
    pub package: Option<PackageHeader>,
    pub imports: Vec<ScannedImport>,
    /// Start of the first token after the header
    pub body_start: Option<usize>,
}

/// Read the header under the `program` node `root`
pub(crate) fn scan(source: &str, root: Node<'_>) -> Result<Header> {
    let mut header = Header::default();
    scan_children(source, root, &mut header)?;
    Ok(header)
}

/// Returns true once the body has been reached
fn scan_children(source: &str, parent: Node<'_>, header: &mut Header) -> Result<bool> {
    let mut cursor = parent.walk();
    let children: Vec<Node<'_>> = parent.children(&mut cursor).collect();
    for node in children {
        if node.is_extra() {
            continue;
        }
        match node.kind() {
            ";" => {}
            // Recovery wraps stray tokens; the header may continue inside
            "ERROR" => {
                if scan_children(source, node, header)? {
                    return Ok(true);
                }
            }
            "package_declaration" if header.package.is_none() && header.imports.is_empty() => {
                check(node)?;
                let start = keyword(node, "package").unwrap_or(node.start_byte());
                header.package = Some(PackageHeader {
                    name: dotted(source, declared_name(node)?),
                    span: Span::new(start, node.end_byte()),
                });
            }
            "import_declaration" => {
                check(node)?;
                let name = dotted(source, declared_name(node)?);
                let is_static = keyword(node, "static").is_some();
                let name = if has_child(node, "asterisk") {
                    ImportName::on_demand(&name, is_static)
                } else {
                    ImportName::single(&name, is_static)
                };
                header.imports.push(ScannedImport {
                    name,
                    span: Span::new(node.start_byte(), node.end_byte()),
                });
            }
            // A header keyword that recovery did not turn into a declaration
            _ if starts_with_keyword(source, node) => {
                return Err(first_error(node).map_or_else(|| syntax(node, "malformed declaration"), Into::into));
            }
            _ => {
                header.body_start = Some(node.start_byte());
                return Ok(true);
            }
        }
    }
    Ok(false)
}

fn starts_with_keyword(source: &str, node: Node<'_>) -> bool {
    let text = &source[node.start_byte()..node.end_byte()];
    ["import", "package"].iter().any(|keyword| {
        text.strip_prefix(keyword)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric() || c == '_' || c == '$'))
    })
}

fn check(node: Node<'_>) -> Result<()> {
    match first_error(node) {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn syntax(node: Node<'_>, message: &str) -> ImportError {
    ImportError::Syntax {
        offset: node.start_byte(),
        message: message.to_string(),
    }
}

/// Start of an anonymous keyword child
fn keyword(node: Node<'_>, text: &str) -> Option<usize> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|c| !c.is_named() && c.kind() == text)
        .map(|c| c.start_byte());
    found
}

fn has_child(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn declared_name(node: Node<'_>) -> Result<Node<'_>> {
    let mut cursor = node.walk();
    let name = node
        .named_children(&mut cursor)
        .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"));
    name.ok_or_else(|| syntax(node, "expected identifier"))
}

/// Identifiers of a possibly scoped name joined with dots; comments and
/// blanks inside the name are dropped
fn dotted(source: &str, name: Node<'_>) -> String {
    let mut parts = Vec::new();
    collect_identifiers(source, name, &mut parts);
    parts.join(".")
}

fn collect_identifiers<'s>(source: &'s str, node: Node<'_>, parts: &mut Vec<&'s str>) {
    if node.kind() == "identifier" {
        parts.push(&source[node.start_byte()..node.end_byte()]);
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_identifiers(source, child, parts);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrewrite_syntax::parse_tree;

    fn scan_source(source: &str) -> Result<Header> {
        let tree = parse_tree(source)?;
        scan(source, tree.root_node())
    }

    #[test]
    fn test_scan_package_and_imports() {
        let source = "package a.b;\n\nimport java.util.*;\nimport static java.lang.Math.max;\n\nclass A {}";
        let header = scan_source(source).unwrap();
        let package = header.package.unwrap();
        assert_eq!(package.name, "a.b");
        assert_eq!(package.span.text(source), "package a.b;");
        assert_eq!(header.imports.len(), 2);
        assert_eq!(header.imports[0].name, ImportName::on_demand("java.util", false));
        assert_eq!(header.imports[1].name, ImportName::single("java.lang.Math.max", true));
        assert_eq!(header.imports[1].span.text(source), "import static java.lang.Math.max;");
        assert_eq!(header.body_start, source.find("class"));
    }

    #[test]
    fn test_comment_inside_name() {
        let source = "import java./* x */util.List;\nclass A {}";
        let header = scan_source(source).unwrap();
        assert_eq!(header.imports[0].name, ImportName::single("java.util.List", false));
    }

    #[test]
    fn test_broken_body_is_not_read() {
        let source = "import a.B;\nclass A { void f( { }";
        let header = scan_source(source).unwrap();
        assert_eq!(header.imports.len(), 1);
        assert_eq!(header.imports[0].name, ImportName::single("a.B", false));
    }

    #[test]
    fn test_annotated_package() {
        let source = "@Deprecated @SuppressWarnings(\"x\")\npackage p;\nimport q.R;";
        let header = scan_source(source).unwrap();
        let package = header.package.unwrap();
        assert_eq!(package.name, "p");
        assert_eq!(package.span.text(source), "package p;");
        assert_eq!(header.imports.len(), 1);
        assert_eq!(header.body_start, None);
    }

    #[test]
    fn test_malformed_import() {
        let source = "import java.util.;\nclass A {}";
        match scan_source(source) {
            Err(ImportError::Syntax { offset, .. }) => assert!(offset < source.find('\n').unwrap()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
