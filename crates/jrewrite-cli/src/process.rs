//! File processing logic for jrewrite

use anyhow::{Context, Result};
use jrewrite_core::{apply_edits, logging, Edit};
use jrewrite_imports::{ImportConfig, ImportRewrite};
use std::path::Path;

use crate::output::EditSite;

/// Import changes requested on the command line, applied to every file
#[derive(Debug, Clone, Default)]
pub struct ImportRequest {
    pub add: Vec<String>,
    /// `Type.member`
    pub add_static: Vec<String>,
    pub remove: Vec<String>,
    pub remove_static: Vec<String>,
    /// Keep the imports a file already declares
    pub restore_existing: bool,
}

impl ImportRequest {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.add_static.is_empty() && self.remove.is_empty() && self.remove_static.is_empty()
    }
}

/// Result of processing a single file
pub struct ProcessResult {
    /// Edits that were found/applied
    pub edits: Vec<EditSite>,
    /// Original source code
    pub old_source: String,
    /// New source code after edits (only if edits were found)
    pub new_source: Option<String>,
}

/// Process a single Java file and return the edits found
pub fn process_file(path: &Path, request: &ImportRequest, config: &ImportConfig) -> Result<ProcessResult> {
    let source_code = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    logging::subsection(&path.display().to_string());
    process_source(source_code, request, config)
        .with_context(|| format!("Failed to rewrite imports of {}", path.display()))
}

/// Run the import session over one source text
pub fn process_source(source_code: String, request: &ImportRequest, config: &ImportConfig) -> Result<ProcessResult> {
    let edits = rewrite_imports(&source_code, request, config)?;

    if edits.is_empty() {
        return Ok(ProcessResult {
            edits: vec![],
            old_source: source_code,
            new_source: None,
        });
    }

    let edit_infos: Vec<EditSite> = edits
        .iter()
        .map(|edit| {
            let (line, column) = offset_to_line_column(&source_code, edit.span.start);
            EditSite {
                line,
                column,
                message: edit.message.clone(),
            }
        })
        .collect();

    let new_source = apply_edits(&source_code, &edits)?;

    Ok(ProcessResult {
        edits: edit_infos,
        old_source: source_code,
        new_source: Some(new_source),
    })
}

fn rewrite_imports(source: &str, request: &ImportRequest, config: &ImportConfig) -> Result<Vec<Edit>> {
    let mut session = ImportRewrite::create(source, request.restore_existing)?.with_config(config.clone());

    for name in &request.remove {
        session.remove_import(name);
    }
    for name in &request.remove_static {
        session.remove_static_import(name);
    }
    for name in &request.add {
        session.add_import(name);
    }
    for name in &request.add_static {
        let (declaring_type, member) = split_member(name)?;
        session.add_static_import(declaring_type, member, false);
    }

    Ok(session.rewrite_imports()?)
}

/// Split `a.b.Type.member` into the declaring type and the member
fn split_member(name: &str) -> Result<(&str, &str)> {
    match name.rsplit_once('.') {
        Some((declaring_type, member)) if !declaring_type.is_empty() && !member.is_empty() => {
            Ok((declaring_type, member))
        }
        _ => anyhow::bail!("Static import '{}' must have the form Type.member", name),
    }
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

/// Convert byte offset to line and column numbers (1-based)
fn offset_to_line_column(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut column = 1;

    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }

    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request() -> ImportRequest {
        ImportRequest {
            restore_existing: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_offset_to_line_column() {
        let source = "line1\nline2\nline3";
        assert_eq!(offset_to_line_column(source, 0), (1, 1));
        assert_eq!(offset_to_line_column(source, 5), (1, 6)); // newline
        assert_eq!(offset_to_line_column(source, 6), (2, 1)); // start of line2
        assert_eq!(offset_to_line_column(source, 12), (3, 1)); // start of line3
    }

    #[test]
    fn test_split_member() {
        assert_eq!(split_member("java.lang.Math.max").unwrap(), ("java.lang.Math", "max"));
        assert!(split_member("max").is_err());
        assert!(split_member("java.lang.Math.").is_err());
    }

    #[test]
    fn test_process_source_adds_imports() {
        let mut request = request();
        request.add = vec!["java.util.List".to_string()];
        request.add_static = vec!["java.lang.Math.max".to_string()];
        let source = "package p;\n\nclass A {}\n".to_string();

        let result = process_source(source, &request, &ImportConfig::default()).unwrap();
        assert_eq!(result.edits.len(), 1);
        assert_eq!((result.edits[0].line, result.edits[0].column), (1, 11));
        assert_eq!(
            result.new_source.unwrap(),
            "package p;\n\nimport static java.lang.Math.max;\n\nimport java.util.List;\n\nclass A {}\n"
        );
    }

    #[test]
    fn test_process_source_without_changes() {
        let mut request = request();
        request.add = vec!["java.util.List".to_string()];
        let source = "import java.util.List;\n\nclass A {}\n".to_string();

        let result = process_source(source, &request, &ImportConfig::default()).unwrap();
        assert!(result.edits.is_empty());
        assert!(result.new_source.is_none());
    }

    #[test]
    fn test_process_file_reports_malformed_header() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Broken.java");
        fs::write(&path, "import java.util.;\nclass A {}\n").unwrap();

        let err = process_file(&path, &request(), &ImportConfig::default()).err().unwrap();
        let message = format!("{:#}", err);
        assert!(message.contains("Broken.java"));
        assert!(message.contains("Malformed import header"));
    }

    #[test]
    fn test_write_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("A.java");
        write_file(&path, "class A {}\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "class A {}\n");
    }
}
