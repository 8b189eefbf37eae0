//! jrewrite-imports: Import reconciliation for Java compilation units
//!
//! An [`ImportRewrite`] reads the package and import header of a unit,
//! takes import additions and removals, and computes one edit that produces
//! a grouped, ordered and deduplicated import block. Single imports of one
//! container fold into an on-demand import once a threshold is reached, and
//! every comment follows the declaration that owns it.
//!
//! ```ignore
//! let mut rewrite = ImportRewrite::create(source, true)?;
//! rewrite.set_import_order(vec!["java".into(), "javax".into(), "".into()]);
//! let name = rewrite.add_import("java.util.List");
//! let edits = rewrite.rewrite_imports()?;
//! ```

mod config;
mod emit;
mod error;
mod groups;
mod name;
mod oracle;
mod record;
mod rewrite;
mod section;
mod trivia;

pub use config::ImportConfig;
pub use error::{ImportError, Result};
pub use name::ImportName;
pub use oracle::{KnownTypes, NoTypeInfo, TypeOracle};
pub use rewrite::ImportRewrite;
pub use trivia::Trivia;
