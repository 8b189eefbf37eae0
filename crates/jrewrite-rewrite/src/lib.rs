//! jrewrite-rewrite: Node-level rewrite sessions for Java sources
//!
//! An [`AstRewrite`] records replacements, removals, list edits, property
//! changes and copy/move placeholders against a parsed compilation unit,
//! then synthesizes the minimal set of text edits that turns the original
//! source into the rewritten one. Everything the session did not touch,
//! comments and formatting included, is reproduced byte for byte.
//!
//! ```ignore
//! let ast = jrewrite_syntax::parse(source)?;
//! let mut rewrite = AstRewrite::new(&ast);
//! let one = rewrite.new_number_literal("1");
//! rewrite.replace(index, one)?;
//! let edits = rewrite.compute_edits()?;
//! ```

mod error;
mod events;
mod format;
mod operation;
mod session;
mod synth;

pub use error::{Result, RewriteError};
pub use events::RewriteEvent;
pub use format::FormattingConfig;
pub use operation::{EditLog, EditOperation};
pub use session::{AstRewrite, ListRewrite, Placeholder, PlaceholderKind};
