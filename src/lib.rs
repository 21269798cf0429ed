/*!
 * scopy - Concatenate source files matching a set of extensions
 *
 * Walks a directory tree, selects files by extension under dotfile,
 * `.gitignore`, exclusion and size rules, optionally strips whole-line
 * comments, and joins the selected files into one text, each preceded
 * by a header line.
 */

pub mod clipboard;
pub mod comments;
pub mod config;
pub mod error;
pub mod filter;
pub mod gitignore;
pub mod processor;
pub mod report;
pub mod types;
pub mod utils;
pub mod walker;
pub mod writer;


// Re-export main components for easier access
pub use comments::is_line_comment;
pub use config::{Config, SummaryFormat};
pub use error::{Result, ScopyError};
pub use gitignore::IgnoreRules;
pub use processor::Processor;
pub use report::Reporter;
pub use types::{Entry, Stats};
pub use writer::OutputSink;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
