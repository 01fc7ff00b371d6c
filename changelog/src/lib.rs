//! Structured editing of package changelogs.
//!
//! A changelog is lexed into a [`Token`] tree, edited in place (entries
//! inserted into version / change-type sections, unpublished changes cut off
//! into a release, package changelogs merged) and rendered back to canonical
//! markdown.
//!
//! ```no_run
//! use changelog::{Change, ChangeType, Changelog, ChangelogEntry};
//!
//! let mut changelog = Changelog::new("CHANGELOG.md");
//! let entry = ChangelogEntry::new("Fixed crash on launch").with_pull_requests([123]);
//! changelog.add_change(&Change::new(ChangeType::BugFixes, entry))?;
//! changelog.save()?;
//! # Ok::<(), changelog::ChangelogError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod formatter;
pub mod lexer;
pub mod merge;
pub mod renderer;
pub mod store;
pub mod token;
pub mod types;
mod utils;

pub use config::ChangelogConfig;
pub use self::core::Changelog;
pub use error::{ChangelogError, Result};
pub use formatter::{create_entry_formatter, EntryFormatter};
pub use lexer::lex;
pub use merge::{merge_changelogs, MergeSummary, PackageChangelog};
pub use renderer::{render, MarkdownRenderer};
pub use store::{ChangelogStore, FsStore, MemoryStore};
pub use token::{Token, Tokens};
pub use types::*;
