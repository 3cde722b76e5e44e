#![doc = include_str!("../README.md")]
//!
//! ## Modules
//!
//! - [`bundle`] - The embedded agents and skills
//! - [`error`] - Error types
//! - [`fs`] - Destination filesystem abstraction
//! - [`inventory`] - Frontmatter parsing and bundle listing
//! - [`publish`] - Copying a source tree into a destination
//! - [`report`] - Per-file outcomes and summary counts
//! - [`source`] - Source tree implementations
//! - [`target`] - Destination root resolution
//! - [`types`] - Core type definitions

pub mod bundle;
pub mod error;
pub mod fs;
pub mod inventory;
pub mod publish;
pub mod report;
pub mod source;
pub mod target;
pub mod types;

pub use bundle::bundled;
pub use error::{Error, Result};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use inventory::{BundleItem, Frontmatter, inventory, parse_frontmatter};
pub use publish::{PublishOptions, file_action, publish, should_write};
pub use report::{FileEntry, Report, Summary};
pub use source::{DirSource, EmbeddedSource, MemorySource, SourceFile, SourceTree};
pub use target::destination_root;
pub use types::{FileAction, PublishMode, ResourceKind, Scope};
