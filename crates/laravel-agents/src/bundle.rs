//! The agents and skills shipped with this crate.
//!
//! The `bundle/` directory is embedded at compile time, so an installed
//! binary can publish without any files on disk.

use include_dir::{Dir, include_dir};

use crate::source::EmbeddedSource;

static BUNDLE: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/bundle");

/// Returns the embedded bundle as a publishable source tree.
#[must_use]
pub fn bundled() -> EmbeddedSource {
    EmbeddedSource::new(&BUNDLE)
}
