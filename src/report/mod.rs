//! Output of a run.
//!
//! - [`manifest`] — serializes conflict maps into `composer.json` metapackages
//!   and writes one per configured major version.
//! - [`terminal`] — colored run summary on stderr; shown with `--verbose`.

pub mod manifest;
pub mod terminal;
