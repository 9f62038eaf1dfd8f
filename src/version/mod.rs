//! Release version handling.
//!
//! - [`normalize`] — turns a raw release version into a comparable version,
//!   stripping the core-compatibility prefix of contrib releases.
//! - [`natural`] — numeric-aware ordering for constraint strings.

pub mod natural;
pub mod normalize;
