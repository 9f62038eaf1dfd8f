use std::fmt;

use thiserror::Error;

/// Marker that disqualifies a release from producing a constraint.
const UNSTABLE_MARKER: &str = "unstable";

/// A version string safe to place behind a `<` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedVersion(String);

impl NormalizedVersion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a release version cannot produce a constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidVersion {
    #[error("version {version:?} is an unstable release")]
    Unstable { version: String },
    #[error("version {raw:?} is empty once normalized")]
    Empty { raw: String },
    #[error("contrib version {version:?} has no core compatibility prefix")]
    MissingCompatibilityPrefix { version: String },
}

/// Normalize a raw release version.
///
/// Core releases are used as-is. Contrib releases carry a core compatibility
/// token (`8.x-1.2`); everything up to and including the first `-` is dropped.
pub fn normalize(raw: &str, is_core: bool) -> Result<NormalizedVersion, InvalidVersion> {
    let candidate = if is_core {
        raw
    } else {
        match raw.split_once('-') {
            Some((_compat, rest)) => rest,
            None => {
                return Err(InvalidVersion::MissingCompatibilityPrefix {
                    version: raw.to_string(),
                })
            }
        }
    };

    if candidate.trim().is_empty() {
        return Err(InvalidVersion::Empty {
            raw: raw.to_string(),
        });
    }

    if candidate.contains(UNSTABLE_MARKER) {
        return Err(InvalidVersion::Unstable {
            version: candidate.to_string(),
        });
    }

    Ok(NormalizedVersion(candidate.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrib_strips_compat_prefix() {
        assert_eq!(normalize("8.x-1.2", false).unwrap().as_str(), "1.2");
        assert_eq!(normalize("7.x-3.14", false).unwrap().as_str(), "3.14");
    }

    #[test]
    fn test_contrib_splits_on_first_separator_only() {
        assert_eq!(normalize("8.x-2.0-rc3", false).unwrap().as_str(), "2.0-rc3");
        assert_eq!(normalize("7.x-1.0-beta1", false).unwrap().as_str(), "1.0-beta1");
    }

    #[test]
    fn test_core_is_unchanged() {
        assert_eq!(normalize("8.5.1", true).unwrap().as_str(), "8.5.1");
        assert_eq!(normalize("7.59", true).unwrap().as_str(), "7.59");
        assert_eq!(normalize("8.6.0-rc1", true).unwrap().as_str(), "8.6.0-rc1");
    }

    #[test]
    fn test_unstable_is_rejected() {
        assert_eq!(
            normalize("7.x-2.0-unstable3", false),
            Err(InvalidVersion::Unstable {
                version: "2.0-unstable3".to_string()
            })
        );
        assert!(matches!(
            normalize("8.0-unstable1", true),
            Err(InvalidVersion::Unstable { .. })
        ));
    }

    #[test]
    fn test_unstable_marker_is_case_sensitive() {
        assert_eq!(
            normalize("7.x-1.0-UNSTABLE", false).unwrap().as_str(),
            "1.0-UNSTABLE"
        );
    }

    #[test]
    fn test_contrib_without_separator_is_rejected() {
        assert_eq!(
            normalize("unstable1", false),
            Err(InvalidVersion::MissingCompatibilityPrefix {
                version: "unstable1".to_string()
            })
        );
        assert!(matches!(
            normalize("1.2", false),
            Err(InvalidVersion::MissingCompatibilityPrefix { .. })
        ));
    }

    #[test]
    fn test_empty_remainder_is_rejected() {
        assert_eq!(
            normalize("8.x-", false),
            Err(InvalidVersion::Empty {
                raw: "8.x-".to_string()
            })
        );
        assert!(matches!(normalize("", true), Err(InvalidVersion::Empty { .. })));
        assert!(matches!(normalize("7.x- ", false), Err(InvalidVersion::Empty { .. })));
    }

    #[test]
    fn test_only_the_remainder_is_checked_for_contrib() {
        // The compat token is discarded before validation.
        assert_eq!(normalize("unstable-1.0", false).unwrap().as_str(), "1.0");
    }
}
