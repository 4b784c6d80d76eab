use crate::errors::{Result, VanityError};
use serde::Deserialize;

pub const DEFAULT_VCS: &str = "git";
pub const DEFAULT_BRANCH: &str = "main";

/// A value as it sits in the key-value store: a JSON object with any of
/// the three fields, or a bare string carrying only the source.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawRecord {
    pub source: Option<String>,
    pub vcs: Option<String>,
    #[serde(rename = "defaultBranch")]
    pub default_branch: Option<String>,
}

impl RawRecord {
    /// Wraps a bare stored string as a record with only the source set.
    pub fn bare<S: Into<String>>(source: S) -> Self {
        RawRecord {
            source: Some(source.into()),
            vcs: None,
            default_branch: None,
        }
    }
}

/// Canonical package record derived from a raw stored value. `source` is
/// a host+path with no scheme prefix; callers must store it that way.
#[derive(Clone, Debug, PartialEq)]
pub struct PackageRecord {
    pub name: String,
    pub source: String,
    pub vcs: String,
    pub default_branch: String,
}

impl PackageRecord {
    /// Normalizes a raw stored value for the package `name`. Absent `vcs`
    /// and `defaultBranch` get their documented defaults; everything else
    /// passes through verbatim. A record without a usable source fails,
    /// since a registered-but-misconfigured package is not a lookup miss.
    pub fn normalize(name: &str, raw: RawRecord) -> Result<Self> {
        let source = match raw.source {
            Some(source) if !source.is_empty() => source,
            _ => return Err(VanityError::InvalidRecord(name.to_string())),
        };

        Ok(PackageRecord {
            name: name.to_string(),
            source,
            vcs: raw.vcs.unwrap_or_else(|| DEFAULT_VCS.to_string()),
            default_branch: raw
                .default_branch
                .unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
        })
    }
}
