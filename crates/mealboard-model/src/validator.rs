// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const VALIDATOR_NAMESPACE: &str = "mealboard";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Registration,
    Aggregate,
    MenuChoice,
}

impl ResourceKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registration => "reg",
            Self::Aggregate => "agg",
            Self::MenuChoice => "choice",
        }
    }
}

/// Opaque state token for a scope at a point in time. Compared for
/// equality only; the version inside is never interpreted by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Validator(String);

impl Validator {
    /// `mealboard:<kind>:<identity>:v<version>`.
    #[must_use]
    pub fn scoped(kind: ResourceKind, identity: &str, version: u64) -> Self {
        Self(format!(
            "{VALIDATOR_NAMESPACE}:{}:{identity}:v{version}",
            kind.as_str()
        ))
    }

    /// Aggregate validators carry both the max and the sum of constituent
    /// versions; the sum changes whenever any constituent changes, even
    /// when the max does not.
    #[must_use]
    pub fn aggregate(identity: &str, max_version: u64, version_sum: u64) -> Self {
        Self(format!(
            "{VALIDATOR_NAMESPACE}:{}:{identity}:v{max_version}.{version_sum}",
            ResourceKind::Aggregate.as_str()
        ))
    }

    /// Export responses derive their validator from the report validator
    /// plus a literal format token.
    #[must_use]
    pub fn with_format_suffix(&self, format_token: &str) -> Self {
        Self(format!("{}:fmt-{format_token}", self.0))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Quoted form for ETag / If-Match / If-None-Match headers.
    #[must_use]
    pub fn etag(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl Display for Validator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a precondition was not fresh. `Stale` carries the current validator
/// so callers can retry without a separate re-read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionDefect {
    Missing,
    Malformed(String),
    Stale { current: Validator },
}

impl Display for PreconditionDefect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "precondition required"),
            Self::Malformed(reason) => write!(f, "malformed precondition: {reason}"),
            Self::Stale { current } => {
                write!(f, "stale precondition; current validator is {current}")
            }
        }
    }
}

impl std::error::Error for PreconditionDefect {}

/// Checks a caller-supplied validator against the expected kind and scope
/// identity and extracts the asserted version. Wrong namespace, kind or
/// identity shape is `Malformed`; a version mismatch is decided later by
/// the store, not here.
pub fn parse_precondition(
    raw: &str,
    kind: ResourceKind,
    identity: &str,
) -> Result<u64, PreconditionDefect> {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix("W/")
        .unwrap_or(trimmed)
        .trim_matches('"');
    if unquoted.is_empty() {
        return Err(PreconditionDefect::Missing);
    }
    let expected_prefix = format!("{VALIDATOR_NAMESPACE}:{}:{identity}:v", kind.as_str());
    let Some(version_part) = unquoted.strip_prefix(expected_prefix.as_str()) else {
        return Err(PreconditionDefect::Malformed(format!(
            "validator does not address {}:{identity}",
            kind.as_str()
        )));
    };
    if version_part.is_empty() || !version_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PreconditionDefect::Malformed(
            "validator version segment is not a non-negative integer".to_string(),
        ));
    }
    version_part.parse::<u64>().map_err(|_| {
        PreconditionDefect::Malformed("validator version segment out of range".to_string())
    })
}
