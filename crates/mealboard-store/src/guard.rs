// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::versions::{BumpOutcome, VersionCache, VersionTable};
use mealboard_model::{parse_precondition, PreconditionDefect, ResourceKind, Validator};
use rusqlite::types::Value;
use rusqlite::{Connection, Transaction};
use tracing::debug;

/// Everything the guard needs to address one versioned scope.
pub(crate) struct GuardedScope {
    pub table: &'static VersionTable,
    pub kind: ResourceKind,
    pub identity: String,
    pub key: Vec<Value>,
}

impl GuardedScope {
    /// Cache key qualified by resource kind so the two subsystem families
    /// can never alias each other.
    pub(crate) fn cache_key(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.identity)
    }
}

/// Reads the current version through the cache-aside layer.
pub(crate) fn cached_version(
    conn: &Connection,
    cache: &VersionCache,
    scope: &GuardedScope,
) -> Result<u64, StoreError> {
    if let Some(version) = cache.get(&scope.cache_key()) {
        return Ok(version);
    }
    let version = scope.table.current_version(conn, &scope.key)?;
    cache.put(&scope.cache_key(), version);
    Ok(version)
}

/// The single write path for both subsystem families: evaluate the
/// precondition, CAS-bump the version, apply the fact mutation, commit —
/// all inside one transaction. A rejected write rolls everything back and
/// never advances the version.
pub(crate) fn guarded_write<T>(
    conn: &mut Connection,
    cache: &VersionCache,
    scope: &GuardedScope,
    precondition: Option<&str>,
    mutate: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
) -> Result<(T, Validator), StoreError> {
    let raw = precondition.ok_or(StoreError::Precondition(PreconditionDefect::Missing))?;
    let expected = parse_precondition(raw, scope.kind, &scope.identity)?;

    let tx = conn.transaction()?;
    let new_version = match scope.table.try_bump(&tx, &scope.key, expected)? {
        BumpOutcome::Bumped(version) => version,
        BumpOutcome::Stale(current) => {
            debug!(
                scope = %scope.identity,
                expected,
                current,
                "write rejected: stale precondition"
            );
            return Err(StoreError::Precondition(PreconditionDefect::Stale {
                current: Validator::scoped(scope.kind, &scope.identity, current),
            }));
        }
    };
    let value = mutate(&tx)?;
    tx.commit()?;
    cache.put(&scope.cache_key(), new_version);
    debug!(scope = %scope.identity, version = new_version, "write committed");
    Ok((
        value,
        Validator::scoped(scope.kind, &scope.identity, new_version),
    ))
}
