// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use mealboard_model::TenantWeek;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Transaction};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// One versioned-scope family: a version table and its key columns. The
/// registration and menu-choice subsystems are the two instances; the
/// bump/guard contract is implemented once over this descriptor.
pub(crate) struct VersionTable {
    pub table: &'static str,
    pub key_cols: &'static [&'static str],
}

pub(crate) const REGISTRATION_VERSIONS: VersionTable = VersionTable {
    table: "registration_version",
    key_cols: &["tenant", "department", "year", "week"],
};

pub(crate) const CHOICE_VERSIONS: VersionTable = VersionTable {
    table: "choice_version",
    key_cols: &["department", "week"],
};

pub(crate) enum BumpOutcome {
    Bumped(u64),
    Stale(u64),
}

impl VersionTable {
    fn where_clause(&self) -> String {
        self.key_cols
            .iter()
            .map(|col| format!("{col} = ?"))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// 0 for a scope no writer has ever touched.
    pub(crate) fn current_version(
        &self,
        conn: &Connection,
        key: &[Value],
    ) -> Result<u64, StoreError> {
        let sql = format!(
            "SELECT version FROM {} WHERE {}",
            self.table,
            self.where_clause()
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query(params_from_iter(key.iter()))?;
        match rows.next()? {
            Some(row) => Ok(row.get::<_, i64>(0)? as u64),
            None => Ok(0),
        }
    }

    /// Atomic conditional bump: the row only moves from `expected` to
    /// `expected + 1`; a concurrent writer that got there first leaves
    /// nothing for us to update and we report the version it left behind.
    /// Runs inside the caller's transaction so the bump and the fact
    /// mutation commit or roll back together.
    pub(crate) fn try_bump(
        &self,
        tx: &Transaction<'_>,
        key: &[Value],
        expected: u64,
    ) -> Result<BumpOutcome, StoreError> {
        if expected == 0 {
            let cols = self.key_cols.join(", ");
            let placeholders = vec!["?"; self.key_cols.len()].join(", ");
            let sql = format!(
                "INSERT INTO {} ({cols}, version) VALUES ({placeholders}, 1) \
                 ON CONFLICT DO NOTHING",
                self.table
            );
            let inserted = tx.execute(&sql, params_from_iter(key.iter()))?;
            if inserted == 1 {
                return Ok(BumpOutcome::Bumped(1));
            }
        } else {
            let sql = format!(
                "UPDATE {} SET version = version + 1 WHERE {} AND version = ?",
                self.table,
                self.where_clause()
            );
            let mut bind: Vec<Value> = key.to_vec();
            bind.push(Value::Integer(expected as i64));
            let updated = tx.execute(&sql, params_from_iter(bind.iter()))?;
            if updated == 1 {
                return Ok(BumpOutcome::Bumped(expected + 1));
            }
        }
        let current = self.current_version(tx, key)?;
        Ok(BumpOutcome::Stale(current))
    }
}

/// Aggregate over every department scope of a tenant week, read straight
/// from the version table. Archived or removed departments keep their
/// version rows, so their contribution never silently drops out of the sum.
pub(crate) fn aggregate_registration_versions(
    conn: &Connection,
    week: &TenantWeek,
) -> Result<(u64, u64), StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT COALESCE(MAX(version), 0), COALESCE(SUM(version), 0) \
         FROM registration_version WHERE tenant = ?1 AND year = ?2 AND week = ?3",
    )?;
    let (max, sum) = stmt.query_row(
        params![
            week.tenant.get() as i64,
            i64::from(week.year.get()),
            i64::from(week.week.get())
        ],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;
    Ok((max as u64, sum as u64))
}

/// Cache-aside layer in front of the version table. Populated on read,
/// updated synchronously on every bump; never consulted to decide
/// freshness of a write.
#[derive(Default)]
pub(crate) struct VersionCache {
    entries: Mutex<HashMap<String, u64>>,
}

impl VersionCache {
    pub(crate) fn get(&self, key: &str) -> Option<u64> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    pub(crate) fn put(&self, key: &str, version: u64) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    fn reg_key() -> Vec<Value> {
        vec![
            Value::Integer(1),
            Value::Text("west".to_string()),
            Value::Integer(2025),
            Value::Integer(47),
        ]
    }

    #[test]
    fn first_touch_creates_version_one() {
        let mut conn = schema::open_memory().expect("open");
        let tx = conn.transaction().expect("tx");
        match REGISTRATION_VERSIONS
            .try_bump(&tx, &reg_key(), 0)
            .expect("bump")
        {
            BumpOutcome::Bumped(v) => assert_eq!(v, 1),
            BumpOutcome::Stale(_) => panic!("fresh scope must bump"),
        }
        tx.commit().expect("commit");
        assert_eq!(
            REGISTRATION_VERSIONS
                .current_version(&conn, &reg_key())
                .expect("version"),
            1
        );
    }

    #[test]
    fn mismatched_expectation_is_stale_and_does_not_advance() {
        let mut conn = schema::open_memory().expect("open");
        let tx = conn.transaction().expect("tx");
        REGISTRATION_VERSIONS
            .try_bump(&tx, &reg_key(), 0)
            .expect("bump");
        tx.commit().expect("commit");

        let tx = conn.transaction().expect("tx");
        match REGISTRATION_VERSIONS
            .try_bump(&tx, &reg_key(), 0)
            .expect("bump")
        {
            BumpOutcome::Stale(current) => assert_eq!(current, 1),
            BumpOutcome::Bumped(_) => panic!("consumed expectation must be stale"),
        }
        tx.commit().expect("commit");
        assert_eq!(
            REGISTRATION_VERSIONS
                .current_version(&conn, &reg_key())
                .expect("version"),
            1
        );
    }

    #[test]
    fn choice_family_versions_independently() {
        let mut conn = schema::open_memory().expect("open");
        let choice_key = vec![Value::Text("west".to_string()), Value::Integer(47)];
        let tx = conn.transaction().expect("tx");
        CHOICE_VERSIONS
            .try_bump(&tx, &choice_key, 0)
            .expect("bump");
        tx.commit().expect("commit");
        assert_eq!(
            REGISTRATION_VERSIONS
                .current_version(&conn, &reg_key())
                .expect("version"),
            0
        );
        assert_eq!(
            CHOICE_VERSIONS
                .current_version(&conn, &choice_key)
                .expect("version"),
            1
        );
    }
}
