// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use mealboard_model::{
    CountOp, DayOfWeek, DietTypeId, Mark, MarkOp, Meal, RegistrationFacts, RegistrationScope,
    ResidentCount,
};
use rusqlite::{params, Connection, Transaction};
use std::collections::BTreeSet;

fn day_from_row(raw: i64) -> Result<DayOfWeek, StoreError> {
    DayOfWeek::new(raw as u8).map_err(|e| StoreError::Backend(format!("corrupt day column: {e}")))
}

fn meal_from_row(raw: &str) -> Result<Meal, StoreError> {
    Meal::parse(raw).map_err(|e| StoreError::Backend(format!("corrupt meal column: {e}")))
}

fn diet_from_row(raw: &str) -> Result<DietTypeId, StoreError> {
    DietTypeId::parse(raw)
        .map_err(|e| StoreError::Backend(format!("corrupt diet_type column: {e}")))
}

pub(crate) fn apply_marks(
    tx: &Transaction<'_>,
    scope: &RegistrationScope,
    ops: &[MarkOp],
) -> Result<(), StoreError> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO diet_mark (tenant, department, year, week, day, meal, diet_type, marked) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
         ON CONFLICT (tenant, department, year, week, day, meal, diet_type) \
         DO UPDATE SET marked = excluded.marked",
    )?;
    for op in ops {
        stmt.execute(params![
            scope.tenant.get() as i64,
            scope.department.as_str(),
            i64::from(scope.year.get()),
            i64::from(scope.week.get()),
            i64::from(op.day.get()),
            op.meal.as_str(),
            op.diet_type.as_str(),
            op.marked,
        ])?;
    }
    Ok(())
}

pub(crate) fn apply_resident_counts(
    tx: &Transaction<'_>,
    scope: &RegistrationScope,
    ops: &[CountOp],
) -> Result<(), StoreError> {
    let mut stmt = tx.prepare_cached(
        "INSERT INTO resident_count (tenant, department, year, week, day, meal, count) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         ON CONFLICT (tenant, department, year, week, day, meal) \
         DO UPDATE SET count = excluded.count",
    )?;
    for op in ops {
        stmt.execute(params![
            scope.tenant.get() as i64,
            scope.department.as_str(),
            i64::from(scope.year.get()),
            i64::from(scope.week.get()),
            i64::from(op.day.get()),
            op.meal.as_str(),
            i64::from(op.count),
        ])?;
    }
    Ok(())
}

/// Replace-the-set: every day absent from `days` becomes disabled. The
/// storage path accepts weekend days; the weekend rule lives at the
/// menu-choice boundary, not here.
pub(crate) fn replace_alt2_days(
    tx: &Transaction<'_>,
    scope: &RegistrationScope,
    days: &BTreeSet<DayOfWeek>,
) -> Result<(), StoreError> {
    tx.execute(
        "DELETE FROM alt2_flag \
         WHERE tenant = ?1 AND department = ?2 AND year = ?3 AND week = ?4",
        params![
            scope.tenant.get() as i64,
            scope.department.as_str(),
            i64::from(scope.year.get()),
            i64::from(scope.week.get()),
        ],
    )?;
    let mut stmt = tx.prepare_cached(
        "INSERT INTO alt2_flag (tenant, department, year, week, day, enabled) \
         VALUES (?1, ?2, ?3, ?4, ?5, 1)",
    )?;
    for day in days {
        stmt.execute(params![
            scope.tenant.get() as i64,
            scope.department.as_str(),
            i64::from(scope.year.get()),
            i64::from(scope.week.get()),
            i64::from(day.get()),
        ])?;
    }
    Ok(())
}

/// Loads all three fact kinds for a scope in deterministic order. An
/// untouched scope comes back as empty defaults.
pub(crate) fn load_facts(
    conn: &Connection,
    scope: &RegistrationScope,
) -> Result<RegistrationFacts, StoreError> {
    let key = params![
        scope.tenant.get() as i64,
        scope.department.as_str(),
        i64::from(scope.year.get()),
        i64::from(scope.week.get()),
    ];

    let mut marks = Vec::new();
    {
        let mut stmt = conn.prepare_cached(
            "SELECT day, meal, diet_type, marked FROM diet_mark \
             WHERE tenant = ?1 AND department = ?2 AND year = ?3 AND week = ?4 \
             ORDER BY day, meal, diet_type",
        )?;
        let mut rows = stmt.query(key)?;
        while let Some(row) = rows.next()? {
            marks.push(Mark {
                day: day_from_row(row.get(0)?)?,
                meal: meal_from_row(row.get::<_, String>(1)?.as_str())?,
                diet_type: diet_from_row(row.get::<_, String>(2)?.as_str())?,
                marked: row.get(3)?,
            });
        }
    }

    let mut resident_counts = Vec::new();
    {
        let mut stmt = conn.prepare_cached(
            "SELECT day, meal, count FROM resident_count \
             WHERE tenant = ?1 AND department = ?2 AND year = ?3 AND week = ?4 \
             ORDER BY day, meal",
        )?;
        let mut rows = stmt.query(key)?;
        while let Some(row) = rows.next()? {
            resident_counts.push(ResidentCount {
                day: day_from_row(row.get(0)?)?,
                meal: meal_from_row(row.get::<_, String>(1)?.as_str())?,
                count: row.get::<_, i64>(2)?.max(0) as u32,
            });
        }
    }

    let mut alt2_days = Vec::new();
    {
        let mut stmt = conn.prepare_cached(
            "SELECT day FROM alt2_flag \
             WHERE tenant = ?1 AND department = ?2 AND year = ?3 AND week = ?4 \
               AND enabled = 1 \
             ORDER BY day",
        )?;
        let mut rows = stmt.query(key)?;
        while let Some(row) = rows.next()? {
            alt2_days.push(day_from_row(row.get(0)?)?);
        }
    }

    Ok(RegistrationFacts {
        marks,
        resident_counts,
        alt2_days,
    })
}
