// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use mealboard_model::{ChoiceScope, DayOfWeek, MenuChoice, MenuChoiceRow};
use rusqlite::{params, Connection, Transaction};

fn choice_from_row(raw: &str) -> Result<MenuChoice, StoreError> {
    MenuChoice::parse(raw).map_err(|e| StoreError::Backend(format!("corrupt choice column: {e}")))
}

pub(crate) fn load_choices(
    conn: &Connection,
    scope: &ChoiceScope,
) -> Result<Vec<MenuChoiceRow>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT day, choice FROM menu_choice \
         WHERE department = ?1 AND week = ?2 ORDER BY day",
    )?;
    let mut rows = stmt.query(params![
        scope.department.as_str(),
        i64::from(scope.week.get())
    ])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let day = DayOfWeek::new(row.get::<_, i64>(0)? as u8)
            .map_err(|e| StoreError::Backend(format!("corrupt day column: {e}")))?;
        out.push(MenuChoiceRow {
            day,
            choice: choice_from_row(row.get::<_, String>(1)?.as_str())?,
        });
    }
    Ok(out)
}

pub(crate) fn stored_choice(
    conn: &Connection,
    scope: &ChoiceScope,
    day: DayOfWeek,
) -> Result<Option<MenuChoice>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT choice FROM menu_choice \
         WHERE department = ?1 AND week = ?2 AND day = ?3",
    )?;
    let mut rows = stmt.query(params![
        scope.department.as_str(),
        i64::from(scope.week.get()),
        i64::from(day.get())
    ])?;
    match rows.next()? {
        Some(row) => Ok(Some(choice_from_row(row.get::<_, String>(0)?.as_str())?)),
        None => Ok(None),
    }
}

pub(crate) fn apply_choice(
    tx: &Transaction<'_>,
    scope: &ChoiceScope,
    day: DayOfWeek,
    choice: MenuChoice,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO menu_choice (department, week, day, choice) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT (department, week, day) DO UPDATE SET choice = excluded.choice",
        params![
            scope.department.as_str(),
            i64::from(scope.week.get()),
            i64::from(day.get()),
            choice.as_str(),
        ],
    )?;
    Ok(())
}
