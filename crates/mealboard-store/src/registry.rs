// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use mealboard_model::{DepartmentId, DietTypeId, TenantId};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;

pub(crate) fn upsert_department(
    conn: &Connection,
    tenant: TenantId,
    id: &DepartmentId,
    name: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO department (tenant, id, name, archived) VALUES (?1, ?2, ?3, 0) \
         ON CONFLICT (tenant, id) DO UPDATE SET name = excluded.name, archived = 0",
        params![tenant.get() as i64, id.as_str(), name],
    )?;
    Ok(())
}

pub(crate) fn set_archived(
    conn: &Connection,
    tenant: TenantId,
    id: &DepartmentId,
    archived: bool,
) -> Result<bool, StoreError> {
    let updated = conn.execute(
        "UPDATE department SET archived = ?3 WHERE tenant = ?1 AND id = ?2",
        params![tenant.get() as i64, id.as_str(), archived],
    )?;
    Ok(updated == 1)
}

/// Active departments only; archived ones stop accepting writes and drop
/// out of report bodies (their version rows remain in the aggregate).
pub(crate) fn department_active(
    conn: &Connection,
    tenant: TenantId,
    id: &DepartmentId,
) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM department WHERE tenant = ?1 AND id = ?2 AND archived = 0",
            params![tenant.get() as i64, id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// The menu-choice scope has no tenant dimension; a department is known
/// if any tenant registers it.
pub(crate) fn department_known(conn: &Connection, id: &DepartmentId) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM department WHERE id = ?1 AND archived = 0 LIMIT 1",
            params![id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn tenant_known(conn: &Connection, tenant: TenantId) -> Result<bool, StoreError> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM department WHERE tenant = ?1 LIMIT 1",
            params![tenant.get() as i64],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn list_active_departments(
    conn: &Connection,
    tenant: TenantId,
) -> Result<Vec<(DepartmentId, String)>, StoreError> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name FROM department WHERE tenant = ?1 AND archived = 0 ORDER BY id",
    )?;
    let mut rows = stmt.query(params![tenant.get() as i64])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let id = DepartmentId::parse(row.get::<_, String>(0)?.as_str())
            .map_err(|e| StoreError::Backend(format!("corrupt department id: {e}")))?;
        out.push((id, row.get(1)?));
    }
    Ok(out)
}

pub(crate) fn department_name(
    conn: &Connection,
    tenant: TenantId,
    id: &DepartmentId,
) -> Result<Option<String>, StoreError> {
    let name: Option<String> = conn
        .query_row(
            "SELECT name FROM department WHERE tenant = ?1 AND id = ?2",
            params![tenant.get() as i64, id.as_str()],
            |row| row.get(0),
        )
        .optional()?;
    Ok(name)
}

pub(crate) fn upsert_diet_type(
    conn: &Connection,
    tenant: TenantId,
    id: &DietTypeId,
    name: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO diet_type (tenant, id, name) VALUES (?1, ?2, ?3) \
         ON CONFLICT (tenant, id) DO UPDATE SET name = excluded.name",
        params![tenant.get() as i64, id.as_str(), name],
    )?;
    Ok(())
}

pub(crate) fn diet_names(
    conn: &Connection,
    tenant: TenantId,
) -> Result<BTreeMap<DietTypeId, String>, StoreError> {
    let mut stmt = conn.prepare_cached("SELECT id, name FROM diet_type WHERE tenant = ?1")?;
    let mut rows = stmt.query(params![tenant.get() as i64])?;
    let mut out = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let id = DietTypeId::parse(row.get::<_, String>(0)?.as_str())
            .map_err(|e| StoreError::Backend(format!("corrupt diet_type id: {e}")))?;
        out.insert(id, row.get(1)?);
    }
    Ok(out)
}
