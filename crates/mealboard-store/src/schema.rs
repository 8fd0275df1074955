// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use rusqlite::Connection;
use std::path::Path;

pub const SCHEMA_VERSION: i64 = 1;

/// Four fact tables plus one version table per subsystem family, and the
/// two registry tables that stand in for the external tenant admin.
const SCHEMA_SQL: &str = "
    CREATE TABLE IF NOT EXISTS department (
      tenant INTEGER NOT NULL,
      id TEXT NOT NULL,
      name TEXT NOT NULL,
      archived INTEGER NOT NULL DEFAULT 0,
      PRIMARY KEY (tenant, id)
    );
    CREATE TABLE IF NOT EXISTS diet_type (
      tenant INTEGER NOT NULL,
      id TEXT NOT NULL,
      name TEXT NOT NULL,
      PRIMARY KEY (tenant, id)
    );
    CREATE TABLE IF NOT EXISTS registration_version (
      tenant INTEGER NOT NULL,
      department TEXT NOT NULL,
      year INTEGER NOT NULL,
      week INTEGER NOT NULL,
      version INTEGER NOT NULL,
      PRIMARY KEY (tenant, department, year, week)
    );
    CREATE TABLE IF NOT EXISTS diet_mark (
      tenant INTEGER NOT NULL,
      department TEXT NOT NULL,
      year INTEGER NOT NULL,
      week INTEGER NOT NULL,
      day INTEGER NOT NULL,
      meal TEXT NOT NULL,
      diet_type TEXT NOT NULL,
      marked INTEGER NOT NULL,
      PRIMARY KEY (tenant, department, year, week, day, meal, diet_type)
    );
    CREATE TABLE IF NOT EXISTS resident_count (
      tenant INTEGER NOT NULL,
      department TEXT NOT NULL,
      year INTEGER NOT NULL,
      week INTEGER NOT NULL,
      day INTEGER NOT NULL,
      meal TEXT NOT NULL,
      count INTEGER NOT NULL,
      PRIMARY KEY (tenant, department, year, week, day, meal)
    );
    CREATE TABLE IF NOT EXISTS alt2_flag (
      tenant INTEGER NOT NULL,
      department TEXT NOT NULL,
      year INTEGER NOT NULL,
      week INTEGER NOT NULL,
      day INTEGER NOT NULL,
      enabled INTEGER NOT NULL,
      PRIMARY KEY (tenant, department, year, week, day)
    );
    CREATE TABLE IF NOT EXISTS choice_version (
      department TEXT NOT NULL,
      week INTEGER NOT NULL,
      version INTEGER NOT NULL,
      PRIMARY KEY (department, week)
    );
    CREATE TABLE IF NOT EXISTS menu_choice (
      department TEXT NOT NULL,
      week INTEGER NOT NULL,
      day INTEGER NOT NULL,
      choice TEXT NOT NULL,
      PRIMARY KEY (department, week, day)
    );
";

pub(crate) fn open_file(path: &Path) -> Result<Connection, StoreError> {
    let conn = Connection::open(path)?;
    init(&conn)?;
    Ok(conn)
}

pub(crate) fn open_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    init(&conn)?;
    Ok(conn)
}

fn init(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode=WAL;
        PRAGMA synchronous=NORMAL;
        PRAGMA temp_store=MEMORY;
        ",
    )?;
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute_batch(&format!("PRAGMA user_version={SCHEMA_VERSION};"))?;
    Ok(())
}
