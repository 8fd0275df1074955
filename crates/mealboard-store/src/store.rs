// SPDX-License-Identifier: Apache-2.0

use crate::error::StoreError;
use crate::guard::{cached_version, guarded_write, GuardedScope};
use crate::versions::{
    aggregate_registration_versions, VersionCache, CHOICE_VERSIONS, REGISTRATION_VERSIONS,
};
use crate::{choice, registration, registry, schema};
use mealboard_model::{
    ChoiceScope, CountOp, DayOfWeek, DepartmentId, DietTypeId, MarkOp, MenuChoice, MenuChoiceRow,
    RegistrationFacts, RegistrationScope, ResourceKind, TenantId, TenantWeek, Validator,
};
use rusqlite::types::Value;
use rusqlite::Connection;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Result of a single-value menu-choice PUT. `Unchanged` is the idempotent
/// no-op path: the stored value already matched, nothing was written and
/// the validator did not move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutChoiceOutcome {
    Applied(Validator),
    Unchanged(Validator),
}

impl PutChoiceOutcome {
    #[must_use]
    pub fn validator(&self) -> &Validator {
        match self {
            Self::Applied(v) | Self::Unchanged(v) => v,
        }
    }
}

/// Durable store for both versioned subsystem families. All writes go
/// through the concurrency guard; nothing mutates facts or version rows
/// around it.
pub struct Store {
    conn: Mutex<Connection>,
    versions: VersionCache,
}

fn registration_guard(scope: &RegistrationScope) -> GuardedScope {
    GuardedScope {
        table: &REGISTRATION_VERSIONS,
        kind: ResourceKind::Registration,
        identity: scope.identity(),
        key: vec![
            Value::Integer(scope.tenant.get() as i64),
            Value::Text(scope.department.as_str().to_string()),
            Value::Integer(i64::from(scope.year.get())),
            Value::Integer(i64::from(scope.week.get())),
        ],
    }
}

fn choice_guard(scope: &ChoiceScope) -> GuardedScope {
    GuardedScope {
        table: &CHOICE_VERSIONS,
        kind: ResourceKind::MenuChoice,
        identity: scope.identity(),
        key: vec![
            Value::Text(scope.department.as_str().to_string()),
            Value::Integer(i64::from(scope.week.get())),
        ],
    }
}

impl Store {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(schema::open_file(path)?),
            versions: VersionCache::default(),
        })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Mutex::new(schema::open_memory()?),
            versions: VersionCache::default(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn require_active_department(
        conn: &Connection,
        tenant: TenantId,
        department: &DepartmentId,
    ) -> Result<(), StoreError> {
        if registry::department_active(conn, tenant, department)? {
            Ok(())
        } else {
            Err(StoreError::DepartmentNotFound {
                tenant: Some(tenant),
                department: department.clone(),
            })
        }
    }

    fn require_known_department(
        conn: &Connection,
        department: &DepartmentId,
    ) -> Result<(), StoreError> {
        if registry::department_known(conn, department)? {
            Ok(())
        } else {
            Err(StoreError::DepartmentNotFound {
                tenant: None,
                department: department.clone(),
            })
        }
    }

    // -- registries -------------------------------------------------------

    pub fn upsert_department(
        &self,
        tenant: TenantId,
        id: &DepartmentId,
        name: &str,
    ) -> Result<(), StoreError> {
        registry::upsert_department(&self.lock(), tenant, id, name)
    }

    pub fn archive_department(
        &self,
        tenant: TenantId,
        id: &DepartmentId,
    ) -> Result<(), StoreError> {
        if registry::set_archived(&self.lock(), tenant, id, true)? {
            Ok(())
        } else {
            Err(StoreError::DepartmentNotFound {
                tenant: Some(tenant),
                department: id.clone(),
            })
        }
    }

    pub fn upsert_diet_type(
        &self,
        tenant: TenantId,
        id: &DietTypeId,
        name: &str,
    ) -> Result<(), StoreError> {
        registry::upsert_diet_type(&self.lock(), tenant, id, name)
    }

    pub fn diet_names(&self, tenant: TenantId) -> Result<BTreeMap<DietTypeId, String>, StoreError> {
        registry::diet_names(&self.lock(), tenant)
    }

    // -- registration reads -----------------------------------------------

    pub fn registration_validator(
        &self,
        scope: &RegistrationScope,
    ) -> Result<Validator, StoreError> {
        let conn = self.lock();
        Self::require_active_department(&conn, scope.tenant, &scope.department)?;
        let guard = registration_guard(scope);
        let version = cached_version(&conn, &self.versions, &guard)?;
        Ok(Validator::scoped(guard.kind, &guard.identity, version))
    }

    pub fn load_registration(
        &self,
        scope: &RegistrationScope,
    ) -> Result<(RegistrationFacts, Validator), StoreError> {
        let conn = self.lock();
        Self::require_active_department(&conn, scope.tenant, &scope.department)?;
        let guard = registration_guard(scope);
        let version = cached_version(&conn, &self.versions, &guard)?;
        let facts = registration::load_facts(&conn, scope)?;
        Ok((
            facts,
            Validator::scoped(guard.kind, &guard.identity, version),
        ))
    }

    pub fn aggregate_validator(&self, week: &TenantWeek) -> Result<Validator, StoreError> {
        let conn = self.lock();
        if !registry::tenant_known(&conn, week.tenant)? {
            return Err(StoreError::TenantNotFound {
                tenant: week.tenant,
            });
        }
        let (max, sum) = aggregate_registration_versions(&conn, week)?;
        Ok(Validator::aggregate(&week.identity(), max, sum))
    }

    /// Facts for every active department of the tenant week, ordered by
    /// department id. Feeds the aggregation engine.
    pub fn week_departments(
        &self,
        week: &TenantWeek,
    ) -> Result<Vec<(DepartmentId, String, RegistrationFacts)>, StoreError> {
        let conn = self.lock();
        if !registry::tenant_known(&conn, week.tenant)? {
            return Err(StoreError::TenantNotFound {
                tenant: week.tenant,
            });
        }
        let mut out = Vec::new();
        for (id, name) in registry::list_active_departments(&conn, week.tenant)? {
            let scope = week.scoped(id.clone());
            let facts = registration::load_facts(&conn, &scope)?;
            out.push((id, name, facts));
        }
        Ok(out)
    }

    pub fn department_name(
        &self,
        tenant: TenantId,
        id: &DepartmentId,
    ) -> Result<Option<String>, StoreError> {
        registry::department_name(&self.lock(), tenant, id)
    }

    // -- registration writes ----------------------------------------------

    pub fn toggle_marks(
        &self,
        scope: &RegistrationScope,
        ops: &[MarkOp],
        precondition: Option<&str>,
    ) -> Result<Validator, StoreError> {
        let mut conn = self.lock();
        Self::require_active_department(&conn, scope.tenant, &scope.department)?;
        let guard = registration_guard(scope);
        let ((), validator) =
            guarded_write(&mut conn, &self.versions, &guard, precondition, |tx| {
                registration::apply_marks(tx, scope, ops)
            })?;
        Ok(validator)
    }

    pub fn upsert_resident_counts(
        &self,
        scope: &RegistrationScope,
        ops: &[CountOp],
        precondition: Option<&str>,
    ) -> Result<Validator, StoreError> {
        let mut conn = self.lock();
        Self::require_active_department(&conn, scope.tenant, &scope.department)?;
        let guard = registration_guard(scope);
        let ((), validator) =
            guarded_write(&mut conn, &self.versions, &guard, precondition, |tx| {
                registration::apply_resident_counts(tx, scope, ops)
            })?;
        Ok(validator)
    }

    pub fn replace_alt2_days(
        &self,
        scope: &RegistrationScope,
        days: &BTreeSet<DayOfWeek>,
        precondition: Option<&str>,
    ) -> Result<Validator, StoreError> {
        let mut conn = self.lock();
        Self::require_active_department(&conn, scope.tenant, &scope.department)?;
        let guard = registration_guard(scope);
        let ((), validator) =
            guarded_write(&mut conn, &self.versions, &guard, precondition, |tx| {
                registration::replace_alt2_days(tx, scope, days)
            })?;
        Ok(validator)
    }

    // -- menu-choice subsystem --------------------------------------------

    pub fn load_menu_choices(
        &self,
        scope: &ChoiceScope,
    ) -> Result<(Vec<MenuChoiceRow>, Validator), StoreError> {
        let conn = self.lock();
        Self::require_known_department(&conn, &scope.department)?;
        let guard = choice_guard(scope);
        let version = cached_version(&conn, &self.versions, &guard)?;
        let rows = choice::load_choices(&conn, scope)?;
        Ok((rows, Validator::scoped(guard.kind, &guard.identity, version)))
    }

    /// Single-value PUT. Resubmitting the stored value is accepted without
    /// a valid precondition and does not advance the version; any actual
    /// change goes through the guard like every other write.
    pub fn put_menu_choice(
        &self,
        scope: &ChoiceScope,
        day: DayOfWeek,
        choice: MenuChoice,
        precondition: Option<&str>,
    ) -> Result<PutChoiceOutcome, StoreError> {
        let mut conn = self.lock();
        Self::require_known_department(&conn, &scope.department)?;
        let guard = choice_guard(scope);
        if choice::stored_choice(&conn, scope, day)? == Some(choice) {
            let version = cached_version(&conn, &self.versions, &guard)?;
            return Ok(PutChoiceOutcome::Unchanged(Validator::scoped(
                guard.kind,
                &guard.identity,
                version,
            )));
        }
        let ((), validator) =
            guarded_write(&mut conn, &self.versions, &guard, precondition, |tx| {
                choice::apply_choice(tx, scope, day, choice)
            })?;
        Ok(PutChoiceOutcome::Applied(validator))
    }
}
