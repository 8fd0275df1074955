// SPDX-License-Identifier: Apache-2.0

use crate::ids::{DepartmentId, IsoWeek, TenantId, Year};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Addressable unit of versioned registration state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationScope {
    pub tenant: TenantId,
    pub department: DepartmentId,
    pub year: Year,
    pub week: IsoWeek,
}

impl RegistrationScope {
    #[must_use]
    pub fn new(tenant: TenantId, department: DepartmentId, year: Year, week: IsoWeek) -> Self {
        Self {
            tenant,
            department,
            year,
            week,
        }
    }

    /// Colon-joined identity used inside validators. Department ids cannot
    /// contain ':', so distinct scopes never produce the same identity.
    #[must_use]
    pub fn identity(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.tenant, self.department, self.year, self.week
        )
    }

    #[must_use]
    pub fn tenant_week(&self) -> TenantWeek {
        TenantWeek {
            tenant: self.tenant,
            year: self.year,
            week: self.week,
        }
    }
}

impl Display for RegistrationScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity())
    }
}

/// Tenant-wide week addressing for aggregate reads. Never written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantWeek {
    pub tenant: TenantId,
    pub year: Year,
    pub week: IsoWeek,
}

impl TenantWeek {
    #[must_use]
    pub fn new(tenant: TenantId, year: Year, week: IsoWeek) -> Self {
        Self { tenant, year, week }
    }

    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}:{}:{}", self.tenant, self.year, self.week)
    }

    #[must_use]
    pub fn scoped(&self, department: DepartmentId) -> RegistrationScope {
        RegistrationScope::new(self.tenant, department, self.year, self.week)
    }
}

impl Display for TenantWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity())
    }
}

/// Scope of the menu-choice subsystem: one department, one week.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChoiceScope {
    pub department: DepartmentId,
    pub week: IsoWeek,
}

impl ChoiceScope {
    #[must_use]
    pub fn new(department: DepartmentId, week: IsoWeek) -> Self {
        Self { department, week }
    }

    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}:{}", self.department, self.week)
    }
}

impl Display for ChoiceScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identity())
    }
}
