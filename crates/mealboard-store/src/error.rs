// SPDX-License-Identifier: Apache-2.0

use mealboard_model::{DepartmentId, PreconditionDefect, TenantId};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum StoreError {
    Backend(String),
    DepartmentNotFound {
        tenant: Option<TenantId>,
        department: DepartmentId,
    },
    TenantNotFound {
        tenant: TenantId,
    },
    Precondition(PreconditionDefect),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Backend(msg) => write!(f, "storage backend failure: {msg}"),
            Self::DepartmentNotFound { tenant, department } => match tenant {
                Some(tenant) => write!(f, "unknown department {department} for tenant {tenant}"),
                None => write!(f, "unknown department {department}"),
            },
            Self::TenantNotFound { tenant } => write!(f, "unknown tenant {tenant}"),
            Self::Precondition(defect) => write!(f, "{defect}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<PreconditionDefect> for StoreError {
    fn from(defect: PreconditionDefect) -> Self {
        Self::Precondition(defect)
    }
}
