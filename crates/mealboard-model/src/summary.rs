// SPDX-License-Identifier: Apache-2.0

use crate::ids::{DepartmentId, DietTypeId, IsoWeek, Meal, TenantId, Year};
use serde::{Deserialize, Serialize};

/// One special-diet line in a meal summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DietCount {
    pub diet_type: DietTypeId,
    pub diet_name: String,
    pub count: u32,
}

/// Derived numbers for one meal: specials sorted count-desc then name-asc,
/// and the normal-diet remainder clamped at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MealSummary {
    pub meal: Meal,
    pub residents_total: u32,
    pub normal_diet_count: u32,
    pub specials: Vec<DietCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepartmentSummary {
    pub department: DepartmentId,
    pub department_name: String,
    pub meals: Vec<MealSummary>,
}

/// Full weekly report: per-department summaries ordered by department id,
/// plus site totals per meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeeklyReport {
    pub tenant: TenantId,
    pub year: Year,
    pub week: IsoWeek,
    pub departments: Vec<DepartmentSummary>,
    pub totals: Vec<MealSummary>,
}
