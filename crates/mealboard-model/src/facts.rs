// SPDX-License-Identifier: Apache-2.0

use crate::ids::{DayOfWeek, DietTypeId, Meal, MenuChoice};
use serde::{Deserialize, Serialize};

/// Stored diet-type mark. Absence of a row means "not marked".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Mark {
    pub day: DayOfWeek,
    pub meal: Meal,
    pub diet_type: DietTypeId,
    pub marked: bool,
}

/// Stored resident head count. Absence of a row means zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResidentCount {
    pub day: DayOfWeek,
    pub meal: Meal,
    pub count: u32,
}

/// Stored Alt2-allowed flag, per day without a meal dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alt2Flag {
    pub day: DayOfWeek,
    pub enabled: bool,
}

/// One batch mark operation, already validated at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkOp {
    pub day: DayOfWeek,
    pub meal: Meal,
    pub diet_type: DietTypeId,
    pub marked: bool,
}

/// One batch resident-count operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountOp {
    pub day: DayOfWeek,
    pub meal: Meal,
    pub count: u32,
}

/// Stored menu choice for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuChoiceRow {
    pub day: DayOfWeek,
    pub choice: MenuChoice,
}

/// Everything stored for one registration scope. An untouched scope loads
/// as all-empty defaults, which is valid state, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationFacts {
    pub marks: Vec<Mark>,
    pub resident_counts: Vec<ResidentCount>,
    pub alt2_days: Vec<DayOfWeek>,
}

impl RegistrationFacts {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.marks.is_empty() && self.resident_counts.is_empty() && self.alt2_days.is_empty()
    }
}
