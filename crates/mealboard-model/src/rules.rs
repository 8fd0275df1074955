// SPDX-License-Identifier: Apache-2.0

use crate::ids::{DayOfWeek, DepartmentId, IsoWeek, MenuChoice};
use std::fmt::{Display, Formatter};

/// Standing business rule: the alternate lunch (Alt2) can only be selected
/// on weekdays. This is a domain rejection, distinct from any precondition
/// outcome, and holds regardless of how fresh the caller's validator is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekendRuleViolation {
    pub department: DepartmentId,
    pub week: IsoWeek,
    pub day: DayOfWeek,
}

impl Display for WeekendRuleViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "alt2 is not available on weekends (department {}, week {}, day {})",
            self.department, self.week, self.day
        )
    }
}

impl std::error::Error for WeekendRuleViolation {}

pub fn check_menu_choice(
    department: &DepartmentId,
    week: IsoWeek,
    day: DayOfWeek,
    choice: MenuChoice,
) -> Result<(), WeekendRuleViolation> {
    if choice == MenuChoice::Alt2 && day.is_weekend() {
        return Err(WeekendRuleViolation {
            department: department.clone(),
            week,
            day,
        });
    }
    Ok(())
}
