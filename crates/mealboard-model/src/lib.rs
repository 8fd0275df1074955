// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod facts;
pub mod ids;
pub mod rules;
pub mod scope;
pub mod summary;
pub mod validator;

pub use facts::{
    Alt2Flag, CountOp, Mark, MarkOp, MenuChoiceRow, RegistrationFacts, ResidentCount,
};
pub use ids::{
    parse_day_of_week, parse_department, parse_diet_type, parse_iso_week, parse_tenant, parse_year,
    DayOfWeek, DepartmentId, DietTypeId, IsoWeek, Meal, MenuChoice, TenantId, ValidationError,
    Year, DEPARTMENT_MAX_LEN, DIET_TYPE_MAX_LEN,
};
pub use rules::{check_menu_choice, WeekendRuleViolation};
pub use scope::{ChoiceScope, RegistrationScope, TenantWeek};
pub use summary::{DietCount, MealSummary, DepartmentSummary, WeeklyReport};
pub use validator::{
    parse_precondition, PreconditionDefect, ResourceKind, Validator, VALIDATOR_NAMESPACE,
};
