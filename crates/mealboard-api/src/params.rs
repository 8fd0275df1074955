// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use mealboard_model::{
    ChoiceScope, DepartmentId, IsoWeek, RegistrationScope, TenantId, TenantWeek, Year,
};
use mealboard_report::ExportFormat;
use std::collections::BTreeMap;

fn required<'q>(query: &'q BTreeMap<String, String>, name: &str) -> Result<&'q str, ApiError> {
    query
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| ApiError::missing_param(name))
}

fn parse_tenant(query: &BTreeMap<String, String>) -> Result<TenantId, ApiError> {
    let raw = required(query, "tenant")?;
    TenantId::parse(raw).map_err(|e| ApiError::invalid_param("tenant", raw, &e.0))
}

fn parse_year(query: &BTreeMap<String, String>) -> Result<Year, ApiError> {
    let raw = required(query, "year")?;
    Year::parse(raw).map_err(|e| ApiError::invalid_param("year", raw, &e.0))
}

fn parse_week(query: &BTreeMap<String, String>) -> Result<IsoWeek, ApiError> {
    let raw = required(query, "week")?;
    IsoWeek::parse(raw).map_err(|e| ApiError::invalid_param("week", raw, &e.0))
}

fn parse_department(query: &BTreeMap<String, String>) -> Result<DepartmentId, ApiError> {
    let raw = required(query, "department")?;
    DepartmentId::parse(raw).map_err(|e| ApiError::invalid_param("department", raw, &e.0))
}

/// Full registration scope: all four dimensions are required.
pub fn parse_registration_params(
    query: &BTreeMap<String, String>,
) -> Result<RegistrationScope, ApiError> {
    Ok(RegistrationScope::new(
        parse_tenant(query)?,
        parse_department(query)?,
        parse_year(query)?,
        parse_week(query)?,
    ))
}

/// Report scope: the department filter is optional; absent means the whole
/// tenant week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportParams {
    pub week: TenantWeek,
    pub department: Option<DepartmentId>,
}

pub fn parse_report_params(query: &BTreeMap<String, String>) -> Result<ReportParams, ApiError> {
    let week = TenantWeek::new(parse_tenant(query)?, parse_year(query)?, parse_week(query)?);
    let department = match query.get("department") {
        Some(raw) => Some(
            DepartmentId::parse(raw)
                .map_err(|e| ApiError::invalid_param("department", raw, &e.0))?,
        ),
        None => None,
    };
    Ok(ReportParams { week, department })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportParams {
    pub report: ReportParams,
    pub format: ExportFormat,
}

pub fn parse_export_params(query: &BTreeMap<String, String>) -> Result<ExportParams, ApiError> {
    let report = parse_report_params(query)?;
    let raw = required(query, "format")?;
    let format = ExportFormat::parse(raw).map_err(|e| ApiError::invalid_param("format", raw, &e.0))?;
    Ok(ExportParams { report, format })
}

/// Menu-choice scope: department and week only, no tenant or year axis.
pub fn parse_choice_params(query: &BTreeMap<String, String>) -> Result<ChoiceScope, ApiError> {
    Ok(ChoiceScope::new(parse_department(query)?, parse_week(query)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ApiErrorCode;

    fn query(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn registration_scope_requires_every_dimension() {
        let full = query(&[
            ("tenant", "1"),
            ("department", "west"),
            ("year", "2025"),
            ("week", "47"),
        ]);
        let scope = parse_registration_params(&full).unwrap();
        assert_eq!(scope.identity(), "1:west:2025:47");

        for missing in ["tenant", "department", "year", "week"] {
            let mut partial = full.clone();
            partial.remove(missing);
            let err = parse_registration_params(&partial).unwrap_err();
            assert_eq!(err.code, ApiErrorCode::ValidationFailed);
        }
    }

    #[test]
    fn out_of_range_week_names_the_parameter() {
        let q = query(&[
            ("tenant", "1"),
            ("department", "west"),
            ("year", "2025"),
            ("week", "54"),
        ]);
        let err = parse_registration_params(&q).unwrap_err();
        assert_eq!(
            err.details["field_errors"][0]["parameter"],
            serde_json::json!("week")
        );
    }

    #[test]
    fn report_department_filter_is_optional() {
        let q = query(&[("tenant", "1"), ("year", "2025"), ("week", "47")]);
        let params = parse_report_params(&q).unwrap();
        assert!(params.department.is_none());

        let q = query(&[
            ("tenant", "1"),
            ("year", "2025"),
            ("week", "47"),
            ("department", "west"),
        ]);
        let params = parse_report_params(&q).unwrap();
        assert_eq!(params.department.unwrap().as_str(), "west");
    }

    #[test]
    fn export_rejects_unsupported_formats() {
        let q = query(&[
            ("tenant", "1"),
            ("year", "2025"),
            ("week", "47"),
            ("format", "pdf"),
        ]);
        let err = parse_export_params(&q).unwrap_err();
        assert_eq!(err.code, ApiErrorCode::ValidationFailed);

        let q = query(&[
            ("tenant", "1"),
            ("year", "2025"),
            ("week", "47"),
            ("format", "spreadsheet"),
        ]);
        assert_eq!(
            parse_export_params(&q).unwrap().format,
            ExportFormat::Spreadsheet
        );
    }

    #[test]
    fn choice_scope_ignores_tenant_and_year() {
        let q = query(&[("department", "west"), ("week", "47")]);
        let scope = parse_choice_params(&q).unwrap();
        assert_eq!(scope.identity(), "west:47");
    }
}
