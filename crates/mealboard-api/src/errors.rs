// SPDX-License-Identifier: Apache-2.0

use mealboard_model::{PreconditionDefect, WeekendRuleViolation};
use mealboard_store::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorCode {
    ValidationFailed,
    PreconditionRequired,
    PreconditionMalformed,
    PreconditionFailed,
    DomainRuleViolation,
    NotFound,
    Internal,
}

impl ApiErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::PreconditionRequired => "precondition_required",
            Self::PreconditionMalformed => "precondition_malformed",
            Self::PreconditionFailed => "precondition_failed",
            Self::DomainRuleViolation => "domain_rule_violation",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }

    /// HTTP status for each taxonomy entry. 428 distinguishes "you sent no
    /// precondition" from the malformed (400) and stale (412) cases.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::ValidationFailed | Self::PreconditionMalformed => 400,
            Self::PreconditionRequired => 428,
            Self::PreconditionFailed => 412,
            Self::DomainRuleViolation => 422,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }
}

/// Wire error shape. `details` names fields or carries the current
/// validator so callers can act without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
    pub details: Value,
    pub request_id: String,
}

impl ApiError {
    #[must_use]
    pub fn new(
        code: ApiErrorCode,
        message: impl Into<String>,
        details: Value,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            request_id: request_id.into(),
        }
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    #[must_use]
    pub fn invalid_param(name: &str, value: &str, reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("invalid parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": reason, "value": value}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn missing_param(name: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            format!("missing parameter: {name}"),
            json!({"field_errors":[{"parameter": name, "reason": "required"}]}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn invalid_body(reason: &str) -> Self {
        Self::new(
            ApiErrorCode::ValidationFailed,
            "invalid request body",
            json!({"reason": reason}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn not_found(what: &str, identity: &str) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{what} not found"),
            json!({"resource": what, "identity": identity}),
            "req-unknown",
        )
    }

    #[must_use]
    pub fn internal(detail: &str) -> Self {
        Self::new(
            ApiErrorCode::Internal,
            "internal error",
            json!({"detail": detail}),
            "req-unknown",
        )
    }

    /// When the error carries the scope's current validator (the 412
    /// case), handlers echo it in the ETag header as well.
    #[must_use]
    pub fn current_validator(&self) -> Option<&str> {
        self.details.get("current_validator")?.as_str()
    }
}

impl From<PreconditionDefect> for ApiError {
    fn from(defect: PreconditionDefect) -> Self {
        match defect {
            PreconditionDefect::Missing => Self::new(
                ApiErrorCode::PreconditionRequired,
                "a precondition is required for this write",
                json!({"header": "If-Match"}),
                "req-unknown",
            ),
            PreconditionDefect::Malformed(reason) => Self::new(
                ApiErrorCode::PreconditionMalformed,
                "precondition is malformed",
                json!({"reason": reason}),
                "req-unknown",
            ),
            PreconditionDefect::Stale { current } => Self::new(
                ApiErrorCode::PreconditionFailed,
                "precondition failed; re-read and retry",
                json!({"current_validator": current.as_str()}),
                "req-unknown",
            ),
        }
    }
}

impl From<WeekendRuleViolation> for ApiError {
    fn from(violation: WeekendRuleViolation) -> Self {
        Self::new(
            ApiErrorCode::DomainRuleViolation,
            "alt2 cannot be chosen on weekend days",
            json!({
                "department": violation.department.as_str(),
                "week": violation.week.get(),
                "day": violation.day.get(),
            }),
            "req-unknown",
        )
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Precondition(defect) => defect.into(),
            StoreError::DepartmentNotFound { department, .. } => {
                Self::not_found("department", department.as_str())
            }
            StoreError::TenantNotFound { tenant } => {
                Self::not_found("tenant", &tenant.to_string())
            }
            StoreError::Backend(detail) => Self::internal(&detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mealboard_model::{ResourceKind, Validator};

    #[test]
    fn status_mapping_matches_the_taxonomy() {
        assert_eq!(ApiErrorCode::ValidationFailed.http_status(), 400);
        assert_eq!(ApiErrorCode::PreconditionRequired.http_status(), 428);
        assert_eq!(ApiErrorCode::PreconditionMalformed.http_status(), 400);
        assert_eq!(ApiErrorCode::PreconditionFailed.http_status(), 412);
        assert_eq!(ApiErrorCode::DomainRuleViolation.http_status(), 422);
        assert_eq!(ApiErrorCode::NotFound.http_status(), 404);
        assert_eq!(ApiErrorCode::Internal.http_status(), 500);
    }

    #[test]
    fn stale_defect_exposes_the_current_validator() {
        let current = Validator::scoped(ResourceKind::Registration, "1:west:2025:47", 3);
        let err: ApiError = PreconditionDefect::Stale {
            current: current.clone(),
        }
        .into();
        assert_eq!(err.code, ApiErrorCode::PreconditionFailed);
        assert_eq!(err.current_validator(), Some(current.as_str()));
    }

    #[test]
    fn error_codes_serialize_snake_case() {
        let value = serde_json::to_value(ApiErrorCode::DomainRuleViolation).unwrap();
        assert_eq!(value, serde_json::json!("domain_rule_violation"));
    }
}
