// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

pub mod dto;
pub mod errors;
pub mod params;

pub use dto::{
    Alt2PutBody, CountPatch, CountsPatchBody, MarkPatch, MarksPatchBody, MenuChoicePutBody,
    MAX_RESIDENT_COUNT,
};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{
    parse_choice_params, parse_export_params, parse_registration_params, parse_report_params,
    ExportParams, ReportParams,
};
