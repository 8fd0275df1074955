// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod engine;
mod export;

pub use engine::{weekly_report, DepartmentFacts};
pub use export::{render, ExportFormat};
