// SPDX-License-Identifier: Apache-2.0

use crate::errors::ApiError;
use mealboard_model::{CountOp, DayOfWeek, DietTypeId, MarkOp, Meal, MenuChoice};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Upper bound on a single resident head count. Anything above this is a
/// data-entry mistake, not a census.
pub const MAX_RESIDENT_COUNT: u32 = 10_000;

pub const MAX_BATCH_OPS: usize = 256;

fn parse_day(raw: u8, field: &str) -> Result<DayOfWeek, ApiError> {
    DayOfWeek::new(raw).map_err(|e| ApiError::invalid_param(field, &raw.to_string(), &e.0))
}

fn parse_meal(raw: &str, field: &str) -> Result<Meal, ApiError> {
    Meal::parse(raw).map_err(|e| ApiError::invalid_param(field, raw, &e.0))
}

fn check_batch_len(len: usize, field: &str) -> Result<(), ApiError> {
    if len == 0 {
        return Err(ApiError::invalid_param(field, "0", "batch must not be empty"));
    }
    if len > MAX_BATCH_OPS {
        return Err(ApiError::invalid_param(
            field,
            &len.to_string(),
            "batch exceeds maximum size",
        ));
    }
    Ok(())
}

/// One diet-mark toggle in a PATCH batch. Raw wire types on purpose: the
/// conversion below is what names the offending field on failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkPatch {
    pub day: u8,
    pub meal: String,
    pub diet_type: String,
    pub marked: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarksPatchBody {
    pub marks: Vec<MarkPatch>,
}

impl MarksPatchBody {
    pub fn into_ops(self) -> Result<Vec<MarkOp>, ApiError> {
        check_batch_len(self.marks.len(), "marks")?;
        self.marks
            .into_iter()
            .map(|patch| {
                Ok(MarkOp {
                    day: parse_day(patch.day, "marks.day")?,
                    meal: parse_meal(&patch.meal, "marks.meal")?,
                    diet_type: DietTypeId::parse(&patch.diet_type).map_err(|e| {
                        ApiError::invalid_param("marks.diet_type", &patch.diet_type, &e.0)
                    })?,
                    marked: patch.marked,
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountPatch {
    pub day: u8,
    pub meal: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountsPatchBody {
    pub counts: Vec<CountPatch>,
}

impl CountsPatchBody {
    pub fn into_ops(self) -> Result<Vec<CountOp>, ApiError> {
        check_batch_len(self.counts.len(), "counts")?;
        self.counts
            .into_iter()
            .map(|patch| {
                if patch.count > MAX_RESIDENT_COUNT {
                    return Err(ApiError::invalid_param(
                        "counts.count",
                        &patch.count.to_string(),
                        "count exceeds maximum",
                    ));
                }
                Ok(CountOp {
                    day: parse_day(patch.day, "counts.day")?,
                    meal: parse_meal(&patch.meal, "counts.meal")?,
                    count: patch.count,
                })
            })
            .collect()
    }
}

/// PUT body replacing the full Alt2-day set for the scope.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Alt2PutBody {
    pub days: Vec<u8>,
}

impl Alt2PutBody {
    pub fn into_days(self) -> Result<BTreeSet<DayOfWeek>, ApiError> {
        let mut days = BTreeSet::new();
        for raw in self.days {
            days.insert(parse_day(raw, "days")?);
        }
        Ok(days)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuChoicePutBody {
    pub day: u8,
    pub choice: String,
}

impl MenuChoicePutBody {
    pub fn into_value(self) -> Result<(DayOfWeek, MenuChoice), ApiError> {
        let day = parse_day(self.day, "day")?;
        let choice = MenuChoice::parse(&self.choice)
            .map_err(|e| ApiError::invalid_param("choice", &self.choice, &e.0))?;
        Ok((day, choice))
    }
}
