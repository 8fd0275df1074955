// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

pub const DEPARTMENT_MAX_LEN: usize = 64;
pub const DIET_TYPE_MAX_LEN: usize = 64;
pub const YEAR_MIN: u16 = 2000;
pub const YEAR_MAX: u16 = 2100;

pub fn parse_tenant(input: &str) -> Result<TenantId, ValidationError> {
    TenantId::parse(input)
}

pub fn parse_department(input: &str) -> Result<DepartmentId, ValidationError> {
    DepartmentId::parse(input)
}

pub fn parse_diet_type(input: &str) -> Result<DietTypeId, ValidationError> {
    DietTypeId::parse(input)
}

pub fn parse_year(input: &str) -> Result<Year, ValidationError> {
    Year::parse(input)
}

pub fn parse_iso_week(input: &str) -> Result<IsoWeek, ValidationError> {
    IsoWeek::parse(input)
}

pub fn parse_day_of_week(raw: u8) -> Result<DayOfWeek, ValidationError> {
    DayOfWeek::new(raw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(u64);

impl TenantId {
    pub fn new(raw: u64) -> Result<Self, ValidationError> {
        if raw == 0 {
            return Err(ValidationError("tenant must be a positive integer".to_string()));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError("tenant must be a positive integer".to_string()))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(String);

impl DepartmentId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError("department must not be empty".to_string()));
        }
        if input.len() > DEPARTMENT_MAX_LEN {
            return Err(ValidationError(format!(
                "department exceeds max length {DEPARTMENT_MAX_LEN}"
            )));
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError(
                "department must match [A-Za-z0-9_-]+".to_string(),
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for DepartmentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DietTypeId(String);

impl DietTypeId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        if input.is_empty() {
            return Err(ValidationError("diet_type must not be empty".to_string()));
        }
        if input.len() > DIET_TYPE_MAX_LEN {
            return Err(ValidationError(format!(
                "diet_type exceeds max length {DIET_TYPE_MAX_LEN}"
            )));
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(ValidationError(
                "diet_type must match [A-Za-z0-9_-]+".to_string(),
            ));
        }
        Ok(Self(input.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for DietTypeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(u16);

impl Year {
    pub fn new(raw: u16) -> Result<Self, ValidationError> {
        if !(YEAR_MIN..=YEAR_MAX).contains(&raw) {
            return Err(ValidationError(format!(
                "year must be in {YEAR_MIN}..={YEAR_MAX}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input
            .trim()
            .parse::<u16>()
            .map_err(|_| ValidationError("year must be a four-digit integer".to_string()))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl Display for Year {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IsoWeek(u8);

impl IsoWeek {
    pub fn new(raw: u8) -> Result<Self, ValidationError> {
        if !(1..=53).contains(&raw) {
            return Err(ValidationError("week must be in 1..=53".to_string()));
        }
        Ok(Self(raw))
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let raw = input
            .trim()
            .parse::<u8>()
            .map_err(|_| ValidationError("week must be an integer in 1..=53".to_string()))?;
        Self::new(raw)
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Display for IsoWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO day of week, 1 = Monday .. 7 = Sunday.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfWeek(u8);

impl DayOfWeek {
    pub fn new(raw: u8) -> Result<Self, ValidationError> {
        if !(1..=7).contains(&raw) {
            return Err(ValidationError("day must be in 1..=7".to_string()));
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_weekend(self) -> bool {
        self.0 >= 6
    }
}

impl TryFrom<u8> for DayOfWeek {
    type Error = ValidationError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<DayOfWeek> for u8 {
    fn from(day: DayOfWeek) -> Self {
        day.0
    }
}

impl Display for DayOfWeek {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Meal {
    Lunch,
    Dinner,
}

impl Meal {
    pub const ALL: [Meal; 2] = [Meal::Lunch, Meal::Dinner];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            other => Err(ValidationError(format!(
                "meal must be lunch or dinner, got {other:?}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

impl Display for Meal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuChoice {
    Alt1,
    Alt2,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.to_ascii_lowercase().as_str() {
            "alt1" => Ok(Self::Alt1),
            "alt2" => Ok(Self::Alt2),
            other => Err(ValidationError(format!(
                "choice must be alt1 or alt2, got {other:?}"
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alt1 => "alt1",
            Self::Alt2 => "alt2",
        }
    }
}

impl Display for MenuChoice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
