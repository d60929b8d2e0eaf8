use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Accepted values for both room counts (`bhk`, `bath`).
pub const ROOM_COUNT_RANGE: RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    TotalSqft,
    Bhk,
    Bath,
    Location,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::TotalSqft,
        FormField::Bhk,
        FormField::Bath,
        FormField::Location,
    ];

    /// Name used on the wire and by form inputs.
    pub fn as_str(self) -> &'static str {
        match self {
            FormField::TotalSqft => "total_sqft",
            FormField::Bhk => "bhk",
            FormField::Bath => "bath",
            FormField::Location => "location",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field `{0}`")]
pub struct UnknownFormField(pub String);

impl FromStr for FormField {
    type Err = UnknownFormField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownFormField(s.to_string()))
    }
}
