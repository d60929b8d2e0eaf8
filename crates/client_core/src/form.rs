//! Raw form input and its conversion into a prediction request.

use shared::{
    domain::{FormField, ROOM_COUNT_RANGE},
    protocol::PredictHomePriceRequest,
};

use crate::error::ValidationError;

/// Bounds applied to `total_sqft` at submission time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormLimits {
    pub min_sqft: f64,
    pub max_sqft: f64,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            min_sqft: 300.0,
            max_sqft: 10_000.0,
        }
    }
}

/// Field values exactly as the user entered them.
///
/// Nothing is parsed until [`FormState::validate`]; a blank value clears its field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    total_sqft: Option<String>,
    bhk: Option<String>,
    bath: Option<String>,
    location: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::TotalSqft => self.total_sqft.as_deref(),
            FormField::Bhk => self.bhk.as_deref(),
            FormField::Bath => self.bath.as_deref(),
            FormField::Location => self.location.as_deref(),
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
    }

    pub fn is_complete(&self) -> bool {
        FormField::ALL
            .into_iter()
            .all(|field| self.get(field).is_some())
    }

    pub fn validate(
        &self,
        limits: &FormLimits,
    ) -> Result<PredictHomePriceRequest, ValidationError> {
        let total_sqft = parse_sqft(self.required(FormField::TotalSqft)?, limits)?;
        let bhk = parse_room_count(FormField::Bhk, self.required(FormField::Bhk)?)?;
        let bath = parse_room_count(FormField::Bath, self.required(FormField::Bath)?)?;
        let location = self.required(FormField::Location)?.to_string();

        Ok(PredictHomePriceRequest {
            total_sqft,
            bhk,
            bath,
            location,
        })
    }

    fn required(&self, field: FormField) -> Result<&str, ValidationError> {
        self.get(field)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ValidationError::Missing(field))
    }

    fn slot_mut(&mut self, field: FormField) -> &mut Option<String> {
        match field {
            FormField::TotalSqft => &mut self.total_sqft,
            FormField::Bhk => &mut self.bhk,
            FormField::Bath => &mut self.bath,
            FormField::Location => &mut self.location,
        }
    }
}

fn parse_sqft(raw: &str, limits: &FormLimits) -> Result<f64, ValidationError> {
    let field = FormField::TotalSqft;
    let value = raw
        .parse::<f64>()
        .ok()
        // "inf" and "NaN" parse as f64 but are not areas.
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::Malformed {
            field,
            value: raw.to_string(),
        })?;

    if value <= 0.0 || value < limits.min_sqft || value > limits.max_sqft {
        return Err(ValidationError::OutOfRange {
            field,
            value: raw.to_string(),
        });
    }
    Ok(value)
}

fn parse_room_count(field: FormField, raw: &str) -> Result<u8, ValidationError> {
    let value = raw.parse::<i64>().map_err(|_| ValidationError::Malformed {
        field,
        value: raw.to_string(),
    })?;

    u8::try_from(value)
        .ok()
        .filter(|count| ROOM_COUNT_RANGE.contains(count))
        .ok_or_else(|| ValidationError::OutOfRange {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
