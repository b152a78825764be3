//! Form state models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::field::{FieldId, Section};
use crate::validation::clamp_to_spec;

/// Current value of every input field
///
/// [`FormState::set`] clamps and quantizes, so a form edited through it never
/// holds an out-of-range value. Forms decoded from the wire go through
/// [`crate::validation::validate_form`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    #[serde(with = "rust_decimal::serde::float")]
    pub nitrogen: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub phosphorus: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub potassium: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub temperature: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub humidity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub ph: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rainfall: Decimal,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            nitrogen: Decimal::from(50),
            phosphorus: Decimal::from(30),
            potassium: Decimal::from(40),
            temperature: Decimal::from(25),
            humidity: Decimal::from(60),
            ph: Decimal::new(65, 1),
            rainfall: Decimal::from(200),
        }
    }
}

impl FormState {
    pub fn get(&self, field: FieldId) -> Decimal {
        match field {
            FieldId::Nitrogen => self.nitrogen,
            FieldId::Phosphorus => self.phosphorus,
            FieldId::Potassium => self.potassium,
            FieldId::Temperature => self.temperature,
            FieldId::Humidity => self.humidity,
            FieldId::Rainfall => self.rainfall,
            FieldId::Ph => self.ph,
        }
    }

    fn slot(&mut self, field: FieldId) -> &mut Decimal {
        match field {
            FieldId::Nitrogen => &mut self.nitrogen,
            FieldId::Phosphorus => &mut self.phosphorus,
            FieldId::Potassium => &mut self.potassium,
            FieldId::Temperature => &mut self.temperature,
            FieldId::Humidity => &mut self.humidity,
            FieldId::Rainfall => &mut self.rainfall,
            FieldId::Ph => &mut self.ph,
        }
    }

    /// Replace one field with a clamped, step-rounded value
    ///
    /// NaN leaves the field untouched. Returns the value now stored.
    pub fn set(&mut self, field: FieldId, raw: f64) -> Decimal {
        if let Some(value) = clamp_to_spec(&field.spec(), raw) {
            *self.slot(field) = value;
        }
        self.get(field)
    }

    /// `(field, value)` pairs in section order
    pub fn entries(&self) -> Vec<(FieldId, Decimal)> {
        FieldId::ALL
            .into_iter()
            .map(|field| (field, self.get(field)))
            .collect()
    }
}

/// 1-based cursor over the form sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepCursor(u8);

impl StepCursor {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = Section::ALL.len() as u8;

    /// Cursor at `step`, saturated into the valid range
    pub fn at(step: u8) -> Self {
        Self(step.clamp(Self::FIRST, Self::LAST))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn section(&self) -> Section {
        match self.0 {
            1 => Section::SoilNutrients,
            2 => Section::ClimateConditions,
            _ => Section::SoilProperties,
        }
    }

    /// Move forward one section; no-op on the last one
    pub fn advance(&mut self) {
        if self.0 < Self::LAST {
            self.0 += 1;
        }
    }

    /// Move back one section; no-op on the first one
    pub fn retreat(&mut self) {
        if self.0 > Self::FIRST {
            self.0 -= 1;
        }
    }
}

impl Default for StepCursor {
    fn default() -> Self {
        Self(Self::FIRST)
    }
}
