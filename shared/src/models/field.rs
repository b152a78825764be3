//! Input field models
//!
//! The seven agricultural parameters a user enters before a prediction,
//! their bounds and units, and the form section each one belongs to.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Identifier of one input field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Nitrogen,
    Phosphorus,
    Potassium,
    Temperature,
    Humidity,
    Rainfall,
    Ph,
}

impl FieldId {
    /// Every field, in section order
    pub const ALL: [FieldId; 7] = [
        FieldId::Nitrogen,
        FieldId::Phosphorus,
        FieldId::Potassium,
        FieldId::Temperature,
        FieldId::Humidity,
        FieldId::Rainfall,
        FieldId::Ph,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::Nitrogen => "nitrogen",
            FieldId::Phosphorus => "phosphorus",
            FieldId::Potassium => "potassium",
            FieldId::Temperature => "temperature",
            FieldId::Humidity => "humidity",
            FieldId::Rainfall => "rainfall",
            FieldId::Ph => "ph",
        }
    }

    /// Static descriptor for this field
    pub fn spec(&self) -> FieldSpec {
        match self {
            FieldId::Nitrogen => FieldSpec::integer(*self, "Nitrogen (N)", "kg/ha", 0, 200),
            FieldId::Phosphorus => FieldSpec::integer(*self, "Phosphorus (P)", "kg/ha", 0, 100),
            FieldId::Potassium => FieldSpec::integer(*self, "Potassium (K)", "kg/ha", 0, 200),
            FieldId::Temperature => FieldSpec::integer(*self, "Temperature", "°C", -10, 50),
            FieldId::Humidity => FieldSpec::integer(*self, "Humidity", "%", 0, 100),
            FieldId::Rainfall => FieldSpec::integer(*self, "Rainfall", "mm", 0, 500),
            FieldId::Ph => FieldSpec {
                field: *self,
                label: "pH Level",
                unit: "",
                min: Decimal::ZERO,
                max: Decimal::from(14),
                decimal_places: 1,
                section: Section::SoilProperties,
            },
        }
    }

    pub fn section(&self) -> Section {
        match self {
            FieldId::Nitrogen | FieldId::Phosphorus | FieldId::Potassium => Section::SoilNutrients,
            FieldId::Temperature | FieldId::Humidity | FieldId::Rainfall => {
                Section::ClimateConditions
            }
            FieldId::Ph => Section::SoilProperties,
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FieldId {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        FieldId::ALL
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Form section, in display order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    SoilNutrients,
    ClimateConditions,
    SoilProperties,
}

impl Section {
    pub const ALL: [Section; 3] = [
        Section::SoilNutrients,
        Section::ClimateConditions,
        Section::SoilProperties,
    ];

    /// 1-based position of the section in the form
    pub fn number(&self) -> u8 {
        match self {
            Section::SoilNutrients => 1,
            Section::ClimateConditions => 2,
            Section::SoilProperties => 3,
        }
    }

    pub fn from_number(number: u8) -> Result<Self, FieldError> {
        match number {
            1 => Ok(Section::SoilNutrients),
            2 => Ok(Section::ClimateConditions),
            3 => Ok(Section::SoilProperties),
            other => Err(FieldError::InvalidStep(other)),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::SoilNutrients => "Soil Nutrients",
            Section::ClimateConditions => "Climate Conditions",
            Section::SoilProperties => "Soil Properties",
        }
    }

    /// Fields shown in this section
    pub fn fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|field| field.section() == *self)
            .collect()
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Static descriptor of one numeric input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub field: FieldId,
    pub label: &'static str,
    pub unit: &'static str,
    /// Inclusive lower bound
    #[serde(with = "rust_decimal::serde::float")]
    pub min: Decimal,
    /// Inclusive upper bound
    #[serde(with = "rust_decimal::serde::float")]
    pub max: Decimal,
    /// Step granularity expressed as decimal places (0 = whole numbers)
    pub decimal_places: u32,
    pub section: Section,
}

impl FieldSpec {
    fn integer(field: FieldId, label: &'static str, unit: &'static str, min: i64, max: i64) -> Self {
        Self {
            field,
            label,
            unit,
            min: Decimal::from(min),
            max: Decimal::from(max),
            decimal_places: 0,
            section: field.section(),
        }
    }

    /// Smallest increment a value of this field can move by
    pub fn step(&self) -> Decimal {
        Decimal::new(1, self.decimal_places)
    }

    pub fn contains(&self, value: Decimal) -> bool {
        value >= self.min && value <= self.max
    }
}

/// The full field table in section order
pub fn field_specs() -> Vec<FieldSpec> {
    FieldId::ALL.iter().map(FieldId::spec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in FieldId::ALL {
            assert_eq!(field.as_str().parse::<FieldId>().unwrap(), field);
        }
    }

    #[test]
    fn test_field_parsing_is_case_insensitive() {
        assert_eq!("Nitrogen".parse::<FieldId>().unwrap(), FieldId::Nitrogen);
        assert_eq!(" PH ".parse::<FieldId>().unwrap(), FieldId::Ph);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = "sulfur".parse::<FieldId>().unwrap_err();
        assert_eq!(err, FieldError::UnknownField("sulfur".to_string()));
    }

    #[test]
    fn test_section_membership() {
        assert_eq!(
            Section::SoilNutrients.fields(),
            vec![FieldId::Nitrogen, FieldId::Phosphorus, FieldId::Potassium]
        );
        assert_eq!(
            Section::ClimateConditions.fields(),
            vec![FieldId::Temperature, FieldId::Humidity, FieldId::Rainfall]
        );
        assert_eq!(Section::SoilProperties.fields(), vec![FieldId::Ph]);
    }

    #[test]
    fn test_spec_table() {
        let nitrogen = FieldId::Nitrogen.spec();
        assert_eq!(nitrogen.min, Decimal::ZERO);
        assert_eq!(nitrogen.max, Decimal::from(200));
        assert_eq!(nitrogen.step(), Decimal::ONE);

        let temperature = FieldId::Temperature.spec();
        assert_eq!(temperature.min, Decimal::from(-10));
        assert_eq!(temperature.unit, "°C");

        let ph = FieldId::Ph.spec();
        assert_eq!(ph.step(), Decimal::new(1, 1));
        assert_eq!(ph.section, Section::SoilProperties);
        assert_eq!(field_specs().len(), 7);
    }

    #[test]
    fn test_section_numbers() {
        for section in Section::ALL {
            assert_eq!(Section::from_number(section.number()).unwrap(), section);
        }
        assert!(Section::from_number(0).is_err());
        assert!(Section::from_number(4).is_err());
    }
}
