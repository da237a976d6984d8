// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion of raw lengths to millimetres.

use ifc_beam_core::LengthUnit;

/// How values stored in model units map to millimetres.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelScale {
    /// Declared millimetre or metre.
    Declared(f64),
    /// Nothing declared; millimetres assumed.
    Assumed,
    /// Declared, but neither millimetre nor metre.
    Unsupported(String),
}

impl ModelScale {
    pub fn from_unit(unit: Option<&LengthUnit>) -> Self {
        match unit {
            None => ModelScale::Assumed,
            Some(LengthUnit::Si { prefix: None }) => ModelScale::Declared(1000.0),
            Some(LengthUnit::Si { prefix: Some(prefix) }) if prefix == "MILLI" => {
                ModelScale::Declared(1.0)
            }
            Some(other) => ModelScale::Unsupported(other.to_string()),
        }
    }

    /// Millimetres per model unit, or `None` for an unsupported unit.
    pub fn factor(&self) -> Option<f64> {
        match self {
            ModelScale::Declared(factor) => Some(*factor),
            ModelScale::Assumed => Some(1.0),
            ModelScale::Unsupported(_) => None,
        }
    }
}

/// Millimetres per unit for a unit token written next to a dimension.
pub fn token_scale(token: &str) -> Option<f64> {
    match token.to_ascii_lowercase().as_str() {
        "mm" | "millimeter" | "millimeters" | "millimetre" | "millimetres" => Some(1.0),
        "cm" => Some(10.0),
        "m" => Some(1000.0),
        _ => None,
    }
}

/// Scale for a bare `a x b` pair: small numbers read as metres.
pub fn magnitude_scale(a: f64, b: f64) -> f64 {
    if a <= 10.0 && b <= 10.0 {
        1000.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_scale() {
        assert_eq!(
            ModelScale::from_unit(Some(&LengthUnit::millimetre())).factor(),
            Some(1.0)
        );
        assert_eq!(
            ModelScale::from_unit(Some(&LengthUnit::metre())).factor(),
            Some(1000.0)
        );
        assert_eq!(ModelScale::from_unit(None), ModelScale::Assumed);
        assert_eq!(ModelScale::Assumed.factor(), Some(1.0));
    }

    #[test]
    fn test_unsupported_units() {
        let centi = LengthUnit::Si {
            prefix: Some("CENTI".to_string()),
        };
        assert_eq!(
            ModelScale::from_unit(Some(&centi)),
            ModelScale::Unsupported("CENTIMETRE".to_string())
        );

        let foot = LengthUnit::ConversionBased {
            name: "FOOT".to_string(),
        };
        let scale = ModelScale::from_unit(Some(&foot));
        assert_eq!(scale.factor(), None);
    }

    #[test]
    fn test_token_scale() {
        assert_eq!(token_scale("MM"), Some(1.0));
        assert_eq!(token_scale("Millimeters"), Some(1.0));
        assert_eq!(token_scale("cm"), Some(10.0));
        assert_eq!(token_scale("m"), Some(1000.0));
        assert_eq!(token_scale("in"), None);
    }

    #[test]
    fn test_magnitude_scale() {
        assert_eq!(magnitude_scale(0.3, 0.45), 1000.0);
        assert_eq!(magnitude_scale(10.0, 10.0), 1000.0);
        assert_eq!(magnitude_scale(0.3, 450.0), 1.0);
    }
}
