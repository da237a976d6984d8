// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declared length unit of an IFC model
//!
//! Follows IFCPROJECT → IFCUNITASSIGNMENT → the unit with `.LENGTHUNIT.`.

use crate::decoder::EntityDecoder;
use crate::error::Result;
use crate::schema::IfcType;
use std::fmt;

/// Length unit as declared by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthUnit {
    /// IFCSIUNIT, optionally prefixed (`MILLI`, `CENTI`, ...)
    Si { prefix: Option<String> },
    /// IFCCONVERSIONBASEDUNIT such as `FOOT` or `INCH`
    ConversionBased { name: String },
}

impl LengthUnit {
    pub fn metre() -> Self {
        LengthUnit::Si { prefix: None }
    }

    pub fn millimetre() -> Self {
        LengthUnit::Si {
            prefix: Some("MILLI".to_string()),
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LengthUnit::Si { prefix: Some(prefix) } => write!(f, "{}METRE", prefix),
            LengthUnit::Si { prefix: None } => f.write_str("METRE"),
            LengthUnit::ConversionBased { name } => f.write_str(name),
        }
    }
}

/// Extract the length unit listed in an IFCUNITASSIGNMENT.
///
/// Returns `Ok(None)` when the assignment holds no length unit. Units that
/// fail to decode are skipped.
pub fn extract_length_unit(
    decoder: &mut EntityDecoder,
    unit_assignment_id: u32,
) -> Result<Option<LengthUnit>> {
    let assignment = decoder.decode_by_id(unit_assignment_id)?;
    if assignment.ifc_type != IfcType::IfcUnitAssignment {
        return Ok(None);
    }

    // IFCUNITASSIGNMENT: Units
    for unit_id in assignment.get_ref_list(0) {
        let unit = match decoder.decode_by_id(unit_id) {
            Ok(unit) => unit,
            Err(e) => {
                tracing::debug!(unit_id, error = %e, "Skipping undecodable unit");
                continue;
            }
        };

        match unit.ifc_type {
            // IFCSIUNIT: Dimensions, UnitType, Prefix, Name
            IfcType::IfcSIUnit if unit.get_enum(1) == Some("LENGTHUNIT") => {
                let prefix = unit.get_enum(2).map(str::to_string);
                return Ok(Some(LengthUnit::Si { prefix }));
            }
            // IFCCONVERSIONBASEDUNIT: Dimensions, UnitType, Name, ConversionFactor
            IfcType::IfcConversionBasedUnit if unit.get_enum(1) == Some("LENGTHUNIT") => {
                let name = unit.get_string(2).unwrap_or("UNNAMED").to_ascii_uppercase();
                return Ok(Some(LengthUnit::ConversionBased { name }));
            }
            _ => {}
        }
    }

    Ok(None)
}
