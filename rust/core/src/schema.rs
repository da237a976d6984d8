// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! The subset of IFC entity types the beam queries touch. Everything else
//! decodes as [`IfcType::Other`] and keeps its raw type name on the entity.

use std::fmt;

/// IFC entity types relevant to structural member lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IfcType {
    // Project & units
    IfcProject,
    IfcUnitAssignment,
    IfcSIUnit,
    IfcConversionBasedUnit,

    // Structural members
    IfcBeam,
    IfcBeamStandardCase,

    // Relationships
    IfcRelDefinesByType,
    IfcRelAssociatesMaterial,

    // Materials
    IfcMaterialProfile,
    IfcMaterialProfileSet,
    IfcMaterialProfileSetUsage,
    IfcMaterialProfileSetUsageTapering,

    // Representation
    IfcShapeRepresentation,
    IfcRepresentationMap,
    IfcMappedItem,
    IfcExtrudedAreaSolid,

    // Profiles
    IfcRectangleProfileDef,
    IfcRectangleHollowProfileDef,

    /// Any type outside the subset above
    Other,
}

impl IfcType {
    /// Parse IFC type from its STEP name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        match upper.as_str() {
            "IFCPROJECT" => Self::IfcProject,
            "IFCUNITASSIGNMENT" => Self::IfcUnitAssignment,
            "IFCSIUNIT" => Self::IfcSIUnit,
            "IFCCONVERSIONBASEDUNIT" => Self::IfcConversionBasedUnit,

            "IFCBEAM" => Self::IfcBeam,
            "IFCBEAMSTANDARDCASE" => Self::IfcBeamStandardCase,

            "IFCRELDEFINESBYTYPE" => Self::IfcRelDefinesByType,
            "IFCRELASSOCIATESMATERIAL" => Self::IfcRelAssociatesMaterial,

            "IFCMATERIALPROFILE" => Self::IfcMaterialProfile,
            "IFCMATERIALPROFILESET" => Self::IfcMaterialProfileSet,
            "IFCMATERIALPROFILESETUSAGE" => Self::IfcMaterialProfileSetUsage,
            "IFCMATERIALPROFILESETUSAGETAPERING" => Self::IfcMaterialProfileSetUsageTapering,

            "IFCSHAPEREPRESENTATION" => Self::IfcShapeRepresentation,
            "IFCREPRESENTATIONMAP" => Self::IfcRepresentationMap,
            "IFCMAPPEDITEM" => Self::IfcMappedItem,
            "IFCEXTRUDEDAREASOLID" => Self::IfcExtrudedAreaSolid,

            "IFCRECTANGLEPROFILEDEF" => Self::IfcRectangleProfileDef,
            "IFCRECTANGLEHOLLOWPROFILEDEF" => Self::IfcRectangleHollowProfileDef,

            _ => Self::Other,
        }
    }

    /// Canonical STEP name (`"OTHER"` for unrecognised types)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IfcProject => "IFCPROJECT",
            Self::IfcUnitAssignment => "IFCUNITASSIGNMENT",
            Self::IfcSIUnit => "IFCSIUNIT",
            Self::IfcConversionBasedUnit => "IFCCONVERSIONBASEDUNIT",
            Self::IfcBeam => "IFCBEAM",
            Self::IfcBeamStandardCase => "IFCBEAMSTANDARDCASE",
            Self::IfcRelDefinesByType => "IFCRELDEFINESBYTYPE",
            Self::IfcRelAssociatesMaterial => "IFCRELASSOCIATESMATERIAL",
            Self::IfcMaterialProfile => "IFCMATERIALPROFILE",
            Self::IfcMaterialProfileSet => "IFCMATERIALPROFILESET",
            Self::IfcMaterialProfileSetUsage => "IFCMATERIALPROFILESETUSAGE",
            Self::IfcMaterialProfileSetUsageTapering => "IFCMATERIALPROFILESETUSAGETAPERING",
            Self::IfcShapeRepresentation => "IFCSHAPEREPRESENTATION",
            Self::IfcRepresentationMap => "IFCREPRESENTATIONMAP",
            Self::IfcMappedItem => "IFCMAPPEDITEM",
            Self::IfcExtrudedAreaSolid => "IFCEXTRUDEDAREASOLID",
            Self::IfcRectangleProfileDef => "IFCRECTANGLEPROFILEDEF",
            Self::IfcRectangleHollowProfileDef => "IFCRECTANGLEHOLLOWPROFILEDEF",
            Self::Other => "OTHER",
        }
    }

    /// Beam-like occurrence types
    pub fn is_beam(&self) -> bool {
        matches!(self, Self::IfcBeam | Self::IfcBeamStandardCase)
    }

    /// Profiles whose `XDim`/`YDim` (attributes 3 and 4) give the outer rectangle
    pub fn is_rectangular_profile(&self) -> bool {
        matches!(
            self,
            Self::IfcRectangleProfileDef | Self::IfcRectangleHollowProfileDef
        )
    }

    /// Material definitions that carry a profile set
    pub fn is_profile_set_usage(&self) -> bool {
        matches!(
            self,
            Self::IfcMaterialProfileSetUsage | Self::IfcMaterialProfileSetUsageTapering
        )
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
