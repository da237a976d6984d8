// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output rows and run summary.

use crate::eurocode::Capacities;
use std::fmt;

/// Width verdict of one beam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compliance {
    Compliant,
    NonCompliant,
    Unknown,
}

impl Compliance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compliance::Compliant => "Compliant",
            Compliance::NonCompliant => "NonCompliant",
            Compliance::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Compliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which resolution route produced a beam's dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provenance {
    Profile,
    Geometry,
    NameParse,
    Unresolved,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::Profile => "Profile",
            Provenance::Geometry => "Geometry",
            Provenance::NameParse => "NameParse",
            Provenance::Unresolved => "Unresolved",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational remark attached to a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Note {
    /// Dimensions came from the element's type object.
    InheritedFromType,
    /// The model declares no length unit; millimetres were assumed.
    AssumedMillimetres,
    /// The model's length unit is outside mm/m.
    UnsupportedUnit(String),
    /// A name or tag held several disagreeing `a x b` patterns.
    AmbiguousText(String),
    /// Dimensions were parsed from this text.
    ParsedFrom(String),
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Note::InheritedFromType => f.write_str("inherited from type"),
            Note::AssumedMillimetres => f.write_str("warning: no length unit declared, assumed mm"),
            Note::UnsupportedUnit(unit) => write!(f, "unsupported length unit {}", unit),
            Note::AmbiguousText(text) => write!(f, "ambiguous dimensions in {:?}", text),
            Note::ParsedFrom(text) => write!(f, "parsed from {:?}", text),
        }
    }
}

/// One output row.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamRecord {
    pub global_id: String,
    /// Smaller cross-section dimension.
    pub width_mm: Option<f64>,
    /// Larger cross-section dimension.
    pub height_mm: Option<f64>,
    pub compliance: Compliance,
    pub capacities: Option<Capacities>,
    pub provenance: Provenance,
    pub notes: Vec<Note>,
}

impl BeamRecord {
    /// Row for a beam with no usable dimensions.
    pub fn unresolved(global_id: String, notes: Vec<Note>) -> Self {
        Self {
            global_id,
            width_mm: None,
            height_mm: None,
            compliance: Compliance::Unknown,
            capacities: None,
            provenance: Provenance::Unresolved,
            notes,
        }
    }

    /// Notes joined for a single table cell.
    pub fn notes_text(&self) -> String {
        self.notes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Counts per verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub unknown: usize,
}

impl Summary {
    pub fn from_records(records: &[BeamRecord]) -> Self {
        records.iter().fold(Summary::default(), |mut summary, record| {
            summary.total += 1;
            match record.compliance {
                Compliance::Compliant => summary.compliant += 1,
                Compliance::NonCompliant => summary.non_compliant += 1,
                Compliance::Unknown => summary.unknown += 1,
            }
            summary
        })
    }
}
