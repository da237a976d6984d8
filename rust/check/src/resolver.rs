// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Beam cross-section resolution
//!
//! Routes are tried in order and the first usable pair wins:
//!
//! 1. material profile of the element, then of its type
//! 2. rectangular swept area of the `Body` representation (one mapped-item hop)
//! 3. `a x b` pattern in element Name, element Tag, type Name, type Tag
//!
//! Missing or broken data never fails a beam; the route just yields nothing.

use crate::name_parse::{parse_dimensions, TextDimensions};
use crate::record::{Note, Provenance};
use crate::units::ModelScale;
use ifc_beam_core::{DecodedEntity, EntityDecoder, IfcModel, IfcType, Result};
use std::sync::Arc;

/// A beam occurrence and its type object.
pub struct BeamContext {
    pub entity: Arc<DecodedEntity>,
    pub type_entity: Option<Arc<DecodedEntity>>,
}

/// Resolved section in millimetres; width is the smaller side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width_mm: f64,
    pub height_mm: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub dimensions: Option<Dimensions>,
    pub provenance: Provenance,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Scale {
    /// Values in the model's declared length unit.
    Model,
    Millimetres,
}

struct Candidate {
    first: f64,
    second: f64,
    scale: Scale,
    notes: Vec<Note>,
}

type Route =
    fn(&IfcModel, &mut EntityDecoder<'_>, &BeamContext, &mut Vec<Note>) -> Result<Option<Candidate>>;

const ROUTES: [(Provenance, Route); 3] = [
    (Provenance::Profile, profile_route),
    (Provenance::Geometry, geometry_route),
    (Provenance::NameParse, name_route),
];

/// Both sides positive and finite.
pub fn is_usable(a: f64, b: f64) -> bool {
    a.is_finite() && b.is_finite() && a > 0.0 && b > 0.0
}

/// Resolve one beam's section.
pub fn resolve(
    model: &IfcModel,
    decoder: &mut EntityDecoder<'_>,
    beam: &BeamContext,
    scale: &ModelScale,
) -> Resolution {
    let mut notes = Vec::new();

    for (provenance, route) in ROUTES {
        let candidate = match route(model, decoder, beam, &mut notes) {
            Ok(Some(candidate)) => candidate,
            Ok(None) => continue,
            Err(e) => {
                tracing::debug!(id = beam.entity.id, route = %provenance, error = %e, "Route failed");
                continue;
            }
        };
        if !is_usable(candidate.first, candidate.second) {
            tracing::debug!(
                id = beam.entity.id,
                route = %provenance,
                first = candidate.first,
                second = candidate.second,
                "Degenerate dimensions"
            );
            continue;
        }

        let factor = match (candidate.scale, scale) {
            (Scale::Millimetres, _) => 1.0,
            (Scale::Model, ModelScale::Declared(factor)) => *factor,
            (Scale::Model, ModelScale::Assumed) => {
                notes.push(Note::AssumedMillimetres);
                1.0
            }
            (Scale::Model, ModelScale::Unsupported(unit)) => {
                // The model has a section of unknown size; a name must not override it
                notes.push(Note::UnsupportedUnit(unit.clone()));
                return Resolution {
                    dimensions: None,
                    provenance: Provenance::Unresolved,
                    notes,
                };
            }
        };

        let (a, b) = (candidate.first * factor, candidate.second * factor);
        notes.extend(candidate.notes);
        return Resolution {
            dimensions: Some(Dimensions {
                width_mm: a.min(b),
                height_mm: a.max(b),
            }),
            provenance,
            notes,
        };
    }

    Resolution {
        dimensions: None,
        provenance: Provenance::Unresolved,
        notes,
    }
}

fn profile_route(
    model: &IfcModel,
    decoder: &mut EntityDecoder<'_>,
    beam: &BeamContext,
    _notes: &mut Vec<Note>,
) -> Result<Option<Candidate>> {
    if let Some((first, second)) = material_profile(model, decoder, beam.entity.id) {
        return Ok(Some(Candidate {
            first,
            second,
            scale: Scale::Model,
            notes: Vec::new(),
        }));
    }

    if let Some(type_entity) = &beam.type_entity {
        if let Some((first, second)) = material_profile(model, decoder, type_entity.id) {
            return Ok(Some(Candidate {
                first,
                second,
                scale: Scale::Model,
                notes: vec![Note::InheritedFromType],
            }));
        }
    }

    Ok(None)
}

/// First rectangular profile among the materials associated with `owner`.
fn material_profile(
    model: &IfcModel,
    decoder: &mut EntityDecoder<'_>,
    owner: u32,
) -> Option<(f64, f64)> {
    for &material_id in model.material_associations(owner) {
        match profile_of_material(decoder, material_id) {
            Ok(Some(pair)) => return Some(pair),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(owner, material_id, error = %e, "Skipping material association");
            }
        }
    }
    None
}

fn profile_of_material(
    decoder: &mut EntityDecoder<'_>,
    material_id: u32,
) -> Result<Option<(f64, f64)>> {
    let material = decoder.decode_by_id(material_id)?;

    let kind = material.ifc_type;
    let set = match kind {
        // IFCMATERIALPROFILESETUSAGE(TAPERING): [0]=ForProfileSet
        _ if kind.is_profile_set_usage() => match material.get_ref(0) {
            Some(set_id) => decoder.decode_by_id(set_id)?,
            None => return Ok(None),
        },
        IfcType::IfcMaterialProfileSet => material,
        IfcType::IfcMaterialProfile => return profile_of_material_profile(decoder, &material),
        _ => return Ok(None),
    };
    if set.ifc_type != IfcType::IfcMaterialProfileSet {
        return Ok(None);
    }

    // IFCMATERIALPROFILESET: [2]=MaterialProfiles
    for profile_id in set.get_ref_list(2) {
        let material_profile = decoder.decode_by_id(profile_id)?;
        if let Some(pair) = profile_of_material_profile(decoder, &material_profile)? {
            return Ok(Some(pair));
        }
    }
    Ok(None)
}

fn profile_of_material_profile(
    decoder: &mut EntityDecoder<'_>,
    material_profile: &DecodedEntity,
) -> Result<Option<(f64, f64)>> {
    if material_profile.ifc_type != IfcType::IfcMaterialProfile {
        return Ok(None);
    }
    // IFCMATERIALPROFILE: [3]=Profile
    match material_profile.get_ref(3) {
        Some(profile_id) => rectangle(decoder, profile_id),
        None => Ok(None),
    }
}

/// `XDim`/`YDim` of a rectangle or rectangle-hollow profile.
fn rectangle(decoder: &mut EntityDecoder<'_>, profile_id: u32) -> Result<Option<(f64, f64)>> {
    let profile = decoder.decode_by_id(profile_id)?;
    if !profile.ifc_type.is_rectangular_profile() {
        return Ok(None);
    }
    Ok(profile.get_float(3).zip(profile.get_float(4)))
}

fn geometry_route(
    _model: &IfcModel,
    decoder: &mut EntityDecoder<'_>,
    beam: &BeamContext,
    _notes: &mut Vec<Note>,
) -> Result<Option<Candidate>> {
    // IFCBEAM: [6]=Representation
    let Some(shape_id) = beam.entity.get_ref(6) else {
        return Ok(None);
    };
    let shape = decoder.decode_by_id(shape_id)?;

    // IFCPRODUCTDEFINITIONSHAPE: [2]=Representations
    for representation_id in shape.get_ref_list(2) {
        let representation = decoder.decode_by_id(representation_id)?;
        if !is_body(&representation) {
            continue;
        }
        if let Some((first, second)) = swept_rectangle(decoder, &representation, true)? {
            return Ok(Some(Candidate {
                first,
                second,
                scale: Scale::Model,
                notes: Vec::new(),
            }));
        }
    }

    Ok(None)
}

fn is_body(representation: &DecodedEntity) -> bool {
    // IFCSHAPEREPRESENTATION: [1]=RepresentationIdentifier
    representation.ifc_type == IfcType::IfcShapeRepresentation
        && representation
            .get_string(1)
            .is_some_and(|id| id.eq_ignore_ascii_case("Body"))
}

fn swept_rectangle(
    decoder: &mut EntityDecoder<'_>,
    representation: &DecodedEntity,
    follow_mapped: bool,
) -> Result<Option<(f64, f64)>> {
    // IFCSHAPEREPRESENTATION: [3]=Items
    for item_id in representation.get_ref_list(3) {
        let item = decoder.decode_by_id(item_id)?;
        let found = match item.ifc_type {
            // IFCEXTRUDEDAREASOLID: [0]=SweptArea
            IfcType::IfcExtrudedAreaSolid => match item.get_ref(0) {
                Some(area_id) => rectangle(decoder, area_id)?,
                None => None,
            },
            IfcType::IfcMappedItem if follow_mapped => mapped_rectangle(decoder, &item)?,
            _ => None,
        };
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

fn mapped_rectangle(
    decoder: &mut EntityDecoder<'_>,
    item: &DecodedEntity,
) -> Result<Option<(f64, f64)>> {
    // IFCMAPPEDITEM: [0]=MappingSource
    let Some(map_id) = item.get_ref(0) else {
        return Ok(None);
    };
    let map = decoder.decode_by_id(map_id)?;
    if map.ifc_type != IfcType::IfcRepresentationMap {
        return Ok(None);
    }
    // IFCREPRESENTATIONMAP: [1]=MappedRepresentation
    let Some(representation_id) = map.get_ref(1) else {
        return Ok(None);
    };
    let representation = decoder.decode_by_id(representation_id)?;
    if representation.ifc_type != IfcType::IfcShapeRepresentation {
        return Ok(None);
    }
    swept_rectangle(decoder, &representation, false)
}

fn name_route(
    _model: &IfcModel,
    _decoder: &mut EntityDecoder<'_>,
    beam: &BeamContext,
    notes: &mut Vec<Note>,
) -> Result<Option<Candidate>> {
    // [2]=Name, [7]=Tag on both IFCBEAM and IFCBEAMTYPE
    let mut texts = vec![
        (beam.entity.get_string(2), false),
        (beam.entity.get_string(7), false),
    ];
    if let Some(type_entity) = &beam.type_entity {
        texts.push((type_entity.get_string(2), true));
        texts.push((type_entity.get_string(7), true));
    }

    for (text, inherited) in texts {
        let Some(text) = text else {
            continue;
        };
        match parse_dimensions(text) {
            TextDimensions::Found(first, second) if is_usable(first, second) => {
                let mut found_notes = vec![Note::ParsedFrom(text.to_string())];
                if inherited {
                    found_notes.push(Note::InheritedFromType);
                }
                return Ok(Some(Candidate {
                    first,
                    second,
                    scale: Scale::Millimetres,
                    notes: found_notes,
                }));
            }
            TextDimensions::Ambiguous => notes.push(Note::AmbiguousText(text.to_string())),
            TextDimensions::Found(..) | TextDimensions::NotFound => {}
        }
    }

    Ok(None)
}
