// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Read-only IFC model handle
//!
//! Owns the file content, the entity index and the inverse relationships
//! needed to walk from an element to its type and material. The handle is
//! immutable after opening, so it can be shared across worker threads; each
//! worker decodes through its own [`EntityDecoder`].

use crate::decoder::{build_entity_index, EntityDecoder, EntityIndex};
use crate::error::{Error, Result};
use crate::parser::{decode_string, parse_parameters, Token};
use crate::schema::IfcType;
use crate::units::{extract_length_unit, LengthUnit};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::sync::Arc;

/// Entity id and type in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityLocation {
    pub id: u32,
    pub ifc_type: IfcType,
}

/// Parsed IFC model
pub struct IfcModel {
    content: String,
    index: Arc<EntityIndex>,
    entities: Vec<EntityLocation>,
    schema: Option<String>,
    length_unit: Option<LengthUnit>,
    /// object id -> type object id (IFCRELDEFINESBYTYPE)
    typed_by: FxHashMap<u32, u32>,
    /// object id -> material definition ids (IFCRELASSOCIATESMATERIAL)
    materials: FxHashMap<u32, Vec<u32>>,
}

impl IfcModel {
    /// Read and index a model file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // Non-ASCII bytes outside \X\ escapes are not valid STEP, but some
        // exporters write raw Latin-1 into names.
        let content = String::from_utf8_lossy(&bytes).into_owned();
        Self::from_content(content)
    }

    /// Index a model held in memory
    pub fn from_content(content: String) -> Result<Self> {
        let trimmed = content.trim_start_matches('\u{feff}').trim_start();
        if !trimmed.starts_with("ISO-10303-21") {
            return Err(Error::NotStepFile);
        }

        let header_start = content
            .find("HEADER;")
            .ok_or_else(|| Error::InvalidHeader("missing HEADER section".to_string()))?;
        let header_end = content[header_start..]
            .find("ENDSEC;")
            .map(|i| header_start + i)
            .ok_or_else(|| Error::InvalidHeader("unterminated HEADER section".to_string()))?;
        let data_start = content[header_end..]
            .find("DATA")
            .map(|i| header_end + i)
            .ok_or_else(|| Error::InvalidHeader("missing DATA section".to_string()))?;
        let data_offset = content[data_start..]
            .find(';')
            .map(|i| data_start + i + 1)
            .ok_or_else(|| Error::InvalidHeader("malformed DATA section".to_string()))?;

        let schema = read_file_schema(&content[header_start..header_end]);

        let (index, spans) = build_entity_index(&content, data_offset);
        if spans.is_empty() {
            return Err(Error::EmptyData);
        }
        let entities: Vec<EntityLocation> = spans
            .iter()
            .map(|span| EntityLocation {
                id: span.id,
                ifc_type: IfcType::from_name(span.type_name),
            })
            .collect();
        let index = Arc::new(index);

        let (typed_by, materials) = index_relationships(&content, &index, &entities);
        let length_unit = find_length_unit(&content, &index, &entities);

        tracing::debug!(
            entities = entities.len(),
            schema = schema.as_deref().unwrap_or("unknown"),
            typed = typed_by.len(),
            with_material = materials.len(),
            "Indexed IFC model"
        );

        Ok(Self {
            content,
            index,
            entities,
            schema,
            length_unit,
            typed_by,
            materials,
        })
    }

    /// Schema identifier from FILE_SCHEMA (e.g. `IFC4`)
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Declared length unit, if the model has one
    pub fn length_unit(&self) -> Option<&LengthUnit> {
        self.length_unit.as_ref()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Ids of entities matching `predicate`, in source order
    pub fn ids_where(&self, predicate: impl Fn(IfcType) -> bool) -> Vec<u32> {
        self.entities
            .iter()
            .filter(|e| predicate(e.ifc_type))
            .map(|e| e.id)
            .collect()
    }

    /// Beam-like occurrences (IFCBEAM, IFCBEAMSTANDARDCASE) in source order
    pub fn beams(&self) -> Vec<u32> {
        self.ids_where(|t| t.is_beam())
    }

    /// A fresh decoder sharing this model's index
    pub fn decoder(&self) -> EntityDecoder<'_> {
        EntityDecoder::with_arc_index(&self.content, Arc::clone(&self.index))
    }

    /// Type object assigned through IFCRELDEFINESBYTYPE
    pub fn relating_type(&self, object_id: u32) -> Option<u32> {
        self.typed_by.get(&object_id).copied()
    }

    /// Material definitions assigned through IFCRELASSOCIATESMATERIAL
    pub fn material_associations(&self, object_id: u32) -> &[u32] {
        self.materials
            .get(&object_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// First schema name in `FILE_SCHEMA(('IFC4'))`
fn read_file_schema(header: &str) -> Option<String> {
    let start = header.find("FILE_SCHEMA")? + "FILE_SCHEMA".len();
    let params = parse_parameters(&header[start..]).ok()?;
    match params.first()? {
        Token::List(names) => names.iter().find_map(|name| match name {
            Token::String(s) => Some(decode_string(s)),
            _ => None,
        }),
        Token::String(s) => Some(decode_string(s)),
        _ => None,
    }
}

type Relationships = (FxHashMap<u32, u32>, FxHashMap<u32, Vec<u32>>);

fn index_relationships(
    content: &str,
    index: &Arc<EntityIndex>,
    entities: &[EntityLocation],
) -> Relationships {
    let mut decoder = EntityDecoder::with_arc_index(content, Arc::clone(index));
    let mut typed_by = FxHashMap::default();
    let mut materials: FxHashMap<u32, Vec<u32>> = FxHashMap::default();

    for location in entities {
        if !matches!(
            location.ifc_type,
            IfcType::IfcRelDefinesByType | IfcType::IfcRelAssociatesMaterial
        ) {
            continue;
        }

        let rel = match decoder.decode_by_id(location.id) {
            Ok(rel) => rel,
            Err(e) => {
                tracing::warn!(id = location.id, error = %e, "Skipping undecodable relationship");
                continue;
            }
        };

        // Both relationships: [4]=RelatedObjects, [5]=Relating{Type,Material}
        let Some(relating) = rel.get_ref(5) else {
            continue;
        };
        for related in rel.get_ref_list(4) {
            match location.ifc_type {
                IfcType::IfcRelDefinesByType => {
                    typed_by.entry(related).or_insert(relating);
                }
                _ => materials.entry(related).or_default().push(relating),
            }
        }
    }

    (typed_by, materials)
}

fn find_length_unit(
    content: &str,
    index: &Arc<EntityIndex>,
    entities: &[EntityLocation],
) -> Option<LengthUnit> {
    let mut decoder = EntityDecoder::with_arc_index(content, Arc::clone(index));

    // IFCPROJECT: [8]=UnitsInContext
    let from_project = entities
        .iter()
        .find(|e| e.ifc_type == IfcType::IfcProject)
        .and_then(|project| decoder.decode_by_id(project.id).ok())
        .and_then(|project| project.get_ref(8));
    let assignment = from_project.or_else(|| {
        entities
            .iter()
            .find(|e| e.ifc_type == IfcType::IfcUnitAssignment)
            .map(|e| e.id)
    })?;

    match extract_length_unit(&mut decoder, assignment) {
        Ok(unit) => unit,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read unit assignment");
            None
        }
    }
}
