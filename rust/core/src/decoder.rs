// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity Decoder - On-demand entity parsing
//!
//! Entities are located once through an index of byte offsets and decoded
//! lazily. Each decoder keeps a private cache, so a decoder per worker can
//! share one `Arc<EntityIndex>`.

use crate::entity::DecodedEntity;
use crate::error::{Error, Result};
use crate::parser::{parse_entity, EntitySpan, EntityScanner};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Entity id -> byte range of its instance line
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

/// Build entity index by scanning from `offset`.
/// Also returns the spans in source order.
pub fn build_entity_index(content: &str, offset: usize) -> (EntityIndex, Vec<EntitySpan<'_>>) {
    // Roughly one entity per 50 bytes
    let estimated = content.len().saturating_sub(offset) / 50;
    let mut index = FxHashMap::with_capacity_and_hasher(estimated, Default::default());
    let mut spans = Vec::with_capacity(estimated);

    for span in EntityScanner::from_offset(content, offset) {
        if index.insert(span.id, (span.start, span.end)).is_some() {
            tracing::warn!(id = span.id, "Duplicate entity id, keeping the last definition");
        }
        spans.push(span);
    }

    (index, spans)
}

/// Entity decoder for lazy parsing
pub struct EntityDecoder<'a> {
    content: &'a str,
    index: Arc<EntityIndex>,
    cache: FxHashMap<u32, Arc<DecodedEntity>>,
}

impl<'a> EntityDecoder<'a> {
    /// Create decoder with shared index (one decoder per worker)
    pub fn with_arc_index(content: &'a str, index: Arc<EntityIndex>) -> Self {
        Self {
            content,
            index,
            cache: FxHashMap::default(),
        }
    }

    /// Decode entity at a byte range
    pub fn decode_at(&self, start: usize, end: usize) -> Result<DecodedEntity> {
        let line = self
            .content
            .get(start..end)
            .ok_or_else(|| Error::parse(start, "Entity range out of bounds"))?;
        let raw = parse_entity(line).map_err(|e| match e {
            Error::Parse { position, message } => Error::parse(
                start + position,
                format!("{} in {:?}", message, &line[..line.len().min(100)]),
            ),
            other => other,
        })?;
        Ok(DecodedEntity::from_raw(&raw))
    }

    /// Decode entity by ID - O(1) lookup, cached
    pub fn decode_by_id(&mut self, entity_id: u32) -> Result<Arc<DecodedEntity>> {
        if let Some(entity) = self.cache.get(&entity_id) {
            return Ok(Arc::clone(entity));
        }

        let (start, end) = self
            .index
            .get(&entity_id)
            .copied()
            .ok_or(Error::EntityNotFound(entity_id))?;

        let entity = Arc::new(self.decode_at(start, end)?);
        self.cache.insert(entity_id, Arc::clone(&entity));
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::IfcType;

    const CONTENT: &str = r#"
#1=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,300.,450.);
#2=IFCDIRECTION((0.,0.,1.));
#3=IFCEXTRUDEDAREASOLID(#1,$,#2,3000.);
#4=IFCSHAPEREPRESENTATION($,'Body','SweptSolid',(#3,#99));
"#;

    fn decoder() -> EntityDecoder<'static> {
        let (index, spans) = build_entity_index(CONTENT, 0);
        assert_eq!(spans.len(), 4);
        EntityDecoder::with_arc_index(CONTENT, Arc::new(index))
    }

    #[test]
    fn test_decode_by_id_caches() {
        let mut decoder = decoder();
        let solid = decoder.decode_by_id(3).unwrap();
        assert_eq!(solid.ifc_type, IfcType::IfcExtrudedAreaSolid);
        let again = decoder.decode_by_id(3).unwrap();
        assert!(Arc::ptr_eq(&solid, &again));
    }

    #[test]
    fn test_follow_reference() {
        let mut decoder = decoder();
        let solid = decoder.decode_by_id(3).unwrap();
        let profile = decoder.decode_by_id(solid.get_ref(0).unwrap()).unwrap();
        assert_eq!(profile.ifc_type, IfcType::IfcRectangleProfileDef);
        assert_eq!(solid.get_ref(1), None);
    }

    #[test]
    fn test_missing_entity() {
        let mut decoder = decoder();
        let rep = decoder.decode_by_id(4).unwrap();
        assert_eq!(rep.get_ref_list(3), vec![3, 99]);
        assert!(matches!(
            decoder.decode_by_id(99),
            Err(Error::EntityNotFound(99))
        ));
    }
}
