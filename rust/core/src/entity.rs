// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoded entities and their attribute values

use crate::parser::{decode_string, RawEntity, Token};
use crate::schema::IfcType;

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference
    EntityRef(u32),
    /// String value, escapes decoded
    String(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Enum value without the surrounding dots
    Enum(String),
    /// List of values
    List(Vec<AttributeValue>),
    /// Typed parameter such as IFCLABEL('x')
    Typed(String, Box<AttributeValue>),
    /// Null/undefined
    Null,
    /// Derived value (*)
    Derived,
}

impl AttributeValue {
    /// Convert from Token
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(decode_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum(e.to_string()),
            Token::List(items) => AttributeValue::List(items.iter().map(Self::from_token).collect()),
            Token::Typed(name, inner) => {
                AttributeValue::Typed(name.to_string(), Box::new(Self::from_token(inner)))
            }
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    /// Strip a typed wrapper, if any
    #[inline]
    fn untyped(&self) -> &AttributeValue {
        match self {
            AttributeValue::Typed(_, inner) => inner.untyped(),
            other => other,
        }
    }

    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    /// String value (typed labels are unwrapped)
    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self.untyped() {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value (integers and typed measures are accepted)
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self.untyped() {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Decoded IFC entity with attributes
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub id: u32,
    pub ifc_type: IfcType,
    /// Type name as written in the file (upper case in practice)
    pub type_name: String,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    pub fn from_raw(raw: &RawEntity<'_>) -> Self {
        Self {
            id: raw.id,
            ifc_type: IfcType::from_name(raw.type_name),
            type_name: raw.type_name.to_string(),
            attributes: raw.args.iter().map(AttributeValue::from_token).collect(),
        }
    }

    /// Get attribute by index
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index).and_then(|v| v.as_entity_ref())
    }

    /// String attribute; empty strings count as absent
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index)
            .and_then(|v| v.as_string())
            .filter(|s| !s.is_empty())
    }

    pub fn get_enum(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|v| v.as_enum())
    }

    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|v| v.as_float())
    }

    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index).and_then(|v| v.as_list())
    }

    /// Entity references held in a list attribute (non-references are skipped)
    pub fn get_ref_list(&self, index: usize) -> Vec<u32> {
        self.get_list(index)
            .map(|items| items.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_entity;

    fn decode(line: &str) -> DecodedEntity {
        DecodedEntity::from_raw(&parse_entity(line).unwrap())
    }

    #[test]
    fn test_from_raw_decodes_strings() {
        let entity = decode("#7=IFCBEAM('g',$,'B 300\\X\\D7450',$,$,$,$,$,$);");
        assert_eq!(entity.ifc_type, IfcType::IfcBeam);
        assert_eq!(entity.get_string(2), Some("B 300×450"));
        assert_eq!(entity.get_string(3), None);
    }

    #[test]
    fn test_typed_values_unwrap() {
        let entity = decode("#1=IFCPROPERTYSINGLEVALUE('Width',$,IFCLENGTHMEASURE(250.),$);");
        assert_eq!(entity.ifc_type, IfcType::Other);
        assert_eq!(entity.type_name, "IFCPROPERTYSINGLEVALUE");
        assert_eq!(entity.get_float(2), Some(250.0));
        let label = decode("#2=IFCX(IFCLABEL('300x450'));");
        assert_eq!(label.get_string(0), Some("300x450"));
    }

    #[test]
    fn test_accessors() {
        let entity = decode("#3=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);");
        assert_eq!(entity.get(0), Some(&AttributeValue::Derived));
        assert_eq!(entity.get_enum(1), Some("LENGTHUNIT"));
        assert_eq!(entity.get_string(1), None);
        assert_eq!(entity.get(9), None);

        let rel = decode("#4=IFCRELDEFINESBYTYPE('g',$,$,$,(#10,#11,$),#12);");
        assert_eq!(rel.get_ref_list(4), vec![10, 11]);
        assert_eq!(rel.get_ref(5), Some(12));
        assert!(rel.get_ref_list(5).is_empty());
    }

    #[test]
    fn test_integer_as_float() {
        let entity = decode("#5=IFCRECTANGLEPROFILEDEF(.AREA.,$,$,300,450);");
        assert_eq!(entity.get_float(3), Some(300.0));
    }
}
