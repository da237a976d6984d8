// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Beam Core
//!
//! Lightweight STEP/IFC reader built with [nom](https://docs.rs/nom). It
//! answers the narrow questions a member check needs: which elements belong to
//! a category, what type and material they are assigned, what their shape
//! representation holds, and which length unit the model declares.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_beam_core::IfcModel;
//!
//! let model = IfcModel::open("model.ifc")?;
//! let mut decoder = model.decoder();
//! for id in model.beams() {
//!     let beam = decoder.decode_by_id(id)?;
//!     println!("#{} {:?} type={:?}", id, beam.get_string(2), model.relating_type(id));
//! }
//! ```
//!
//! Entities are indexed once ([memchr](https://docs.rs/memchr) driven scan)
//! and decoded lazily on request.

pub mod decoder;
pub mod entity;
pub mod error;
pub mod model;
pub mod parser;
pub mod schema;
pub mod units;

pub use decoder::{build_entity_index, EntityDecoder, EntityIndex};
pub use entity::{AttributeValue, DecodedEntity};
pub use error::{Error, Result};
pub use model::{EntityLocation, IfcModel};
pub use parser::{decode_string, parse_entity, EntityScanner, EntitySpan, RawEntity, Token};
pub use schema::IfcType;
pub use units::{extract_length_unit, LengthUnit};
