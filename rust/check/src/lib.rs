// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC Beam Check
//!
//! Minimum-requirement checks for concrete beams in IFC models, following
//! EN 1992-1-1 (Eurocode 2).
//!
//! For every `IfcBeam`/`IfcBeamStandardCase` the cross-section is resolved
//! (material profile, then body geometry, then the name or tag), normalized to
//! millimetres and checked against a minimum width. Minimum reinforcement,
//! bending and shear resistance estimates are reported alongside.
//!
//! ```rust,ignore
//! use ifc_beam_check::{check_model, export_csv, CheckConfig};
//! use ifc_beam_core::IfcModel;
//!
//! let model = IfcModel::open("tower.ifc")?;
//! let records = check_model(&model, &CheckConfig::default());
//! export_csv("tower.beam_check.csv".as_ref(), &records)?;
//! ```

pub mod config;
pub mod error;
pub mod eurocode;
pub mod export;
pub mod name_parse;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod units;

#[cfg(test)]
mod fixtures;

pub use config::CheckConfig;
pub use error::{CheckError, Result};
pub use eurocode::{evaluate, Capacities, Evaluation};
pub use export::{default_output_path, export_csv, write_csv};
pub use pipeline::{check_beam, check_model};
pub use record::{BeamRecord, Compliance, Note, Provenance, Summary};
pub use resolver::{resolve, BeamContext, Dimensions, Resolution};
pub use units::ModelScale;
