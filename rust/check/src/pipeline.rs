// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-beam evaluation over a whole model.
//!
//! Beams are independent, so they are evaluated on the rayon pool with one
//! decoder per worker. Output order is source order.

use crate::config::CheckConfig;
use crate::eurocode::evaluate;
use crate::record::BeamRecord;
use crate::resolver::{resolve, BeamContext};
use crate::units::ModelScale;
use ifc_beam_core::{EntityDecoder, IfcModel};
use rayon::prelude::*;

/// Evaluate every beam-like element of `model`.
pub fn check_model(model: &IfcModel, config: &CheckConfig) -> Vec<BeamRecord> {
    let scale = ModelScale::from_unit(model.length_unit());
    match &scale {
        ModelScale::Assumed => tracing::warn!("Model declares no length unit, assuming millimetres"),
        ModelScale::Unsupported(unit) => {
            tracing::warn!(unit = %unit, "Unsupported length unit, model dimensions will be ignored")
        }
        ModelScale::Declared(factor) => tracing::debug!(mm_per_unit = factor, "Length unit"),
    }

    let beams = model.beams();
    tracing::info!(
        beams = beams.len(),
        schema = model.schema().unwrap_or("unknown"),
        "Checking beams"
    );

    beams
        .par_iter()
        .map_init(
            || model.decoder(),
            |decoder, &id| check_beam(model, decoder, id, &scale, config),
        )
        .collect()
}

/// Evaluate one beam. Never fails; problems end up on the record.
pub fn check_beam(
    model: &IfcModel,
    decoder: &mut EntityDecoder<'_>,
    id: u32,
    scale: &ModelScale,
    config: &CheckConfig,
) -> BeamRecord {
    let entity = match decoder.decode_by_id(id) {
        Ok(entity) => entity,
        Err(e) => {
            tracing::warn!(id, error = %e, "Could not decode beam");
            return BeamRecord::unresolved(fallback_id(id), Vec::new());
        }
    };
    // [0]=GlobalId
    let global_id = entity
        .get_string(0)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_id(id));

    let type_entity = model
        .relating_type(id)
        .and_then(|type_id| match decoder.decode_by_id(type_id) {
            Ok(type_entity) => Some(type_entity),
            Err(e) => {
                tracing::debug!(id, type_id, error = %e, "Ignoring undecodable type");
                None
            }
        });

    let beam = BeamContext { entity, type_entity };
    let resolution = resolve(model, decoder, &beam, scale);

    let Some(dimensions) = resolution.dimensions else {
        tracing::debug!(id, global_id = %global_id, "No dimensions found");
        return BeamRecord::unresolved(global_id, resolution.notes);
    };

    let evaluation = evaluate(dimensions.width_mm, dimensions.height_mm, config);
    tracing::debug!(
        id,
        global_id = %global_id,
        width = dimensions.width_mm,
        height = dimensions.height_mm,
        provenance = %resolution.provenance,
        compliance = %evaluation.compliance,
        "Checked beam"
    );

    BeamRecord {
        global_id,
        width_mm: Some(dimensions.width_mm),
        height_mm: Some(dimensions.height_mm),
        compliance: evaluation.compliance,
        capacities: evaluation.capacities,
        provenance: resolution.provenance,
        notes: resolution.notes,
    }
}

/// Stand-in when GlobalId is missing.
fn fallback_id(id: u32) -> String {
    format!("#{}", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{model, MILLIMETRE_UNITS};
    use crate::record::{Compliance, Provenance};

    #[test]
    fn test_records_follow_source_order() {
        let data = (0..50)
            .map(|i| format!("#{}=IFCBEAM('g{}',$,'B {}x600',$,$,$,$,$,$);", 100 + i, i, 150 + 2 * i))
            .collect::<Vec<_>>()
            .join("\n");
        let model = model(MILLIMETRE_UNITS, &data);
        let records = check_model(&model, &CheckConfig::default());

        assert_eq!(records.len(), 50);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.global_id, format!("g{}", i));
            assert_eq!(record.width_mm, Some((150 + 2 * i) as f64));
        }
        // 150..=198 fail, 200.. pass
        assert_eq!(records[24].compliance, Compliance::NonCompliant);
        assert_eq!(records[25].compliance, Compliance::Compliant);
    }

    #[test]
    fn test_standard_case_and_missing_global_id() {
        let data = "#10=IFCBEAMSTANDARDCASE($,$,'Beam-X',$,$,$,$,$,$);
#11=IFCCOLUMN('col',$,'C 400x400',$,$,$,$,$,$);";
        let model = model(MILLIMETRE_UNITS, data);
        let records = check_model(&model, &CheckConfig::default());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].global_id, "#10");
        assert_eq!(records[0].provenance, Provenance::Unresolved);
        assert_eq!(records[0].compliance, Compliance::Unknown);
    }

    #[test]
    fn test_threshold_comes_from_config() {
        let data = "#10=IFCBEAM('g',$,'B 180x400',$,$,$,$,$,$);";
        let model = model(MILLIMETRE_UNITS, data);
        let strict = check_model(&model, &CheckConfig::default());
        let relaxed = check_model(
            &model,
            &CheckConfig {
                min_width_mm: 150.0,
                ..Default::default()
            },
        );
        assert_eq!(strict[0].compliance, Compliance::NonCompliant);
        assert_eq!(relaxed[0].compliance, Compliance::Compliant);
        assert_eq!(strict[0].capacities, relaxed[0].capacities);
    }
}
