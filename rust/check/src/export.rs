// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CSV export of beam records.
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! failed run never leaves a partial table behind.

use crate::error::{CheckError, Result};
use crate::record::BeamRecord;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const HEADER: [&str; 10] = [
    "global_id",
    "width_mm",
    "height_mm",
    "compliance",
    "As_min_mm2",
    "M_Rd_kNm",
    "V_Rd_c_kN",
    "V_Rd_s_kN",
    "provenance",
    "notes",
];

/// `<model>.beam_check.csv` next to the model.
pub fn default_output_path(model_path: &Path) -> PathBuf {
    let mut name = model_path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_else(|| "model".into());
    name.push(".beam_check.csv");
    model_path.with_file_name(name)
}

/// Write records as CSV to any writer.
pub fn write_csv<W: Write>(writer: W, records: &[BeamRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(HEADER)?;

    for record in records {
        let capacities = record.capacities;
        writer.write_record([
            record.global_id.clone(),
            fixed(record.width_mm, 1),
            fixed(record.height_mm, 1),
            record.compliance.to_string(),
            fixed(capacities.map(|c| c.as_min_mm2), 1),
            fixed(capacities.map(|c| c.m_rd_knm), 2),
            fixed(capacities.map(|c| c.v_rd_c_kn), 2),
            fixed(capacities.map(|c| c.v_rd_s_kn), 2),
            record.provenance.to_string(),
            record.notes_text(),
        ])?;
    }

    writer.flush().map_err(|e| CheckError::Csv(e.into()))?;
    Ok(())
}

/// Write records to `path`, replacing any previous file atomically.
pub fn export_csv(path: &Path, records: &[BeamRecord]) -> Result<()> {
    let output_error = |source| CheckError::Output {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(output_error)?;
    write_csv(&mut file, records)?;
    file.as_file().sync_all().map_err(output_error)?;
    file.persist(path).map_err(|e| output_error(e.error))?;

    tracing::info!(path = %path.display(), rows = records.len(), "Wrote beam table");
    Ok(())
}

/// Empty for null, fixed decimals otherwise.
fn fixed(value: Option<f64>, decimals: usize) -> String {
    value
        .map(|v| format!("{:.*}", decimals, v))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eurocode::Capacities;
    use crate::record::{Compliance, Note, Provenance};

    fn resolved() -> BeamRecord {
        BeamRecord {
            global_id: "2O2Fr$t4X7Zf8NOew3FLOH".to_string(),
            width_mm: Some(150.0),
            height_mm: Some(400.0),
            compliance: Compliance::NonCompliant,
            capacities: Some(Capacities {
                as_min_mm2: 79.97727866,
                m_rd_knm: 11.07859173,
                v_rd_c_kn: 18.45241589,
                v_rd_s_kn: 36.41831099,
            }),
            provenance: Provenance::Profile,
            notes: vec![Note::InheritedFromType],
        }
    }

    fn to_string(records: &[BeamRecord]) -> String {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, records).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_rows() {
        let unresolved = BeamRecord::unresolved("Beam-X".to_string(), vec![]);
        let text = to_string(&[resolved(), unresolved]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "global_id,width_mm,height_mm,compliance,As_min_mm2,M_Rd_kNm,V_Rd_c_kN,V_Rd_s_kN,provenance,notes"
        );
        assert_eq!(
            lines[1],
            "2O2Fr$t4X7Zf8NOew3FLOH,150.0,400.0,NonCompliant,80.0,11.08,18.45,36.42,Profile,inherited from type"
        );
        assert_eq!(lines[2], "Beam-X,,,Unknown,,,,,Unresolved,");
    }

    #[test]
    fn test_notes_are_quoted() {
        let mut record = resolved();
        record.notes = vec![Note::ParsedFrom("B 150x400, type A".to_string())];
        let text = to_string(&[record]);
        assert!(text.contains(r#","parsed from ""B 150x400, type A"""#));
    }

    #[test]
    fn test_empty_table_has_header() {
        assert_eq!(to_string(&[]).lines().count(), 1);
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/tower.ifc")),
            PathBuf::from("/data/tower.beam_check.csv")
        );
        assert_eq!(
            default_output_path(Path::new("model.ifc")),
            PathBuf::from("model.beam_check.csv")
        );
    }

    #[test]
    fn test_export_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale").unwrap();

        export_csv(&path, &[resolved()]).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("global_id,"));
        assert_eq!(written.lines().count(), 2);
        // No temp files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(matches!(
            export_csv(&path, &[resolved()]),
            Err(CheckError::Output { .. })
        ));
        assert!(!path.exists());
    }
}
