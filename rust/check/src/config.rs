// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Check configuration: material constants, detailing assumptions and the
//! width threshold.
//!
//! Layers, lowest priority first: defaults, JSON file, `BEAM_CHECK_*`
//! environment variables, command line flags (applied by the binary).

use crate::error::{CheckError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Immutable configuration for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Minimum beam width in mm.
    pub min_width_mm: f64,
    /// Characteristic concrete cylinder strength fck in MPa (C30/37).
    pub fck_mpa: f64,
    /// Characteristic reinforcement yield strength fyk in MPa (B500).
    pub fyk_mpa: f64,
    /// Partial factor for concrete.
    pub gamma_c: f64,
    /// Partial factor for reinforcing steel.
    pub gamma_s: f64,
    /// Nominal cover in mm.
    pub cover_mm: f64,
    /// Longitudinal bar diameter in mm.
    pub bar_diameter_mm: f64,
    /// Stirrup diameter in mm.
    pub stirrup_diameter_mm: f64,
    /// Number of stirrup legs.
    pub stirrup_legs: u32,
    /// Strut inclination θ in degrees.
    pub theta_deg: f64,
    /// Lever arm ratio z/d.
    pub z_over_d: f64,
    /// Upper bound for ρl in the concrete shear formula.
    pub rho_l_max: f64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            min_width_mm: 200.0,
            fck_mpa: 30.0,
            fyk_mpa: 500.0,
            gamma_c: 1.5,
            gamma_s: 1.15,
            cover_mm: 30.0,
            bar_diameter_mm: 16.0,
            stirrup_diameter_mm: 8.0,
            stirrup_legs: 2,
            theta_deg: 45.0,
            z_over_d: 0.9,
            rho_l_max: 0.02,
        }
    }
}

impl CheckConfig {
    /// Load a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| CheckError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Override fields from `BEAM_CHECK_*` environment variables.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Override fields from a variable lookup (the environment, in practice).
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        override_from(&lookup, "BEAM_CHECK_MIN_WIDTH_MM", &mut self.min_width_mm)?;
        override_from(&lookup, "BEAM_CHECK_FCK_MPA", &mut self.fck_mpa)?;
        override_from(&lookup, "BEAM_CHECK_FYK_MPA", &mut self.fyk_mpa)?;
        override_from(&lookup, "BEAM_CHECK_GAMMA_C", &mut self.gamma_c)?;
        override_from(&lookup, "BEAM_CHECK_GAMMA_S", &mut self.gamma_s)?;
        override_from(&lookup, "BEAM_CHECK_COVER_MM", &mut self.cover_mm)?;
        override_from(&lookup, "BEAM_CHECK_BAR_DIAMETER_MM", &mut self.bar_diameter_mm)?;
        override_from(&lookup, "BEAM_CHECK_STIRRUP_DIAMETER_MM", &mut self.stirrup_diameter_mm)?;
        override_from(&lookup, "BEAM_CHECK_STIRRUP_LEGS", &mut self.stirrup_legs)?;
        override_from(&lookup, "BEAM_CHECK_THETA_DEG", &mut self.theta_deg)?;
        override_from(&lookup, "BEAM_CHECK_Z_OVER_D", &mut self.z_over_d)?;
        override_from(&lookup, "BEAM_CHECK_RHO_L_MAX", &mut self.rho_l_max)?;
        Ok(self)
    }

    /// Reject values the formulas cannot work with.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("min_width_mm", self.min_width_mm),
            ("fck_mpa", self.fck_mpa),
            ("fyk_mpa", self.fyk_mpa),
            ("gamma_c", self.gamma_c),
            ("gamma_s", self.gamma_s),
            ("z_over_d", self.z_over_d),
            ("rho_l_max", self.rho_l_max),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CheckError::Config(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("cover_mm", self.cover_mm),
            ("bar_diameter_mm", self.bar_diameter_mm),
            ("stirrup_diameter_mm", self.stirrup_diameter_mm),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CheckError::Config(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if self.stirrup_legs == 0 {
            return Err(CheckError::Config("stirrup_legs must be at least 1".to_string()));
        }
        if !(self.theta_deg > 0.0 && self.theta_deg < 90.0) {
            return Err(CheckError::Config(format!(
                "theta_deg must lie strictly between 0 and 90, got {}",
                self.theta_deg
            )));
        }
        if self.z_over_d > 1.0 {
            return Err(CheckError::Config(format!(
                "z_over_d must not exceed 1, got {}",
                self.z_over_d
            )));
        }

        Ok(())
    }
}

fn override_from<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    field: &mut T,
) -> Result<()> {
    if let Some(raw) = lookup(key) {
        *field = raw
            .trim()
            .parse()
            .map_err(|_| CheckError::Config(format!("{} has invalid value {:?}", key, raw)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_are_valid() {
        let config = CheckConfig::default();
        assert_eq!(config.min_width_mm, 200.0);
        assert_eq!(config.stirrup_legs, 2);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: CheckConfig =
            serde_json::from_str(r#"{ "min_width_mm": 250, "fck_mpa": 35.0 }"#).unwrap();
        assert_eq!(config.min_width_mm, 250.0);
        assert_eq!(config.fck_mpa, 35.0);
        assert_eq!(config.fyk_mpa, 500.0);
    }

    #[test]
    fn test_unknown_json_field_is_rejected() {
        assert!(serde_json::from_str::<CheckConfig>(r#"{ "min_widht_mm": 250 }"#).is_err());
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, br#"{ "theta_deg": 30.0 }"#).unwrap();
        let config = CheckConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.theta_deg, 30.0);

        assert!(matches!(
            CheckConfig::from_json_file("/nonexistent/config.json"),
            Err(CheckError::ConfigFile { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("BEAM_CHECK_MIN_WIDTH_MM", "180"),
            ("BEAM_CHECK_STIRRUP_LEGS", " 4 "),
        ]
        .into_iter()
        .collect();
        let config = CheckConfig::default()
            .with_vars(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.min_width_mm, 180.0);
        assert_eq!(config.stirrup_legs, 4);
        assert_eq!(config.gamma_c, 1.5);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let result = CheckConfig::default().with_vars(|key| {
            (key == "BEAM_CHECK_GAMMA_S").then(|| "one point fifteen".to_string())
        });
        assert!(matches!(result, Err(CheckError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad = [
            CheckConfig { fck_mpa: 0.0, ..Default::default() },
            CheckConfig { gamma_s: -1.0, ..Default::default() },
            CheckConfig { theta_deg: 90.0, ..Default::default() },
            CheckConfig { stirrup_legs: 0, ..Default::default() },
            CheckConfig { cover_mm: f64::NAN, ..Default::default() },
            CheckConfig { z_over_d: 1.2, ..Default::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{:?} should be rejected", config);
        }
    }
}
