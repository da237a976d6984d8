// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! EN 1992-1-1 minimum-requirement estimates for a rectangular section.
//!
//! Units: mm and MPa (N/mm²) in, mm², kN·m and kN out.
//!
//! | quantity | clause | formula |
//! |----------|--------|---------|
//! | fctm     | Tab 3.1 | 0.30·fck^(2/3) |
//! | ρ,min    | 9.2.1.1(1) | max(0.26·fctm/fyk, 0.0013) |
//! | As,min   | 9.2.1.1(1) | ρ,min·b·d |
//! | M_Rd     | - | As,min·fyd·z |
//! | V_Rd,c   | 6.2.2(1) | (0.18/γc)·k·(100·ρl·fck)^(1/3)·b·d |
//! | V_Rd,s   | 6.2.3(3), 9.2.2(5) | (Asw/s)min·z·fyd·cotθ |

use crate::config::CheckConfig;
use crate::record::Compliance;

/// Derived resistance estimates of one section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacities {
    /// Minimum longitudinal reinforcement area As,min [mm²].
    pub as_min_mm2: f64,
    /// Bending resistance with As,min [kN·m].
    pub m_rd_knm: f64,
    /// Shear resistance without shear reinforcement V_Rd,c [kN].
    pub v_rd_c_kn: f64,
    /// Shear resistance with minimum stirrups V_Rd,s [kN].
    pub v_rd_s_kn: f64,
}

impl Capacities {
    const ZERO: Capacities = Capacities {
        as_min_mm2: 0.0,
        m_rd_knm: 0.0,
        v_rd_c_kn: 0.0,
        v_rd_s_kn: 0.0,
    };
}

/// Verdict plus estimates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub compliance: Compliance,
    pub capacities: Option<Capacities>,
}

/// Mean axial tensile strength fctm [MPa].
pub fn fctm(fck: f64) -> f64 {
    0.3 * fck.powf(2.0 / 3.0)
}

/// Minimum longitudinal reinforcement ratio.
pub fn rho_l_min(config: &CheckConfig) -> f64 {
    (0.26 * fctm(config.fck_mpa) / config.fyk_mpa).max(0.0013)
}

/// Effective depth d = h − cover − ø_stirrup − ø_bar/2, floored at zero.
pub fn effective_depth(height_mm: f64, config: &CheckConfig) -> f64 {
    (height_mm - config.cover_mm - config.stirrup_diameter_mm - 0.5 * config.bar_diameter_mm)
        .max(0.0)
}

fn lever_arm(d: f64, config: &CheckConfig) -> f64 {
    config.z_over_d * d
}

fn fyd(config: &CheckConfig) -> f64 {
    config.fyk_mpa / config.gamma_s
}

/// As,min [mm²] and M_Rd [kN·m].
pub fn bending_capacity_min_steel(b: f64, d: f64, config: &CheckConfig) -> (f64, f64) {
    let as_min = rho_l_min(config) * b * d;
    let m_rd_nmm = as_min * fyd(config) * lever_arm(d, config);
    (as_min, m_rd_nmm / 1e6)
}

/// V_Rd,c [kN] using ρl = min(ρ,min, ρl,max).
pub fn shear_capacity_concrete(b: f64, d: f64, config: &CheckConfig) -> f64 {
    let rho = rho_l_min(config).min(config.rho_l_max);
    let k = (1.0 + (200.0 / d).sqrt()).min(2.0);
    let term = (100.0 * rho * config.fck_mpa).powf(1.0 / 3.0);
    (0.18 / config.gamma_c) * k * term * b * d / 1000.0
}

/// V_Rd,s [kN] with minimum shear reinforcement ρw,min = 0.08·√fck/fyk.
pub fn shear_capacity_min_stirrups(b: f64, d: f64, config: &CheckConfig) -> f64 {
    let asw_per_s = 0.08 * config.fck_mpa.sqrt() / config.fyk_mpa * b * f64::from(config.stirrup_legs);
    let cot_theta = 1.0 / config.theta_deg.to_radians().tan();
    asw_per_s * lever_arm(d, config) * fyd(config) * cot_theta / 1000.0
}

/// All four estimates. Sections with no effective depth get zeros.
pub fn capacities(width_mm: f64, height_mm: f64, config: &CheckConfig) -> Capacities {
    let d = effective_depth(height_mm, config);
    if d <= 0.0 || width_mm <= 0.0 {
        return Capacities::ZERO;
    }

    let (as_min_mm2, m_rd_knm) = bending_capacity_min_steel(width_mm, d, config);
    Capacities {
        as_min_mm2,
        m_rd_knm,
        v_rd_c_kn: shear_capacity_concrete(width_mm, d, config),
        v_rd_s_kn: shear_capacity_min_stirrups(width_mm, d, config),
    }
}

/// Width verdict and estimates for a resolved section.
///
/// Estimates are reported regardless of the verdict. Non-positive or
/// non-finite input yields `Unknown` without estimates.
pub fn evaluate(width_mm: f64, height_mm: f64, config: &CheckConfig) -> Evaluation {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !(valid(width_mm) && valid(height_mm)) {
        return Evaluation {
            compliance: Compliance::Unknown,
            capacities: None,
        };
    }

    let compliance = if width_mm >= config.min_width_mm {
        Compliance::Compliant
    } else {
        Compliance::NonCompliant
    };

    Evaluation {
        compliance,
        capacities: Some(capacities(width_mm, height_mm, config)),
    }
}
