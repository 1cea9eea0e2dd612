use crate::shared::types::Dimension;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleDirection {
    /// Value at or above the threshold hops to a larger unit.
    Up,
    /// Value below the threshold hops to a smaller unit.
    Down,
}

/// One hop candidate in a unit's auto-sizing table.
///
/// Rules are consulted top to bottom and the first firing rule wins. When
/// `min_value` is set, the hop is only taken if the re-converted magnitude
/// reaches it; otherwise the next rule in the list is tried (this is how the
/// "try qt, pt, cup, fl oz in order" chains are expressed, with the last
/// candidate left ungated as the fallback).
#[derive(Debug, Clone, Copy)]
pub struct ScalingRule {
    pub threshold: f64,
    pub direction: ScaleDirection,
    pub target: &'static str,
    pub min_value: Option<f64>,
}

const fn down(threshold: f64, target: &'static str, min_value: Option<f64>) -> ScalingRule {
    ScalingRule {
        threshold,
        direction: ScaleDirection::Down,
        target,
        min_value,
    }
}

const fn up(threshold: f64, target: &'static str) -> ScalingRule {
    ScalingRule {
        threshold,
        direction: ScaleDirection::Up,
        target,
        min_value: None,
    }
}

const LENGTH_M: &[ScalingRule] = &[down(1.0, "cm", None), up(1000.0, "km")];
const LENGTH_CM: &[ScalingRule] = &[down(1.0, "mm", None)];
const LENGTH_FT: &[ScalingRule] = &[down(1.0, "in", None), up(5280.0, "mi")];
const LENGTH_YD: &[ScalingRule] = &[down(1.0, "ft", Some(1.0)), down(1.0, "in", None)];
const WEIGHT_KG: &[ScalingRule] = &[down(1.0, "g", None), up(1000.0, "t")];
const WEIGHT_LB: &[ScalingRule] = &[down(1.0, "oz", None)];
const VOLUME_L: &[ScalingRule] = &[down(1.0, "ml", None)];
const VOLUME_GAL: &[ScalingRule] = &[
    down(1.0, "qt", Some(1.0)),
    down(1.0, "pt", Some(1.0)),
    down(1.0, "cup", Some(1.0)),
    down(1.0, "floz", None),
];
const AREA_M2: &[ScalingRule] = &[down(1.0, "cm2", None), up(1e6, "km2")];
const AREA_CM2: &[ScalingRule] = &[down(1.0, "mm2", None)];
const AREA_FT2: &[ScalingRule] = &[down(1.0, "in2", None), up(43_560.0, "acre")];
const SPEED_MS: &[ScalingRule] = &[up(50.0, "kmh")];
const PRESSURE_PA: &[ScalingRule] = &[up(1e5, "bar"), up(1e3, "kpa")];
const PRESSURE_BAR: &[ScalingRule] = &[down(0.01, "kpa", None)];

/// Auto-sizing table for a source unit. Chains (m → cm → mm) are expressed
/// by giving the intermediate unit its own table; the sizer re-applies rules
/// until none fire.
pub fn scaling_rules(dimension: Dimension, unit: &str) -> &'static [ScalingRule] {
    match (dimension, unit) {
        (Dimension::Length, "m") => LENGTH_M,
        (Dimension::Length, "cm") => LENGTH_CM,
        (Dimension::Length, "ft") => LENGTH_FT,
        (Dimension::Length, "yd") => LENGTH_YD,
        (Dimension::Weight, "kg") => WEIGHT_KG,
        (Dimension::Weight, "lb") => WEIGHT_LB,
        (Dimension::Volume, "l") => VOLUME_L,
        (Dimension::Volume, "gal") => VOLUME_GAL,
        (Dimension::Area, "m2") => AREA_M2,
        (Dimension::Area, "cm2") => AREA_CM2,
        (Dimension::Area, "ft2") => AREA_FT2,
        (Dimension::Speed, "ms") => SPEED_MS,
        (Dimension::Pressure, "pa") => PRESSURE_PA,
        (Dimension::Pressure, "bar") => PRESSURE_BAR,
        _ => &[],
    }
}
