//! Static unit registry: ratio tables, aliases, display names, scaling
//! rules, timezone offsets and currency maps. Everything here is built once
//! at first use and shared by reference across the converter, the currency
//! utilities and the detector.

pub mod currencies;
pub mod scaling;
pub mod timezones;
pub mod units;

use crate::shared::types::Dimension;

pub use scaling::{ScaleDirection, ScalingRule};

/// Resolve a surface form to its canonical unit code: lowercase, collapse
/// internal whitespace, then apply the alias table.
pub fn canonicalize(text: &str) -> Option<&'static str> {
    let normalized = text
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    units::ALIAS_MAP.get(normalized.as_str()).copied()
}

/// Exact-match lookup of an already-canonical code, returning the interned
/// form. Unlike `canonicalize` this does not lowercase, so it is the right
/// entry point for stored settings values (`Nm` must not collapse to `nm`).
pub fn as_canonical(code: &str) -> Option<&'static str> {
    units::UNITS.get(code).map(|def| def.code)
}

pub fn dimension_of(unit: &str) -> Option<Dimension> {
    units::UNITS.get(unit).map(|def| def.dimension)
}

/// Units-per-base ratio. Undefined for temperature (additive) and for
/// anything outside the ratio tables.
pub fn ratio(unit: &str) -> Option<f64> {
    let def = units::UNITS.get(unit)?;
    if def.dimension == Dimension::Temperature {
        return None;
    }
    Some(def.ratio)
}

/// Unicode display form of a canonical code (`kmh` → `"km/h"`, `c` → `"°C"`).
pub fn display_name(unit: &str) -> Option<&'static str> {
    units::UNITS.get(unit).map(|def| def.display)
}

pub fn default_unit(dimension: Dimension) -> &'static str {
    units::default_unit(dimension)
}

pub fn scaling_rules(dimension: Dimension, unit: &str) -> &'static [ScalingRule] {
    scaling::scaling_rules(dimension, unit)
}
