//! Value conversion between units of one dimension, auto-selection of a
//! human-friendly display unit, and result formatting.

pub mod timezone;

use crate::registry;
use crate::registry::{ScaleDirection, ScalingRule};
use crate::shared::settings::UserSettings;
use crate::shared::types::Dimension;

/// Convert between two units of the same dimension. Returns `None` when the
/// units are unknown or belong to different dimensions; bad input is never an
/// error here.
pub fn convert(value: f64, from: &str, to: &str) -> Option<f64> {
    let from_dim = registry::dimension_of(from)?;
    let to_dim = registry::dimension_of(to)?;
    if from_dim != to_dim {
        return None;
    }
    if from_dim == Dimension::Temperature {
        return convert_temperature(value, from, to);
    }
    let base = value / registry::ratio(from)?;
    Some(base * registry::ratio(to)?)
}

/// Two-step temperature conversion via Celsius.
pub fn convert_temperature(value: f64, from: &str, to: &str) -> Option<f64> {
    let celsius = match from {
        "c" => value,
        "f" => (value - 32.0) * 5.0 / 9.0,
        "k" => value - 273.15,
        _ => return None,
    };
    Some(match to {
        "c" => celsius,
        "f" => celsius * 9.0 / 5.0 + 32.0,
        "k" => celsius + 273.15,
        _ => return None,
    })
}

/// Re-home a converted value onto a more readable unit of the same dimension.
///
/// `value` is expressed in `default_unit`. Each hop re-converts the original
/// base magnitude into the rule's target, never the already-hopped value, and
/// rules are re-applied from the landing unit so chains like m → cm → mm
/// resolve in one call. `source_unit` suppresses hops that would land the
/// user back on the unit they started from.
pub fn get_best_unit(
    value: f64,
    dimension: Dimension,
    default_unit: &str,
    source_unit: Option<&str>,
) -> (f64, &'static str) {
    let mut current = match registry::as_canonical(default_unit) {
        Some(unit) => unit,
        None => return (value, registry::default_unit(dimension)),
    };
    let base = match registry::ratio(current) {
        Some(ratio) => value / ratio,
        // Temperature and friends have no ratio table and no scaling rules.
        None => return (value, current),
    };
    let mut current_value = value;

    // Rule tables are acyclic; four hops covers the longest chain with room.
    for _ in 0..4 {
        let hop = scaling_hop(dimension, current, current_value, base, source_unit);
        match hop {
            Some((next_value, next_unit)) => {
                current_value = next_value;
                current = next_unit;
            }
            None => break,
        }
    }

    (current_value, current)
}

fn scaling_hop(
    dimension: Dimension,
    unit: &'static str,
    value: f64,
    base: f64,
    source_unit: Option<&str>,
) -> Option<(f64, &'static str)> {
    let rules: &[ScalingRule] = registry::scaling_rules(dimension, unit);
    for rule in rules {
        if source_unit == Some(rule.target) {
            continue;
        }
        let fires = match rule.direction {
            ScaleDirection::Up => value.abs() >= rule.threshold,
            ScaleDirection::Down => value.abs() < rule.threshold,
        };
        if !fires {
            continue;
        }
        let candidate = base * registry::ratio(rule.target)?;
        if let Some(min) = rule.min_value {
            if candidate.abs() < min {
                continue;
            }
        }
        return Some((candidate, rule.target));
    }
    None
}

/// Target unit for a detected source unit: the user's per-dimension setting,
/// falling back to the registry default for the dimension.
pub fn get_default_target_unit(source_unit: &str, settings: &UserSettings) -> Option<&'static str> {
    let dimension = registry::dimension_of(source_unit)?;
    let target = settings
        .target_for(dimension)
        .and_then(registry::as_canonical)
        .unwrap_or_else(|| registry::default_unit(dimension));
    Some(target)
}

/// Round to two decimals, half away from zero, and drop trailing zeros.
pub fn format_value(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{:.2}", rounded);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text.truncate(0);
        text.push('0');
    }
    text
}

/// `"{value} {display name}"`, e.g. `format_result(3.048, "m")` → `"3.05 m"`.
pub fn format_result(value: f64, unit: &str) -> String {
    let display = registry::display_name(unit).unwrap_or(unit);
    format!("{} {}", format_value(value), display)
}

/// Render a detector result for display. Currency results return `None`
/// here: they are pending a rate and are formatted by the currency
/// formatter once the rate service answers.
pub fn format_conversion(
    conversion: &crate::shared::types::Conversion,
    settings: &UserSettings,
) -> Option<String> {
    use crate::shared::types::ConversionKind;
    match &conversion.kind {
        ConversionKind::Scalar {
            converted_value,
            converted_unit,
        } => Some(format_result(*converted_value, converted_unit)),
        ConversionKind::Dimensions3D { l, w, h, unit } => {
            let display = registry::display_name(unit).unwrap_or(unit);
            Some(format!(
                "{} × {} × {} {}",
                format_value(*l),
                format_value(*w),
                format_value(*h),
                display
            ))
        }
        ConversionKind::TimeZone {
            hours,
            minutes,
            zone_label,
        } => {
            let zoned = timezone::ZonedTime {
                hours: *hours,
                minutes: *minutes,
                zone_label: zone_label.clone(),
            };
            Some(timezone::format_time(&zoned, settings.is_12hr))
        }
        ConversionKind::CurrencyPending { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_of(dimension: Dimension) -> &'static str {
        match dimension {
            Dimension::Length => "m",
            Dimension::Weight => "kg",
            Dimension::Volume => "l",
            Dimension::Area => "m2",
            Dimension::Speed => "ms",
            Dimension::Acceleration => "ms2",
            Dimension::FlowRate => "lmin",
            Dimension::Torque => "Nm",
            Dimension::Pressure => "pa",
            other => panic!("{:?} has no ratio base", other),
        }
    }

    #[test]
    fn every_unit_round_trips_through_its_base() {
        for def in crate::registry::units::UNIT_DEFS {
            if matches!(
                def.dimension,
                Dimension::Temperature | Dimension::Timezone | Dimension::Currency
            ) {
                continue;
            }
            let base = base_of(def.dimension);
            let through = convert(convert(1.0, def.code, base).unwrap(), base, def.code).unwrap();
            assert!(
                (through - 1.0).abs() <= 1e-9,
                "{} <-> {} round trip drifted: {}",
                def.code,
                base,
                through
            );
        }
    }

    #[test]
    fn cross_dimension_is_rejected() {
        assert_eq!(convert(1.0, "m", "kg"), None);
        assert_eq!(convert(1.0, "m", "bogus"), None);
        assert_eq!(convert(1.0, "nm", "Nm"), None);
    }

    #[test]
    fn every_pair_is_cross_consistent() {
        // convert(x, u, v) == convert(x, u, w) * ratio(v) / ratio(w) for any
        // third unit w of the dimension; checking against the base suffices
        // since every other w differs from it by a constant factor.
        let x = 17.5;
        for u in crate::registry::units::UNIT_DEFS {
            if registry::ratio(u.code).is_none() {
                continue;
            }
            for v in crate::registry::units::UNIT_DEFS {
                if v.dimension != u.dimension || registry::ratio(v.code).is_none() {
                    continue;
                }
                let w = base_of(u.dimension);
                let direct = convert(x, u.code, v.code).unwrap();
                let via_w = convert(x, u.code, w).unwrap() * registry::ratio(v.code).unwrap()
                    / registry::ratio(w).unwrap();
                assert!(
                    (direct - via_w).abs() <= 1e-9 * direct.abs().max(1.0),
                    "{} -> {} inconsistent: {} vs {}",
                    u.code,
                    v.code,
                    direct,
                    via_w
                );
            }
        }
    }

    #[test]
    fn temperature_formulas() {
        assert!((convert_temperature(72.0, "f", "c").unwrap() - 22.222_222_222).abs() < 1e-6);
        assert!((convert_temperature(0.0, "c", "k").unwrap() - 273.15).abs() < 1e-12);
        let round_trip = convert_temperature(convert_temperature(21.3, "c", "f").unwrap(), "f", "c")
            .unwrap();
        assert!((round_trip - 21.3).abs() <= 1e-9);
    }

    #[test]
    fn best_unit_hops_down_the_metric_chain() {
        let (value, unit) = get_best_unit(0.001, Dimension::Length, "m", None);
        assert_eq!(unit, "mm");
        assert!((value - 1.0).abs() < 1e-12);

        let (value, unit) = get_best_unit(0.5, Dimension::Length, "m", None);
        assert_eq!(unit, "cm");
        assert!((value - 50.0).abs() < 1e-12);
    }

    #[test]
    fn best_unit_hops_up() {
        let (value, unit) = get_best_unit(1500.0, Dimension::Length, "m", None);
        assert_eq!(unit, "km");
        assert!((value - 1.5).abs() < 1e-12);

        let (_, unit) = get_best_unit(6000.0, Dimension::Length, "ft", None);
        assert_eq!(unit, "mi");

        let (value, unit) = get_best_unit(250_000.0, Dimension::Pressure, "pa", None);
        assert_eq!(unit, "bar");
        assert!((value - 2.5).abs() < 1e-12);

        let (value, unit) = get_best_unit(5_000.0, Dimension::Pressure, "pa", None);
        assert_eq!(unit, "kpa");
        assert!((value - 5.0).abs() < 1e-12);
    }

    #[test]
    fn gallon_chain_picks_first_unit_above_one() {
        // 0.4 gal ≈ 1.6 qt: the qt candidate already clears 1.0.
        let (value, unit) = get_best_unit(0.4, Dimension::Volume, "gal", None);
        assert_eq!(unit, "qt");
        assert!(value >= 1.0);

        // 0.01 gal ≈ 1.28 fl oz: everything upstream is below 1, fl oz is the
        // ungated fallback.
        let (value, unit) = get_best_unit(0.01, Dimension::Volume, "gal", None);
        assert_eq!(unit, "floz");
        assert!((value - 1.28).abs() < 0.01);
    }

    #[test]
    fn best_unit_does_not_bounce_back_to_source() {
        // 0.8 m would normally hop to cm; if the user selected cm, stay put.
        let (value, unit) = get_best_unit(0.8, Dimension::Length, "m", Some("cm"));
        assert_eq!(unit, "m");
        assert!((value - 0.8).abs() < 1e-12);
    }

    #[test]
    fn speed_hops_to_kmh() {
        let (value, unit) = get_best_unit(60.0, Dimension::Speed, "ms", None);
        assert_eq!(unit, "kmh");
        assert!((value - 216.0).abs() < 1e-9);
    }

    #[test]
    fn formatting_rounds_and_trims() {
        assert_eq!(format_value(3.048), "3.05");
        assert_eq!(format_value(1.0), "1");
        assert_eq!(format_value(8.2021), "8.2");
        assert_eq!(format_value(-0.004), "0");
        assert_eq!(format_value(2.375), "2.38"); // half away from zero
        assert_eq!(format_result(22.2222, "c"), "22.22 °C");
        assert_eq!(format_result(1.0, "mm"), "1 mm");
    }
}
