//! Pattern matching over a selection snippet: dispatches to the dimensions,
//! currency, single-unit and timezone paths and emits at most one
//! `Conversion`.

pub mod patterns;

use crate::converter;
use crate::converter::timezone;
use crate::currency;
use crate::registry;
use crate::shared::settings::UserSettings;
use crate::shared::types::{Conversion, ConversionKind, Dimension, PageContext};

/// Find the single conversion a selection asks for, if any.
///
/// Precedence: three-axis dimensions, then currency, then single units in
/// the fixed priority order. Inputs spanning multiple lines abort.
pub fn find_conversion(text: &str, settings: &UserSettings) -> Option<Conversion> {
    find_conversion_with_context(text, settings, &PageContext::default())
}

/// `find_conversion` with page-level cues for ambiguous currency symbols.
pub fn find_conversion_with_context(
    text: &str,
    settings: &UserSettings,
    ctx: &PageContext,
) -> Option<Conversion> {
    if text.contains('\n') || text.contains('\r') {
        return None;
    }
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(conversion) = detect_dimensions(text, settings) {
        return Some(conversion);
    }
    if let Some(conversion) = detect_currency_expression(text, settings, ctx) {
        return Some(conversion);
    }
    for dimension in patterns::SINGLE_UNIT_PRIORITY {
        let found = match dimension {
            Dimension::Timezone => detect_time(text, settings),
            _ => detect_single_unit(text, *dimension, settings),
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Map a matched unit surface form onto the canonical code for the
/// dimension being evaluated. The torque fallback covers the fused
/// uppercase forms (`Nm`, `N·m`) whose lowercased spelling would collide
/// with nanometer.
fn canonical_for(dimension: Dimension, unit_text: &str) -> Option<&'static str> {
    match registry::canonicalize(unit_text) {
        Some(canonical) if registry::dimension_of(canonical) == Some(dimension) => Some(canonical),
        _ if dimension == Dimension::Torque => Some("Nm"),
        _ => None,
    }
}

/// Strip the boundary characters the patterns are allowed to consume so
/// `original_text` is the bare expression.
fn trim_boundaries(matched: &str) -> &str {
    matched.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '.' | ',' | ';' | ':' | '!' | '?' | '"' | '\'')
    })
}

/// Parse a matched numeric group, preserving the sign the locale-tolerant
/// parser does not carry.
fn parse_number(raw: &str) -> Option<f64> {
    let value = currency::extract_number(raw)?;
    if raw.trim_start().starts_with('-') {
        Some(-value)
    } else {
        Some(value)
    }
}

fn detect_single_unit(
    text: &str,
    dimension: Dimension,
    settings: &UserSettings,
) -> Option<Conversion> {
    let caps = patterns::single_unit_regex(dimension).captures(text)?;
    let value = parse_number(&caps[1])?;
    let unit = canonical_for(dimension, &caps[2])?;

    let target = converter::get_default_target_unit(unit, settings)?;
    let converted = converter::convert(value, unit, target)?;
    let (best_value, best_unit) = converter::get_best_unit(converted, dimension, target, Some(unit));

    // A result that lands back on the source unit with no visible change is
    // noise, not a conversion.
    if best_unit == unit && (best_value - value).abs() < 0.01 {
        return None;
    }

    Some(Conversion {
        original_text: trim_boundaries(&caps[0]).to_string(),
        original_value: value,
        original_unit: unit.to_string(),
        kind: ConversionKind::Scalar {
            converted_value: best_value,
            converted_unit: best_unit.to_string(),
        },
    })
}

fn detect_dimensions(text: &str, settings: &UserSettings) -> Option<Conversion> {
    let caps = patterns::DIMENSIONS_RE.captures(text)?;
    let matched = caps.get(0)?.as_str().trim();
    // The triple must essentially be the selection, not a fragment of it.
    if (matched.len() as f64) < 0.8 * text.len() as f64 {
        return None;
    }

    let axis_units = [caps.get(2), caps.get(4), caps.get(6)];
    // `a × b × c u` carries the unit on the last axis; `a u × b u × c u`
    // carries one per axis. Axes without their own unit share the last
    // explicit one.
    let shared = axis_units
        .iter()
        .rev()
        .find_map(|m| m.map(|u| u.as_str()))?;

    let mut originals = [0.0_f64; 3];
    let mut converted = [0.0_f64; 3];
    let mut best: [(f64, &'static str); 3] = [(0.0, ""); 3];
    let mut source_units: [&'static str; 3] = [""; 3];
    let mut target = "";

    for (idx, num_group) in [1, 3, 5].into_iter().enumerate() {
        let value = parse_number(&caps[num_group])?;
        let unit_text = axis_units[idx].map(|m| m.as_str()).unwrap_or(shared);
        let unit = canonical_for(Dimension::Length, unit_text)?;
        let axis_target = converter::get_default_target_unit(unit, settings)?;
        let axis_converted = converter::convert(value, unit, axis_target)?;

        originals[idx] = value;
        converted[idx] = axis_converted;
        source_units[idx] = unit;
        best[idx] =
            converter::get_best_unit(axis_converted, Dimension::Length, axis_target, Some(unit));
        target = axis_target;
    }

    // Harmonization: only a unanimous preference may override the user's
    // target unit, otherwise one outlier axis would drag the whole display.
    let unanimous = best[0].1 == best[1].1 && best[1].1 == best[2].1 && best[0].1 != target;
    let (l, w, h, unit) = if unanimous {
        (best[0].0, best[1].0, best[2].0, best[0].1)
    } else {
        (converted[0], converted[1], converted[2], target)
    };

    Some(Conversion {
        original_text: matched.to_string(),
        original_value: originals[0],
        original_unit: source_units[0].to_string(),
        kind: ConversionKind::Dimensions3D {
            l,
            w,
            h,
            unit: unit.to_string(),
        },
    })
}

fn detect_currency_expression(
    text: &str,
    settings: &UserSettings,
    ctx: &PageContext,
) -> Option<Conversion> {
    let matched = find_currency_match(text)?;
    let amount = currency::extract_number(matched)?;
    let symbol = currency::extract_currency_symbol(matched);
    let from_code = currency::detect_currency(&symbol, ctx)?;
    let to_code = settings.currency_unit.to_ascii_uppercase();
    if from_code == to_code {
        return None;
    }

    Some(Conversion {
        original_text: matched.to_string(),
        original_value: amount,
        original_unit: from_code.clone(),
        kind: ConversionKind::CurrencyPending {
            from_code,
            to_code,
            amount,
        },
    })
}

/// First substring that pairs an amount with a currency marker. Symbol
/// matches win over generic three-letter tokens, and a token only counts
/// when it is a registered code.
fn find_currency_match(text: &str) -> Option<&str> {
    if let Some(m) = patterns::SYMBOL_BEFORE_RE.find(text) {
        return Some(m.as_str());
    }
    if let Some(m) = patterns::SYMBOL_AFTER_RE.find(text) {
        return Some(m.as_str());
    }
    for caps in patterns::CODE_BEFORE_RE.captures_iter(text) {
        if crate::registry::currencies::is_known_code(&caps[1]) {
            return caps.get(0).map(|m| m.as_str());
        }
    }
    for caps in patterns::CODE_AFTER_RE.captures_iter(text) {
        if crate::registry::currencies::is_known_code(&caps[2]) {
            return caps.get(0).map(|m| m.as_str());
        }
    }
    None
}

fn detect_time(text: &str, settings: &UserSettings) -> Option<Conversion> {
    let caps = patterns::TIME_RE.captures(text)?;
    let zone = caps.get(3)?.as_str();
    let modifier = caps.get(4).map(|m| m.as_str()).unwrap_or("");
    let source_zone = format!("{}{}", zone, modifier);
    let source_offset = timezone::resolve_zone(&source_zone)?;

    let (target_zone, use_offset_format) = if settings.timezone_unit.eq_ignore_ascii_case("auto") {
        let offset = timezone::local_offset_minutes();
        (crate::registry::timezones::offset_label(offset), true)
    } else {
        (settings.timezone_unit.clone(), false)
    };
    let target_offset = timezone::resolve_zone(&target_zone)?;
    // Same wall time either way; showing it again is a no-op popup.
    if source_offset == target_offset {
        return None;
    }

    let time_text = match caps.get(2) {
        Some(meridiem) => format!("{} {}", &caps[1], meridiem.as_str()),
        None => caps[1].to_string(),
    };
    let zoned = timezone::convert_timezone(&time_text, &source_zone, &target_zone, use_offset_format)?;

    // The clock reading re-encoded as decimal hours; the matched text
    // carries the authoritative original.
    let (hh, mm) = caps[1].split_once(':')?;
    let original_value = hh.parse::<f64>().ok()? + mm.parse::<f64>().ok()? / 60.0;

    Some(Conversion {
        original_text: trim_boundaries(&caps[0]).to_string(),
        original_value,
        original_unit: zone.to_ascii_uppercase(),
        kind: ConversionKind::TimeZone {
            hours: zoned.hours,
            minutes: zoned.minutes,
            zone_label: zoned.zone_label,
        },
    })
}
