//! Compiled detection patterns. Unit alternations are generated from the
//! registry's alias table so the regex vocabulary and the canonicalizer can
//! never drift apart; the currency union is generated from the symbol map
//! the same way.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::registry::currencies;
use crate::registry::units::{ALIASES, UNITS};
use crate::shared::types::Dimension;

/// Signed decimal with an optional `.`/`,` fraction; full locale handling
/// happens in the number parser after the match.
const NUM: &str = r"[-+]?\d+(?:[.,]\d+)?";

/// Run of digits and separators, the shape currency amounts take.
const AMOUNT: &str = r"\d[\d.,' ]*\d|\d";

/// Single-unit evaluation order. Resolves the overlapping-token cases:
/// torque before weight claims `lb·ft`, length before everything claims
/// lowercase `nm`, the time slot sits between torque and area.
pub const SINGLE_UNIT_PRIORITY: &[Dimension] = &[
    Dimension::Length,
    Dimension::Torque,
    Dimension::Timezone,
    Dimension::Area,
    Dimension::Speed,
    Dimension::Acceleration,
    Dimension::FlowRate,
    Dimension::Pressure,
    Dimension::Temperature,
    Dimension::Volume,
    Dimension::Weight,
];

/// All alias surface forms of a dimension, longest first, regex-escaped and
/// joined into one alternation.
fn alternation(dimension: Dimension, exclude: &[&str]) -> String {
    let mut forms: Vec<&str> = ALIASES
        .iter()
        .filter(|(alias, canonical)| {
            UNITS[canonical].dimension == dimension && !exclude.contains(alias)
        })
        .map(|(alias, _)| *alias)
        .collect();
    forms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let escaped: Vec<String> = forms.iter().map(|f| regex::escape(f)).collect();
    escaped.join("|")
}

fn unit_group(dimension: Dimension) -> String {
    match dimension {
        // Lowercase `nm` is nanometer; the case-sensitive branch keeps the
        // case-insensitive flag from swallowing `Nm`. Quote marks for
        // feet/inches stay out of patterns (they terminate matches instead).
        Dimension::Length => format!("({}|(?-i:nm))", alternation(dimension, &["nm", "'", "\""])),
        // Newton-meter needs the uppercase N; the fused and separator forms
        // are matched case-sensitively, the unambiguous long forms through
        // the aliases.
        Dimension::Torque => format!(r"((?-i:N[·⋅.\-]?m)|{})", alternation(dimension, &[])),
        _ => format!("({})", alternation(dimension, &[])),
    }
}

fn dimension_regex(dimension: Dimension) -> Regex {
    let pattern = format!(
        r#"(?i)(?:^|[\s(\[])({num})\s*{unit}(?:$|[\s.,;:!?)\]"'])"#,
        num = NUM,
        unit = unit_group(dimension),
    );
    Regex::new(&pattern).expect("dimension pattern")
}

static SINGLE_UNIT_RES: Lazy<HashMap<Dimension, Regex>> = Lazy::new(|| {
    SINGLE_UNIT_PRIORITY
        .iter()
        .filter(|d| **d != Dimension::Timezone)
        .map(|d| (*d, dimension_regex(*d)))
        .collect()
});

pub fn single_unit_regex(dimension: Dimension) -> &'static Regex {
    &SINGLE_UNIT_RES[&dimension]
}

/// Three-axis form: `a × b × c u` or `a u × b u × c u`, length units only.
/// Capture groups: (1 num, 2 unit?, 3 num, 4 unit?, 5 num, 6 unit?).
pub static DIMENSIONS_RE: Lazy<Regex> = Lazy::new(|| {
    let unit = unit_group(Dimension::Length);
    let pattern = format!(
        r"(?i)({num})\s*{unit}?\s*[x×]\s*({num})\s*{unit}?\s*[x×]\s*({num})\s*{unit}?",
        num = NUM,
        unit = unit,
    );
    Regex::new(&pattern).expect("dimensions pattern")
});

/// `HH:MM[ AM/PM][ ZONE][±N]` — groups: (1 clock, 2 meridiem?, 3 zone?,
/// 4 offset modifier?). Zone tokens are validated against the registry.
pub static TIME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?:^|\s)(\d{1,2}:\d{2})\s*(am|pm)?\s*([a-z]{2,5})?\s*([+-]\d{1,2}(?::\d{2})?)?(?:$|[\s.,;:!?)])",
    )
    .expect("time pattern")
});

fn symbol_alternation() -> String {
    let mut symbols: Vec<String> = currencies::SYMBOL_CANDIDATES
        .iter()
        .map(|(symbol, _)| regex::escape(symbol))
        .collect();
    symbols.sort_by(|a, b| b.len().cmp(&a.len()));
    symbols.join("|")
}

/// `$100`, `R$ 1.234,56` — symbol before the amount.
pub static SYMBOL_BEFORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)({sym})\s*({amount})",
        sym = symbol_alternation(),
        amount = AMOUNT,
    ))
    .expect("symbol-before pattern")
});

/// `100€`, `99 kr` — symbol after the amount.
pub static SYMBOL_AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)({amount})\s*({sym})",
        sym = symbol_alternation(),
        amount = AMOUNT,
    ))
    .expect("symbol-after pattern")
});

/// `USD 100` — a three-letter token, validated against the code set.
pub static CODE_BEFORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b([a-z]{{3}})\s*({amount})", amount = AMOUNT))
        .expect("code-before pattern")
});

/// `100 USD`.
pub static CODE_AFTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)({amount})\s*([a-z]{{3}})\b", amount = AMOUNT))
        .expect("code-after pattern")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_pattern_keeps_nm_lowercase() {
        let re = single_unit_regex(Dimension::Length);
        assert!(re.is_match("500 nm"));
        assert!(!re.is_match("500 Nm"));
        assert!(!re.is_match("500 NM"));
        assert!(re.is_match("12 Kilometers"));
    }

    #[test]
    fn torque_pattern_requires_uppercase_n() {
        let re = single_unit_regex(Dimension::Torque);
        assert!(re.is_match("25 Nm"));
        assert!(re.is_match("25 N·m"));
        assert!(re.is_match("25 N-m"));
        assert!(!re.is_match("25 nm"));
        assert!(re.is_match("80 lb-ft"));
        assert!(re.is_match("80 lb ft"));
    }

    #[test]
    fn compound_units_do_not_truncate() {
        // `m` followed by `/s` must not match as a bare length.
        assert!(!single_unit_regex(Dimension::Length).is_match("10 m/s"));
        assert!(single_unit_regex(Dimension::Speed).is_match("10 m/s"));
        assert!(!single_unit_regex(Dimension::Speed).is_match("9.8 m/s²"));
        assert!(single_unit_regex(Dimension::Acceleration).is_match("9.8 m/s²"));
        assert!(!single_unit_regex(Dimension::Volume).is_match("5 L/min"));
        assert!(single_unit_regex(Dimension::FlowRate).is_match("5 L/min"));
    }

    #[test]
    fn dimensions_pattern_accepts_both_shapes() {
        assert!(DIMENSIONS_RE.is_match("6m × 4m × 2.5m"));
        assert!(DIMENSIONS_RE.is_match("10 x 5 x 3 feet"));
        assert!(!DIMENSIONS_RE.is_match("10 x 5 feet"));
    }

    #[test]
    fn currency_patterns() {
        assert!(SYMBOL_BEFORE_RE.is_match("$100"));
        assert!(SYMBOL_BEFORE_RE.is_match("R$ 1.234,56"));
        assert!(SYMBOL_AFTER_RE.is_match("99 kr"));
        assert!(CODE_AFTER_RE.is_match("100 USD"));
        assert!(CODE_BEFORE_RE.is_match("usd 25"));
    }

    #[test]
    fn time_pattern_groups() {
        let caps = TIME_RE.captures("3:30 PM EST").unwrap();
        assert_eq!(&caps[1], "3:30");
        assert_eq!(&caps[2], "PM");
        assert_eq!(&caps[3], "EST");

        let caps = TIME_RE.captures("14:00 GMT+2").unwrap();
        assert_eq!(&caps[1], "14:00");
        assert_eq!(caps.get(2), None);
        assert_eq!(&caps[3], "GMT");
        assert_eq!(&caps[4], "+2");
    }
}
