//! Currency symbol/code extraction, locale-tolerant number parsing,
//! ambiguous-symbol disambiguation and amount formatting. The async rate
//! machinery lives in the submodules.

pub mod http;
pub mod service;
pub mod storage;
pub mod types;

use crate::registry::currencies;
use crate::shared::types::PageContext;

/// Pull the currency marker out of a selection.
///
/// A standalone three-letter token that is a known ISO code wins outright.
/// Otherwise digits, whitespace, commas, periods and apostrophes are
/// stripped and everything up to the first parenthesis is the symbol.
pub fn extract_currency_symbol(text: &str) -> String {
    for token in text.split(|c: char| !c.is_alphabetic()) {
        if token.len() == 3 && currencies::is_known_code(token) {
            return token.to_ascii_uppercase();
        }
    }
    let stripped: String = text
        .chars()
        .filter(|c| {
            !(c.is_ascii_digit() || c.is_whitespace() || matches!(c, ',' | '.' | '\''))
        })
        .collect();
    stripped.split('(').next().unwrap_or("").to_string()
}

/// Locale-tolerant amount parsing.
///
/// Grabs the first run of digits interspersed with `. , '` and spaces, then
/// decides which separator is the decimal one:
/// - both `.` and `,` present → the later one is the decimal point;
/// - only `,` → decimal iff a single comma is followed by exactly two digits;
/// - only `.` → extra dots are thousands separators; a lone dot is a
///   thousands separator only after a run of four or more digits followed by
///   exactly three (`1.234` parses as a decimal, `1234.567` does not).
pub fn extract_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let tail = &text[start..];
    let mut end = 0;
    for (idx, ch) in tail.char_indices() {
        if ch.is_ascii_digit() || matches!(ch, '.' | ',' | '\'' | ' ') {
            end = idx + ch.len_utf8();
        } else {
            break;
        }
    }
    let raw = tail[..end].trim_end_matches([' ', '.', ',', '\'']);
    // Apostrophes and spaces only ever group thousands.
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '\'' | ' ')).collect();

    let has_dot = cleaned.contains('.');
    let has_comma = cleaned.contains(',');
    let normalized = if has_dot && has_comma {
        let last_dot = cleaned.rfind('.').expect("dot present");
        let last_comma = cleaned.rfind(',').expect("comma present");
        if last_dot > last_comma {
            cleaned.replace(',', "")
        } else {
            cleaned.replace('.', "").replace(',', ".")
        }
    } else if has_comma {
        let frac = cleaned.rsplit(',').next().unwrap_or("");
        let comma_is_decimal = cleaned.matches(',').count() == 1 && frac.len() == 2;
        if comma_is_decimal {
            cleaned.replace(',', ".")
        } else {
            cleaned.replace(',', "")
        }
    } else if has_dot {
        let last_dot = cleaned.rfind('.').expect("dot present");
        let single: String = cleaned
            .char_indices()
            .filter(|(idx, ch)| *ch != '.' || *idx == last_dot)
            .map(|(_, ch)| ch)
            .collect();
        let dot = single.find('.').expect("dot survives");
        let (before, after) = (&single[..dot], &single[dot + 1..]);
        if after.len() == 3 && before.len() >= 4 {
            single.replace('.', "")
        } else {
            single
        }
    } else {
        cleaned
    };

    normalized.parse().ok()
}

/// Resolve a symbol or code to an ISO currency code; `None` is the
/// "Unknown currency" outcome.
pub fn detect_currency(symbol_or_code: &str, ctx: &PageContext) -> Option<String> {
    let trimmed = symbol_or_code.trim();
    if trimmed.len() == 3 && currencies::is_known_code(trimmed) {
        return Some(trimmed.to_ascii_uppercase());
    }
    let key = trimmed.to_lowercase();
    let candidates = currencies::SYMBOL_MAP.get(key.as_str())?;
    if candidates.len() == 1 {
        return Some(candidates[0].to_string());
    }
    Some(disambiguate(candidates, ctx).to_string())
}

/// Deterministic resolution of an ambiguous symbol, in order: page locale
/// country, USD on English pages, page TLD, first candidate.
fn disambiguate<'a>(candidates: &'a [&'a str], ctx: &PageContext) -> &'a str {
    if let Some(country) = ctx.country() {
        if let Some(code) = currencies::currency_for_country(&country) {
            if candidates.contains(&code) {
                return code;
            }
        }
    }
    if candidates.contains(&"USD") && ctx.language().as_deref() == Some("en") {
        return "USD";
    }
    if let Some(tld) = ctx.tld.as_deref() {
        if let Some(code) = currencies::currency_for_tld(tld) {
            if candidates.contains(&code) {
                return code;
            }
        }
    }
    candidates[0]
}

/// `"NNN.NN CCC SYM"` — two fraction digits, grouping per locale, trailing
/// symbol only when it differs from the code.
pub fn format_currency(amount: f64, code: &str, locale: &str) -> String {
    let code = code.to_ascii_uppercase();
    let (group_sep, decimal_sep) = locale_separators(locale);
    let rounded = (amount * 100.0).round() / 100.0;
    let cents = (rounded.abs() * 100.0).round() as u64;
    let sign = if rounded < 0.0 && cents > 0 { "-" } else { "" };
    let grouped = group_digits(&(cents / 100).to_string(), group_sep);

    let mut out = format!(
        "{}{}{}{:02} {}",
        sign,
        grouped,
        decimal_sep,
        cents % 100,
        code
    );
    if let Some(symbol) = currencies::symbol_for_code(&code) {
        if symbol != code {
            out.push(' ');
            out.push_str(symbol);
        }
    }
    out
}

fn locale_separators(locale: &str) -> (&'static str, &'static str) {
    let language = locale
        .split('-')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();
    match language.as_str() {
        "de" | "es" | "it" | "nl" | "pt" | "da" => (".", ","),
        "fr" => (" ", ","),
        _ => (",", "."),
    }
}

fn group_digits(digits: &str, separator: &str) -> String {
    let chars: Vec<char> = digits.chars().rev().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in chars.iter().enumerate() {
        if idx > 0 && idx % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(*ch);
    }
    grouped.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_extraction() {
        assert_eq!(extract_currency_symbol("$100"), "$");
        assert_eq!(extract_currency_symbol("100 EUR"), "EUR");
        assert_eq!(extract_currency_symbol("usd 25"), "USD");
        assert_eq!(extract_currency_symbol("R$ 1.234,56"), "R$");
        assert_eq!(extract_currency_symbol("kr 99 (approx)"), "kr");
    }

    #[test]
    fn number_parsing_separator_rules() {
        assert_eq!(extract_number("1,234"), Some(1234.0));
        assert_eq!(extract_number("1,23"), Some(1.23));
        assert_eq!(extract_number("1.234"), Some(1.234));
        assert_eq!(extract_number("1234.567"), Some(1_234_567.0));
        assert_eq!(extract_number("1.234.567"), Some(1_234_567.0));
        assert_eq!(extract_number("1.234.567,89"), Some(1_234_567.89));
        assert_eq!(extract_number("1,234,567.89"), Some(1_234_567.89));
        assert_eq!(extract_number("1'234'567.89"), Some(1_234_567.89));
        assert_eq!(extract_number("12 345,67"), Some(12_345.67));
        assert_eq!(extract_number("$99.95"), Some(99.95));
        assert_eq!(extract_number("no digits here"), None);
    }

    #[test]
    fn number_parsing_best_effort() {
        // Documented choice: European thousands-then-decimal.
        assert_eq!(extract_number("1.2.3"), Some(12.3));
        // Trailing separators do not leak into the number.
        assert_eq!(extract_number("100, then more"), Some(100.0));
    }

    #[test]
    fn unambiguous_symbols_resolve_directly() {
        let ctx = PageContext::default();
        assert_eq!(detect_currency("€", &ctx).as_deref(), Some("EUR"));
        assert_eq!(detect_currency("£", &ctx).as_deref(), Some("GBP"));
        assert_eq!(detect_currency("JPY", &ctx).as_deref(), Some("JPY"));
        assert_eq!(detect_currency("☃", &ctx), None);
    }

    #[test]
    fn dollar_disambiguation_order() {
        // (a) locale country wins
        let canadian = PageContext {
            locale: Some("en-CA".to_string()),
            tld: Some("com".to_string()),
        };
        assert_eq!(detect_currency("$", &canadian).as_deref(), Some("CAD"));

        // (b) English page defaults to USD
        let english = PageContext {
            locale: Some("en".to_string()),
            tld: Some("au".to_string()),
        };
        assert_eq!(detect_currency("$", &english).as_deref(), Some("USD"));

        // (c) TLD map
        let australian = PageContext {
            locale: Some("de".to_string()),
            tld: Some("au".to_string()),
        };
        assert_eq!(detect_currency("$", &australian).as_deref(), Some("AUD"));

        // (d) first candidate
        assert_eq!(detect_currency("$", &PageContext::default()).as_deref(), Some("USD"));

        // kr has no USD candidate; a Norwegian locale picks NOK.
        let norwegian = PageContext {
            locale: Some("nb-NO".to_string()),
            tld: None,
        };
        assert_eq!(detect_currency("kr", &norwegian).as_deref(), Some("NOK"));
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(85.0, "EUR", "en-US"), "85.00 EUR €");
        assert_eq!(format_currency(1234.5, "USD", "en"), "1,234.50 USD $");
        assert_eq!(format_currency(1234.5, "EUR", "de"), "1.234,50 EUR €");
        // CHF has no distinct symbol; the code stands alone.
        assert_eq!(format_currency(10.0, "CHF", "en"), "10.00 CHF");
        assert_eq!(format_currency(-3.555, "USD", "en"), "-3.56 USD $");
    }
}
