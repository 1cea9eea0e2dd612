use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

/// Currency symbol → candidate ISO codes. Single-candidate symbols resolve
/// directly; multi-candidate ones go through the page-locale disambiguator.
/// Candidate order matters: the first entry is the final fallback.
pub static SYMBOL_CANDIDATES: &[(&str, &[&str])] = &[
    ("$", &["USD", "CAD", "AUD", "MXN", "NZD", "SGD", "HKD"]),
    ("€", &["EUR"]),
    ("£", &["GBP"]),
    ("¥", &["JPY", "CNY"]),
    ("₹", &["INR"]),
    ("₩", &["KRW"]),
    ("₽", &["RUB"]),
    ("₺", &["TRY"]),
    ("₪", &["ILS"]),
    ("₫", &["VND"]),
    ("₱", &["PHP"]),
    ("฿", &["THB"]),
    ("zł", &["PLN"]),
    ("kr", &["SEK", "NOK", "DKK"]),
    ("r$", &["BRL"]),
    ("c$", &["CAD"]),
    ("a$", &["AUD"]),
    ("nz$", &["NZD"]),
    ("s$", &["SGD"]),
    ("hk$", &["HKD"]),
    ("chf", &["CHF"]),
];

/// Every ISO code the engine recognizes as a currency.
pub static KNOWN_CODES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CNY", "CAD", "AUD", "NZD", "CHF", "SEK", "NOK", "DKK", "PLN",
    "CZK", "HUF", "RON", "BGN", "RUB", "TRY", "ILS", "INR", "KRW", "SGD", "HKD", "TWD", "THB",
    "VND", "PHP", "MYR", "IDR", "MXN", "BRL", "ARS", "CLP", "COP", "PEN", "ZAR", "EGP", "NGN",
    "KES", "AED", "SAR", "QAR", "KWD", "UAH",
];

/// ISO country code → home currency, for the locale-region disambiguation
/// step.
pub static COUNTRY_CURRENCY: &[(&str, &str)] = &[
    ("US", "USD"),
    ("CA", "CAD"),
    ("AU", "AUD"),
    ("NZ", "NZD"),
    ("MX", "MXN"),
    ("SG", "SGD"),
    ("HK", "HKD"),
    ("GB", "GBP"),
    ("JP", "JPY"),
    ("CN", "CNY"),
    ("IN", "INR"),
    ("KR", "KRW"),
    ("BR", "BRL"),
    ("SE", "SEK"),
    ("NO", "NOK"),
    ("DK", "DKK"),
    ("CH", "CHF"),
    ("PL", "PLN"),
    ("TR", "TRY"),
    ("IL", "ILS"),
    ("TH", "THB"),
    ("VN", "VND"),
    ("PH", "PHP"),
    ("RU", "RUB"),
];

/// Top-level domain → currency, the third disambiguation step.
pub static TLD_CURRENCY: &[(&str, &str)] = &[
    ("us", "USD"),
    ("ca", "CAD"),
    ("au", "AUD"),
    ("nz", "NZD"),
    ("mx", "MXN"),
    ("sg", "SGD"),
    ("hk", "HKD"),
    ("uk", "GBP"),
    ("jp", "JPY"),
    ("cn", "CNY"),
    ("in", "INR"),
    ("kr", "KRW"),
    ("br", "BRL"),
    ("se", "SEK"),
    ("no", "NOK"),
    ("dk", "DKK"),
    ("ch", "CHF"),
    ("pl", "PLN"),
    ("tr", "TRY"),
    ("il", "ILS"),
    ("th", "THB"),
    ("vn", "VND"),
    ("ph", "PHP"),
    ("ru", "RUB"),
    ("de", "EUR"),
    ("fr", "EUR"),
    ("es", "EUR"),
    ("it", "EUR"),
    ("nl", "EUR"),
    ("at", "EUR"),
    ("ie", "EUR"),
    ("pt", "EUR"),
    ("fi", "EUR"),
];

/// Preferred display symbol per code, appended after the code when it
/// differs from the code itself (`"85.00 EUR €"`).
pub static CODE_SYMBOL: &[(&str, &str)] = &[
    ("USD", "$"),
    ("CAD", "$"),
    ("AUD", "$"),
    ("NZD", "$"),
    ("MXN", "$"),
    ("SGD", "$"),
    ("HKD", "$"),
    ("EUR", "€"),
    ("GBP", "£"),
    ("JPY", "¥"),
    ("CNY", "¥"),
    ("INR", "₹"),
    ("KRW", "₩"),
    ("RUB", "₽"),
    ("TRY", "₺"),
    ("ILS", "₪"),
    ("VND", "₫"),
    ("PHP", "₱"),
    ("THB", "฿"),
    ("PLN", "zł"),
    ("SEK", "kr"),
    ("NOK", "kr"),
    ("DKK", "kr"),
    ("BRL", "R$"),
];

pub static SYMBOL_MAP: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| SYMBOL_CANDIDATES.iter().copied().collect());

pub static CODE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| KNOWN_CODES.iter().copied().collect());

pub fn is_known_code(token: &str) -> bool {
    token.len() == 3 && CODE_SET.contains(token.to_ascii_uppercase().as_str())
}

pub fn symbol_for_code(code: &str) -> Option<&'static str> {
    let upper = code.to_ascii_uppercase();
    CODE_SYMBOL
        .iter()
        .find(|(c, _)| *c == upper)
        .map(|(_, sym)| *sym)
}

pub fn currency_for_country(country: &str) -> Option<&'static str> {
    let upper = country.to_ascii_uppercase();
    COUNTRY_CURRENCY
        .iter()
        .find(|(c, _)| *c == upper)
        .map(|(_, code)| *code)
}

pub fn currency_for_tld(tld: &str) -> Option<&'static str> {
    let lower = tld.to_ascii_lowercase();
    TLD_CURRENCY
        .iter()
        .find(|(t, _)| *t == lower)
        .map(|(_, code)| *code)
}
