use serde::{Deserialize, Serialize};

/// Closed set of physically comparable unit families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Length,
    Weight,
    Temperature,
    Volume,
    Area,
    Speed,
    Acceleration,
    FlowRate,
    Torque,
    Pressure,
    Timezone,
    Currency,
}

/// What a detected expression converts into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ConversionKind {
    /// Plain `value unit` result, rendered as `"v u"`.
    #[serde(rename_all = "camelCase")]
    Scalar {
        converted_value: f64,
        converted_unit: String,
    },
    /// Three-axis result, rendered as `"a × b × c u"`.
    #[serde(rename_all = "camelCase")]
    Dimensions3D {
        l: f64,
        w: f64,
        h: f64,
        unit: String,
    },
    /// Currency expression awaiting a rate from the rate service.
    #[serde(rename_all = "camelCase")]
    CurrencyPending {
        from_code: String,
        to_code: String,
        amount: f64,
    },
    /// Wall-clock time shifted into the target zone, rendered as `"HH:MM LABEL"`.
    #[serde(rename_all = "camelCase")]
    TimeZone {
        hours: u32,
        minutes: u32,
        zone_label: String,
    },
}

/// The detector's single result for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// The matched substring of the selection.
    pub original_text: String,
    pub original_value: f64,
    pub original_unit: String,
    #[serde(flatten)]
    pub kind: ConversionKind,
}

/// Page-level cues consumed by the currency disambiguator.
///
/// `locale` is a BCP-47 tag from the host page (`"en-US"`, `"de"`); `tld` is
/// the page's top-level domain without the dot (`"ca"`, `"co.uk"` reduced to
/// its last label by the caller).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub locale: Option<String>,
    pub tld: Option<String>,
}

impl PageContext {
    /// Language subtag of the page locale, lowercased (`"en-US"` -> `"en"`).
    pub fn language(&self) -> Option<String> {
        self.locale
            .as_deref()
            .and_then(|l| l.split('-').next())
            .filter(|l| !l.is_empty())
            .map(|l| l.to_ascii_lowercase())
    }

    /// Region subtag of the page locale, uppercased (`"en-US"` -> `"US"`).
    pub fn country(&self) -> Option<String> {
        self.locale
            .as_deref()
            .and_then(|l| l.split('-').nth(1))
            .filter(|c| c.len() == 2 && c.chars().all(|ch| ch.is_ascii_alphabetic()))
            .map(|c| c.to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_context_subtags() {
        let ctx = PageContext {
            locale: Some("en-US".to_string()),
            tld: Some("com".to_string()),
        };
        assert_eq!(ctx.language().as_deref(), Some("en"));
        assert_eq!(ctx.country().as_deref(), Some("US"));

        let bare = PageContext {
            locale: Some("de".to_string()),
            tld: None,
        };
        assert_eq!(bare.language().as_deref(), Some("de"));
        assert_eq!(bare.country(), None);
    }

    #[test]
    fn conversion_serializes_flat() {
        let conv = Conversion {
            original_text: "10 ft".to_string(),
            original_value: 10.0,
            original_unit: "ft".to_string(),
            kind: ConversionKind::Scalar {
                converted_value: 3.05,
                converted_unit: "m".to_string(),
            },
        };
        let json = serde_json::to_value(&conv).unwrap();
        assert_eq!(json["kind"], "scalar");
        assert_eq!(json["convertedUnit"], "m");
        assert_eq!(json["originalText"], "10 ft");
    }
}
