use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::shared::error::{AppError, AppResult};

/// One cached base currency: every rate quoted against it, stamped with the
/// local wall clock at store time. Keys in `rates` are lowercase codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub rates: HashMap<String, f64>,
    /// Milliseconds since epoch, local clock. May legitimately sit in the
    /// future under clock skew; a negative age just reads as "not expired".
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_timestamp: Option<i64>,
    #[serde(default)]
    pub used_fallback: bool,
}

impl CacheEntry {
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }

    pub fn rate_for(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_ascii_lowercase()).copied()
    }
}

/// What `get_currency_rate` resolves to. Flags let the UI badge degraded
/// answers: `used_fallback` for the secondary API, `stale` for a rate older
/// than the cache timeout served as a last resort.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateResult {
    pub rate: f64,
    pub used_fallback: bool,
    pub from_cache: bool,
    pub stale: bool,
}

/// Primary API payload: `GET {base}/latest?base=USD` →
/// `{ base, timestamp, rates: { CODE: number } }`. Keys arrive uppercase and
/// are normalized to lowercase before caching.
#[derive(Debug, Deserialize)]
pub struct PrimaryApiResponse {
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub rates: HashMap<String, f64>,
}

impl PrimaryApiResponse {
    pub fn from_value(value: Value) -> AppResult<Self> {
        let parsed: Self = serde_json::from_value(value)
            .map_err(|e| AppError::Network(format!("Invalid primary rates payload: {}", e)))?;
        if parsed.rates.is_empty() {
            return Err(AppError::Network("Primary rates payload was empty".to_string()));
        }
        Ok(parsed)
    }

    pub fn lowercased_rates(self) -> HashMap<String, f64> {
        self.rates
            .into_iter()
            .map(|(code, rate)| (code.to_ascii_lowercase(), rate))
            .collect()
    }
}

/// Fallback API payload: `GET {base}/{usd}.json` → `{ "usd": { code: number } }`
/// with keys already lowercase.
pub fn parse_fallback_rates(value: Value, base: &str) -> AppResult<HashMap<String, f64>> {
    let table = value
        .get(base)
        .and_then(Value::as_object)
        .ok_or_else(|| {
            AppError::Network(format!("Fallback payload missing \"{}\" table", base))
        })?;
    let rates: HashMap<String, f64> = table
        .iter()
        .filter_map(|(code, rate)| rate.as_f64().map(|r| (code.to_ascii_lowercase(), r)))
        .collect();
    if rates.is_empty() {
        return Err(AppError::Network("Fallback rates payload was empty".to_string()));
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn primary_payload_lowercases_keys() {
        let parsed = PrimaryApiResponse::from_value(json!({
            "base": "USD",
            "timestamp": 1_700_000_000,
            "rates": {"EUR": 0.85, "gbp": 0.73}
        }))
        .unwrap();
        assert_eq!(parsed.timestamp, Some(1_700_000_000));
        let rates = parsed.lowercased_rates();
        assert_eq!(rates.get("eur"), Some(&0.85));
        assert_eq!(rates.get("gbp"), Some(&0.73));
    }

    #[test]
    fn fallback_payload_needs_base_table() {
        let rates = parse_fallback_rates(json!({"usd": {"eur": 0.9}}), "usd").unwrap();
        assert_eq!(rates.get("eur"), Some(&0.9));
        assert!(parse_fallback_rates(json!({"aud": {}}), "usd").is_err());
    }

    #[test]
    fn cache_entry_round_trips_and_tolerates_skew() {
        let entry = CacheEntry {
            rates: HashMap::from([("eur".to_string(), 0.85)]),
            timestamp: 10_000,
            api_timestamp: None,
            used_fallback: true,
        };
        let json = serde_json::to_value(&entry).unwrap();
        let back: CacheEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
        assert_eq!(back.rate_for("EUR"), Some(0.85));
        // Future timestamp → negative age; callers treat that as fresh.
        assert!(back.age_ms(5_000) < 0);
    }
}
