//! Currency rate cache service: per-pair deduplicated fetches against a
//! primary and a fallback rates API, a stale-but-usable policy, and
//! activity-gated background refresh.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde_json::{json, Value};

use crate::currency::http::HttpClient;
use crate::currency::storage::Storage;
use crate::currency::types::{parse_fallback_rates, CacheEntry, PrimaryApiResponse, RateResult};
use crate::shared::error::{AppError, AppResult};

/// Storage key holding the base → `CacheEntry` object.
pub const RATES_CACHE_KEY: &str = "currencyRatesCache";
/// Storage key holding the last-activity epoch-ms integer.
pub const ACTIVITY_KEY: &str = "lastUserActivity";

#[derive(Debug, Clone)]
pub struct RateServiceConfig {
    /// Cache entries younger than this are served without a fetch.
    pub cache_timeout: Duration,
    /// A user whose last activity is older than this counts as idle.
    pub inactivity_threshold: Duration,
    /// Lower edge of the prefetch window: entries at least this old (but not
    /// yet expired) are refreshed opportunistically on activity pings.
    pub stale_threshold: Duration,
    /// Alarm-driven refresh re-fetches entries older than this.
    pub refresh_threshold: Duration,
    pub primary_base_url: String,
    pub fallback_base_url: String,
}

impl Default for RateServiceConfig {
    fn default() -> Self {
        Self {
            cache_timeout: Duration::from_secs(60 * 60),
            inactivity_threshold: Duration::from_secs(5 * 60),
            stale_threshold: Duration::from_secs(45 * 60),
            refresh_threshold: Duration::from_secs(50 * 60),
            primary_base_url: "https://api.exchangerate.host".to_string(),
            fallback_base_url: "https://cdn.jsdelivr.net/gh/fawazahmed0/currency-api@1/latest/currencies"
                .to_string(),
        }
    }
}

/// Wall-clock seam so staleness boundaries are testable.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

type SharedFetch = Shared<BoxFuture<'static, AppResult<RateResult>>>;

struct ServiceState {
    store: Arc<dyn Storage>,
    http: Arc<dyn HttpClient>,
    clock: Arc<dyn Clock>,
    config: RateServiceConfig,
    in_flight: Mutex<HashMap<(String, String), SharedFetch>>,
    last_activity: AtomicI64,
}

/// The rate service. Cheap to clone; all clones share one in-flight map and
/// one activity mirror, which is what the deduplication guarantee hangs on.
#[derive(Clone)]
pub struct RateService {
    state: Arc<ServiceState>,
}

impl RateService {
    pub fn new(store: Arc<dyn Storage>, http: Arc<dyn HttpClient>) -> Self {
        Self::with_config(store, http, RateServiceConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn Storage>,
        http: Arc<dyn HttpClient>,
        config: RateServiceConfig,
    ) -> Self {
        Self::with_clock(store, http, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        store: Arc<dyn Storage>,
        http: Arc<dyn HttpClient>,
        config: RateServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Arc::new(ServiceState {
                store,
                http,
                clock,
                config,
                in_flight: Mutex::new(HashMap::new()),
                last_activity: AtomicI64::new(0),
            }),
        }
    }

    /// Rate from `from` to `to`, deduplicated: while a fetch for a pair is
    /// outstanding every caller awaits the same future and receives the same
    /// `RateResult`. A caller dropping its await does not cancel the shared
    /// fetch.
    pub async fn get_currency_rate(&self, from: &str, to: &str) -> AppResult<RateResult> {
        let from = from.trim().to_ascii_lowercase();
        let to = to.trim().to_ascii_lowercase();
        let key = (from, to);

        let fetch = {
            let mut in_flight = self
                .state
                .in_flight
                .lock()
                .map_err(|_| AppError::Unknown("in-flight map poisoned".to_string()))?;
            match in_flight.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let state = Arc::clone(&self.state);
                    let cleanup_key = key.clone();
                    let fetch: SharedFetch = async move {
                        let result = resolve_rate(&state, &cleanup_key.0, &cleanup_key.1).await;
                        // Entry removal is part of the fetch itself so it
                        // runs exactly once, success or failure.
                        if let Ok(mut in_flight) = state.in_flight.lock() {
                            in_flight.remove(&cleanup_key);
                        }
                        result
                    }
                    .boxed()
                    .shared();
                    in_flight.insert(key, fetch.clone());
                    fetch
                }
            }
        };

        fetch.await
    }

    /// Fetch the `usd` base (which carries every rate in one call) unless a
    /// still-valid cache for it exists. Called on install and startup.
    pub async fn warm_cache(&self) -> AppResult<()> {
        let state = &self.state;
        let now = state.clock.now_ms();
        if let Some(entry) = read_cache_entry(state, "usd").await {
            if is_cache_valid(state, &entry, now) {
                log::debug!("[Rates] Warm skipped; usd cache still valid");
                return Ok(());
            }
        }
        let (rates, api_timestamp) = fetch_primary(state, "usd").await?;
        let entry = CacheEntry {
            rates,
            timestamp: state.clock.now_ms(),
            api_timestamp,
            used_fallback: false,
        };
        store_entry(state, "usd", &entry).await;
        log::info!("[Rates] Cache warmed with {} usd rates", entry.rates.len());
        Ok(())
    }

    /// Opportunistic refresh driven by activity pings. No-op when the user
    /// is idle; warms a missing cache; refreshes an aging-but-unexpired one.
    /// All errors are swallowed — the next foreground request recovers.
    pub async fn prefetch_if_stale(&self) {
        let state = &self.state;
        let now = state.clock.now_ms();
        if !is_user_active(state, now) {
            return;
        }
        match read_cache_entry(state, "usd").await {
            None => {
                if let Err(e) = self.warm_cache().await {
                    log::debug!("[Rates] Prefetch warm failed: {}", e);
                }
            }
            Some(entry) => {
                let age = entry.age_ms(now);
                let stale = duration_ms(state.config.stale_threshold);
                let timeout = duration_ms(state.config.cache_timeout);
                if age >= stale && age < timeout {
                    match fetch_primary(state, "usd").await {
                        Ok((rates, api_timestamp)) => {
                            let entry = CacheEntry {
                                rates,
                                timestamp: state.clock.now_ms(),
                                api_timestamp,
                                used_fallback: false,
                            };
                            store_entry(state, "usd", &entry).await;
                            log::debug!("[Rates] Prefetched usd rates inside stale window");
                        }
                        Err(e) => log::debug!("[Rates] Prefetch failed: {}", e),
                    }
                }
            }
        }
    }

    /// Alarm-driven sweep: re-fetch every cached base older than the refresh
    /// threshold. Idle users cause no network traffic; per-base failures are
    /// logged and the sweep continues.
    pub async fn refresh_cache_if_needed(&self) {
        let state = &self.state;
        let now = state.clock.now_ms();
        if !is_user_active(state, now) {
            log::debug!("[Rates] Refresh skipped; user idle");
            return;
        }
        let refresh = duration_ms(state.config.refresh_threshold);
        for (base, entry) in read_cache_map(state).await {
            if entry.age_ms(now) <= refresh {
                continue;
            }
            match fetch_primary(state, &base).await {
                Ok((rates, api_timestamp)) => {
                    let fresh = CacheEntry {
                        rates,
                        timestamp: state.clock.now_ms(),
                        api_timestamp,
                        used_fallback: false,
                    };
                    store_entry(state, &base, &fresh).await;
                    log::debug!("[Rates] Refreshed {} rates", base);
                }
                Err(e) => log::warn!("[Rates] Refresh of {} failed: {}", base, e),
            }
        }
    }

    /// Record user activity now, mirrored in memory and persisted. Callers
    /// throttle pings to at most one per inactivity window.
    pub async fn update_activity(&self) {
        let now = self.state.clock.now_ms();
        self.state.last_activity.store(now, Ordering::Relaxed);
        if let Err(e) = self.state.store.set(ACTIVITY_KEY, json!(now)).await {
            log::warn!("[Rates] Failed to persist activity timestamp: {}", e);
        }
    }

    /// Restore the persisted activity timestamp at startup (defaults to 0,
    /// i.e. idle).
    pub async fn load_activity(&self) {
        let stored = match self.state.store.get(ACTIVITY_KEY).await {
            Ok(value) => value.and_then(|v| v.as_i64()).unwrap_or(0),
            Err(e) => {
                log::warn!("[Rates] Failed to load activity timestamp: {}", e);
                0
            }
        };
        self.state.last_activity.store(stored, Ordering::Relaxed);
    }

    pub fn is_user_active(&self) -> bool {
        is_user_active(&self.state, self.state.clock.now_ms())
    }

    /// Cached entry for a base currency, if any.
    pub async fn get_cached_rate(&self, base: &str) -> Option<CacheEntry> {
        read_cache_entry(&self.state, &base.to_ascii_lowercase()).await
    }

    /// Overwrite the cached entry for a base currency.
    pub async fn set_cached_rate(&self, base: &str, entry: CacheEntry) {
        store_entry(&self.state, &base.to_ascii_lowercase(), &entry).await;
    }

    /// Drop the whole rate cache; the activity record is left intact.
    pub async fn clear_cache(&self) -> AppResult<()> {
        self.state.store.remove(RATES_CACHE_KEY).await
    }

    /// Stand-in for a host alarm: run `refresh_cache_if_needed` on a fixed
    /// interval equal to the refresh threshold.
    pub fn spawn_refresh_task(&self) -> tokio::task::JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(service.state.config.refresh_threshold);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The immediate first tick; startup warming is warm_cache's job.
            interval.tick().await;
            loop {
                interval.tick().await;
                service.refresh_cache_if_needed().await;
            }
        })
    }
}

fn duration_ms(duration: Duration) -> i64 {
    duration.as_millis() as i64
}

fn is_cache_valid(state: &ServiceState, entry: &CacheEntry, now: i64) -> bool {
    // A future timestamp yields a negative age and counts as fresh; clock
    // skew is tolerated rather than clamped.
    entry.age_ms(now) < duration_ms(state.config.cache_timeout)
}

fn is_user_active(state: &ServiceState, now: i64) -> bool {
    now - state.last_activity.load(Ordering::Relaxed) < duration_ms(state.config.inactivity_threshold)
}

fn should_refresh_cache(state: &ServiceState, cached: Option<&CacheEntry>, now: i64) -> bool {
    match cached {
        None => true,
        Some(entry) => !is_cache_valid(state, entry, now) && is_user_active(state, now),
    }
}

async fn resolve_rate(state: &ServiceState, from: &str, to: &str) -> AppResult<RateResult> {
    let cached = read_cache_entry(state, from).await;
    let now = state.clock.now_ms();

    if let Some(entry) = cached.as_ref() {
        if is_cache_valid(state, entry, now) {
            if let Some(rate) = entry.rate_for(to) {
                log::debug!("[Rates] {}→{} served from cache", from, to);
                return Ok(RateResult {
                    rate,
                    used_fallback: entry.used_fallback,
                    from_cache: true,
                    stale: false,
                });
            }
        }
    }

    // Cache missing or expired from here on.
    let stale_rate = cached.as_ref().and_then(|entry| entry.rate_for(to));
    let stale_from_fallback = cached.as_ref().map(|e| e.used_fallback).unwrap_or(false);

    if let Some(rate) = stale_rate {
        if !should_refresh_cache(state, cached.as_ref(), now) {
            log::debug!("[Rates] {}→{} user idle; serving expired rate", from, to);
            return Ok(RateResult {
                rate,
                used_fallback: stale_from_fallback,
                from_cache: true,
                stale: true,
            });
        }
    }

    match fetch_primary(state, from).await {
        Ok((rates, api_timestamp)) => {
            let entry = CacheEntry {
                rates,
                timestamp: state.clock.now_ms(),
                api_timestamp,
                used_fallback: false,
            };
            store_entry(state, from, &entry).await;
            if let Some(rate) = entry.rate_for(to) {
                return Ok(RateResult {
                    rate,
                    used_fallback: false,
                    from_cache: false,
                    stale: false,
                });
            }
            log::warn!("[Rates] Primary API has no {} rate for base {}", to, from);
        }
        Err(e) => log::warn!("[Rates] Primary API failed for {}: {}", from, e),
    }

    match fetch_fallback(state, from).await {
        Ok(rates) => {
            let entry = CacheEntry {
                rates,
                timestamp: state.clock.now_ms(),
                api_timestamp: None,
                used_fallback: true,
            };
            store_entry(state, from, &entry).await;
            if let Some(rate) = entry.rate_for(to) {
                return Ok(RateResult {
                    rate,
                    used_fallback: true,
                    from_cache: false,
                    stale: false,
                });
            }
            log::warn!("[Rates] Fallback API has no {} rate for base {}", to, from);
        }
        Err(e) => log::warn!("[Rates] Fallback API failed for {}: {}", from, e),
    }

    if let Some(rate) = stale_rate {
        log::warn!("[Rates] Both APIs failed; serving stale {}→{} rate", from, to);
        return Ok(RateResult {
            rate,
            used_fallback: stale_from_fallback,
            from_cache: true,
            stale: true,
        });
    }

    Err(AppError::RateUnavailable)
}

async fn fetch_primary(
    state: &ServiceState,
    base: &str,
) -> AppResult<(HashMap<String, f64>, Option<i64>)> {
    let url = format!(
        "{}/latest?base={}",
        state.config.primary_base_url,
        base.to_ascii_uppercase()
    );
    log::debug!("[Rates] GET {}", url);
    let value = state.http.get_json(&url).await?;
    let parsed = PrimaryApiResponse::from_value(value)?;
    let api_timestamp = parsed.timestamp;
    Ok((parsed.lowercased_rates(), api_timestamp))
}

async fn fetch_fallback(state: &ServiceState, base: &str) -> AppResult<HashMap<String, f64>> {
    let url = format!("{}/{}.json", state.config.fallback_base_url, base);
    log::debug!("[Rates] GET {}", url);
    let value = state.http.get_json(&url).await?;
    parse_fallback_rates(value, base)
}

async fn read_cache_map(state: &ServiceState) -> HashMap<String, CacheEntry> {
    match state.store.get(RATES_CACHE_KEY).await {
        Ok(Some(Value::Object(map))) => map
            .into_iter()
            .filter_map(|(base, value)| {
                serde_json::from_value::<CacheEntry>(value)
                    .ok()
                    .map(|entry| (base, entry))
            })
            .collect(),
        Ok(_) => HashMap::new(),
        // Read errors degrade to a cache miss.
        Err(e) => {
            log::warn!("[Rates] Cache read failed: {}", e);
            HashMap::new()
        }
    }
}

async fn read_cache_entry(state: &ServiceState, base: &str) -> Option<CacheEntry> {
    read_cache_map(state).await.remove(base)
}

async fn store_entry(state: &ServiceState, base: &str, entry: &CacheEntry) {
    let mut map = match state.store.get(RATES_CACHE_KEY).await {
        Ok(Some(Value::Object(map))) => map,
        _ => serde_json::Map::new(),
    };
    match serde_json::to_value(entry) {
        Ok(value) => {
            map.insert(base.to_string(), value);
        }
        Err(e) => {
            log::warn!("[Rates] Failed to serialize cache entry for {}: {}", base, e);
            return;
        }
    }
    // Write errors are logged and swallowed; the rate already fetched is
    // still returned to the caller.
    if let Err(e) = state.store.set(RATES_CACHE_KEY, Value::Object(map)).await {
        log::warn!("[Rates] Cache write for {} failed: {}", base, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::storage::MemoryStore;
    use std::sync::atomic::AtomicUsize;

    const T0: i64 = 1_700_000_000_000;
    const MINUTE: i64 = 60_000;

    struct MockClock {
        now: AtomicI64,
    }

    impl MockClock {
        fn new() -> Self {
            Self {
                now: AtomicI64::new(T0),
            }
        }

        fn advance_minutes(&self, minutes: i64) {
            self.now.fetch_add(minutes * MINUTE, Ordering::SeqCst);
        }
    }

    impl Clock for MockClock {
        fn now_ms(&self) -> i64 {
            self.now.load(Ordering::SeqCst)
        }
    }

    type Responder = Box<dyn Fn(&str) -> AppResult<Value> + Send + Sync>;

    struct MockHttp {
        calls: AtomicUsize,
        delay: Option<Duration>,
        responder: Responder,
    }

    impl MockHttp {
        fn new(responder: Responder) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: None,
                responder,
            }
        }

        fn with_delay(responder: Responder, delay: Duration) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                delay: Some(delay),
                responder,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl HttpClient for MockHttp {
        async fn get_json(&self, url: &str) -> AppResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.responder)(url)
        }
    }

    fn primary_rates() -> Responder {
        Box::new(|url| {
            if url.contains("/latest?") {
                Ok(json!({"base": "USD", "timestamp": 1_700_000_000, "rates": {"EUR": 0.85, "GBP": 0.73}}))
            } else {
                Err(AppError::Network("unexpected fallback call".to_string()))
            }
        })
    }

    fn failing_primary_with_fallback() -> Responder {
        Box::new(|url| {
            if url.contains("/latest?") {
                Err(AppError::Network("Request failed: 500".to_string()))
            } else {
                Ok(json!({"usd": {"eur": 0.9}}))
            }
        })
    }

    fn all_apis_down() -> Responder {
        Box::new(|_| Err(AppError::Network("offline".to_string())))
    }

    struct Harness {
        service: RateService,
        store: Arc<MemoryStore>,
        http: Arc<MockHttp>,
        clock: Arc<MockClock>,
    }

    fn harness(http: MockHttp) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let http = Arc::new(http);
        let clock = Arc::new(MockClock::new());
        let service = RateService::with_clock(
            store.clone(),
            http.clone(),
            RateServiceConfig::default(),
            clock.clone(),
        );
        Harness {
            service,
            store,
            http,
            clock,
        }
    }

    async fn seed_usd_entry(h: &Harness, rate: f64, age_ms: i64, used_fallback: bool) {
        let entry = CacheEntry {
            rates: HashMap::from([("eur".to_string(), rate)]),
            timestamp: h.clock.now_ms() - age_ms,
            api_timestamp: None,
            used_fallback,
        };
        h.service.set_cached_rate("usd", entry).await;
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_calls_share_one_fetch() {
        let h = harness(MockHttp::with_delay(primary_rates(), Duration::from_millis(50)));
        h.service.update_activity().await;

        let (a, b) = tokio::join!(
            h.service.get_currency_rate("USD", "EUR"),
            h.service.get_currency_rate("usd", "eur"),
        );
        let a = a.unwrap();
        let b = b.unwrap();
        assert_eq!(h.http.call_count(), 1);
        assert_eq!(a, b);
        assert_eq!(a.rate, 0.85);
        assert!(!a.from_cache && !a.stale && !a.used_fallback);

        // Within the cache window nothing new is fetched.
        let cached = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert!(cached.from_cache);
        assert_eq!(h.http.call_count(), 1);

        // 61 minutes later an active user triggers exactly one new fetch.
        h.clock.advance_minutes(61);
        h.service.update_activity().await;
        let refreshed = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert!(!refreshed.from_cache);
        assert_eq!(h.http.call_count(), 2);
    }

    #[tokio::test]
    async fn fallback_api_covers_primary_outage() {
        let h = harness(MockHttp::new(failing_primary_with_fallback()));
        h.service.update_activity().await;

        let result = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert_eq!(result.rate, 0.9);
        assert!(result.used_fallback);
        assert!(!result.from_cache && !result.stale);

        // The fallback result was cached and keeps its provenance flag.
        let hit = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert!(hit.from_cache && hit.used_fallback && !hit.stale);
    }

    #[tokio::test]
    async fn expired_cache_survives_total_outage() {
        let h = harness(MockHttp::new(all_apis_down()));
        h.service.update_activity().await;
        seed_usd_entry(&h, 0.80, 2 * 60 * MINUTE, false).await;

        let result = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert_eq!(result.rate, 0.80);
        assert!(result.from_cache && result.stale);
        // Primary and fallback were both attempted first.
        assert_eq!(h.http.call_count(), 2);
    }

    #[tokio::test]
    async fn rate_unavailable_when_nothing_works() {
        let h = harness(MockHttp::new(all_apis_down()));
        h.service.update_activity().await;

        let err = h.service.get_currency_rate("USD", "EUR").await.unwrap_err();
        assert!(matches!(err, AppError::RateUnavailable));
    }

    #[tokio::test]
    async fn idle_user_is_served_expired_cache_without_network() {
        let h = harness(MockHttp::new(primary_rates()));
        // No activity recorded: last activity stays at 0, far in the past.
        seed_usd_entry(&h, 0.80, 2 * 60 * MINUTE, false).await;

        let result = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert_eq!(result.rate, 0.80);
        assert!(result.from_cache && result.stale);
        assert_eq!(h.http.call_count(), 0);
    }

    #[tokio::test]
    async fn cache_validity_boundary() {
        let h = harness(MockHttp::new(primary_rates()));
        h.service.update_activity().await;

        let timeout = duration_ms(RateServiceConfig::default().cache_timeout);
        seed_usd_entry(&h, 0.80, timeout - 1, false).await;
        let result = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert!(result.from_cache && !result.stale);
        assert_eq!(h.http.call_count(), 0);

        seed_usd_entry(&h, 0.80, timeout + 1, false).await;
        let result = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert!(!result.from_cache);
        assert_eq!(h.http.call_count(), 1);
    }

    #[tokio::test]
    async fn future_timestamp_counts_as_fresh() {
        let h = harness(MockHttp::new(primary_rates()));
        h.service.update_activity().await;
        // Negative age via clock skew: do not clamp, do not refetch.
        seed_usd_entry(&h, 0.80, -10 * MINUTE, false).await;

        let result = h.service.get_currency_rate("USD", "EUR").await.unwrap();
        assert!(result.from_cache && !result.stale);
        assert_eq!(h.http.call_count(), 0);
    }

    #[tokio::test]
    async fn prefetch_only_fires_inside_stale_window() {
        let h = harness(MockHttp::new(primary_rates()));
        h.service.update_activity().await;

        // Fresh entry: below the stale threshold, nothing happens.
        seed_usd_entry(&h, 0.80, 10 * MINUTE, false).await;
        h.service.prefetch_if_stale().await;
        assert_eq!(h.http.call_count(), 0);

        // Inside [stale, timeout): one primary fetch.
        seed_usd_entry(&h, 0.80, 46 * MINUTE, false).await;
        h.service.prefetch_if_stale().await;
        assert_eq!(h.http.call_count(), 1);

        // Past the timeout: outside the window, prefetch leaves it to the
        // next foreground request.
        seed_usd_entry(&h, 0.80, 61 * MINUTE, false).await;
        h.service.prefetch_if_stale().await;
        assert_eq!(h.http.call_count(), 1);
    }

    #[tokio::test]
    async fn idle_user_suppresses_background_work() {
        let h = harness(MockHttp::new(primary_rates()));
        // Activity exactly at the threshold is already idle.
        h.service.update_activity().await;
        h.clock
            .advance_minutes(RateServiceConfig::default().inactivity_threshold.as_secs() as i64 / 60);

        seed_usd_entry(&h, 0.80, 46 * MINUTE, false).await;
        h.service.prefetch_if_stale().await;
        h.service.refresh_cache_if_needed().await;
        assert_eq!(h.http.call_count(), 0);
        assert!(!h.service.is_user_active());
    }

    #[tokio::test]
    async fn warm_cache_respects_valid_entries() {
        let h = harness(MockHttp::new(primary_rates()));
        seed_usd_entry(&h, 0.80, 10 * MINUTE, false).await;
        h.service.warm_cache().await.unwrap();
        assert_eq!(h.http.call_count(), 0);

        seed_usd_entry(&h, 0.80, 2 * 60 * MINUTE, false).await;
        h.service.warm_cache().await.unwrap();
        assert_eq!(h.http.call_count(), 1);
        let entry = h.service.get_cached_rate("usd").await.unwrap();
        assert_eq!(entry.rate_for("gbp"), Some(0.73));
    }

    #[tokio::test]
    async fn refresh_sweep_only_touches_old_bases() {
        let h = harness(MockHttp::new(primary_rates()));
        h.service.update_activity().await;

        seed_usd_entry(&h, 0.80, 55 * MINUTE, false).await;
        let fresh = CacheEntry {
            rates: HashMap::from([("usd".to_string(), 1.18)]),
            timestamp: h.clock.now_ms() - 10 * MINUTE,
            api_timestamp: None,
            used_fallback: false,
        };
        h.service.set_cached_rate("eur", fresh).await;

        h.service.refresh_cache_if_needed().await;
        // Only the 55-minute-old usd base crossed the 50-minute threshold.
        assert_eq!(h.http.call_count(), 1);
    }

    #[tokio::test]
    async fn clear_cache_keeps_activity_record() {
        let h = harness(MockHttp::new(primary_rates()));
        h.service.update_activity().await;
        seed_usd_entry(&h, 0.80, 0, false).await;

        h.service.clear_cache().await.unwrap();
        assert!(h.service.get_cached_rate("usd").await.is_none());
        assert!(h.store.get(ACTIVITY_KEY).await.unwrap().is_some());

        // A fresh service instance restores activity from storage.
        let revived = RateService::with_clock(
            h.store.clone(),
            h.http.clone(),
            RateServiceConfig::default(),
            h.clock.clone(),
        );
        revived.load_activity().await;
        assert!(revived.is_user_active());
    }
}
