//! Detection and conversion engine behind an on-page select-to-convert tool.
//!
//! A selection snippet goes through a deterministic pipeline — detection,
//! normalization, conversion, auto-scaling, formatting — covering lengths,
//! weights, temperatures, volumes, areas, speeds, accelerations, flow rates,
//! torques, pressures, three-axis dimensions, time-of-day with zones, and
//! currency. Currency rates come from an async cache service with per-pair
//! fetch deduplication, a primary/fallback API pair, a stale-but-usable
//! policy and activity-gated background refresh.
//!
//! ```
//! use omniconvert::{find_conversion, UserSettings};
//!
//! let settings = UserSettings::default();
//! if let Some(conversion) = find_conversion("10 feet", &settings) {
//!     let rendered = omniconvert::converter::format_conversion(&conversion, &settings);
//!     assert_eq!(rendered.as_deref(), Some("3.05 m"));
//! }
//! ```

pub mod converter;
pub mod currency;
pub mod detector;
pub mod registry;
pub mod shared;

pub use converter::{convert, convert_temperature, format_result, get_best_unit};
pub use currency::service::{RateService, RateServiceConfig};
pub use currency::types::{CacheEntry, RateResult};
pub use detector::{find_conversion, find_conversion_with_context};
pub use shared::error::{AppError, AppResult};
pub use shared::settings::{Preset, UserSettings};
pub use shared::types::{Conversion, ConversionKind, Dimension, PageContext};
