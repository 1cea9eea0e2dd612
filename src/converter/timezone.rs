//! Wall-clock time conversion between fixed-offset zones. No dates are
//! involved; times wrap modulo 24 hours.

use chrono::{Local, Offset};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::registry::timezones;

/// A time of day placed in a target zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZonedTime {
    /// 24-hour clock, 0..=23.
    pub hours: u32,
    pub minutes: u32,
    pub zone_label: String,
}

static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2}):(\d{2})\s*(am|pm)?").expect("time regex"));

/// Shift `time_text` (`HH:MM[ AM/PM]`) from `from_zone` into `to_zone`.
///
/// Zones accept registry names (`EST`), `UTC±N`/`GMT±N` forms, and a name
/// with a numeric modifier (`EST+1`). `use_offset_format` replaces the
/// target label with the canonical `GMT±N` form — used when the target zone
/// was derived from the machine clock and a name would be a guess.
pub fn convert_timezone(
    time_text: &str,
    from_zone: &str,
    to_zone: &str,
    use_offset_format: bool,
) -> Option<ZonedTime> {
    let caps = TIME_RE.captures(time_text)?;
    let mut hours: i32 = caps[1].parse().ok()?;
    let minutes: i32 = caps[2].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    match caps.get(3).map(|m| m.as_str().to_ascii_lowercase()) {
        Some(meridiem) => {
            if hours < 1 || hours > 12 {
                return None;
            }
            hours %= 12;
            if meridiem == "pm" {
                hours += 12;
            }
        }
        None => {}
    }

    let from_offset = resolve_zone(from_zone)?;
    let to_offset = resolve_zone(to_zone)?;

    let total = (hours * 60 + minutes - from_offset + to_offset).rem_euclid(24 * 60);
    let zone_label = if use_offset_format {
        timezones::offset_label(to_offset)
    } else {
        to_zone.trim().to_ascii_uppercase()
    };

    Some(ZonedTime {
        hours: (total / 60) as u32,
        minutes: (total % 60) as u32,
        zone_label,
    })
}

/// Offset in minutes for a zone spelling, including `NAME±N` modifiers.
pub fn resolve_zone(zone: &str) -> Option<i32> {
    let zone = zone.trim();
    if let Some(offset) = timezones::zone_offset_minutes(zone) {
        return Some(offset);
    }
    let idx = zone.find(['+', '-'])?;
    let (name, suffix) = zone.split_at(idx);
    let base = timezones::zone_offset_minutes(name)?;
    Some(base + timezones::parse_offset_suffix(suffix)?)
}

/// The machine's current UTC offset in minutes.
pub fn local_offset_minutes() -> i32 {
    Local::now().offset().fix().local_minus_utc() / 60
}

/// Render a converted time: `"12:30 PM PST"` or `"15:30 CET"`.
pub fn format_time(time: &ZonedTime, is_12hr: bool) -> String {
    if is_12hr {
        let meridiem = if time.hours < 12 { "AM" } else { "PM" };
        let mut display_hours = time.hours % 12;
        if display_hours == 0 {
            display_hours = 12;
        }
        format!(
            "{}:{:02} {} {}",
            display_hours, time.minutes, meridiem, time.zone_label
        )
    } else {
        format!("{:02}:{:02} {}", time.hours, time.minutes, time.zone_label)
    }
}
