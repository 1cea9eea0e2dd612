/// Zone abbreviation → UTC offset in minutes.
///
/// Fixed offsets by design: conversions operate on bare wall-clock times, so
/// there is no date to resolve DST against. Daylight variants are separate
/// entries (EST/EDT) and the selection picks whichever the text names.
pub static ZONE_OFFSETS: &[(&str, i32)] = &[
    // UTC / GMT
    ("utc", 0),
    ("gmt", 0),
    // North America
    ("est", -5 * 60),
    ("edt", -4 * 60),
    ("cst", -6 * 60),
    ("cdt", -5 * 60),
    ("mst", -7 * 60),
    ("mdt", -6 * 60),
    ("pst", -8 * 60),
    ("pdt", -7 * 60),
    ("akst", -9 * 60),
    ("akdt", -8 * 60),
    ("hst", -10 * 60),
    // Europe
    ("wet", 0),
    ("west", 60),
    ("bst", 60),
    ("cet", 60),
    ("cest", 2 * 60),
    ("eet", 2 * 60),
    ("eest", 3 * 60),
    ("msk", 3 * 60),
    // Asia
    ("ist", 5 * 60 + 30),
    ("pkt", 5 * 60),
    ("npt", 5 * 60 + 45),
    ("ict", 7 * 60),
    ("sgt", 8 * 60),
    ("hkt", 8 * 60),
    ("jst", 9 * 60),
    ("kst", 9 * 60),
    ("gst", 4 * 60),
    // Australia / Pacific
    ("awst", 8 * 60),
    ("acst", 9 * 60 + 30),
    ("aest", 10 * 60),
    ("acdt", 10 * 60 + 30),
    ("aedt", 11 * 60),
    ("nzst", 12 * 60),
    ("nzdt", 13 * 60),
    // Africa
    ("wat", 60),
    ("cat", 2 * 60),
    ("sast", 2 * 60),
    ("eat", 3 * 60),
    // South America
    ("art", -3 * 60),
    ("brt", -3 * 60),
    ("clt", -4 * 60),
    ("vet", -4 * 60),
    ("cot", -5 * 60),
    ("pet", -5 * 60),
];

/// UTC offset for a zone name, case-insensitive. `utc`/`gmt` with an
/// embedded numeric suffix (`utc+3`, `gmt-5:30`) resolve too.
pub fn zone_offset_minutes(zone: &str) -> Option<i32> {
    let zone = zone.trim().to_ascii_lowercase();
    if let Some(&(_, offset)) = ZONE_OFFSETS.iter().find(|(name, _)| *name == zone) {
        return Some(offset);
    }
    for prefix in ["utc", "gmt"] {
        if let Some(rest) = zone.strip_prefix(prefix) {
            if rest.is_empty() {
                return Some(0);
            }
            return parse_offset_suffix(rest);
        }
    }
    None
}

/// Parse `+N`, `-N`, `+N:MM` or `+NMM` into minutes.
pub fn parse_offset_suffix(suffix: &str) -> Option<i32> {
    let (sign, digits) = match suffix.as_bytes().first()? {
        b'+' => (1, &suffix[1..]),
        b'-' => (-1, &suffix[1..]),
        _ => return None,
    };
    if let Some((hours, minutes)) = digits.split_once(':') {
        let hours: i32 = hours.parse().ok()?;
        let minutes: i32 = minutes.parse().ok()?;
        if hours > 14 || minutes > 59 {
            return None;
        }
        return Some(sign * (hours * 60 + minutes));
    }
    let value: i32 = digits.parse().ok()?;
    // Bare "+530" style means 5h30m; "+5" means 5h.
    let (hours, minutes) = if digits.len() > 2 {
        (value / 100, value % 100)
    } else {
        (value, 0)
    };
    if hours > 14 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 60 + minutes))
}

/// Canonical `GMT±N` label for an offset, used when the target zone is
/// derived from the machine clock and the name would be ambiguous.
pub fn offset_label(offset_minutes: i32) -> String {
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let abs = offset_minutes.abs();
    if abs % 60 == 0 {
        format!("GMT{}{}", sign, abs / 60)
    } else {
        format!("GMT{}{}:{:02}", sign, abs / 60, abs % 60)
    }
}

pub fn is_known_zone(zone: &str) -> bool {
    zone_offset_minutes(zone).is_some()
}
