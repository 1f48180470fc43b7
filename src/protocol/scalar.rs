//! Scalar codec
//!
//! Pure conversions between native scalar values and their wire text. No I/O
//! happens here; the frame reader and writer call into these functions.
//!
//! ## Encodings
//! - text: strict UTF-8
//! - double: shortest decimal with at least one fractional digit, or the
//!   `+inf` / `-inf` sentinels (`inf` is also accepted when decoding)
//! - timestamp: decimal seconds since 1970-01-01T00:00:00Z
//! - duration: decimal seconds

use std::time::{Duration, SystemTime, UNIX_EPOCH as SYSTEM_UNIX_EPOCH};

use crate::error::{Result, WireError};

/// Timestamp resolution: one tick is 100 nanoseconds
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// 1970-01-01T00:00:00Z expressed in ticks since 0001-01-01T00:00:00
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// Fractional digits carried by a tick count
const TICK_DIGITS: u32 = 7;

/// Fractional digits carried by a `Duration`
const NANO_DIGITS: u32 = 9;

const NANOS_PER_TICK: u32 = 100;

// =============================================================================
// Timestamp
// =============================================================================

/// An absolute point in time, counted in 100 ns ticks since 0001-01-01
///
/// The tick scale and epoch match other clients of the same protocol, so
/// values written by one can be read back by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    ticks: i64,
}

impl Timestamp {
    /// 1970-01-01T00:00:00Z
    pub const UNIX_EPOCH: Timestamp = Timestamp {
        ticks: UNIX_EPOCH_TICKS,
    };

    /// Build a timestamp from a raw tick count
    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    /// Raw tick count since 0001-01-01
    pub const fn ticks(self) -> i64 {
        self.ticks
    }

    /// Convert to a `SystemTime`, if the platform can represent it
    pub fn to_system_time(self) -> Option<SystemTime> {
        let delta = self.ticks as i128 - UNIX_EPOCH_TICKS as i128;
        let magnitude = ticks_to_duration(delta.unsigned_abs());
        if delta < 0 {
            SYSTEM_UNIX_EPOCH.checked_sub(magnitude)
        } else {
            SYSTEM_UNIX_EPOCH.checked_add(magnitude)
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let delta = match time.duration_since(SYSTEM_UNIX_EPOCH) {
            Ok(after) => duration_to_ticks(after),
            Err(before) => -duration_to_ticks(before.duration()),
        };
        let ticks = (UNIX_EPOCH_TICKS as i128 + delta).clamp(i64::MIN as i128, i64::MAX as i128);
        Self::from_ticks(ticks as i64)
    }
}

fn duration_to_ticks(duration: Duration) -> i128 {
    duration.as_secs() as i128 * TICKS_PER_SECOND as i128
        + (duration.subsec_nanos() / NANOS_PER_TICK) as i128
}

fn ticks_to_duration(ticks: u128) -> Duration {
    let per_second = TICKS_PER_SECOND as u128;
    let secs = (ticks / per_second).min(u64::MAX as u128) as u64;
    let nanos = (ticks % per_second) as u32 * NANOS_PER_TICK;
    Duration::new(secs, nanos)
}

// =============================================================================
// Text
// =============================================================================

/// Encode text for the wire
pub fn encode_str(text: &str) -> &[u8] {
    text.as_bytes()
}

/// Decode a wire payload as text
///
/// Invalid UTF-8 is reported, never replaced.
pub fn decode_str(raw: Vec<u8>) -> Result<String> {
    Ok(String::from_utf8(raw)?)
}

// =============================================================================
// Timestamps and Durations
// =============================================================================

/// Seconds since the Unix epoch, fractional ticks preserved
pub fn format_timestamp(timestamp: Timestamp) -> String {
    let delta = timestamp.ticks as i128 - UNIX_EPOCH_TICKS as i128;
    format_fixed(delta, TICK_DIGITS)
}

/// Parse seconds since the Unix epoch; digits finer than one tick are dropped
pub fn parse_timestamp(raw: &str) -> Result<Timestamp> {
    let out_of_range = || WireError::Format(format!("timestamp out of range: {:?}", raw));

    let ticks = parse_fixed(raw, TICK_DIGITS)?
        .checked_add(UNIX_EPOCH_TICKS as i128)
        .ok_or_else(out_of_range)?;
    i64::try_from(ticks)
        .map(Timestamp::from_ticks)
        .map_err(|_| out_of_range())
}

/// Whole or fractional seconds
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_secs() as i128 * 1_000_000_000 + duration.subsec_nanos() as i128;
    format_fixed(nanos, NANO_DIGITS)
}

/// Parse a non-negative number of seconds
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let nanos = parse_fixed(raw, NANO_DIGITS)?;
    if nanos < 0 {
        return Err(WireError::Format(format!("negative duration: {:?}", raw)));
    }

    let secs = u64::try_from(nanos / 1_000_000_000)
        .map_err(|_| WireError::Format(format!("duration out of range: {:?}", raw)))?;
    Ok(Duration::new(secs, (nanos % 1_000_000_000) as u32))
}

// =============================================================================
// Doubles
// =============================================================================

/// Format a double, never with fewer than one fractional digit
///
/// Finite values use the shortest decimal that parses back to the same
/// double, so `3.14159` goes out as `3.14159` rather than being rounded to a
/// single fractional digit like `3.1`.
pub fn format_double(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value.is_nan() {
        "nan".to_string()
    } else {
        let mut text = value.to_string();
        if !text.contains('.') {
            text.push_str(".0");
        }
        text
    }
}

/// Parse a double; `inf` and `+inf` both mean positive infinity
pub fn parse_double(raw: &str) -> Result<f64> {
    match raw {
        "inf" | "+inf" => Ok(f64::INFINITY),
        "-inf" => Ok(f64::NEG_INFINITY),
        _ => raw
            .parse::<f64>()
            .map_err(|e| WireError::Format(format!("invalid double {:?}: {}", raw, e))),
    }
}

// =============================================================================
// Fixed-point helpers
// =============================================================================

/// Render `value / 10^digits` as a decimal, trimming trailing fractional zeros
fn format_fixed(value: i128, digits: u32) -> String {
    let scale = 10u128.pow(digits);
    let magnitude = value.unsigned_abs();
    let sign = if value < 0 { "-" } else { "" };
    let whole = magnitude / scale;
    let fraction = magnitude % scale;

    if fraction == 0 {
        return format!("{}{}", sign, whole);
    }

    let mut fraction = format!("{:0width$}", fraction, width = digits as usize);
    while fraction.ends_with('0') {
        fraction.pop();
    }
    format!("{}{}.{}", sign, whole, fraction)
}

/// Parse a decimal into an integer scaled by `10^digits`, truncating the rest
fn parse_fixed(raw: &str, digits: u32) -> Result<i128> {
    let invalid = || WireError::Format(format!("invalid decimal: {:?}", raw));

    let (negative, unsigned) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let scale = 10i128.pow(digits);
    let mut value: i128 = 0;
    for b in whole.bytes() {
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add((b - b'0') as i128))
            .ok_or_else(invalid)?;
    }
    value = value.checked_mul(scale).ok_or_else(invalid)?;

    let mut place = scale;
    for b in fraction.bytes().take(digits as usize) {
        place /= 10;
        value = value
            .checked_add((b - b'0') as i128 * place)
            .ok_or_else(invalid)?;
    }

    Ok(if negative { -value } else { value })
}
