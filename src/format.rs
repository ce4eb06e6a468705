//! Duration display helpers.

use crate::error::{Result, TimerError};

/// Unit ratios from milliseconds up to hours: ms per s, s per min, min per h.
const MS_TO_HOURS: [u64; 3] = [1000, 60, 60];

/// Split `amount` of the smallest unit into successively larger units.
///
/// Each ratio is the number of the previous unit that make up the next one.
/// The result holds one remainder per ratio, smallest unit first, followed by
/// whatever is left over in the largest unit.
pub fn break_into_units(ratios_small_to_large: &[u64], amount: u64) -> Vec<u64> {
    let mut units = Vec::with_capacity(ratios_small_to_large.len() + 1);
    let mut carried = amount;
    for &ratio in ratios_small_to_large {
        units.push(carried % ratio);
        carried /= ratio;
    }
    units.push(carried);
    units
}

/// Decompose milliseconds into `[seconds, minutes, hours]`, dropping the
/// sub-second remainder.
pub fn ms_to_sec_min_hrs(ms: u64) -> [u64; 3] {
    let units = break_into_units(&MS_TO_HOURS, ms);
    [units[1], units[2], units[3]]
}

/// Left-pad `n` with zeros to at least `width` digits.
pub fn zero_pad(n: u64, width: usize) -> String {
    format!("{:0width$}", n, width = width)
}

/// Render milliseconds as `H:MM:SS`. Hours are not padded and may run past
/// two digits.
pub fn format_duration(ms: u64) -> String {
    let [secs, mins, hrs] = ms_to_sec_min_hrs(ms);
    format!("{}:{}:{}", hrs, zero_pad(mins, 2), zero_pad(secs, 2))
}

/// Like [`format_duration`], for callers holding a signed difference.
/// Negative input means a clock or arithmetic error upstream and is rejected.
pub fn format_signed_duration(ms: i64) -> Result<String> {
    u64::try_from(ms)
        .map(format_duration)
        .map_err(|_| TimerError::NegativeDuration(ms))
}
