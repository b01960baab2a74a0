use hifitime::Epoch;
use std::str::FromStr;

use crate::odflow_errors::ParseDetectionError;

/// Split `s` on `sep` into exactly three integer components.
fn three_components<T: FromStr>(s: &str, sep: char) -> Option<(T, T, T)> {
    let mut parts = s.trim().split(sep);
    let a = T::from_str(parts.next()?.trim()).ok()?;
    let b = T::from_str(parts.next()?.trim()).ok()?;
    let c = T::from_str(parts.next()?.trim()).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((a, b, c))
}

/// Build a UTC epoch from a date field (`YYYY-MM-DD`) and a time field (`HH:MM:SS`).
///
/// Arguments
/// ---------
/// * `date_str`: the date column of a raw record
/// * `time_str`: the time column of a raw record
/// * `date_sep`: separator between year, month and day
/// * `time_sep`: separator between hour, minute and second
///
/// Return
/// ------
/// * the epoch in the UTC time scale, with second resolution
/// * a [`ParseDetectionError`] naming the malformed field otherwise
pub fn date_time_to_epoch(
    date_str: &str,
    time_str: &str,
    date_sep: char,
    time_sep: char,
) -> Result<Epoch, ParseDetectionError> {
    let (year, month, day) = three_components::<i32>(date_str, date_sep)
        .ok_or_else(|| ParseDetectionError::InvalidDate(date_str.to_string()))?;
    let (hour, minute, second) = three_components::<u8>(time_str, time_sep)
        .ok_or_else(|| ParseDetectionError::InvalidTime(time_str.to_string()))?;

    let month = u8::try_from(month)
        .map_err(|_| ParseDetectionError::InvalidDate(date_str.to_string()))?;
    let day =
        u8::try_from(day).map_err(|_| ParseDetectionError::InvalidDate(date_str.to_string()))?;

    Epoch::maybe_from_gregorian_utc(year, month, day, hour, minute, second, 0).map_err(|_| {
        ParseDetectionError::InvalidDateTime(format!("{} {}", date_str.trim(), time_str.trim()))
    })
}
