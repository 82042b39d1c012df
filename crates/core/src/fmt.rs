//! Number and time formatting for the rendered feeds.
//!
//! Float-to-decimal `format!` has had wasm-facing panics on some
//! toolchain/browser combinations, so the number helpers avoid formatting
//! floats directly: finite values are scaled and rounded into an integer first,
//! then the integer parts are formatted. Only values past `u64` range go
//! through `{:.0}`.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

use crate::model::Timestamp;

/// Most fraction digits a grouped number shows (matches `toLocaleString`).
const GROUPED_DECIMALS: u32 = 3;
const PLAIN_DECIMALS: u32 = 6;

/// Epoch values above this are taken to be milliseconds.
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

/// Formats `v` with `,` thousands separators and at most three fraction
/// digits, trailing zeros dropped: `1234567.5` → `"1,234,567.5"`.
pub fn fmt_number_grouped(v: f64) -> String {
    fmt_number(v, GROUPED_DECIMALS, true)
}

/// Formats `v` without grouping: `1520.0` → `"1520"`, `12.25` → `"12.25"`.
pub fn fmt_number_plain(v: f64) -> String {
    fmt_number(v, PLAIN_DECIMALS, false)
}

fn fmt_number(v: f64, decimals: u32, grouped: bool) -> String {
    if !v.is_finite() {
        return if v.is_nan() {
            "NaN".to_string()
        } else if v.is_sign_positive() {
            "∞".to_string()
        } else {
            "-∞".to_string()
        };
    }

    let scale = 10_u64.pow(decimals);
    let scaled = (v.abs() * scale as f64).round();
    // Past u64 range there is no fraction left to show; print the exact
    // integer digits.
    if scaled >= u64::MAX as f64 {
        let int_part = format!("{:.0}", v.abs().trunc());
        return finish(v < 0.0, &int_part, "", grouped);
    }

    let scaled = scaled as u64;
    let int_part = scaled / scale;
    let frac_part = scaled % scale;

    let mut frac = String::new();
    if frac_part > 0 {
        frac = format!("{:0width$}", frac_part, width = decimals as usize);
        while frac.ends_with('0') {
            frac.pop();
        }
    }

    // `-0.0004` rounds to zero and prints unsigned.
    let negative = v < 0.0 && scaled > 0;
    finish(negative, &int_part.to_string(), &frac, grouped)
}

fn finish(negative: bool, int_digits: &str, frac: &str, grouped: bool) -> String {
    let mut out = String::with_capacity(int_digits.len() + frac.len() + 8);
    if negative {
        out.push('-');
    }
    if grouped {
        out.push_str(&group_digits(int_digits));
    } else {
        out.push_str(int_digits);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Inserts `,` every three digits from the right of a plain digit string.
pub fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Resolves a message timestamp to wall-clock time in `offset`.
pub fn wall_clock(ts: &Timestamp, offset: FixedOffset) -> Option<NaiveDateTime> {
    match ts {
        Timestamp::Epoch(v) => {
            if !v.is_finite() {
                return None;
            }
            let millis = if v.abs() >= EPOCH_MILLIS_THRESHOLD {
                v.round() as i64
            } else {
                (v * 1000.0).round() as i64
            };
            let utc = DateTime::from_timestamp_millis(millis)?;
            Some(offset.from_utc_datetime(&utc.naive_utc()).naive_local())
        }
        Timestamp::Iso(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&offset).naive_local());
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
                .ok()
        }
        Timestamp::Other(_) => None,
    }
}

/// en-US style local time: `"3:04:05 PM"`; `"Invalid Date"` when missing or
/// unparsable.
pub fn fmt_time_of_day(ts: Option<&Timestamp>, offset: FixedOffset) -> String {
    match ts.and_then(|ts| wall_clock(ts, offset)) {
        Some(t) => t.format("%-I:%M:%S %p").to_string(),
        None => "Invalid Date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn grouped_numbers_match_locale_style() {
        assert_eq!(fmt_number_grouped(500.0), "500");
        assert_eq!(fmt_number_grouped(1000.0), "1,000");
        assert_eq!(fmt_number_grouped(1234567.0), "1,234,567");
        assert_eq!(fmt_number_grouped(-98765.4321), "-98,765.432");
        assert_eq!(fmt_number_grouped(0.5), "0.5");
        assert_eq!(fmt_number_grouped(-0.0001), "0");
        assert_eq!(fmt_number_grouped(f64::NAN), "NaN");
    }

    #[test]
    fn plain_numbers_drop_trailing_zeros() {
        assert_eq!(fmt_number_plain(1520.0), "1520");
        assert_eq!(fmt_number_plain(12.25), "12.25");
        assert_eq!(fmt_number_plain(0.0), "0");
    }

    #[test]
    fn group_digits_handles_short_strings() {
        assert_eq!(group_digits(""), "");
        assert_eq!(group_digits("12"), "12");
        assert_eq!(group_digits("123"), "123");
        assert_eq!(group_digits("1234"), "1,234");
    }

    #[test]
    fn naive_iso_is_already_local() {
        let ts = Timestamp::Iso("2024-05-01T15:04:05.123456".into());
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(fmt_time_of_day(Some(&ts), plus_two), "3:04:05 PM");
    }

    #[test]
    fn offset_iso_and_epoch_are_converted() {
        let ts = Timestamp::Iso("2024-05-01T10:00:00Z".into());
        let minus_five = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(fmt_time_of_day(Some(&ts), minus_five), "5:00:00 AM");

        // 2024-05-01T00:00:09Z
        let secs = Timestamp::Epoch(1_714_521_609.0);
        assert_eq!(fmt_time_of_day(Some(&secs), utc()), "12:00:09 AM");
        let millis = Timestamp::Epoch(1_714_521_609_000.0);
        assert_eq!(fmt_time_of_day(Some(&millis), utc()), "12:00:09 AM");
    }

    #[test]
    fn unparsable_timestamp_is_reported() {
        let ts = Timestamp::Iso("yesterday".into());
        assert_eq!(fmt_time_of_day(Some(&ts), utc()), "Invalid Date");
        assert_eq!(fmt_time_of_day(None, utc()), "Invalid Date");
        let odd = Timestamp::Other(serde_json::Value::Bool(true));
        assert_eq!(fmt_time_of_day(Some(&odd), utc()), "Invalid Date");
    }

    #[test]
    fn huge_values_keep_their_digits() {
        let plain = fmt_number_plain(1e40);
        assert_eq!(plain.len(), 41);
        assert!(plain.starts_with("1000000000000000"));

        let negative = fmt_number_plain(-1e300);
        assert_eq!(negative.len(), 302);
        assert!(negative.starts_with("-1000000000000000"));

        let grouped = fmt_number_grouped(1e40);
        assert!(grouped.starts_with("10,000,000,000,000,000,"));
        assert_eq!(grouped.replace(',', ""), plain);
    }
}
