//! Timestamp encoding for OPML date fields.
//!
//! OPML mandates RFC 822/1123 dates, but some feed readers (NewsBlur) emit a
//! space-separated date-time with microseconds instead. Decoding tries exactly
//! these two formats in order; everything is interpreted in GMT.

use chrono::{DateTime, NaiveDateTime, Utc, Weekday};

use crate::error::OpmlError;

/// Label of the reference timezone written after every encoded timestamp.
pub const REFERENCE_ZONE: &str = "GMT";

/// RFC 1123 after the weekday and zone label are split off. `%.f` also
/// accepts an optional fraction.
const RFC1123_BODY: &str = "%d %b %Y %H:%M:%S%.f";

/// Encoding never writes sub-second precision.
const RFC1123_GMT_OUT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Fallback used by NewsBlur exports: `2024-11-07 20:18:01.109756`.
const DATETIME_MICRO: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Renders a timestamp as RFC 1123 text in GMT, e.g. `Mon, 27 Feb 2006 12:09:48 GMT`.
///
/// Callers decide whether a timestamp is present; this never sees an absent one.
pub fn encode(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(RFC1123_GMT_OUT).to_string()
}

/// Parses an OPML timestamp.
///
/// Attempts, in order:
/// 1. RFC 1123 (optional fractional seconds), interpreted as GMT
/// 2. `YYYY-MM-DD hh:mm:ss.ffffff`, interpreted as GMT
///
/// # Errors
///
/// Returns [`OpmlError::MalformedTimestamp`] carrying the original text and the
/// error from the last attempt when no format matches.
pub fn decode(value: &str) -> Result<DateTime<Utc>, OpmlError> {
    if let Some(naive) = parse_rfc1123(value) {
        return Ok(naive.and_utc());
    }

    NaiveDateTime::parse_from_str(value, DATETIME_MICRO)
        .map(|naive| naive.and_utc())
        .map_err(|source| OpmlError::MalformedTimestamp {
            value: value.to_string(),
            source,
        })
}

/// RFC 1123 as OPML producers write it.
///
/// The weekday must be a valid abbreviation but is not checked against the
/// date. The zone label may be any alphabetic abbreviation and carries no
/// offset: the reference zone is the only one understood.
fn parse_rfc1123(value: &str) -> Option<NaiveDateTime> {
    let (weekday, rest) = value.split_once(", ")?;
    if weekday.len() != 3 || weekday.parse::<Weekday>().is_err() {
        return None;
    }

    let (datetime, zone) = rest.rsplit_once(' ')?;
    if zone.is_empty() || !zone.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }

    NaiveDateTime::parse_from_str(datetime, RFC1123_BODY).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_decode_rfc1123() {
        let got = decode("Mon, 27 Feb 2006 12:09:48 GMT").unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2006, 2, 27, 12, 9, 48).unwrap());
    }

    #[test]
    fn test_decode_newsblur_matches_rfc1123_with_fraction() {
        let rfc = decode("Thu, 07 Nov 2024 20:18:01.109756 GMT").unwrap();
        let micro = decode("2024-11-07 20:18:01.109756").unwrap();

        assert_eq!(rfc, micro);
        assert_eq!(micro.nanosecond(), 109_756_000);
    }

    #[test]
    fn test_decode_ignores_wrong_weekday() {
        // 27 Feb 2006 was a Monday
        let got = decode("Tue, 27 Feb 2006 12:09:48 GMT").unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2006, 2, 27, 12, 9, 48).unwrap());
    }

    #[test]
    fn test_decode_rejects_bad_weekday_name() {
        assert!(decode("Xyz, 27 Feb 2006 12:09:48 GMT").is_err());
        assert!(decode("27 Feb 2006 12:09:48 GMT").is_err());
    }

    #[test]
    fn test_decode_zone_abbreviation_has_no_offset() {
        let got = decode("Mon, 27 Feb 2006 12:09:48 EST").unwrap();
        assert_eq!(got, Utc.with_ymd_and_hms(2006, 2, 27, 12, 9, 48).unwrap());
    }

    #[test]
    fn test_decode_rejects_numeric_offset() {
        assert!(decode("Mon, 27 Feb 2006 14:09:48 +0200").is_err());
    }

    #[test]
    fn test_decode_rejects_unknown_format() {
        let err = decode("not-a-date").unwrap_err();
        match err {
            OpmlError::MalformedTimestamp { value, .. } => assert_eq!(value, "not-a-date"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_iso8601() {
        assert!(decode("2006-02-27T12:09:48Z").is_err());
    }

    #[test]
    fn test_encode_rfc1123() {
        let t = Utc.with_ymd_and_hms(2005, 10, 31, 19, 23, 0).unwrap();
        assert_eq!(encode(&t), "Mon, 31 Oct 2005 19:23:00 GMT");
    }

    #[test]
    fn test_encode_drops_fraction() {
        let t = decode("2024-11-07 20:18:01.109756").unwrap();
        assert_eq!(encode(&t), "Thu, 07 Nov 2024 20:18:01 GMT");
    }

    #[test]
    fn test_encode_then_decode_whole_seconds() {
        let t = Utc.with_ymd_and_hms(2024, 1, 5, 3, 4, 5).unwrap();
        assert_eq!(decode(&encode(&t)).unwrap(), t);
    }
}
