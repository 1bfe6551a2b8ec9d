//! Date/time normalization against a caller-supplied UTC offset.
//!
//! The canonical zoned wire representation is RFC 3339. Unqualified
//! timestamps (`YYYY-MM-DDTHH:MM:SS[.sss]`) are anchored to the call's
//! UTC offset on input, unless strict qualification is requested.

use crate::error::CodecError;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub(crate) fn offset_from_minutes(minutes: i32) -> UtcOffset {
    UtcOffset::from_whole_seconds(minutes.saturating_mul(60)).unwrap_or(UtcOffset::UTC)
}

/// Format a date/time value as RFC 3339 at the given UTC offset.
pub fn format(value: &OffsetDateTime, utc_offset_minutes: i32) -> Result<String, CodecError> {
    value
        .to_offset(offset_from_minutes(utc_offset_minutes))
        .format(&Rfc3339)
        .map_err(|err| CodecError::Format(format!("cannot format datetime: {}", err)))
}

/// Parse a date/time string.
///
/// A string with an explicit zone qualifier parses as-is. A string
/// without one is anchored at `utc_offset_minutes`, or rejected when
/// `strict` is set. Anything else is malformed.
pub fn parse(text: &str, utc_offset_minutes: i32, strict: bool) -> Result<OffsetDateTime, CodecError> {
    if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(value);
    }

    let unqualified =
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]");
    match PrimitiveDateTime::parse(text, unqualified) {
        Ok(value) => {
            if strict {
                Err(CodecError::Format(format!(
                    "datetime '{}' lacks an explicit zone qualifier",
                    text
                )))
            } else {
                Ok(value.assume_offset(offset_from_minutes(utc_offset_minutes)))
            }
        }
        Err(_) => Err(CodecError::Format(format!("invalid datetime: '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_datetimes_parse_in_either_mode() {
        let strict = parse("2024-03-01T12:30:00+05:30", 0, true).unwrap();
        let lax = parse("2024-03-01T12:30:00+05:30", 0, false).unwrap();
        assert_eq!(strict, lax);
        assert_eq!(strict.offset().whole_minutes(), 330);
    }

    #[test]
    fn unqualified_datetimes_anchor_to_the_call_offset() {
        let value = parse("2024-03-01T12:30:00", 120, false).unwrap();
        assert_eq!(value.offset().whole_minutes(), 120);
        assert_eq!(value.hour(), 12);
    }

    #[test]
    fn strict_mode_rejects_unqualified_datetimes() {
        let err = parse("2024-03-01T12:30:00", 0, true).unwrap_err();
        assert!(matches!(err, CodecError::Format(_)));
    }

    #[test]
    fn garbage_is_malformed_in_either_mode() {
        assert!(parse("yesterday", 0, false).is_err());
        assert!(parse("2024-03-01", 0, false).is_err());
    }

    #[test]
    fn format_re_offsets_to_the_requested_zone() {
        let value = parse("2024-03-01T12:00:00Z", 0, true).unwrap();
        let text = format(&value, 60).unwrap();
        assert_eq!(text, "2024-03-01T13:00:00+01:00");
    }
}
