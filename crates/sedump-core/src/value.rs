//! Attribute value conversions shared by every entity decoder.
//!
//! Timestamps in the dumps look like `2014-01-05T23:09:19.420`: no offset,
//! fraction optional, at most millisecond precision. They are kept as
//! [`NaiveDateTime`] and never converted to a zone.

use chrono::{NaiveDateTime, Timelike};

use crate::{Error, Result};

/// `strftime` pattern used when timestamps are written back out.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

const BASE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// `d` marks a digit; every other byte must match exactly.
const BASE_SHAPE: &[u8] = b"dddd-dd-ddTdd:dd:dd";

/// Parse a dump timestamp, `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<NaiveDateTime> {
  let invalid = |reason: &str| Error::InvalidField {
    field,
    value: raw.to_owned(),
    reason: reason.to_owned(),
  };

  let (base, fraction) = match raw.split_once('.') {
    Some((base, fraction)) => (base, Some(fraction)),
    None => (raw, None),
  };

  let shaped = base.len() == BASE_SHAPE.len()
    && base.bytes().zip(BASE_SHAPE).all(|(b, &want)| match want {
      b'd' => b.is_ascii_digit(),
      sep => b == sep,
    });
  if !shaped {
    return Err(invalid("expected YYYY-MM-DDTHH:MM:SS[.fff]"));
  }
  // chrono reads `:60` as a leap second, which `with_nanosecond` would fold
  // back into :59.
  if &base[17..] > "59" {
    return Err(invalid("seconds out of range"));
  }

  let parsed = NaiveDateTime::parse_from_str(base, BASE_FORMAT)
    .map_err(|e| invalid(&e.to_string()))?;

  let Some(fraction) = fraction else {
    return Ok(parsed);
  };

  if fraction.is_empty()
    || fraction.len() > 3
    || !fraction.bytes().all(|b| b.is_ascii_digit())
  {
    return Err(invalid("fraction must be one to three digits"));
  }

  let mut millis: u32 = fraction.parse().map_err(|_| invalid("bad fraction"))?;
  for _ in fraction.len()..3 {
    millis *= 10;
  }

  parsed
    .with_nanosecond(millis * 1_000_000)
    .ok_or_else(|| invalid("fraction out of range"))
}

/// Render a timestamp with exactly three fraction digits.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
  ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_int(field: &'static str, raw: &str) -> Result<i64> {
  raw.parse().map_err(|e: std::num::ParseIntError| Error::InvalidField {
    field,
    value: raw.to_owned(),
    reason: e.to_string(),
  })
}

/// Accepts the usual spellings: `1 t T TRUE true True` and their negatives.
pub fn parse_bool(field: &'static str, raw: &str) -> Result<bool> {
  match raw {
    "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
    "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
    _ => Err(Error::InvalidField {
      field,
      value: raw.to_owned(),
      reason: "not a boolean".to_owned(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  fn ts(raw: &str) -> Result<NaiveDateTime> { parse_timestamp("CreationDate", raw) }

  #[test]
  fn timestamp_with_millis() {
    let expected = NaiveDate::from_ymd_opt(2014, 1, 5)
      .unwrap()
      .and_hms_milli_opt(23, 9, 19, 420)
      .unwrap();
    assert_eq!(ts("2014-01-05T23:09:19.420").unwrap(), expected);
  }

  #[test]
  fn timestamp_without_fraction() {
    let parsed = ts("2010-07-28T19:04:21").unwrap();
    assert_eq!(parsed.nanosecond(), 0);
    assert_eq!(parsed.second(), 21);
  }

  #[test]
  fn short_fraction_is_scaled_to_millis() {
    assert_eq!(ts("2010-07-28T19:04:21.4").unwrap().nanosecond(), 400_000_000);
    assert_eq!(ts("2010-07-28T19:04:21.04").unwrap().nanosecond(), 40_000_000);
  }

  #[test]
  fn date_only_is_rejected() {
    let err = ts("2014-01-05").unwrap_err();
    assert_eq!(err.field(), "CreationDate");
  }

  #[test]
  fn malformed_timestamps_are_rejected() {
    for raw in [
      "",
      "2014-01-05 23:09:19",
      "2014-01-05T23:09:19.",
      "2014-01-05T23:09:19.1234",
      "2014-01-05T23:09:19Z",
      "2014-01-05T23:09:19+01:00",
      "2014-13-05T23:09:19",
      "2014-1-5T23:09:19.000",
      "2014-01-05T23:09:19.4a",
      "2014-01-05T23:59:60",
      "2014-01-05T23:59:60.500",
      " 2014-1-05T23:09:19",
      "+014-01-05T23:09:19",
      "2014-01-05t23:09:19",
      "2014/01/05T23:09:19",
      "２014-01-05T23:09:19",
    ] {
      assert!(ts(raw).is_err(), "{raw:?} should not parse");
    }
  }

  #[test]
  fn format_round_trips_millis() {
    let parsed = ts("2014-01-05T23:09:19.42").unwrap();
    assert_eq!(format_timestamp(&parsed), "2014-01-05T23:09:19.420");
  }

  #[test]
  fn ints() {
    assert_eq!(parse_int("Views", "42").unwrap(), 42);
    assert_eq!(parse_int("Views", "-1").unwrap(), -1);
    assert!(parse_int("Views", "").is_err());
    assert!(parse_int("Views", "4.2").is_err());
  }

  #[test]
  fn bools() {
    assert!(parse_bool("TagBased", "True").unwrap());
    assert!(!parse_bool("TagBased", "False").unwrap());
    assert!(parse_bool("TagBased", "1").unwrap());
    assert!(parse_bool("TagBased", "yes").is_err());
  }
}
