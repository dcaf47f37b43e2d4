use std::fmt;
use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{DomainError, DomainResult};

const FIELD: &str = "record date";
const FIRST_YEAR: i32 = 2000;
const LAST_YEAR: i32 = 2999;
const DISPLAY_FORMAT: &str = "%d/%m/%Y at %H:%M";
const DB_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Minute-precision timestamp of an observation, between
/// `01/01/2000 00:00` and `31/12/2999 23:59` inclusive.
///
/// Build one with [`RecordDate::create`] or [`RecordDate::parse`]; the inner value is
/// private:
///
/// ```compile_fail
/// let date = sw_core::RecordDate { value: chrono::NaiveDateTime::MIN };
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordDate {
    value: NaiveDateTime,
}

impl RecordDate {
    /// Read a user-entered `dd/mm/yyyy HH:MM` timestamp (24-hour clock).
    pub fn create(text: &str) -> DomainResult<Self> {
        let malformed = || parse_error(text, "expected `dd/mm/yyyy HH:MM`");
        let (date, time) = text.split_once(' ').ok_or_else(malformed)?;
        let [day, month, year] =
            numeric_fields(date, '/', [1..=2, 1..=2, 4..=4]).ok_or_else(malformed)?;
        let [hour, minute] = numeric_fields(time, ':', [1..=2, 1..=2]).ok_or_else(malformed)?;

        let year = i32::try_from(year).map_err(|_| parse_error(text, "year is too large"))?;
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| parse_error(text, "not a calendar date"))?;
        let value = date
            .and_hms_opt(hour, minute, 0)
            .ok_or_else(|| parse_error(text, "not a time of day"))?;
        Self::from_datetime(value)
    }

    /// Read a service timestamp such as `2023-12-08T12:20:00+01:00`.
    ///
    /// The offset is dropped and the wall-clock time kept as-is; seconds are discarded.
    pub fn parse(text: &str) -> DomainResult<Self> {
        let (date, time) = text
            .split_once('T')
            .ok_or_else(|| parse_error(text, "expected `yyyy-mm-ddTHH:MM:SS`"))?;
        let time = time
            .find(['+', '-', 'Z'])
            .map_or(time, |offset| &time[..offset]);
        let time = time.split_once('.').map_or(time, |(whole, _)| whole);

        let local = format!("{date}T{time}");
        let value = NaiveDateTime::parse_from_str(&local, "%Y-%m-%dT%H:%M:%S")
            .or_else(|_| NaiveDateTime::parse_from_str(&local, DB_FORMAT))
            .map_err(|_| parse_error(text, "expected `yyyy-mm-ddTHH:MM:SS`"))?;
        Self::from_datetime(value)
    }

    /// Wrap a timestamp, truncating it to the minute and checking the era.
    pub fn from_datetime(value: NaiveDateTime) -> DomainResult<Self> {
        let value = value
            .with_second(0)
            .and_then(|value| value.with_nanosecond(0))
            .ok_or_else(|| parse_error(&value.to_string(), "not a time of day"))?;
        if !(FIRST_YEAR..=LAST_YEAR).contains(&value.year()) {
            return Err(DomainError::OutOfRange {
                field: FIELD,
                value: value.format(DISPLAY_FORMAT).to_string(),
                min: "01/01/2000 at 00:00".into(),
                max: "31/12/2999 at 23:59".into(),
            });
        }
        Ok(Self { value })
    }

    /// Human rendering, `dd/mm/yyyy at HH:MM`.
    pub fn value(&self) -> String {
        self.value.format(DISPLAY_FORMAT).to_string()
    }

    /// Service rendering, `yyyy-mm-ddTHH:MM`.
    pub fn db_date(&self) -> String {
        self.value.format(DB_FORMAT).to_string()
    }

    /// The underlying wall-clock timestamp.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.value
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value.format(DISPLAY_FORMAT))
    }
}

fn parse_error(input: &str, reason: &'static str) -> DomainError {
    DomainError::Parse {
        field: FIELD,
        input: input.to_string(),
        reason,
    }
}

/// Split `text` on `separator` into exactly `N` runs of ASCII digits, each within its width.
fn numeric_fields<const N: usize>(
    text: &str,
    separator: char,
    widths: [RangeInclusive<usize>; N],
) -> Option<[u32; N]> {
    let mut fields = [0; N];
    let mut pieces = text.split(separator);
    for (field, width) in fields.iter_mut().zip(widths) {
        let piece = pieces.next()?;
        if !width.contains(&piece.len()) || !piece.bytes().all(|byte| byte.is_ascii_digit()) {
            return None;
        }
        *field = piece.parse().ok()?;
    }
    if pieces.next().is_some() {
        return None;
    }
    Some(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, ValidationKind};

    #[test]
    fn create_renders_both_formats() {
        let cases = [
            ("09/09/2000 15:34", "09/09/2000 at 15:34", "2000-09-09T15:34"),
            ("01/01/2000 00:00", "01/01/2000 at 00:00", "2000-01-01T00:00"),
            ("31/12/2999 23:59", "31/12/2999 at 23:59", "2999-12-31T23:59"),
            ("29/02/2000 10:00", "29/02/2000 at 10:00", "2000-02-29T10:00"),
        ];
        for (input, value, db_date) in cases {
            let date = RecordDate::create(input).unwrap();
            assert_eq!(date.value(), value);
            assert_eq!(date.to_string(), value);
            assert_eq!(date.db_date(), db_date);
        }
    }

    #[test]
    fn create_rejects_impossible_dates_and_times() {
        for input in [
            "29/02/2001 10:00",
            "31/11/2000 10:00",
            "30/11/2000 25:00",
            "30/11/2000 10:60",
            "a",
            "",
            " ",
            "30/11/2000",
            "30/11/2000 10:00:00",
            "2000/11/30 10:00",
            "30-11-2000 10:00",
            "aa/11/2000 10:00",
            "+5/+1/2000 +9:+0",
            "0005/001/02000 009:0000",
            "5/1/200 9:00",
            "5/1/2000 9:",
            " 5/1/2000 9:00",
        ] {
            let err = RecordDate::create(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "input {input:?}");
        }
    }

    #[test]
    fn create_accepts_single_digit_components() {
        let date = RecordDate::create("5/1/2000 9:0").unwrap();
        assert_eq!(date.value(), "05/01/2000 at 09:00");
    }

    #[test]
    fn create_rejects_dates_outside_the_era() {
        for input in ["31/12/1999 10:00", "01/01/3000 10:00", "31/12/1999 23:59"] {
            let err = RecordDate::create(input).unwrap_err();
            assert_eq!(
                err.validation_kind(),
                Some(ValidationKind::OutOfRange),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn parse_discards_offset_and_seconds() {
        let date = RecordDate::parse("2023-12-08T12:20:00+01:00").unwrap();
        assert_eq!(date.value(), "08/12/2023 at 12:20");
        assert_eq!(date.db_date(), "2023-12-08T12:20");

        let date = RecordDate::parse("2022-10-20T14:54:37-05:00").unwrap();
        assert_eq!(date.value(), "20/10/2022 at 14:54");

        let date = RecordDate::parse("2022-10-20T14:54:37.125Z").unwrap();
        assert_eq!(date.db_date(), "2022-10-20T14:54");

        let date = RecordDate::parse("2022-10-20T14:54").unwrap();
        assert_eq!(date.value(), "20/10/2022 at 14:54");
    }

    #[test]
    fn parse_rejects_malformed_text() {
        for input in ["a", "", "2023-13-08T12:20:00+01:00", "08/12/2023 12:20"] {
            let err = RecordDate::parse(input).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Parse, "input {input:?}");
        }
        let err = RecordDate::parse("1999-12-31T23:59:00+01:00").unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::OutOfRange));
    }

    #[test]
    fn ordering_is_chronological() {
        let march = RecordDate::parse("2023-03-01T00:00:00+01:00").unwrap();
        let january = RecordDate::parse("2023-01-01T00:00:00+01:00").unwrap();
        assert!(january < march);
    }

    #[test]
    fn from_datetime_truncates_seconds() {
        let value = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 45)
            .unwrap();
        let date = RecordDate::from_datetime(value).unwrap();
        assert_eq!(date.as_datetime().second(), 0);
        assert_eq!(date.db_date(), "2024-05-01T08:30");
    }
}
