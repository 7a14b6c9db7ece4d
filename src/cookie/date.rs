//! Dates in cookies arrive in one of several historical formats.
//!
//! The input is trimmed and lower-cased, then matched against each of the following grammars in
//! turn. The first grammar that both matches and yields valid numeric fields wins.
//!
//! ```text
//! iso-8601  = year "-" month "-" day ( "t" / 1*SP ) hms [ "." 1*DIGIT ] [ zone ]
//! zone      = 1*SP "utc" / "z" / ( "+" / "-" ) 1*( DIGIT / ":" )
//! rfc-1123  = weekday [ "," ] 1*SP day 1*SP month 1*SP year 1*SP hms 1*SP "gmt"
//! rfc-850   = weekday [ "," ] 1*SP day "-" month "-" year 1*SP hms 1*SP "gmt"
//! asctime   = weekday [ "," ] 1*SP month 1*SP day 1*SP hms 1*SP 4DIGIT
//! weekday   = 3*word
//! month     = 3*word
//! hms       = 2DIGIT ":" 2DIGIT ":" 2DIGIT
//! ```
//!
//! The zone suffix of the ISO-8601 form is accepted but ignored. Every date is read as UTC.

use error::parser::*;
use regex::{Captures, Regex};
use time::{at_utc, Timespec, Tm};

use super::parse::{is_space, parse_int_prefix};

/// Month abbreviations, indexed by zero-based month number.
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Largest distance from the epoch, in seconds, that a parsed date may have.
const MAX_EPOCH_OFFSET: i64 = 8_640_000_000_000;

/// Fields larger than this are rejected before any arithmetic is done on them.
const MAX_FIELD: i64 = 1_000_000_000;

/// A date format and the capture groups holding each of its fields.
struct Grammar {
    name: &'static str,
    matcher: Regex,
    /// Capture indices of the year, month, day, hour, minute and second.
    fields: [usize; 6],
}

impl Grammar {
    fn new(name: &'static str, pattern: &str, fields: [usize; 6]) -> Grammar {
        Grammar {
            name: name,
            matcher: Regex::new(pattern).expect("date grammar must compile"),
            fields: fields,
        }
    }

    /// Convert a match of this grammar into a time.
    fn extract(&self, captures: &Captures) -> Result<Tm> {
        let field = |index: usize| captures.get(self.fields[index]).map_or("", |m| m.as_str());

        let year = decode_number(field(0))?;
        let month = decode_month(field(1))?;
        let day = decode_number(field(2))?;
        let hour = decode_number(field(3))?;
        let minute = decode_number(field(4))?;
        let second = decode_number(field(5))?;

        let seconds = epoch_seconds(year, month, day, hour, minute, second);
        ensure!(
            seconds.abs() <= MAX_EPOCH_OFFSET,
            ErrorKind::InvalidDate(captures[0].to_string())
        );

        Ok(at_utc(Timespec::new(seconds, 0)))
    }
}

lazy_static! {
    static ref GRAMMARS: [Grammar; 4] = [
        Grammar::new(
            "iso-8601",
            r"^([0-9]{4})-([0-9]{2})-([0-9]{2})(?:t| +)([0-9]{2}):([0-9]{2}):([0-9]{2})(?:\.[0-9]+)?(?: +utc|z|[+\-][0-9:]+)?$",
            [1, 2, 3, 4, 5, 6],
        ),
        Grammar::new(
            "rfc-1123",
            r"^[0-9a-z_]{3,},? +([0-9]+) +([0-9a-z_]{3,}) +([0-9]+) +([0-9]{2}):([0-9]{2}):([0-9]{2}) +gmt$",
            [3, 2, 1, 4, 5, 6],
        ),
        Grammar::new(
            "rfc-850",
            r"^[0-9a-z_]{3,},? +([0-9]+)-([0-9a-z_]{3,})-([0-9]+) +([0-9]{2}):([0-9]{2}):([0-9]{2}) +gmt$",
            [3, 2, 1, 4, 5, 6],
        ),
        Grammar::new(
            "asctime",
            r"^[0-9a-z_]{3,},? +([0-9a-z_]{3,}) +([0-9]+) +([0-9]{2}):([0-9]{2}):([0-9]{2}) +([0-9]{4})$",
            [6, 1, 2, 3, 4, 5],
        ),
    ];
}

/// Parse a date string into a UTC time.
///
/// Returns `None` if no grammar accepts the string.
pub fn parse(source: &str) -> Option<Tm> {
    let source = source.trim_matches(is_space).to_lowercase();

    for grammar in GRAMMARS.iter() {
        if let Some(captures) = grammar.matcher.captures(&source) {
            match grammar.extract(&captures) {
                Ok(time) => return Some(time),
                Err(error) => {
                    debug!("{} date {:?} rejected: {}", grammar.name, source, error);
                }
            }
        }
    }

    None
}

/// Decode a field that the grammar already restricted to digits.
fn decode_number(field: &str) -> Result<i64> {
    match field.parse::<i64>() {
        Ok(value) if value <= MAX_FIELD => Ok(value),
        _ => bail!(ErrorKind::InvalidDate(field.to_string())),
    }
}

/// Decode a zero-based month from its abbreviation or, failing that, its one-based number.
fn decode_month(field: &str) -> Result<i64> {
    if let Some(month) = MONTHS.iter().position(|&month| month == field) {
        return Ok(month as i64);
    }

    match parse_int_prefix(field) {
        Some(month) if month >= 1 && month <= MAX_FIELD => Ok(month - 1),
        _ => bail!(ErrorKind::InvalidDate(field.to_string())),
    }
}

/// Seconds since the epoch for a set of non-negative date fields.
///
/// Years below 100 are read as years of the twentieth century. Fields past the end of their
/// range carry into the next larger field.
fn epoch_seconds(year: i64, month: i64, day: i64, hour: i64, minute: i64, second: i64) -> i64 {
    let year = if year <= 99 { year + 1900 } else { year };
    let months = year * 12 + month;
    let days = days_from_civil(months / 12, months % 12 + 1, 1) + day - 1;

    days * 86_400 + hour * 3_600 + minute * 60 + second
}

/// Number of days from 1970-01-01 to the given proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = (if year >= 0 { year } else { year - 399 }) / 400;
    let year_of_era = year - era * 400;
    let month_index = if month > 2 { month - 3 } else { month + 9 };
    let day_of_year = (153 * month_index + 2) / 5 + day - 1;
    let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;

    era * 146_097 + day_of_era - 719_468
}

#[cfg(test)]
mod test {
    use super::*;

    fn seconds(date: &str) -> Option<i64> {
        parse(date).map(|time| time.to_timespec().sec)
    }

    #[test]
    fn canonical_formats() {
        let dates = [
            "1994-11-06T08:49:37Z",
            "Sun, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06 Nov 1994 08:49:37 GMT",
            "Sunday, 06-Nov-1994 08:49:37 GMT",
            "Sun, 06-Nov-1994 08:49:37 GMT",
            "Sun Nov  6 08:49:37 1994",
            "Sunday Nov  6 08:49:37 1994",
        ];

        for date in dates.iter() {
            assert_eq!((*date, seconds(date)), (*date, Some(784111777)));
        }
    }

    #[test]
    fn iso_variants() {
        let dates = [
            ("2023-04-05T12:48:00.000Z", 1680698880),
            ("2023-04-05 12:48:00", 1680698880),
            ("2023-04-05   12:48:00 UTC", 1680698880),
            ("2023-04-05T12:48:00+02:00", 1680698880),
            ("  2023-04-05t12:48:00z\n", 1680698880),
            ("\u{feff}2023-04-05T12:48:00Z", 1680698880),
        ];

        for &(date, expected) in dates.iter() {
            assert_eq!((date, seconds(date)), (date, Some(expected)));
        }
    }

    #[test]
    fn lenient_fields() {
        let dates = [
            // Weekday is not checked against the date.
            ("Mon, 06 Nov 1994 08:49:37 GMT", 784111777),
            // Numeric months count from one.
            ("Sun, 06 011 1994 08:49:37 GMT", 784111777),
            // Two digit years belong to the twentieth century.
            ("Sunday, 06-Nov-94 08:49:37 GMT", 784111777),
            ("Thu, 01-Jan-1970 00:00:00 GMT", 0),
            ("Fri, 01-Jan-2038 00:00:00 GMT", 2145916800),
            // Overflowing days roll into the next month.
            ("Wed, 32 Jan 1995 00:00:00 GMT", 791596800),
            // Month thirteen is January of the following year.
            ("Sat, 01 013 2000 00:00:00 GMT", 978307200),
            // Numeric months may be written in hexadecimal.
            ("Sun, 06 0xb 1994 08:49:37 GMT", 784111777),
        ];

        for &(date, expected) in dates.iter() {
            assert_eq!((date, seconds(date)), (date, Some(expected)));
        }
    }

    #[test]
    fn rejected_dates() {
        let dates = [
            "",
            "something",
            "Sat, 3 Apr 2021 12:34:56 CEST",
            "Sun, 06 November 1994 08:49:37 GMT",
            "Sun, 06 000 1994 08:49:37 GMT",
            "Sun, 06 Nov 1994 8:49:37 GMT",
            "1994-11-06",
            "Sun, 06 Nov 99999999999999999999 08:49:37 GMT",
            "Sun, 06 Nov 999999999 08:49:37 GMT",
        ];

        for date in dates.iter() {
            assert_eq!((*date, seconds(date)), (*date, None));
        }
    }

    #[test]
    fn normalised_time() {
        let time = parse("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(time, at_utc(Timespec::new(1445412480, 0)));
        assert_eq!(time.tm_year, 115);
        assert_eq!(time.tm_mon, 9);
        assert_eq!(time.tm_mday, 21);
        assert_eq!(time.tm_wday, 3);
    }

    #[test]
    fn civil_days() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(days_from_civil(2000, 3, 1), 11017);
        assert_eq!(days_from_civil(1969, 12, 31), -1);
    }
}
