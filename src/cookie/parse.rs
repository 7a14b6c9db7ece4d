//! Splitting a `Set-Cookie` header into its `name=value` pair and attributes.
//!
//! ```text
//! set-cookie-string = cookie-pair *( ";" *WSP attribute )
//! cookie-pair       = name "=" value
//! attribute         = name [ "=" value ]
//! ```
//!
//! Every piece keeps the exact text it was read from, including the delimiter that preceded
//! it, so that the header can be written back out unchanged.

use error::parser::*;
use std::fmt;
use std::str::FromStr;

/// Delimiter written in front of attributes that did not come from a parsed header.
pub(crate) const DEFAULT_DELIMITER: &str = "; ";

/// Split a header into its segments, each paired with the delimiter text preceding it.
///
/// A segment runs up to the next `;`. The delimiter is the `;` and any whitespace after it.
pub(crate) fn split_segments(source: &str) -> Vec<(&str, &str)> {
    let mut segments = Vec::new();
    let mut delimiter = "";
    let mut remaining = source;

    loop {
        let end = remaining.find(';').unwrap_or_else(|| remaining.len());
        segments.push((delimiter, &remaining[..end]));

        if end == remaining.len() {
            return segments;
        }

        let rest = &remaining[end + 1..];
        let whitespace = rest.len() - rest.trim_start_matches(is_space).len();
        delimiter = &remaining[end..end + 1 + whitespace];
        remaining = &rest[whitespace..];
    }
}

/// Split a segment on its first `=`.
fn split_pair(segment: &str) -> (&str, Option<&str>) {
    match segment.find('=') {
        Some(offset) => (&segment[..offset], Some(&segment[offset + 1..])),
        None => (segment, None),
    }
}

/// Whitespace as browsers skip it in header text.
///
/// This is Unicode white space plus the byte order mark, without the next-line control.
pub(crate) fn is_space(c: char) -> bool {
    c == '\u{feff}' || (c.is_whitespace() && c != '\u{85}')
}

/// Parse an integer the permissive way browsers read numeric attributes.
///
/// Leading whitespace and a sign are allowed, then as many digits as are present. A `0x` prefix
/// switches to hexadecimal digits. Anything after the digits is ignored. No digits yields `None`;
/// too many to fit saturates at `i64::MAX` or `i64::MIN`.
pub(crate) fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start_matches(is_space);
    let (negative, unsigned) = if text.starts_with('-') {
        (true, &text[1..])
    } else if text.starts_with('+') {
        (false, &text[1..])
    } else {
        (false, text)
    };
    let (radix, digits) = if unsigned.starts_with("0x") || unsigned.starts_with("0X") {
        (16, &unsigned[2..])
    } else {
        (10, unsigned)
    };

    let len = digits
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if len == 0 {
        return None;
    }

    match i64::from_str_radix(&digits[..len], radix) {
        Ok(magnitude) => Some(if negative { -magnitude } else { magnitude }),
        Err(_) => Some(if negative { i64::min_value() } else { i64::max_value() }),
    }
}

/// The `name=value` pair at the start of a cookie header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pair {
    /// Formatted `name=value` pair, exactly as read.
    pair: String,
    /// The length of the name at the start of the pair.
    name_len: usize,
}

impl Pair {
    /// Get the name of the cookie.
    pub fn name(&self) -> &str {
        &self.pair[..self.name_len]
    }

    /// Get the value of the cookie as it appears in the header, including any quotes.
    pub fn raw_value(&self) -> &str {
        &self.pair[self.name_len + 1..]
    }

    /// Get the value of the cookie with one pair of surrounding double quotes removed.
    pub fn value(&self) -> &str {
        let value = self.raw_value();
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            &value[1..value.len() - 1]
        } else {
            value
        }
    }

    /// Get the (name, value) pair of a cookie.
    pub fn as_tuple(&self) -> (&str, &str) {
        (self.name(), self.value())
    }

    /// Get the formatted `name=value` pair string of a cookie.
    ///
    /// Preserves any quotation from the original cookie as read.
    pub fn as_str(&self) -> &str {
        self.pair.as_str()
    }
}

impl FromStr for Pair {
    type Err = Error;

    fn from_str(source: &str) -> Result<Pair> {
        ensure!(!source.is_empty(), ErrorKind::Empty);
        let (name, value) = split_pair(source);
        let value = match value {
            Some(value) => value,
            None => bail!(ErrorKind::MissingDelimiter),
        };
        ensure!(!name.is_empty(), ErrorKind::EmptyName);
        ensure!(!value.is_empty(), ErrorKind::EmptyValue);

        Ok(Pair {
            pair: source.to_owned(),
            name_len: name.len(),
        })
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.pair)
    }
}

/// A single attribute following the `name=value` pair, such as `Path=/` or `Secure`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    /// The `;` and whitespace that preceded the attribute.
    delimiter: String,
    name: String,
    value: Option<String>,
}

impl Attribute {
    /// Create an attribute that will be written with the usual `"; "` delimiter.
    pub fn new<S: Into<String>>(name: S, value: Option<String>) -> Attribute {
        Attribute {
            delimiter: DEFAULT_DELIMITER.to_owned(),
            name: name.into(),
            value: value,
        }
    }

    /// Decode an attribute segment and the delimiter that preceded it.
    pub(crate) fn decode(delimiter: &str, segment: &str) -> Attribute {
        let (name, value) = split_pair(segment);
        Attribute {
            delimiter: delimiter.to_owned(),
            name: name.to_owned(),
            value: value.map(str::to_owned),
        }
    }

    /// Get the name of the attribute in its original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the value of the attribute, if it had one.
    pub fn value(&self) -> Option<&str> {
        self.value.as_ref().map(String::as_str)
    }

    /// Check if the attribute has a given name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Replace the value while keeping the name and delimiter.
    pub(crate) fn with_value(&self, value: String) -> Attribute {
        Attribute {
            value: Some(value),
            ..self.clone()
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.delimiter)?;
        f.write_str(&self.name)?;
        if let Some(ref value) = self.value {
            write!(f, "={}", value)?;
        }
        Ok(())
    }
}

/// Decode a header into its pair and its attributes in order.
pub(crate) fn process_cookie(source: &str) -> Result<(Pair, Vec<Attribute>)> {
    let mut segments = split_segments(source).into_iter();
    let pair = match segments.next() {
        Some((_, first)) => first.parse::<Pair>()?,
        None => bail!(ErrorKind::Empty),
    };
    let attributes = segments
        .map(|(delimiter, segment)| Attribute::decode(delimiter, segment))
        .collect();

    Ok((pair, attributes))
}
