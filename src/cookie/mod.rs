//! Representation of a single `Set-Cookie` header value.

pub mod date;
pub mod iter;
mod parse;

use std::fmt;
use std::str::FromStr;

use error::*;
use time::Tm;

pub use self::parse::{Attribute, Pair};
use self::parse::{parse_int_prefix, process_cookie};

/// The value of a `Max-Age` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaxAge {
    /// A number of seconds; zero or negative expires the cookie immediately.
    Seconds(i64),
    /// The attribute was present but did not hold a number.
    NotANumber,
}

impl MaxAge {
    /// Read a `Max-Age` value the way browsers read integers.
    ///
    /// Leading whitespace, a sign and trailing text are tolerated, so `" 12abc"` is 12 seconds.
    /// A `0x` prefix reads the digits as hexadecimal, so `"0x1F"` is 31 seconds. Values too
    /// large for an `i64` saturate rather than becoming `NotANumber`. Only text with no digits
    /// at all is `NotANumber`.
    pub fn parse(text: &str) -> MaxAge {
        match parse_int_prefix(text) {
            Some(seconds) => MaxAge::Seconds(seconds),
            None => MaxAge::NotANumber,
        }
    }

    /// Get the number of seconds, if the value was numeric.
    pub fn seconds(&self) -> Option<i64> {
        match *self {
            MaxAge::Seconds(seconds) => Some(seconds),
            MaxAge::NotANumber => None,
        }
    }

    /// Check if the value was not numeric.
    pub fn is_nan(&self) -> bool {
        *self == MaxAge::NotANumber
    }
}

/// A parsed `Set-Cookie` header.
///
/// The header is never modified in place. [`update_max_age`](#method.update_max_age) produces
/// a new header, and rendering an unmodified header reproduces the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SetCookieHeader {
    /// The leading `name=value` pair.
    pair: Pair,

    /// Attributes in the order they appeared.
    attributes: Vec<Attribute>,
}

impl SetCookieHeader {
    /// Parse a header value, without the `Set-Cookie:` prefix.
    ///
    /// Returns `None` if the header has no usable `name=value` pair.
    pub fn parse(header: &str) -> Option<SetCookieHeader> {
        match SetCookieHeader::decode(header) {
            Ok(parsed) => Some(parsed),
            Err(error) => {
                debug!("Set-Cookie header {:?} rejected: {}", header, error);
                None
            }
        }
    }

    /// Parse a header value, reporting why it could not be parsed.
    pub fn decode(header: &str) -> Result<SetCookieHeader> {
        let (pair, attributes) = process_cookie(header)?;
        trace!(
            "parsed cookie {:?} with {} attributes",
            pair.name(),
            attributes.len()
        );
        Ok(SetCookieHeader {
            pair: pair,
            attributes: attributes,
        })
    }

    /// Get the name of the cookie.
    pub fn name(&self) -> &str {
        self.pair.name()
    }

    /// Get the value of the cookie, without surrounding double quotes.
    pub fn value(&self) -> &str {
        self.pair.value()
    }

    /// Get the value of the cookie exactly as it appears in the header.
    pub fn raw_value(&self) -> &str {
        self.pair.raw_value()
    }

    /// Get the `name=value` pair.
    pub fn pair(&self) -> &Pair {
        &self.pair
    }

    /// Get all attributes in the order they will be rendered.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Find the first attribute with a given name, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.is_named(name))
    }

    /// Get the value of the first attribute with a given name.
    ///
    /// An attribute written without `=` reads as the empty string.
    pub fn attribute_value(&self, name: &str) -> Option<&str> {
        self.attribute(name)
            .map(|attribute| attribute.value().unwrap_or(""))
    }

    /// Check if an attribute with a given name is present, regardless of its value.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Get the expiry time from the `Expires` attribute.
    ///
    /// `None` if there is no such attribute or its date could not be read.
    pub fn expires(&self) -> Option<Tm> {
        self.attribute_value("Expires").and_then(date::parse)
    }

    /// Get the value of the `Max-Age` attribute.
    ///
    /// `None` if the attribute is absent; `Some(MaxAge::NotANumber)` if it is present but not
    /// numeric.
    pub fn max_age(&self) -> Option<MaxAge> {
        self.attribute_value("Max-Age").map(MaxAge::parse)
    }

    /// Get the `Domain` attribute.
    pub fn domain(&self) -> Option<&str> {
        self.attribute_value("Domain")
    }

    /// Get the `Path` attribute.
    pub fn path(&self) -> Option<&str> {
        self.attribute_value("Path")
    }

    /// Check if the cookie requires a secure connection.
    pub fn secure(&self) -> bool {
        self.has_attribute("Secure")
    }

    /// Check if the cookie should be hidden from scripts.
    pub fn http_only(&self) -> bool {
        self.has_attribute("HttpOnly")
    }

    /// Get the `SameSite` attribute, lower-cased.
    pub fn same_site(&self) -> Option<String> {
        self.attribute_value("SameSite").map(str::to_lowercase)
    }

    /// Produce a copy of the header whose lifetime is given by `Max-Age` alone.
    ///
    /// Every `Expires` attribute is dropped. An existing `Max-Age` is overwritten where it
    /// stands, otherwise one is appended.
    pub fn update_max_age(&self, seconds: i64) -> SetCookieHeader {
        let value = seconds.to_string();
        let mut attributes = Vec::with_capacity(self.attributes.len() + 1);
        let mut replaced = false;

        for attribute in &self.attributes {
            if attribute.is_named("Expires") {
                continue;
            }
            if attribute.is_named("Max-Age") {
                if !replaced {
                    attributes.push(attribute.with_value(value.clone()));
                    replaced = true;
                }
                continue;
            }
            attributes.push(attribute.clone());
        }

        if !replaced {
            attributes.push(Attribute::new("Max-Age", Some(value)));
        }

        SetCookieHeader {
            pair: self.pair.clone(),
            attributes: attributes,
        }
    }

    /// Render the header back into a string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl FromStr for SetCookieHeader {
    type Err = Error;

    fn from_str(header: &str) -> Result<SetCookieHeader> {
        SetCookieHeader::decode(header)
    }
}

impl fmt::Display for SetCookieHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.pair, f)?;
        for attribute in &self.attributes {
            fmt::Display::fmt(attribute, f)?;
        }
        Ok(())
    }
}


#[cfg(test)]
mod generated_headers {
    use super::{MaxAge, SetCookieHeader};
    use proptest::collection::vec;
    use proptest::prelude::{any, Just, Strategy};
    use proptest::sample::subsequence;
    use proptest::string::string_regex;
    use time::{at_utc, Timespec, Tm};

    fn utc(seconds: i64) -> Tm {
        at_utc(Timespec::new(seconds, 0))
    }

    fn cookie_octets() -> impl Strategy<Value = String> {
        string_regex(r"[!#$%&'()*+\-./0-9:<=>?@A-Z\[\]^_`a-z{|}~]{1,16}").expect("cookie-octet regex")
    }

    fn cookie_name() -> impl Strategy<Value = String> {
        string_regex(r"[!#$%&'*+\-.0-9A-Z^_`a-z|~]{1,16}").expect("token regex")
    }

    fn cookie_value() -> impl Strategy<Value = String> {
        prop_oneof![
            cookie_octets(),
            cookie_octets().prop_map(|value| format!("\"{}\"", value)),
        ]
    }

    fn delimiter() -> impl Strategy<Value = &'static str> {
        prop_oneof![Just("; "), Just(";"), Just(";   "), Just(";\t"), Just("; \u{feff}")]
    }

    /// A shuffled selection of the attributes a server may send.
    fn cookie_attributes() -> impl Strategy<Value = Vec<String>> {
        (
            0i64..4_102_444_800,
            any::<i64>(),
            cookie_octets(),
            cookie_octets(),
            prop_oneof![Just("Strict"), Just("Lax"), Just("None")],
        ).prop_flat_map(|(expires, max_age, domain, path, same_site)| {
            let attributes = vec![
                format!("Expires={}", utc(expires).rfc822()),
                format!("Max-Age={}", max_age),
                format!("Domain={}", domain),
                format!("Path={}", path),
                format!("SameSite={}", same_site),
                "Secure".to_string(),
                "HttpOnly".to_string(),
            ];
            subsequence(attributes, 0..=7).prop_shuffle()
        })
    }

    fn set_cookie_header() -> impl Strategy<Value = String> {
        (
            cookie_name(),
            cookie_value(),
            cookie_attributes(),
            vec(delimiter(), 7),
        ).prop_map(|(name, value, attributes, delimiters)| {
            let mut header = format!("{}={}", name, value);
            for (attribute, delimiter) in attributes.iter().zip(delimiters) {
                header.push_str(delimiter);
                header.push_str(attribute);
            }
            header
        })
    }

    proptest! {
        #[test]
        fn any_header_round_trips(header in set_cookie_header()) {
            let parsed = SetCookieHeader::parse(&header);
            prop_assert!(parsed.is_some());
            prop_assert_eq!(parsed.unwrap().render(), header.clone());
        }

        #[test]
        fn lifetime_attributes_read_back(
            name in cookie_name(),
            expires in 0i64..4_102_444_800,
            max_age in any::<i64>(),
        ) {
            let source = format!(
                "{}=v; Expires={}; Max-Age={}",
                name,
                utc(expires).rfc822(),
                max_age
            );
            let header = SetCookieHeader::parse(&source).expect("generated header parses");
            prop_assert_eq!(header.expires().map(|time| time.to_timespec().sec), Some(expires));
            prop_assert_eq!(header.max_age(), Some(MaxAge::Seconds(max_age)));
        }

        #[test]
        fn updated_header_round_trips(header in set_cookie_header(), seconds in any::<i64>()) {
            let updated = SetCookieHeader::parse(&header)
                .expect("generated header parses")
                .update_max_age(seconds);
            prop_assert_eq!(updated.expires(), None);
            prop_assert_eq!(updated.max_age(), Some(MaxAge::Seconds(seconds)));

            let rendered = updated.render();
            let reparsed = SetCookieHeader::parse(&rendered).expect("updated header parses");
            prop_assert_eq!(reparsed.render(), rendered);
            prop_assert_eq!(reparsed.name(), updated.name());
        }
    }
}
