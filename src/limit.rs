//! Capping the lifetime of cookies.
//!
//! A [`CookieLimit`](struct.CookieLimit.html) is the longest a cookie may live. Headers asking
//! for a longer lifetime are rewritten to carry a `Max-Age` of the limit instead, and anything
//! that cannot be parsed is passed through untouched.

use std::fmt;
use std::str::FromStr;

use cookie::iter::is_set_cookie;
use cookie::SetCookieHeader;
use error::*;
use time::Tm;

const DAYS: i64 = 24 * 60 * 60;

/// The longest lifetime, in seconds, a cookie may be given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CookieLimit {
    seconds: i64,
}

impl CookieLimit {
    /// Limits offered to users, by description.
    pub const PRESETS: &'static [(&'static str, i64)] = &[
        ("1 day", 1 * DAYS),
        ("1 week", 7 * DAYS),
        ("2 weeks", 14 * DAYS),
        ("1 month", 30 * DAYS),
        ("3 months", 90 * DAYS),
        ("6 months", 180 * DAYS),
        ("1 year", 365 * DAYS),
    ];

    /// Create a limit of a number of seconds.
    pub fn from_seconds(seconds: i64) -> Result<CookieLimit> {
        ensure!(seconds > 0, ErrorKind::InvalidLimit(seconds.to_string()));
        Ok(CookieLimit { seconds: seconds })
    }

    /// Iterate over the preset limits.
    pub fn presets() -> impl Iterator<Item = CookieLimit> {
        CookieLimit::PRESETS
            .iter()
            .map(|&(_, seconds)| CookieLimit { seconds: seconds })
    }

    /// Get the limit in seconds.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Get the description of the limit if it is one of the presets.
    pub fn description(&self) -> Option<&'static str> {
        CookieLimit::PRESETS
            .iter()
            .find(|&&(_, seconds)| seconds == self.seconds)
            .map(|&(description, _)| description)
    }

    /// Check if a header asks for a lifetime longer than the limit.
    pub fn exceeded_by(&self, header: &SetCookieHeader, now: Tm) -> bool {
        match lifetime(header, now) {
            Some(lifetime) => lifetime > self.seconds,
            None => false,
        }
    }

    /// Rewrite a header to live no longer than the limit.
    ///
    /// `None` if the header already keeps to the limit.
    pub fn apply(&self, header: &SetCookieHeader, now: Tm) -> Option<SetCookieHeader> {
        if self.exceeded_by(header, now) {
            debug!(
                "limiting cookie {:?} to {} seconds",
                header.name(),
                self.seconds
            );
            Some(header.update_max_age(self.seconds))
        } else {
            None
        }
    }
}

impl FromStr for CookieLimit {
    type Err = Error;

    /// Read a limit from a preset description such as `"1 week"` or a number of seconds.
    fn from_str(source: &str) -> Result<CookieLimit> {
        let source = source.trim();
        if let Some(&(_, seconds)) = CookieLimit::PRESETS
            .iter()
            .find(|&&(description, _)| description.eq_ignore_ascii_case(source))
        {
            return CookieLimit::from_seconds(seconds);
        }

        let seconds = source
            .parse::<i64>()
            .chain_err(|| ErrorKind::InvalidLimit(source.to_string()))?;
        CookieLimit::from_seconds(seconds)
    }
}

impl fmt::Display for CookieLimit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.description() {
            Some(description) => f.write_str(description),
            None => write!(f, "{} seconds", self.seconds),
        }
    }
}

/// The lifetime a header asks for, in seconds from `now`.
///
/// A numeric `Max-Age` takes precedence over `Expires`. `None` for session cookies and for
/// headers whose lifetime attributes cannot be read.
pub fn lifetime(header: &SetCookieHeader, now: Tm) -> Option<i64> {
    if let Some(seconds) = header.max_age().and_then(|max_age| max_age.seconds()) {
        return Some(seconds);
    }

    header
        .expires()
        .map(|expires| (expires.to_timespec() - now.to_timespec()).num_seconds())
}

/// Options controlling how `Set-Cookie` headers are rewritten.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    /// The longest lifetime to allow, if any.
    pub cookie_limit: Option<CookieLimit>,
}

impl Options {
    /// Options limiting cookies to a given lifetime.
    pub fn with_limit(limit: CookieLimit) -> Options {
        Options {
            cookie_limit: Some(limit),
        }
    }

    /// Rewrite a single `Set-Cookie` header value.
    ///
    /// Headers that cannot be parsed, or that keep to the limit, are returned unchanged.
    pub fn rewrite(&self, header: &str, now: Tm) -> String {
        let limit = match self.cookie_limit {
            Some(limit) => limit,
            None => return header.to_owned(),
        };

        match SetCookieHeader::parse(header).and_then(|parsed| limit.apply(&parsed, now)) {
            Some(limited) => limited.render(),
            None => header.to_owned(),
        }
    }

    /// Rewrite every `Set-Cookie` header in a list of response headers.
    ///
    /// Other headers and the order of all headers are left alone.
    pub fn rewrite_headers(&self, headers: &[(String, String)], now: Tm) -> Vec<(String, String)> {
        headers
            .iter()
            .map(|&(ref name, ref value)| {
                if is_set_cookie(name) {
                    (name.clone(), self.rewrite(value, now))
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect()
    }
}
