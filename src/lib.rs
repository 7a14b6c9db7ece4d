//! Parsing, rewriting and re-rendering of [RFC6265][rfc6265] `Set-Cookie` header values.
//!
//! Headers are kept in their original textual form so that rendering an unmodified header
//! reproduces it exactly. The only supported rewrite replaces the lifetime of a cookie with a
//! `Max-Age`, which is what the [`limit`](limit/index.html) module uses to cap long-lived cookies.
//!
//! [rfc6265]: https://tools.ietf.org/html/rfc6265

#![deny(missing_docs)]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;
#[cfg(test)]
#[macro_use]
extern crate proptest;
extern crate regex;
extern crate time;

pub mod cookie;
pub mod error;
pub mod limit;

pub use cookie::date::parse as parse_date;
pub use cookie::{Attribute, MaxAge, SetCookieHeader};
pub use limit::{CookieLimit, Options};
