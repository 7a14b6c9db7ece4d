//! Iterators that pick `Set-Cookie` headers out of a response.

use cookie::SetCookieHeader;
use error::*;

/// Name of the response header carrying cookies.
pub const SET_COOKIE: &str = "Set-Cookie";

/// Check if a header name is `Set-Cookie`, ignoring case.
pub fn is_set_cookie(name: &str) -> bool {
    name.eq_ignore_ascii_case(SET_COOKIE)
}

/// A trait representing the source of a set of response headers.
///
/// This is applied to anything holding `(name, value)` header pairs so that its cookies can be
/// read without copying.
pub trait HeaderSource {
    /// Produce the headers as `(name, value)` pairs, in order.
    fn header_pairs(&self) -> Vec<(&str, &str)>;

    /// Iterate over the `Set-Cookie` headers of the source.
    fn set_cookies(&self) -> SetCookieIter<::std::vec::IntoIter<(&str, &str)>> {
        SetCookieIter::new(self.header_pairs().into_iter())
    }
}

impl<N, V> HeaderSource for [(N, V)]
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    fn header_pairs(&self) -> Vec<(&str, &str)> {
        self.iter()
            .map(|&(ref name, ref value)| (name.as_ref(), value.as_ref()))
            .collect()
    }
}

impl<N, V> HeaderSource for Vec<(N, V)>
where
    N: AsRef<str>,
    V: AsRef<str>,
{
    fn header_pairs(&self) -> Vec<(&str, &str)> {
        self.as_slice().header_pairs()
    }
}

/// An iterator over a collection of headers that decodes each `Set-Cookie` header it finds.
///
/// Each item carries the raw header value alongside the result of decoding it, so that headers
/// which cannot be decoded can still be passed along untouched.
#[derive(Debug)]
pub struct SetCookieIter<I> {
    /// The source of the headers.
    headers: I,
}

impl<'s, I> SetCookieIter<I>
where
    I: Iterator<Item = (&'s str, &'s str)>,
{
    /// Create a new iterator over `(name, value)` header pairs.
    pub fn new(headers: I) -> SetCookieIter<I> {
        SetCookieIter { headers: headers }
    }
}

impl<'s, I> Iterator for SetCookieIter<I>
where
    I: Iterator<Item = (&'s str, &'s str)>,
{
    type Item = (&'s str, Result<SetCookieHeader>);

    fn next(&mut self) -> Option<(&'s str, Result<SetCookieHeader>)> {
        self.headers
            .by_ref()
            .find(|&(name, _)| is_set_cookie(name))
            .map(|(_, value)| (value, SetCookieHeader::decode(value)))
    }
}
