//! Errors produced while handling cookie headers.

#![allow(missing_docs)]

error_chain!{
    // Links to other error chains.
    links {
        CookieParse(parser::Error, parser::ErrorKind);
    }

    // Internal error forms.
    errors {
        InvalidLimit(limit: String) {
            description("The cookie lifetime limit was invalid"),
            display("Not a valid cookie lifetime limit: {}", limit),
        }
    }
}

/// Errors specific to parsing the cookie.
pub mod parser {
    error_chain!{
        errors {
            Empty {
                description("The cookie header did not contain a name=value pair"),
            }
            MissingDelimiter {
                description("The name=value pair had no '=' delimiter"),
            }
            EmptyName {
                description("The cookie name was empty"),
            }
            EmptyValue {
                description("The cookie value was empty"),
            }
            InvalidDate(date: String) {
                description("The date provided was invalid"),
                display("The date provided was invalid: {}", date),
            }
        }
    }
}
