//! # siphdr
//!
//! Codecs for structured SIP headers.
//!
//! Every header family converts between a wire-format header line and a
//! typed value through the [`SipHeader`](headers::SipHeader) trait:
//!
//! ```
//! use siphdr::headers::{Route, SipHeader};
//!
//! let route = Route::parse("Route: <sip:p1.example.com;lr>,<sip:p2.example.com;lr>\r\n").unwrap();
//!
//! assert_eq!(route.uris().len(), 2);
//! assert_eq!(route.raw().unwrap(), "Route: <sip:p1.example.com;lr>, <sip:p2.example.com;lr>\r\n");
//! ```

pub mod extract;
pub mod headers;
pub mod message;

pub(crate) mod error;
pub(crate) mod macros;

pub use error::{Error, Result, SyntaxError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
