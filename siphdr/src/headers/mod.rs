#![deny(missing_docs)]
//! SIP Headers types
//!
//! Each header family implements [`SipHeader`]. The [`Header`] enum
//! wraps them so a raw line can be decoded without knowing its name
//! beforehand.

mod header;
mod proxy_authenticate;
mod record_route;
mod route;
mod www_authenticate;

pub use header::Header;
pub use proxy_authenticate::ProxyAuthenticate;
pub use record_route::RecordRoute;
pub use route::Route;
pub use www_authenticate::WWWAuthenticate;

use std::fmt;

use crate::error::Result;

/// Trait implemented by every SIP header codec.
///
/// A header is decoded from one raw line with [`parse`], checked with
/// [`validate`] and encoded back with [`raw`]. The [`Display`]
/// implementation renders only the header value, without the name and
/// the line terminator.
///
/// [`parse`]: SipHeader::parse
/// [`validate`]: SipHeader::validate
/// [`raw`]: SipHeader::raw
/// [`Display`]: fmt::Display
pub trait SipHeader: Sized + fmt::Display {
    /// The full name of the SIP header (e.g., `"Route"`).
    const NAME: &'static str;

    /// Checks if the given name matches this header's name.
    fn matches_name(name: &str) -> bool {
        name.eq_ignore_ascii_case(Self::NAME)
    }

    /// Parses a raw header line, e.g, `"Route: <sip:p1.example.com;lr>\r\n"`.
    ///
    /// The line may be folded and the name is matched ignoring case.
    /// The decoded value is validated before it is returned.
    fn parse(raw: &str) -> Result<Self>;

    /// Checks that the required fields are present.
    fn validate(&self) -> Result<()>;

    /// Encodes the header as a `CRLF` terminated line.
    ///
    /// Fails with the same error as [`SipHeader::validate`] when the
    /// value is not valid.
    fn raw(&self) -> Result<String> {
        self.validate()?;

        Ok(format!("{}: {}\r\n", Self::NAME, self))
    }
}
