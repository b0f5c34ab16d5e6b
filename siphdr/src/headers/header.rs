use enum_as_inner::EnumAsInner;
use std::fmt;

use crate::error::{Error, Result};
use crate::headers::*;
use crate::macros::try_parse_hdr;

/// A SIP Header.
///
/// This enum contain the SIP headers supported by this crate, see their
/// respective documentation for more details.
#[derive(Debug, PartialEq, Eq, EnumAsInner, Clone)]
pub enum Header {
    /// `Route` Header
    Route(Route),
    /// `Record-Route` Header
    RecordRoute(RecordRoute),
    /// `WWW-Authenticate` Header
    WWWAuthenticate(WWWAuthenticate),
    /// `Proxy-Authenticate` Header
    ProxyAuthenticate(ProxyAuthenticate),
}

impl Header {
    /// Parses a raw header line into the matching variant.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyInput`] for a blank line and
    /// [`Error::UnknownHeader`] when no supported header has that
    /// name. The error of the matching header codec is returned
    /// as is.
    ///
    /// # Examples
    ///
    /// ```
    /// use siphdr::headers::Header;
    ///
    /// let header = Header::parse("Record-Route: <sip:p1.example.com;lr>").unwrap();
    ///
    /// assert!(header.is_record_route());
    /// assert_eq!(header.name(), "Record-Route");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        try_parse_hdr!(Route, raw);
        try_parse_hdr!(RecordRoute, raw);
        try_parse_hdr!(WWWAuthenticate, raw);
        try_parse_hdr!(ProxyAuthenticate, raw);

        tracing::debug!(raw, "unknown header");
        Err(Error::UnknownHeader)
    }
}

macro_rules! impl_header_dispatch {
    ( $($variant:ident),* $(,)? ) => {
        impl Header {
            /// The header name, e.g, `"Route"`.
            pub fn name(&self) -> &'static str {
                match self {
                    $( Header::$variant(_) => $variant::NAME, )*
                }
            }

            /// Checks the required fields of the inner header.
            pub fn validate(&self) -> Result<()> {
                match self {
                    $( Header::$variant(inner) => inner.validate(), )*
                }
            }

            /// Encodes the inner header as a `CRLF` terminated line.
            pub fn raw(&self) -> Result<String> {
                match self {
                    $( Header::$variant(inner) => inner.raw(), )*
                }
            }
        }

        impl fmt::Display for Header {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Header::$variant(inner) => inner.fmt(f), )*
                }
            }
        }

        $(
            impl From<$variant> for Header {
                fn from(header: $variant) -> Self {
                    Header::$variant(header)
                }
            }
        )*
    };
}

impl_header_dispatch!(Route, RecordRoute, WWWAuthenticate, ProxyAuthenticate);
