use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::headers::SipHeader;
use crate::message::Uri;

use super::route::{display_name_from, fmt_addr_list, parse_addr_list, validate_addr_list};

/// The `Record-Route` SIP header.
///
/// Inserted by proxies that want to stay in the path of
/// subsequent requests of the dialog. Shares the address list
/// encoding of [`Route`](super::Route).
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct RecordRoute {
    display_name: Option<String>,
    uris: Vec<Uri>,
}

impl RecordRoute {
    /// Creates a `RecordRoute`, a blank `display_name` is
    /// dropped.
    pub fn new<I>(display_name: impl Into<String>, uris: I) -> Self
    where
        I: IntoIterator<Item = Uri>,
    {
        Self {
            display_name: display_name_from(display_name.into()),
            uris: uris.into_iter().collect(),
        }
    }

    /// The display name, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Replaces the display name.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name_from(display_name.into());
    }

    /// The recorded uris, in order.
    pub fn uris(&self) -> &[Uri] {
        &self.uris
    }

    /// Appends `uris` after the current ones.
    pub fn push_uris<I>(&mut self, uris: I)
    where
        I: IntoIterator<Item = Uri>,
    {
        self.uris.extend(uris);
    }

    /// Appends one uri.
    pub fn push_uri(&mut self, uri: Uri) {
        self.uris.push(uri);
    }
}

impl SipHeader for RecordRoute {
    const NAME: &'static str = "Record-Route";

    fn parse(raw: &str) -> Result<Self> {
        /*
         * Record-Route  =  "Record-Route" HCOLON rec-route *(COMMA rec-route)
         * rec-route     =  name-addr *( SEMI rr-param )
         */
        let (display_name, uris) = parse_addr_list(raw, Self::NAME)?;
        let record_route = RecordRoute { display_name, uris };
        record_route.validate()?;

        tracing::trace!(header = Self::NAME, uris = record_route.uris.len(), "decoded header");
        Ok(record_route)
    }

    fn validate(&self) -> Result<()> {
        validate_addr_list(self.display_name(), &self.uris)
    }
}

impl FromStr for RecordRoute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        <RecordRoute as SipHeader>::parse(s)
    }
}

impl fmt::Display for RecordRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() {
            return Ok(());
        }
        fmt_addr_list(f, self.display_name(), &self.uris)
    }
}
