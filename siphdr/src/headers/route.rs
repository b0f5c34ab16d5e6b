use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::error::{Error, Result};
use crate::extract;
use crate::headers::SipHeader;
use crate::message::Uri;

/// The `Route` SIP header.
///
/// Specify the sequence of proxy servers and other
/// intermediaries that a SIP message should pass through on
/// its way to the final destination.
///
/// The uris keep their order, it is the order the request
/// visits them. A `Route` without uris is not valid.
///
/// # Examples
///
/// ```
/// use siphdr::headers::{Route, SipHeader};
///
/// let route = Route::new("Bob", ["sip:p1.example.com;lr".parse().unwrap()]);
///
/// assert_eq!(route.raw().unwrap(), "Route: \"Bob\" sip:p1.example.com;lr\r\n");
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Route {
    display_name: Option<String>,
    uris: Vec<Uri>,
}

impl Route {
    /// Creates a `Route` with a display name and its uris.
    ///
    /// A blank `display_name` means the route has no display
    /// name.
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

    /// Replaces the display name, a blank name removes it.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) {
        self.display_name = display_name_from(display_name.into());
    }

    /// The route uris, in order.
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

impl SipHeader for Route {
    const NAME: &'static str = "Route";

    fn parse(raw: &str) -> Result<Self> {
        /*
         * Route        =  "Route" HCOLON route-param *(COMMA route-param)
         * route-param  =  name-addr *( SEMI rr-param )
         */
        let (display_name, uris) = parse_addr_list(raw, Self::NAME)?;
        let route = Route { display_name, uris };
        route.validate()?;

        tracing::trace!(header = Self::NAME, uris = route.uris.len(), "decoded header");
        Ok(route)
    }

    fn validate(&self) -> Result<()> {
        validate_addr_list(self.display_name(), &self.uris)
    }
}

impl FromStr for Route {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        <Route as SipHeader>::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() {
            return Ok(());
        }
        fmt_addr_list(f, self.display_name(), &self.uris)
    }
}

pub(super) fn display_name_from(display_name: String) -> Option<String> {
    let trimmed = display_name.trim();

    if trimmed.is_empty() {
        None
    } else if trimmed.len() == display_name.len() {
        Some(display_name)
    } else {
        Some(trimmed.to_owned())
    }
}

/// Checks an address list value before it is encoded.
///
/// The display name is written between quotes without
/// escaping, so it can not hold a quote, an angle bracket or a
/// line break.
pub(super) fn validate_addr_list(display_name: Option<&str>, uris: &[Uri]) -> Result<()> {
    if uris.is_empty() {
        return Err(Error::MissingRequiredField("uris"));
    }
    if display_name.is_some_and(|name| name.contains(['"', '<', '>', '\r', '\n'])) {
        return Err(Error::InvalidField("display_name"));
    }
    Ok(())
}

/// Decodes the value of an address list header: an optional
/// display name followed by comma separated uris.
///
/// Every uri must parse, their error is returned as is.
pub(super) fn parse_addr_list(raw: &str, name: &'static str) -> Result<(Option<String>, Vec<Uri>)> {
    let raw = extract::normalize_newlines(raw);
    let tail = extract::strip_header_tag(&raw, name)?;
    let (display_name, rest) = extract::extract_display_name(tail);

    let uris = extract::split_value_list(rest)
        .into_iter()
        .map(|fragment| Uri::parse(&extract::strip_angle_brackets(fragment)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok((display_name.map(str::to_owned), uris))
}

/// Encodes an address list value.
///
/// With a display name the uris follow it without angle
/// brackets, otherwise every uri is enclosed in `<` `>`.
pub(super) fn fmt_addr_list(f: &mut fmt::Formatter<'_>, display_name: Option<&str>, uris: &[Uri]) -> fmt::Result {
    match display_name {
        Some(display_name) => write!(f, "\"{display_name}\" {}", uris.iter().format(", ")),
        None => {
            let formater = uris.iter().format_with(", ", |uri, f| f(&format_args!("<{uri}>")));
            write!(f, "{formater}")
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::message::{Host, UriError};

    use super::*;

    fn uri(s: &str) -> Uri {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        let route = Route::parse("Route: <sip:bigbox3.site3.atlanta.com;lr>\r\n").unwrap();

        assert_eq!(route.display_name(), None);
        assert_eq!(route.uris().len(), 1);
        assert_eq!(
            route.uris()[0].host_port.host,
            Host::DomainName("bigbox3.site3.atlanta.com".into())
        );
        assert!(route.uris()[0].lr_param());
    }

    #[test]
    fn test_parse_list_keeps_order() {
        let route = Route::parse("Route: <sip:a@x>,<sip:b@y>\r\n").unwrap();

        assert_eq!(route.uris(), [uri("sip:a@x"), uri("sip:b@y")]);
    }

    #[test]
    fn test_parse_display_name() {
        let route = Route::parse("Route: \"Bob\" sip:a@x, sip:b@y\r\n").unwrap();
        assert_eq!(route.display_name(), Some("Bob"));
        assert_eq!(route.uris(), [uri("sip:a@x"), uri("sip:b@y")]);

        let route = Route::parse("Route: Bob <sip:bob@biloxi.com>").unwrap();
        assert_eq!(route.display_name(), Some("Bob"));
        assert_eq!(route.uris(), [uri("sip:bob@biloxi.com")]);
    }

    #[test]
    fn test_parse_display_name_found_in_uris() {
        let route = Route::parse("Route: \"sip\" <sip:sip@sip.com>, <sip:b@y>").unwrap();

        assert_eq!(route.display_name(), Some("sip"));
        assert_eq!(route.uris(), [uri("sip:sip@sip.com"), uri("sip:b@y")]);
    }

    #[test]
    fn test_parse_quoted_comma_in_display_name() {
        let route = Route::parse("Route: \"Doe, John\" <sip:john@doe.com>").unwrap();

        assert_eq!(route.display_name(), Some("Doe, John"));
        assert_eq!(route.uris(), [uri("sip:john@doe.com")]);
    }

    #[test]
    fn test_parse_folded_line() {
        let route = Route::parse("route: <sip:p1.example.com;lr>,\r\n <sip:p2.example.com;lr>\r\n").unwrap();

        assert_eq!(
            route.uris(),
            [uri("sip:p1.example.com;lr"), uri("sip:p2.example.com;lr")]
        );
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(Route::parse(""), Err(Error::EmptyInput));
        assert_eq!(Route::parse("   "), Err(Error::EmptyInput));
        assert_eq!(Route::parse("\r\n"), Err(Error::EmptyInput));
    }

    #[test]
    fn test_parse_wrong_header() {
        assert_eq!(
            Route::parse("From: <sip:a@b>"),
            Err(Error::WrongHeaderType { expected: "Route" })
        );
    }

    #[test]
    fn test_parse_uri_error_is_not_wrapped() {
        assert_eq!(
            Route::parse("Route: <tel:+1-201-555-0123>"),
            Err(Error::Uri(UriError::UnsupportedScheme("tel".into())))
        );
        assert_eq!(Route::parse("Route: <sip:a@x>,,<sip:b@y>"), Err(Error::Uri(UriError::Empty)));
    }

    #[test]
    fn test_parse_comma_inside_uri_param_is_split() {
        // Commas are not matched against quotes.
        let result = Route::parse("Route: <sip:a@x;foo=\"1,2\">");

        assert_matches!(result, Err(Error::Uri(UriError::Unexpected { found: '"', .. })));
    }

    #[test]
    fn test_raw_without_display_name() {
        let route = Route::new("", [uri("sip:a@x"), uri("sip:b@y")]);

        assert_eq!(route.raw().unwrap(), "Route: <sip:a@x>, <sip:b@y>\r\n");
        assert_eq!(route.to_string(), "<sip:a@x>, <sip:b@y>");
    }

    #[test]
    fn test_raw_with_display_name() {
        let route = Route::new("Bob", [uri("sip:a@x"), uri("sip:b@y")]);
        let raw = route.raw().unwrap();

        assert_eq!(raw, "Route: \"Bob\" sip:a@x, sip:b@y\r\n");
        assert!(!raw.contains('<'));
        assert_eq!(route.to_string(), "\"Bob\" sip:a@x, sip:b@y");
    }

    #[test]
    fn test_raw_is_idempotent() {
        let route = Route::new("Proxy", [uri("sip:p1.example.com;lr")]);

        assert_eq!(route.raw(), route.raw());
    }

    #[test_log::test]
    fn test_round_trip() {
        let routes = [
            Route::new("", [uri("sip:p1.example.com;lr"), uri("sip:p2.example.com:5070;lr")]),
            Route::new("Bob", [uri("sips:bob@192.0.2.4;transport=tcp"), uri("sip:[2001:db8::1]")]),
            Route::new(" Carol ", [uri("sip:carol@chicago.com?subject=project")]),
        ];

        for route in routes {
            let raw = route.raw().unwrap();
            assert_eq!(Route::parse(&raw), Ok(route), "{raw}");
        }
    }

    #[test]
    fn test_validate() {
        let route = Route::default();

        assert_eq!(route.validate(), Err(Error::MissingRequiredField("uris")));
        assert_eq!(route.raw(), Err(Error::MissingRequiredField("uris")));
        assert_eq!(route.to_string(), "");

        let route = Route::new("Bob", []);
        assert_eq!(route.raw(), Err(Error::MissingRequiredField("uris")));
        assert_eq!(route.to_string(), "");
    }

    #[test]
    fn test_validate_display_name() {
        for name in ["Al\"ice", "<Bob>", "Bob >", "Carol\r\nRoute: x"] {
            let route = Route::new(name, [uri("sip:a@x")]);

            assert_eq!(route.validate(), Err(Error::InvalidField("display_name")), "{name}");
            assert_eq!(route.raw(), Err(Error::InvalidField("display_name")), "{name}");
            assert_eq!(route.to_string(), "", "{name}");
        }

        let route = Route::new("Doe, John (proxy)", [uri("sip:a@x")]);
        assert_eq!(Route::parse(&route.raw().unwrap()), Ok(route));
    }

    #[test]
    fn test_setters() {
        let mut route = Route::default();
        route.push_uris([uri("sip:a@x")]);
        route.push_uris([uri("sip:b@y"), uri("sip:c@z")]);
        route.push_uri(uri("sip:d@w"));
        route.set_display_name("  ");

        assert_eq!(route.display_name(), None);
        assert_eq!(
            route.uris(),
            [uri("sip:a@x"), uri("sip:b@y"), uri("sip:c@z"), uri("sip:d@w")]
        );

        route.set_display_name(" Alice");
        assert_eq!(route.display_name(), Some("Alice"));
    }

    #[test]
    fn test_from_str() {
        let route: Route = "Route: <sip:a@x>".parse().unwrap();

        assert_eq!(route, Route::new("", [uri("sip:a@x")]));
    }
}
