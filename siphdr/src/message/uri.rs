use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
};

use itertools::Itertools;
use thiserror::Error;
use util::Scanner;

use crate::extract::ALPHANUMERIC;
use crate::macros::lookup_table;

use super::{Param, Params};

/// Unreserved characters in user, password, uri and header
/// parameters in SIP uris.
const UNRESERVED: &[u8] = b"-_.!~*'()%";
/// Escaped character in SIP URIs.
const ESCAPED: &[u8] = b"%";
/// Unreserverd charaters in user part of SIP URIs.
const USER_UNRESERVED: &[u8] = b"&=+$,;?/";
/// Password valid characters in SIP URIs.
const PASS: &[u8] = b"&=+$,";
/// Valid characters in SIP URIs host part.
const HOST: &[u8] = b"_-.";
/// The lr param used in SIP URIs.
const LR_PARAM: &str = "lr";
/// The transport param used in SIP URIs.
const TRANSPORT_PARAM: &str = "transport";

// For reading user in uri.
lookup_table!(USER_TAB => ALPHANUMERIC, UNRESERVED, USER_UNRESERVED, ESCAPED);
// For reading password in uri.
lookup_table!(PASS_TAB => ALPHANUMERIC, UNRESERVED, ESCAPED, PASS);
// For reading host in uri.
lookup_table!(HOST_TAB => ALPHANUMERIC, HOST);
// For reading parameter in uri.
lookup_table!(PARAM_TAB => b"[]/:&+$", ALPHANUMERIC, UNRESERVED, ESCAPED);
// For reading header parameter in uri.
lookup_table!(HDR_TAB => b"[]/?:+$", ALPHANUMERIC, UNRESERVED, ESCAPED);

/// Errors returned while parsing an [`Uri`].
#[derive(Debug, PartialEq, Eq, Clone, Error)]
pub enum UriError {
    /// Nothing to parse.
    #[error("the uri is empty")]
    Empty,

    /// A scheme other than `sip` or `sips`.
    #[error("unsupported uri scheme '{0}'")]
    UnsupportedScheme(String),

    /// The host part is missing.
    #[error("missing host in uri")]
    MissingHost,

    /// A bracketed host that is not an IPv6 address.
    #[error("invalid IPv6 reference '{0}'")]
    InvalidIpv6(String),

    /// A port that is not a number or does not fit in `u16`.
    #[error("invalid port in uri")]
    InvalidPort,

    /// A byte left after the uri headers.
    #[error("unexpected '{found}' in uri at column {col}")]
    Unexpected {
        /// The unexpected character.
        found: char,
        /// Its column in the trimmed uri.
        col: usize,
    },

    /// The scanner failed, e.g, the `:` after the scheme is missing.
    #[error("malformed uri: {0}")]
    Scan(#[from] util::Error),
}

#[derive(Debug, PartialEq, Eq, Clone, Default, Copy)]
/// A SIP URI scheme, either `sip` or `sips`.
pub enum Scheme {
    #[default]
    /// An Sip uri scheme.
    Sip,
    /// An Sips uri scheme.
    Sips,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Sip => f.write_str("sip"),
            Scheme::Sips => f.write_str("sips"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
/// Represents the user information component of a URI.
pub struct UserInfo {
    /// The username part of the URI.
    pub user: String,

    /// The optional password associated with the user.
    pub pass: Option<String>,
}

impl UserInfo {
    /// Creates an `UserInfo` without password.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
/// Represents the host part of a URI, which can be either a domain name or an IP address.
pub enum Host {
    /// A domain name, such as `example.com`.
    DomainName(String),

    /// An IP address, either IPv4 or IPv6.
    IpAddr(IpAddr),
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Host::DomainName(domain) => f.write_str(domain),
            Host::IpAddr(IpAddr::V6(ip_addr)) => write!(f, "[{ip_addr}]"),
            Host::IpAddr(ip_addr) => write!(f, "{ip_addr}"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
/// Represents a combination of a host (domain or IP address) and an optional port.
pub struct HostPort {
    /// The host part, which may be a domain name or an IP address.
    pub host: Host,

    /// The optional port number.
    pub port: Option<u16>,
}

impl HostPort {
    /// Creates a new `HostPort` from a host and optional port.
    pub fn new(host: Host, port: Option<u16>) -> Self {
        Self { host, port }
    }
}

impl From<Host> for HostPort {
    fn from(host: Host) -> Self {
        Self { host, port: None }
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{port}")?;
        }
        Ok(())
    }
}

/// An SIP uri.
///
/// The target address carried by address headers such as
/// `Route`.
///
/// # Examples
///
/// ```
/// use siphdr::message::{Host, Uri};
///
/// let uri: Uri = "sip:alice@atlanta.com:5060;transport=tcp".parse().unwrap();
///
/// assert_eq!(uri.host_port.host, Host::DomainName("atlanta.com".into()));
/// assert_eq!(uri.host_port.port, Some(5060));
/// assert_eq!(uri.transport_param(), Some("tcp"));
/// assert_eq!(uri.to_string(), "sip:alice@atlanta.com:5060;transport=tcp");
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Uri {
    /// The uri scheme.
    pub scheme: Scheme,

    /// Optional user part of uri.
    pub user: Option<UserInfo>,

    /// The uri host.
    pub host_port: HostPort,

    /// The uri parameters, e.g, `;lr`.
    pub params: Params,

    /// The uri headers, e.g, `?subject=project`.
    pub headers: Params,
}

impl Uri {
    /// Creates an `Uri` instance without parameters.
    pub fn new(scheme: Scheme, user: Option<UserInfo>, host_port: HostPort) -> Self {
        Uri {
            scheme,
            user,
            host_port,
            params: Params::new(),
            headers: Params::new(),
        }
    }

    /// Adds the uri parameter `name`.
    pub fn with_param(mut self, name: &str, value: Option<&str>) -> Self {
        self.params.set(name, value);
        self
    }

    /// Parses a SIP uri.
    ///
    /// Leading and trailing whitespace is ignored. Anything
    /// left after the uri headers is an error.
    pub fn parse(s: &str) -> Result<Self, UriError> {
        /*
         * SIP-URI          =  "sip:" [ userinfo ] hostport
         *                     uri-parameters [ headers ]
         * SIPS-URI         =  "sips:" [ userinfo ] hostport
         *                     uri-parameters [ headers ]
         * userinfo         =  ( user / telephone-subscriber ) [ ":" password ] "@"
         */
        let s = s.trim();
        if s.is_empty() {
            return Err(UriError::Empty);
        }
        let mut scanner = Scanner::new(s.as_bytes());

        let scheme = parse_scheme(&mut scanner)?;
        let user = parse_user_info(&mut scanner)?;
        let host_port = parse_host_port(&mut scanner)?;

        let mut params = Params::new();
        while scanner.advance_if_eq(b';').is_some() {
            let name = scanner.read_str(is_param)?;
            let value = match scanner.advance_if_eq(b'=') {
                Some(_) => Some(scanner.read_str(is_param)?),
                None => None,
            };
            params.push(Param::new(name, value));
        }

        let mut headers = Params::new();
        if scanner.advance_if_eq(b'?').is_some() {
            loop {
                let name = scanner.read_str(is_hdr)?;
                scanner.must_read(b'=')?;
                let value = scanner.read_str(is_hdr)?;
                headers.push(Param::new(name, Some(value)));

                if scanner.advance_if_eq(b'&').is_none() {
                    break;
                }
            }
        }

        if let Some(&found) = scanner.peek() {
            return Err(UriError::Unexpected {
                found: char::from(found),
                col: scanner.position().col(),
            });
        }

        Ok(Uri {
            scheme,
            user,
            host_port,
            params,
            headers,
        })
    }

    /// Returns `true` if the uri has the `lr` parameter.
    pub fn lr_param(&self) -> bool {
        self.params.contains(LR_PARAM)
    }

    /// Returns the `transport` parameter.
    pub fn transport_param(&self) -> Option<&str> {
        self.params.get(TRANSPORT_PARAM).flatten()
    }
}

impl FromStr for Uri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;

        if let Some(user) = &self.user {
            f.write_str(&user.user)?;
            if let Some(pass) = &user.pass {
                write!(f, ":{pass}")?;
            }
            f.write_str("@")?;
        }
        write!(f, "{}{}", self.host_port, self.params)?;

        if !self.headers.is_empty() {
            let formater = self.headers.iter().format_with("&", |it, f| {
                f(&format_args!("{}={}", it.name, it.value.as_deref().unwrap_or("")))
            });
            write!(f, "?{formater}")?;
        }

        Ok(())
    }
}

fn parse_scheme(scanner: &mut Scanner) -> Result<Scheme, UriError> {
    let scheme = scanner.read_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    scanner.must_read(b':')?;

    if scheme.eq_ignore_ascii_case(b"sip") {
        Ok(Scheme::Sip)
    } else if scheme.eq_ignore_ascii_case(b"sips") {
        Ok(Scheme::Sips)
    } else {
        Err(UriError::UnsupportedScheme(String::from_utf8_lossy(scheme).into_owned()))
    }
}

fn parse_user_info(scanner: &mut Scanner) -> Result<Option<UserInfo>, UriError> {
    let has_user = scanner
        .remaining()
        .iter()
        .take_while(|&&b| b != b'?')
        .any(|&b| b == b'@');
    if !has_user {
        return Ok(None);
    }

    let user = scanner.read_str(is_user)?.to_owned();
    let pass = match scanner.advance_if_eq(b':') {
        Some(_) => Some(scanner.read_str(is_pass)?.to_owned()),
        None => None,
    };
    scanner.must_read(b'@')?;

    Ok(Some(UserInfo { user, pass }))
}

fn parse_host_port(scanner: &mut Scanner) -> Result<HostPort, UriError> {
    let host = if scanner.advance_if_eq(b'[').is_some() {
        let ip = scanner.read_str(|b| b != b']')?;
        scanner.must_read(b']')?;
        let ip = ip
            .parse::<Ipv6Addr>()
            .map_err(|_| UriError::InvalidIpv6(ip.to_owned()))?;

        Host::IpAddr(IpAddr::V6(ip))
    } else {
        let host = scanner.read_str(is_host)?;
        if host.is_empty() {
            return Err(UriError::MissingHost);
        }
        match host.parse::<Ipv4Addr>() {
            Ok(ip) => Host::IpAddr(IpAddr::V4(ip)),
            Err(_) => Host::DomainName(host.to_owned()),
        }
    };

    let port = match scanner.advance_if_eq(b':') {
        Some(_) => Some(scanner.read_num::<u16>().map_err(|_| UriError::InvalidPort)?),
        None => None,
    };

    Ok(HostPort { host, port })
}

#[inline(always)]
fn is_user(b: u8) -> bool {
    USER_TAB[b as usize]
}

#[inline(always)]
fn is_pass(b: u8) -> bool {
    PASS_TAB[b as usize]
}

#[inline(always)]
fn is_host(b: u8) -> bool {
    HOST_TAB[b as usize]
}

#[inline(always)]
fn is_param(b: u8) -> bool {
    PARAM_TAB[b as usize]
}

#[inline(always)]
fn is_hdr(b: u8) -> bool {
    HDR_TAB[b as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! uri_test_ok {
        (name: $name:ident, input: $input:literal, expected: $expected:expr) => {
            #[test]
            fn $name() -> Result<(), UriError> {
                let uri = Uri::parse($input)?;

                assert_eq!(uri, $expected);
                assert_eq!(uri.to_string(), $input.trim());

                Ok(())
            }
        };
    }

    uri_test_ok! {
        name: uri_test_domain,
        input: "sip:biloxi.com",
        expected: Uri::new(Scheme::Sip, None, Host::DomainName("biloxi.com".into()).into())
    }

    uri_test_ok! {
        name: uri_test_port,
        input: "sip:biloxi.com:5060",
        expected: Uri::new(
            Scheme::Sip,
            None,
            HostPort::new(Host::DomainName("biloxi.com".into()), Some(5060))
        )
    }

    uri_test_ok! {
        name: uri_test_user_and_pass,
        input: "sips:alice:secret@atlanta.com",
        expected: Uri::new(
            Scheme::Sips,
            Some(UserInfo { user: "alice".into(), pass: Some("secret".into()) }),
            Host::DomainName("atlanta.com".into()).into()
        )
    }

    uri_test_ok! {
        name: uri_test_ipv4_and_params,
        input: "sip:bob@192.0.2.4;transport=udp;lr",
        expected: Uri::new(
            Scheme::Sip,
            Some(UserInfo::new("bob")),
            Host::IpAddr("192.0.2.4".parse().unwrap()).into()
        )
        .with_param("transport", Some("udp"))
        .with_param("lr", None)
    }

    uri_test_ok! {
        name: uri_test_ipv6,
        input: "sip:[2001:db8::10]:5070",
        expected: Uri::new(
            Scheme::Sip,
            None,
            HostPort::new(Host::IpAddr("2001:db8::10".parse().unwrap()), Some(5070))
        )
    }

    #[test]
    fn test_parse_headers() {
        let uri = Uri::parse("sip:carol@chicago.com?subject=project&priority=urgent").unwrap();

        assert_eq!(uri.headers.get("subject"), Some(Some("project")));
        assert_eq!(uri.headers.get("priority"), Some(Some("urgent")));
        assert_eq!(uri.to_string(), "sip:carol@chicago.com?subject=project&priority=urgent");
    }

    #[test]
    fn test_parse_user_with_semicolon() {
        let uri = Uri::parse("sip:+1-212-555-1212;phone-context=example.com@gw.example.com;user=phone").unwrap();

        assert_eq!(uri.user, Some(UserInfo::new("+1-212-555-1212;phone-context=example.com")));
        assert_eq!(uri.host_port.host, Host::DomainName("gw.example.com".into()));
        assert_eq!(uri.params.get("user"), Some(Some("phone")));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let uri = Uri::parse("  sip:p1.example.com;lr ").unwrap();

        assert!(uri.lr_param());
        assert_eq!(uri.to_string(), "sip:p1.example.com;lr");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Uri::parse(""), Err(UriError::Empty));
        assert_eq!(
            Uri::parse("tel:+1-201-555-0123"),
            Err(UriError::UnsupportedScheme("tel".into()))
        );
        assert_eq!(Uri::parse("sip:;lr"), Err(UriError::MissingHost));
        assert_eq!(Uri::parse("sip:a.com:99999"), Err(UriError::InvalidPort));
        assert_eq!(Uri::parse("sip:[::zz]"), Err(UriError::InvalidIpv6("::zz".into())));
        assert_eq!(
            Uri::parse("sip:a.com;foo=\"1"),
            Err(UriError::Unexpected { found: '"', col: 15 })
        );
        assert_matches!(Uri::parse("bob@a.com"), Err(UriError::Scan(_)));
    }
}
