use std::fmt;
use std::str::FromStr;

use util::Scanner;

use crate::error::{Error, Result};
use crate::extract;
use crate::headers::SipHeader;
use crate::message::auth::Challenge;
use crate::message::Params;

/// The `WWW-Authenticate` SIP header.
///
/// Consists of at least one challenge the
/// authentication scheme(s) and parameters applicable
/// to the `Request-URI`.
///
/// Parameter values are always written quoted, a parameter
/// without value is written as its bare name.
///
/// # Examples
///
/// ```
/// use siphdr::headers::{SipHeader, WWWAuthenticate};
///
/// let www_auth = WWWAuthenticate::new("Digest", "atlanta.com", "f84f1cec41e6cbe5", "MD5");
///
/// assert_eq!(
///     www_auth.raw().unwrap(),
///     "WWW-Authenticate: Digest realm=\"atlanta.com\",nonce=\"f84f1cec41e6cbe5\",algorithm=\"MD5\"\r\n"
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct WWWAuthenticate(Challenge);

impl WWWAuthenticate {
    /// Creates a challenge with the usual digest parameters.
    ///
    /// Empty `realm`, `nonce` or `algorithm` values are left
    /// out.
    pub fn new(scheme: &str, realm: &str, nonce: &str, algorithm: &str) -> Self {
        Self(digest_challenge(scheme, realm, nonce, algorithm))
    }

    /// Creates a challenge for `scheme` without parameters.
    pub fn with_scheme(scheme: impl Into<String>) -> Self {
        Self(Challenge::new(scheme))
    }

    /// Sets the parameter `name`, see [`Challenge::set_param`].
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.set_param(name, value);
        self
    }

    /// Sets the parameter `name`, an existing parameter keeps
    /// its position.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.set_param(name, value);
    }

    /// The challenge carried by this header.
    pub fn challenge(&self) -> &Challenge {
        &self.0
    }

    /// The authentication scheme.
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// The `realm` parameter.
    pub fn realm(&self) -> Option<&str> {
        self.0.realm()
    }

    /// The `nonce` parameter.
    pub fn nonce(&self) -> Option<&str> {
        self.0.nonce()
    }

    /// The `algorithm` parameter.
    pub fn algorithm(&self) -> Option<&str> {
        self.0.algorithm()
    }

    /// Returns the parameter `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.0.param(name)
    }

    /// All the challenge parameters, in order.
    pub fn params(&self) -> &Params {
        self.0.params()
    }
}

impl From<Challenge> for WWWAuthenticate {
    fn from(challenge: Challenge) -> Self {
        Self(challenge)
    }
}

impl SipHeader for WWWAuthenticate {
    const NAME: &'static str = "WWW-Authenticate";
    /*
     * WWW-Authenticate  =  "WWW-Authenticate" HCOLON challenge
     */
    fn parse(raw: &str) -> Result<Self> {
        let www_auth = WWWAuthenticate(parse_challenge(raw, Self::NAME)?);
        www_auth.validate()?;

        Ok(www_auth)
    }

    fn validate(&self) -> Result<()> {
        self.0.validate()
    }
}

impl FromStr for WWWAuthenticate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        <WWWAuthenticate as SipHeader>::parse(s)
    }
}

impl fmt::Display for WWWAuthenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() {
            return Ok(());
        }
        write!(f, "{}", self.0)
    }
}

pub(super) fn digest_challenge(scheme: &str, realm: &str, nonce: &str, algorithm: &str) -> Challenge {
    let mut challenge = Challenge::new(scheme);

    for (name, value) in [("realm", realm), ("nonce", nonce), ("algorithm", algorithm)] {
        if !value.is_empty() {
            challenge.set_param(name, value);
        }
    }
    challenge
}

/// Decodes the challenge of an authentication header.
pub(super) fn parse_challenge(raw: &str, name: &'static str) -> Result<Challenge> {
    let raw = extract::normalize_newlines(raw);
    let tail = extract::strip_header_tag(&raw, name)?;
    let challenge = Challenge::parse(&mut Scanner::new(tail.as_bytes()))?;

    tracing::trace!(
        header = name,
        scheme = challenge.scheme(),
        params = challenge.params().len(),
        "decoded header"
    );
    Ok(challenge)
}
