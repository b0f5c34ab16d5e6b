use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::headers::SipHeader;
use crate::message::auth::Challenge;

use super::www_authenticate::{digest_challenge, parse_challenge};

/// The `Proxy-Authenticate` SIP header.
///
/// The authentication requirements from a proxy server to a
/// client. Encoded like [`WWWAuthenticate`](super::WWWAuthenticate).
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct ProxyAuthenticate(Challenge);

impl ProxyAuthenticate {
    /// Creates a challenge with the usual digest parameters,
    /// empty values are left out.
    pub fn new(scheme: &str, realm: &str, nonce: &str, algorithm: &str) -> Self {
        Self(digest_challenge(scheme, realm, nonce, algorithm))
    }

    /// The challenge carried by this header.
    pub fn challenge(&self) -> &Challenge {
        &self.0
    }

    /// Mutable access to the challenge.
    pub fn challenge_mut(&mut self) -> &mut Challenge {
        &mut self.0
    }
}

impl From<Challenge> for ProxyAuthenticate {
    fn from(challenge: Challenge) -> Self {
        Self(challenge)
    }
}

impl SipHeader for ProxyAuthenticate {
    const NAME: &'static str = "Proxy-Authenticate";
    /*
     * Proxy-Authenticate  =  "Proxy-Authenticate" HCOLON challenge
     */
    fn parse(raw: &str) -> Result<Self> {
        let proxy_auth = ProxyAuthenticate(parse_challenge(raw, Self::NAME)?);
        proxy_auth.validate()?;

        Ok(proxy_auth)
    }

    fn validate(&self) -> Result<()> {
        self.0.validate()
    }
}

impl FromStr for ProxyAuthenticate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        <ProxyAuthenticate as SipHeader>::parse(s)
    }
}

impl fmt::Display for ProxyAuthenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.validate().is_err() {
            return Ok(());
        }
        write!(f, "{}", self.0)
    }
}
