//! SIP Auth types
//!
use std::fmt;

use itertools::Itertools;
use util::Scanner;

use crate::error::{Error, Result, SyntaxError};
use crate::extract::is_token;
use crate::macros::comma_separated;

use super::{Param, Params};

/// The realm param used in challenges.
const REALM: &str = "realm";
/// The nonce param used in challenges.
const NONCE: &str = "nonce";
/// The algorithm param used in challenges.
const ALGORITHM: &str = "algorithm";
/// The domain param used in challenges.
const DOMAIN: &str = "domain";
/// The opaque param used in challenges.
const OPAQUE: &str = "opaque";
/// The stale param used in challenges.
const STALE: &str = "stale";
/// The qop param used in challenges.
const QOP: &str = "qop";

/// An authentication challenge, as used in `WWW-Authenticate`
/// and `Proxy-Authenticate` headers.
///
/// Holds the scheme token and its parameters in the order
/// they were given. The well known digest parameters are
/// available as accessors over the same list, any other
/// parameter is kept as is.
///
/// # Examples
///
/// ```
/// use siphdr::message::auth::Challenge;
///
/// let challenge = Challenge::new("Digest")
///     .with_param("realm", "atlanta.com")
///     .with_param("nonce", "84a4cc6f3082121f32b42a2187831a9e");
///
/// assert_eq!(challenge.realm(), Some("atlanta.com"));
/// assert_eq!(
///     challenge.to_string(),
///     "Digest realm=\"atlanta.com\",nonce=\"84a4cc6f3082121f32b42a2187831a9e\""
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Challenge {
    scheme: String,
    params: Params,
}

impl Challenge {
    /// Creates a challenge for `scheme` without parameters.
    pub fn new(scheme: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            params: Params::new(),
        }
    }

    /// Sets the parameter `name` to `value`, see [`Challenge::set_param`].
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_param(name, value);
        self
    }

    /// Sets the parameter `name` to `value`.
    ///
    /// An existing parameter keeps its position in the
    /// serialized challenge.
    pub fn set_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.params.set(name, Some(value));
    }

    /// The authentication scheme, e.g, `Digest`.
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Replaces the authentication scheme.
    pub fn set_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into();
    }

    /// All the parameters, in order.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Returns the value of the parameter `name`.
    ///
    /// A parameter given without value is returned as an
    /// empty string.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|value| value.unwrap_or(""))
    }

    /// The `realm` parameter.
    pub fn realm(&self) -> Option<&str> {
        self.param(REALM)
    }

    /// The `nonce` parameter.
    pub fn nonce(&self) -> Option<&str> {
        self.param(NONCE)
    }

    /// The `algorithm` parameter.
    pub fn algorithm(&self) -> Option<&str> {
        self.param(ALGORITHM)
    }

    /// The `domain` parameter.
    pub fn domain(&self) -> Option<&str> {
        self.param(DOMAIN)
    }

    /// The `opaque` parameter.
    pub fn opaque(&self) -> Option<&str> {
        self.param(OPAQUE)
    }

    /// The `stale` parameter.
    pub fn stale(&self) -> Option<&str> {
        self.param(STALE)
    }

    /// The `qop` parameter.
    pub fn qop(&self) -> Option<&str> {
        self.param(QOP)
    }

    /// Checks that the challenge can be encoded.
    ///
    /// The scheme and the parameter names must be tokens and a
    /// value can not hold a quote or a line break, as values are
    /// written quoted without escaping. The `realm` and `nonce`
    /// parameters are not required here, that is up to the
    /// authentication layer.
    pub fn validate(&self) -> Result<()> {
        if self.scheme.trim().is_empty() {
            return Err(Error::MissingRequiredField("scheme"));
        }
        if !self.scheme.bytes().all(is_token) {
            return Err(Error::InvalidField("scheme"));
        }
        for Param { name, value } in self.params.iter() {
            if name.is_empty() || !name.bytes().all(is_token) {
                return Err(Error::InvalidField("param_name"));
            }
            if value.as_deref().is_some_and(|v| v.contains(['"', '\r', '\n'])) {
                return Err(Error::InvalidField("param_value"));
            }
        }
        Ok(())
    }

    pub(crate) fn parse(scanner: &mut Scanner) -> Result<Self> {
        /*
         * challenge        =  ("Digest" LWS digest-cln *(COMMA digest-cln))
         *                     / other-challenge
         * other-challenge  =  auth-scheme LWS auth-param
         *                     *(COMMA auth-param)
         * auth-param       =  auth-param-name EQUAL
         *                     ( token / quoted-string )
         */
        util::space!(scanner);
        let scheme = scanner.read_str(is_token)?;
        if scheme.is_empty() {
            return Err(Error::MissingRequiredField("scheme"));
        }
        let mut challenge = Challenge::new(scheme);

        util::space!(scanner);
        if scanner.is_eof() {
            return Ok(challenge);
        }

        comma_separated!(scanner => {
            let Param { name, value } = parse_auth_param(scanner)?;
            challenge.params.set(name, value);
        });

        if let Some(&found) = scanner.peek() {
            let msg = format!("unexpected '{}' after challenge parameters", char::from(found));
            return Err(SyntaxError::new(msg, Scanner::position(scanner)).into());
        }

        Ok(challenge)
    }
}

fn parse_auth_param(scanner: &mut Scanner) -> Result<Param> {
    let name = scanner.read_str(is_token)?;
    if name.is_empty() {
        return Err(SyntaxError::new("expected a parameter name", Scanner::position(scanner)).into());
    }
    util::space!(scanner);

    let value = match scanner.advance_if_eq(b'=') {
        Some(_) => {
            util::space!(scanner);
            let value = match scanner.peek() {
                Some(b'"') => std::str::from_utf8(scanner.read_between(b'"')?)
                    .map_err(|_| SyntaxError::new("invalid utf-8 in quoted value", Scanner::position(scanner)))?,
                _ => scanner.read_str(is_token)?,
            };
            Some(value)
        }
        None => None,
    };
    util::space!(scanner);

    Ok(Param::new(name, value))
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.scheme)?;
        if self.params.is_empty() {
            return Ok(());
        }

        let formater = self.params.iter().format_with(",", |param, f| match &param.value {
            Some(value) => f(&format_args!("{}=\"{}\"", param.name, value)),
            None => f(&param.name),
        });
        write!(f, " {formater}")
    }
}
