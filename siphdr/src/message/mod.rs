#![deny(missing_docs)]
//! SIP Message types
//!
//! The values carried inside the headers: the [`Uri`] address
//! unit, generic [`Params`] and the authentication
//! [`Challenge`](auth::Challenge).

pub mod auth;

mod params;
mod uri;

pub use params::*;
pub use uri::*;
