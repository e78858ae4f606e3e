//! Base types shared by the cookie jar and the campaign tracker.
//!
//! - [`CookieError`](error::CookieError): failures while serializing, parsing or
//!   storing a cookie
//! - [`Clock`](clock::Clock): injectable time source for expiration math

pub mod clock;
pub mod error;
