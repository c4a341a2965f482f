//! # Otpgen Engine
//!
//! Generator component of **otpgen**. It creates and verifies time based one-time passwords
//! (RFC 6238) for any descriptor from the [`otpgen_core`] component.
//!
//! The engine never reads the system clock. Every time dependent operation takes the current Unix
//! time in seconds as argument, so callers decide where time comes from and how often codes are
//! refreshed.

#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc, clippy::cast_possible_truncation)]

use std::fmt::{self, Display};

use hmac::digest::InvalidLength;
pub use otpgen_core::{Algorithm, Key, OtpDescriptor, TotpConfig};

pub use self::totp::{counter_for_time, Countdown, TotpEngine, DEFAULT_SKEW, MAX_SKEW};

pub mod hotp;
mod totp;

/// Errors that can occur when generating or verifying an OTP.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The secret key has no content.
    #[error("the secret key is empty")]
    EmptySecret,
    /// The given timestamp lies before the Unix epoch.
    #[error("timestamp {0} is before the unix epoch")]
    InvalidTime(i64),
    /// The verification window is wider than [`MAX_SKEW`] steps in either direction.
    #[error("a skew of {0} steps exceeds the maximum of {max}", max = MAX_SKEW)]
    SkewTooLarge(u64),
    /// The time step used to derive a counter is invalid.
    #[error("invalid TOTP configuration")]
    Config(#[from] otpgen_core::Error),
    /// The provided key was rejected by the HMAC.
    #[error("the given key has an invalid length")]
    KeyLength(#[from] InvalidLength),
}

/// A generated OTP code that can be used to verify identity against a service.
///
/// The code is always exactly as long as the configured amount of digits, shifted with zeroes on
/// the left if the numeric value is shorter.
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
    fn new(value: u32, digits: u8) -> Self {
        Self(format!("{value:0>width$}", width = usize::from(digits)))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OtpCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for OtpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OtpCode([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::OtpCode;

    #[test]
    fn code_display() {
        assert_eq!("000123", OtpCode::new(123, 6).to_string());
        assert_eq!("00000123", OtpCode::new(123, 8).to_string());
        assert_eq!("2147483647", OtpCode::new(0x7fff_ffff, 10).to_string());
    }

    #[test]
    fn code_debug_is_redacted() {
        assert_eq!("OtpCode([REDACTED])", format!("{:?}", OtpCode::new(755_224, 6)));
    }
}
