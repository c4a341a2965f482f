//! # Otpgen Core
//!
//! Core component of **otpgen** that is shared between all other components and serves as building
//! block. The main piece of interest is the [`OtpDescriptor`] and its related data. It describes a
//! single TOTP account, usually parsed from an `otpauth://` URI, and contains all information
//! needed to create new codes.

#![deny(rust_2018_idioms, clippy::all, clippy::pedantic)]
#![allow(clippy::inline_always, clippy::missing_errors_doc)]

#[cfg(feature = "otpurl")]
use std::str::FromStr;

pub use key::Key;
pub use secrecy::{ExposeSecret, SecretString};

pub use self::config::{
    Algorithm, TotpConfig, DEFAULT_DIGITS, DEFAULT_PERIOD, MAX_DIGITS, MIN_DIGITS,
};
#[cfg(feature = "otpurl")]
pub use self::url::{parse, InvalidUri, ParseError};

pub mod base32;
mod config;
mod key;
#[cfg(feature = "otpurl")]
mod url;

/// Errors for the basic building blocks, like decoding secrets or validating a [`TotpConfig`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The secret is not valid RFC 4648 Base32.
    #[error("the secret is not valid Base32")]
    InvalidEncoding(#[from] data_encoding::DecodeError),
    /// The hash algorithm name is none of the supported ones.
    #[error("algorithm `{0}` is not supported, only `SHA1`, `SHA256` or `SHA512`")]
    UnsupportedAlgorithm(String),
    /// Amount of digits outside of the allowed range.
    #[error("digits must be between 6 and 10, but got {0}")]
    InvalidDigits(u8),
    /// A period of zero seconds.
    #[error("the period must be at least one second")]
    InvalidPeriod,
}

/// Variation of OTP that a descriptor describes. Only time based OTPs are supported, other types
/// found in `otpauth://` URIs are rejected during parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum OtpType {
    /// Time based, see RFC 6238.
    Totp,
}

/// Description of a single TOTP account, containing all information needed to create codes for it.
#[derive(Debug)]
pub struct OtpDescriptor {
    /// The kind of OTP, always [`OtpType::Totp`].
    pub otp_type: OtpType,
    /// Free form label, kept exactly as found in the URI (after percent decoding). It often takes
    /// the form `issuer:account`, see [`Self::label_issuer`] and [`Self::account`].
    pub label: String,
    /// Optional issuer, as given by the `issuer` parameter.
    pub issuer: Option<String>,
    /// The secret in its original Base32 transport form.
    pub encoded_secret: SecretString,
    /// The decoded secret key.
    pub secret: Key,
    /// Parameters that control the code generation.
    pub config: TotpConfig,
}

impl OtpDescriptor {
    /// Issuer prefix of the label, if the label is in the `issuer:account` form.
    #[must_use]
    pub fn label_issuer(&self) -> Option<&str> {
        self.label
            .split_once(':')
            .map(|(issuer, _)| issuer)
            .filter(|issuer| !issuer.is_empty())
    }

    /// Account name part of the label. This is the whole label if it carries no issuer prefix.
    #[must_use]
    pub fn account(&self) -> &str {
        self.label
            .split_once(':')
            .map_or(self.label.as_str(), |(_, account)| account.trim_start())
    }
}

#[cfg(feature = "otpurl")]
impl FromStr for OtpDescriptor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::url::parse(s)
    }
}
