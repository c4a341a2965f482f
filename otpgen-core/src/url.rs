use serde::Deserialize;
use tracing::debug;

use crate::{base32, Algorithm, Error, Key, OtpDescriptor, OtpType, SecretString, TotpConfig};

/// Any error that can happen when parsing an [`OtpDescriptor`] from an URI.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The URI is malformed or misses required information.
    #[error("invalid otpauth URI")]
    InvalidUri(#[from] InvalidUri),
    /// The URI describes a valid OTP type other than TOTP.
    #[error("OTP type is `{0}` but only `totp` is supported")]
    UnsupportedOtpType(String),
}

/// The specific reason why an URI was rejected with [`ParseError::InvalidUri`].
#[derive(Debug, thiserror::Error)]
pub enum InvalidUri {
    /// The input didn't form a valid URL.
    #[error("the URL is not valid")]
    Url(#[from] url::ParseError),
    /// An unknown scheme was used in the URL.
    #[error("the scheme `{0}` is not supported, only `otpauth`")]
    Scheme(String),
    /// The host part of the URL was missing.
    #[error("host (otp type) is missing")]
    MissingHost,
    /// The `secret` parameter was missing or empty.
    #[error("the `secret` parameter is missing")]
    MissingSecret,
    /// The `secret` parameter isn't valid Base32.
    #[error("the `secret` parameter is malformed")]
    Secret(#[source] Error),
    /// Parameters of the URL failed to deserialize.
    #[error("parameters failed to deserialize")]
    Deserialize(#[from] serde_qs::Error),
    /// The label was no proper UTF-8 after percent decoding.
    #[error("label is not valid UTF-8")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    /// The `digits`, `period` or `algorithm` parameter was given without a value.
    #[error("the `{0}` parameter is empty")]
    EmptyParameter(&'static str),
    /// The `digits`, `period` or `algorithm` parameter had an unacceptable value.
    #[error("the parameters describe an invalid configuration")]
    Config(#[source] Error),
}

/// Parameters that fall back to a default when absent, but must carry a value when present.
const CONFIG_PARAMS: [&str; 3] = ["algorithm", "digits", "period"];

#[derive(Deserialize)]
struct Params {
    secret: Option<String>,
    issuer: Option<String>,
    algorithm: Option<String>,
    digits: Option<u8>,
    period: Option<u64>,
}

impl Params {
    fn config(&self) -> Result<TotpConfig, Error> {
        let mut config = TotpConfig::default();

        if let Some(digits) = self.digits {
            config = config.with_digits(digits)?;
        }
        if let Some(period) = self.period {
            config = config.with_period(period)?;
        }
        if let Some(algorithm) = &self.algorithm {
            config = config.with_algorithm(algorithm.parse::<Algorithm>()?);
        }

        Ok(config)
    }
}

/// Parse an `otpauth://totp/...` URI into a descriptor.
///
/// Only the `secret` parameter is required. Unknown parameters are ignored.
pub fn parse(value: &str) -> Result<OtpDescriptor, ParseError> {
    let url = url::Url::parse(value).map_err(InvalidUri::from)?;

    if url.scheme() != "otpauth" {
        return Err(InvalidUri::Scheme(url.scheme().to_owned()).into());
    }

    let otp_type = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or(InvalidUri::MissingHost)?;

    if otp_type != "totp" {
        return Err(ParseError::UnsupportedOtpType(otp_type.to_owned()));
    }

    if let Some(name) = CONFIG_PARAMS.into_iter().find(|param| {
        url.query_pairs()
            .any(|(name, value)| name == *param && value.trim().is_empty())
    }) {
        return Err(InvalidUri::EmptyParameter(name).into());
    }

    let query = url.query().unwrap_or_default();
    let params = serde_qs::from_str::<Params>(query).map_err(InvalidUri::from)?;

    let encoded = params
        .secret
        .as_deref()
        .filter(|secret| !secret.trim().is_empty())
        .ok_or(InvalidUri::MissingSecret)?;
    let secret = base32::decode(encoded).map_err(InvalidUri::Secret)?;
    let config = params.config().map_err(InvalidUri::Config)?;

    let path = url.path();
    let label = path.strip_prefix('/').unwrap_or(path);
    let label = percent_encoding::percent_decode_str(label)
        .decode_utf8()
        .map_err(InvalidUri::from)?;

    debug!(
        digits = config.digits(),
        period = config.period(),
        algorithm = %config.algorithm(),
        has_issuer = params.issuer.is_some(),
        "parsed otpauth URI"
    );

    Ok(OtpDescriptor {
        otp_type: OtpType::Totp,
        label: label.into_owned(),
        encoded_secret: SecretString::new(encoded.to_owned()),
        secret: Key::new(secret),
        issuer: params.issuer,
        config,
    })
}
