use std::{
    fmt::{self, Display},
    str::FromStr,
};

use crate::Error;

/// Most common amount of digits for OTPs.
pub const DEFAULT_DIGITS: u8 = 6;
/// Smallest amount of digits a code may have.
pub const MIN_DIGITS: u8 = 6;
/// Largest amount of digits a code may have. The truncated HMAC value is a 31-bit integer, so any
/// further digit would always be zero.
pub const MAX_DIGITS: u8 = 10;
/// Most common time step in seconds.
pub const DEFAULT_PERIOD: u64 = 30;

/// Algorithm used in the OTP generation to create the final code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// SHA-1 algorithm, most common.
    #[default]
    Sha1,
    /// SHA(2)-256 algorithm.
    Sha256,
    /// SHA(2)-512 algorithm.
    Sha512,
}

impl Algorithm {
    /// Name of the algorithm, as used in `otpauth://` URIs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sha1 => "SHA1",
            Self::Sha256 => "SHA256",
            Self::Sha512 => "SHA512",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s.eq_ignore_ascii_case("sha1") {
            Self::Sha1
        } else if s.eq_ignore_ascii_case("sha256") {
            Self::Sha256
        } else if s.eq_ignore_ascii_case("sha512") {
            Self::Sha512
        } else {
            return Err(Error::UnsupportedAlgorithm(s.to_owned()));
        })
    }
}

/// Parameters that control how codes are generated from a secret.
///
/// Values can only be created through validating constructors, so every instance holds a digit
/// count within [`MIN_DIGITS`]..=[`MAX_DIGITS`] and a period of at least one second.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TotpConfig {
    digits: u8,
    period: u64,
    algorithm: Algorithm,
}

impl TotpConfig {
    pub fn new(digits: u8, period: u64, algorithm: Algorithm) -> Result<Self, Error> {
        Self::default()
            .with_digits(digits)?
            .with_period(period)
            .map(|config| config.with_algorithm(algorithm))
    }

    pub fn with_digits(self, digits: u8) -> Result<Self, Error> {
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            return Err(Error::InvalidDigits(digits));
        }

        Ok(Self { digits, ..self })
    }

    pub fn with_period(self, period: u64) -> Result<Self, Error> {
        if period == 0 {
            return Err(Error::InvalidPeriod);
        }

        Ok(Self { period, ..self })
    }

    #[must_use]
    pub fn with_algorithm(self, algorithm: Algorithm) -> Self {
        Self { algorithm, ..self }
    }

    /// Amount of digits in each generated code.
    #[inline(always)]
    #[must_use]
    pub fn digits(&self) -> u8 {
        self.digits
    }

    /// Seconds that a single code stays valid.
    #[inline(always)]
    #[must_use]
    pub fn period(&self) -> u64 {
        self.period
    }

    #[inline(always)]
    #[must_use]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Default for TotpConfig {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
            algorithm: Algorithm::Sha1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_case_insensitive() {
        assert_eq!(Algorithm::Sha1, "sha1".parse().unwrap());
        assert_eq!(Algorithm::Sha256, "Sha256".parse().unwrap());
        assert_eq!(Algorithm::Sha512, "SHA512".parse().unwrap());
    }

    #[test]
    fn algorithm_unsupported() {
        let err = "MD5".parse::<Algorithm>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedAlgorithm(name) if name == "MD5"));
    }

    #[test]
    fn defaults() {
        let config = TotpConfig::default();
        assert_eq!(6, config.digits());
        assert_eq!(30, config.period());
        assert_eq!(Algorithm::Sha1, config.algorithm());
    }

    #[test]
    fn digit_range() {
        assert!(TotpConfig::new(6, 30, Algorithm::Sha1).is_ok());
        assert!(TotpConfig::new(10, 30, Algorithm::Sha1).is_ok());
        assert!(matches!(
            TotpConfig::new(5, 30, Algorithm::Sha1),
            Err(Error::InvalidDigits(5))
        ));
        assert!(matches!(
            TotpConfig::new(11, 30, Algorithm::Sha1),
            Err(Error::InvalidDigits(11))
        ));
    }

    #[test]
    fn zero_period() {
        assert!(matches!(
            TotpConfig::new(6, 0, Algorithm::Sha1),
            Err(Error::InvalidPeriod)
        ));
    }

    #[test]
    fn builder_keeps_other_values() {
        let config = TotpConfig::default()
            .with_algorithm(Algorithm::Sha512)
            .with_period(60)
            .unwrap();
        assert_eq!(6, config.digits());
        assert_eq!(60, config.period());
        assert_eq!(Algorithm::Sha512, config.algorithm());
    }
}
