use otpgen_core::{ExposeSecret, Key, OtpDescriptor, TotpConfig};
use subtle::{Choice, ConstantTimeEq};
use tracing::trace;

use crate::{hotp, Error, OtpCode};

/// Amount of time steps before and after the current one that [`TotpEngine::verify`] accepts.
pub const DEFAULT_SKEW: u64 = 1;
/// Widest window that [`TotpEngine::verify_with_skew`] accepts, in time steps before and after the
/// current one.
pub const MAX_SKEW: u64 = 10;

/// Derive the HOTP counter for a Unix timestamp, which is the amount of full `period`s that passed
/// since the epoch.
pub fn counter_for_time(unix_seconds: i64, period: u64) -> Result<u64, Error> {
    let seconds = u64::try_from(unix_seconds).map_err(|_| Error::InvalidTime(unix_seconds))?;
    seconds
        .checked_div(period)
        .ok_or(Error::Config(otpgen_core::Error::InvalidPeriod))
}

/// Position within the current time step, for callers that display how long a code stays valid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Countdown {
    /// Seconds until the next code, in the range `1..=period`.
    pub remaining: u64,
    /// Elapsed part of the time step, in the range `0.0..1.0`.
    pub progress: f64,
}

/// Generator and verifier of time based OTPs for a single secret.
///
/// The engine is immutable after creation and keeps no state between calls. It can be shared
/// freely between threads.
#[derive(Debug)]
pub struct TotpEngine {
    key: Key,
    config: TotpConfig,
}

impl TotpEngine {
    pub fn new(key: Key, config: TotpConfig) -> Result<Self, Error> {
        if key.is_empty() {
            return Err(Error::EmptySecret);
        }

        Ok(Self { key, config })
    }

    pub fn from_descriptor(descriptor: OtpDescriptor) -> Result<Self, Error> {
        Self::new(descriptor.secret, descriptor.config)
    }

    #[must_use]
    pub fn config(&self) -> &TotpConfig {
        &self.config
    }

    /// HOTP counter of the time step that `now` falls into.
    pub fn counter(&self, now: i64) -> Result<u64, Error> {
        counter_for_time(now, self.config.period())
    }

    /// The code for an explicit time step counter.
    pub fn code_at_counter(&self, counter: u64) -> Result<OtpCode, Error> {
        hotp::compute(
            self.key.expose_secret(),
            counter,
            self.config.digits(),
            self.config.algorithm(),
        )
    }

    /// The code that is valid at `now`.
    pub fn current_code(&self, now: i64) -> Result<OtpCode, Error> {
        self.code_at_counter(self.counter(now)?)
    }

    /// Check a code entered by a user, accepting [`DEFAULT_SKEW`] steps of clock difference.
    pub fn verify(&self, candidate: &str, now: i64) -> Result<bool, Error> {
        self.verify_with_skew(candidate, now, DEFAULT_SKEW)
    }

    /// Check a code entered by a user against all codes from `skew_steps` time steps before until
    /// `skew_steps` after the one of `now`.
    ///
    /// Candidates that can't be a code at all, because of their length or non-digit characters,
    /// are rejected right away. Otherwise every code in the window is computed and compared in
    /// constant time. A `skew_steps` above [`MAX_SKEW`] fails with [`Error::SkewTooLarge`].
    pub fn verify_with_skew(
        &self,
        candidate: &str,
        now: i64,
        skew_steps: u64,
    ) -> Result<bool, Error> {
        if candidate.len() != usize::from(self.config.digits())
            || !candidate.bytes().all(|b| b.is_ascii_digit())
        {
            trace!("rejected malformed candidate");
            return Ok(false);
        }

        if skew_steps > MAX_SKEW {
            return Err(Error::SkewTooLarge(skew_steps));
        }

        let counter = self.counter(now)?;
        let first = counter.saturating_sub(skew_steps);
        let last = counter.saturating_add(skew_steps);

        let mut matched = Choice::from(0);
        for step in first..=last {
            let code = self.code_at_counter(step)?;
            matched |= candidate.as_bytes().ct_eq(code.as_str().as_bytes());
        }

        let matched = bool::from(matched);
        trace!(counter, skew_steps, matched, "verified candidate");

        Ok(matched)
    }

    /// Seconds until the code of `now` expires, in the range `1..=period`.
    pub fn seconds_remaining(&self, now: i64) -> Result<u64, Error> {
        let seconds = u64::try_from(now).map_err(|_| Error::InvalidTime(now))?;
        let period = self.config.period();

        Ok(period - seconds % period)
    }

    /// Elapsed fraction of the time step that `now` falls into, in the range `0.0..1.0`.
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_fraction(&self, now: i64) -> Result<f64, Error> {
        let period = self.config.period();
        let remaining = self.seconds_remaining(now)?;

        Ok((period - remaining) as f64 / period as f64)
    }

    pub fn countdown(&self, now: i64) -> Result<Countdown, Error> {
        Ok(Countdown {
            remaining: self.seconds_remaining(now)?,
            progress: self.progress_fraction(now)?,
        })
    }
}

impl TryFrom<OtpDescriptor> for TotpEngine {
    type Error = Error;

    fn try_from(descriptor: OtpDescriptor) -> Result<Self, Self::Error> {
        Self::from_descriptor(descriptor)
    }
}
