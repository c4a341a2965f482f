//! RFC 4648 Base32, the transport encoding for secrets in `otpauth://` URIs.
//!
//! Decoding is lenient about the form secrets are usually shared in: whitespace is ignored, case
//! doesn't matter and trailing `=` padding may be missing or excessive. The decoded bytes are
//! still the canonical RFC 4648 mapping.

use data_encoding::BASE32_NOPAD;

use crate::Error;

/// Decode a Base32 string into raw bytes.
///
/// Fails with [`Error::InvalidEncoding`] if the input contains characters outside of `A-Z2-7`
/// (ignoring case, whitespace and trailing padding) or the last group has an impossible length.
pub fn decode(text: &str) -> Result<Vec<u8>, Error> {
    let mut cleaned = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect::<String>();

    let unpadded = cleaned.trim_end_matches('=').len();
    cleaned.truncate(unpadded);

    BASE32_NOPAD
        .decode(cleaned.as_bytes())
        .map_err(Error::InvalidEncoding)
}

/// Encode raw bytes as Base32 string, without padding.
#[must_use]
pub fn encode(value: &[u8]) -> String {
    BASE32_NOPAD.encode(value)
}
