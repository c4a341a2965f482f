use std::fmt;

use secrecy::{ExposeSecret, Zeroize};

/// The secret key of an account that should be kept private as much as possible.
///
/// The content is wiped from memory when dropped and never shows up in debug output.
pub struct Key(Vec<u8>);

impl Key {
    #[must_use]
    pub fn new(content: Vec<u8>) -> Self {
        Self(content)
    }

    /// Length of the key in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Zeroize for Key {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl ExposeSecret<Vec<u8>> for Key {
    fn expose_secret(&self) -> &Vec<u8> {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key([REDACTED; {} bytes])", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let key = Key::new(vec![1, 2, 3]);
        assert_eq!("Key([REDACTED; 3 bytes])", format!("{key:?}"));
    }

    #[test]
    fn zeroize_clears_content() {
        let mut key = Key::new(vec![1, 2, 3]);
        key.zeroize();
        assert!(key.is_empty());
    }
}
