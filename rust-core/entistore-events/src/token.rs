// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Listener tokens.

use std::fmt;

use rand::Rng;

/// Length of a generated listener token.
pub const TOKEN_LENGTH: usize = 6;

const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Opaque handle returned when a listener is registered.
///
/// Tokens are drawn at random from a space of 36^6 values. Collisions are
/// possible in principle and are not checked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerToken(String);

impl ListenerToken {
    pub(crate) fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let token = (0..TOKEN_LENGTH)
            .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect();
        Self(token)
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ListenerToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

impl fmt::Display for ListenerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_token_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let token = ListenerToken::generate(&mut rng);
        assert_eq!(token.as_str().len(), TOKEN_LENGTH);
        assert!(token
            .as_str()
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_display_matches_inner_string() {
        let token = ListenerToken::from("abc123");
        assert_eq!(token.to_string(), "abc123");
    }
}
