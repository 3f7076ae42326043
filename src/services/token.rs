//! Session token generation

use argon2::password_hash::rand_core::{OsRng, RngCore};

/// Random bytes per token (256 bits)
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Length of an encoded token
pub const SESSION_TOKEN_LEN: usize = SESSION_TOKEN_BYTES * 2;

/// Generate an unguessable session token from the OS random source.
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; SESSION_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Whether `token` has the shape of a token produced by `generate_session_token`.
///
/// Lets lookups reject junk cookies without a database round trip.
pub fn is_well_formed_token(token: &str) -> bool {
    token.len() == SESSION_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_length_and_alphabet() {
        let token = generate_session_token();

        assert_eq!(token.len(), 64);
        assert!(is_well_formed_token(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_session_token()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(!is_well_formed_token(""));
        assert!(!is_well_formed_token("abc"));
        assert!(!is_well_formed_token(&"A".repeat(64)));
        assert!(!is_well_formed_token(&"g".repeat(64)));
        assert!(!is_well_formed_token(&"a".repeat(65)));
        assert!(is_well_formed_token(&"0f".repeat(32)));
    }
}
