/// Opaque bearer token utilities
///
/// Access tokens are random strings issued at register/login. The plaintext
/// token is returned to the client exactly once; only the SHA-256 hex digest
/// is stored (`models::access_token`). Authenticating a request hashes the
/// presented token and looks the digest up, so logout can revoke a token by
/// deleting its row.
///
/// # Example
///
/// ```
/// use taskhive_shared::auth::token::{generate_token, hash_token, validate_token_format};
///
/// let (token, digest) = generate_token();
///
/// assert!(validate_token_format(&token));
/// assert_eq!(hash_token(&token), digest);
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of the random portion of a token
const TOKEN_RANDOM_LENGTH: usize = 40;

/// Token prefix for easy identification in logs and configs
const TOKEN_PREFIX: &str = "thv_";

/// Total length of a well-formed token
pub const TOKEN_LENGTH: usize = TOKEN_PREFIX.len() + TOKEN_RANDOM_LENGTH;

/// Generates a new access token
///
/// Returns `(token, digest)`: the plaintext token to hand to the client and
/// the SHA-256 hex digest to store.
pub fn generate_token() -> (String, String) {
    let random_part = generate_random_string(TOKEN_RANDOM_LENGTH);
    let token = format!("{}{}", TOKEN_PREFIX, random_part);
    let digest = hash_token(&token);

    (token, digest)
}

fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Computes the SHA-256 hex digest of a token
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Checks that a string looks like a token we issued
///
/// Rejecting malformed tokens early avoids a pointless database lookup.
pub fn validate_token_format(token: &str) -> bool {
    if token.len() != TOKEN_LENGTH {
        return false;
    }

    if !token.starts_with(TOKEN_PREFIX) {
        return false;
    }

    let random_part = &token[TOKEN_PREFIX.len()..];
    random_part.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token_format() {
        let (token, digest) = generate_token();

        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.starts_with(TOKEN_PREFIX));
        assert!(validate_token_format(&token));

        // SHA-256 hex digest is 64 characters
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, hash_token(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_token_format_rejects_garbage() {
        assert!(!validate_token_format(""));
        assert!(!validate_token_format("thv_short"));
        assert!(!validate_token_format(&"x".repeat(TOKEN_LENGTH)));

        // Right length, wrong charset in random part
        let bad = format!("{}{}", TOKEN_PREFIX, "!".repeat(TOKEN_RANDOM_LENGTH));
        assert!(!validate_token_format(&bad));
    }

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(hash_token("thv_abc"), hash_token("thv_abc"));
        assert_ne!(hash_token("thv_abc"), hash_token("thv_abd"));
    }
}
