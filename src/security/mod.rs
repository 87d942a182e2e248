pub mod jwt;
pub mod password;

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate an opaque token with 32 bytes of entropy, hex-encoded.
/// Used for refresh tokens and client secrets.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 hex digest, used for client secrets at rest.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_tokens_are_unique_and_sized() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_eq!(a.len(), 64); // 32 bytes hex-encoded
        assert_ne!(a, b);
    }

    #[test]
    fn sha256_hex_is_deterministic() {
        assert_eq!(sha256_hex("secret"), sha256_hex("secret"));
        assert_ne!(sha256_hex("secret"), sha256_hex("secret2"));
    }
}
