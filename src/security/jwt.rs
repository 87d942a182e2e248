/// Access token minting and verification.
///
/// The signer is pure: it never touches the database. Client binding and
/// user/client liveness are layered on top by the auth service.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Claims, User, TOKEN_TYPE_ACCESS};

#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    access_ttl: Duration,
}

impl TokenSigner {
    /// Keys are derived once from the configured secret and immutable for the
    /// lifetime of the process.
    pub fn new(secret: &str, access_expiration_hours: i64) -> Self {
        Self::with_ttl(secret, Duration::hours(access_expiration_hours))
    }

    pub fn with_ttl(secret: &str, access_ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
        }
    }

    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Mint a signed access token bound to `client_id`.
    pub fn mint(&self, user: &User, client_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            client_id,
            token_type: TOKEN_TYPE_ACCESS.to_string(),
            iat: now.timestamp(),
            exp: (now + self.access_ttl).timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature, structure and expiry. Tokens missing any required
    /// claim fail decoding and are rejected.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthError;
    use crate::tests::fixtures::{test_signer, test_user};

    #[test]
    fn test_mint_and_verify_roundtrip() {
        let signer = test_signer();
        let user = test_user();
        let client_id = Uuid::new_v4();

        let token = signer.mint(&user, client_id).unwrap();
        assert_eq!(token.matches('.').count(), 2, "expected a three-part JWT");

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.client_id, client_id);
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let signer = test_signer();
        let token = signer.mint(&test_user(), Uuid::new_v4()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('x') { 'y' } else { 'x' });

        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let signer = test_signer();
        let other = TokenSigner::new("a-completely-different-secret", 1);

        let token = signer.mint(&test_user(), Uuid::new_v4()).unwrap();
        assert!(matches!(other.verify(&token), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let signer = TokenSigner::with_ttl("test-secret", Duration::seconds(-10));
        let token = signer.mint(&test_user(), Uuid::new_v4()).unwrap();

        assert!(matches!(
            signer.verify(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let signer = test_signer();
        assert!(matches!(
            signer.verify("not.a.token"),
            Err(AuthError::TokenInvalid)
        ));
    }
}
