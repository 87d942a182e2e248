/// Shared fixtures for unit tests (no database required).
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use uuid::Uuid;

use crate::models::{Claims, User};
use crate::security::jwt::TokenSigner;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "password1";
pub const TEST_EMAIL: &str = "a@x.com";

pub fn test_signer() -> TokenSigner {
    TokenSigner::new(TEST_SECRET, 1)
}

pub fn test_user() -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        email: TEST_EMAIL.to_string(),
        password_hash: String::new(),
        name: "A".to_string(),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn claims_for(user: &User, client_id: Uuid, token_type: &str) -> Claims {
    let now = Utc::now();
    Claims {
        sub: user.id,
        email: user.email.clone(),
        client_id,
        token_type: token_type.to_string(),
        iat: now.timestamp(),
        exp: (now + chrono::Duration::hours(1)).timestamp(),
    }
}

/// Sign arbitrary claims with the test secret, bypassing the signer.
/// Used to craft tokens the signer itself would never mint.
pub fn sign_raw<T: serde::Serialize>(claims: &T) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("signing test claims should succeed")
}
