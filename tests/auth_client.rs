//! The consuming side of the validation contract, exercised against a stub
//! issuer: non-2xx answers mean "unauthenticated", whatever the body says.

use std::net::SocketAddr;

use axum::{http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use chrono::Utc;
use uuid::Uuid;

use auth_service::client::AuthClient;
use auth_service::error::AuthError;
use auth_service::models::{UserResponse, ValidateTokenRequest};

fn stub_identity() -> UserResponse {
    UserResponse {
        id: Uuid::new_v4(),
        email: "a@x.com".to_string(),
        name: "A".to_string(),
        active: true,
        created_at: Utc::now(),
    }
}

/// Stub issuer that accepts exactly one (token, client_id) pair. Rejections
/// deliberately carry an identity-shaped body to prove the client ignores it.
async fn spawn_stub(
    identity: UserResponse,
    accepted_token: String,
    accepted_client: Uuid,
) -> SocketAddr {
    let app = Router::new().route(
        "/api/v1/validate",
        post(move |Json(req): Json<ValidateTokenRequest>| {
            let identity = identity.clone();
            let accepted_token = accepted_token.clone();
            async move {
                if req.token == accepted_token && req.client_id == accepted_client {
                    Json(identity).into_response()
                } else {
                    (StatusCode::UNAUTHORIZED, Json(identity)).into_response()
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });
    addr
}

#[tokio::test]
async fn valid_token_yields_the_owning_identity() {
    let identity = stub_identity();
    let client_id = Uuid::new_v4();
    let addr = spawn_stub(identity.clone(), "good-token".to_string(), client_id).await;

    let client = AuthClient::new(format!("http://{addr}"), client_id).unwrap();
    let user = client.validate_token("good-token").await.unwrap();

    assert_eq!(user.id, identity.id);
    assert_eq!(user.email, identity.email);
}

#[tokio::test]
async fn rejected_token_is_unauthenticated_even_with_a_body() {
    let client_id = Uuid::new_v4();
    let addr = spawn_stub(stub_identity(), "good-token".to_string(), client_id).await;

    let client = AuthClient::new(format!("http://{addr}"), client_id).unwrap();
    let result = client.validate_token("stolen-token").await;

    assert!(matches!(result, Err(AuthError::TokenInvalid)));
}

#[tokio::test]
async fn client_forwards_its_own_registered_client_id() {
    // The stub only accepts the id the AuthClient was constructed with; a
    // client registered under a different id must come back unauthenticated.
    let registered = Uuid::new_v4();
    let addr = spawn_stub(stub_identity(), "good-token".to_string(), registered).await;

    let other = AuthClient::new(format!("http://{addr}"), Uuid::new_v4()).unwrap();
    assert!(other.validate_token("good-token").await.is_err());

    let right = AuthClient::new(format!("http://{addr}"), registered).unwrap();
    assert!(right.validate_token("good-token").await.is_ok());
}

#[tokio::test]
async fn unreachable_issuer_is_an_internal_error_not_an_identity() {
    let client = AuthClient::new("http://127.0.0.1:1", Uuid::new_v4()).unwrap();
    let result = client.validate_token("any").await;

    assert!(matches!(result, Err(AuthError::Internal(_))));
}
