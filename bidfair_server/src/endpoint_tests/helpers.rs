use actix_web::{
    body::MessageBody,
    http::StatusCode,
    test,
    test::TestRequest,
    web::ServiceConfig,
    App,
};
use bf_common::Secret;
use bidfair_engine::db_types::Role;

use crate::{
    auth::{TokenIssuer, TokenValidator},
    config::AuthConfig,
    middleware::JwtMiddlewareFactory,
};

// Creates a test `AuthConfig` for issuing tokens. DO NOT re-use this secret anywhere.
pub fn get_auth_config() -> AuthConfig {
    AuthConfig { jwt_secret: Secret::new("endpoint-test-signing-secret-0000".to_string()) }
}

pub fn issue_token(account_id: i64, role: Role) -> String {
    let signer = TokenIssuer::new(&get_auth_config());
    signer.issue_token(account_id, role).expect("Failed to sign token")
}

/// Builds an app with the test signing secret, mounts `configure` behind the JWT middleware
/// under `/api`, and fires the request.
pub async fn call_protected(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let validator = TokenValidator::new(&get_auth_config());
    let scope = actix_web::web::scope("/api").wrap(JwtMiddlewareFactory::new(validator)).configure(configure);
    let app = App::new().service(scope);
    let service = test::init_service(app).await;
    // Middleware errors come back as `Err`; render them the way the real server would.
    let res = match test::try_call_service(&service, req.to_request()).await {
        Ok(res) => res.map_into_boxed_body().into_parts().1,
        Err(err) => err.error_response(),
    };
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}

/// Builds an app from public routes only and fires the request.
pub async fn call_public(req: TestRequest, configure: fn(&mut ServiceConfig)) -> (StatusCode, String) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    let (_req, res) = test::call_service(&service, req.to_request()).await.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    (status, body)
}
