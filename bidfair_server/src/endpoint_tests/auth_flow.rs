use actix_web::{guard, http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bidfair_engine::{db_types::{Customer, Role}, VerificationApi, VerificationError};
use chrono::Utc;
use serde_json::json;

use super::{
    helpers::{call_public, get_auth_config},
    mocks::MockVerificationBackend,
};
use crate::{
    auth::{TokenIssuer, TokenValidator},
    data_objects::TokenResponse,
    routes::{customer_auth_request, customer_auth_verify, partner_auth_register, partner_auth_request},
};

fn sample_customer(phone: &str, name: &str) -> Customer {
    Customer {
        id: 42,
        name: name.to_string(),
        phone: phone.to_string(),
        email: None,
        phone_verified_at: Some(Utc::now()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn configure_verify_ok(cfg: &mut ServiceConfig) {
    let mut backend = MockVerificationBackend::new();
    backend.expect_take_verification().returning(|_, _| Ok(None));
    backend.expect_upsert_customer_on_verify().returning(|phone, name| Ok(sample_customer(phone, name)));
    let api = VerificationApi::new(backend);
    cfg.app_data(web::Data::new(api)).app_data(web::Data::new(TokenIssuer::new(&get_auth_config()))).service(
        web::resource("/auth/customer/verify")
            .guard(guard::Post())
            .to(customer_auth_verify::<MockVerificationBackend>),
    );
}

#[actix_web::test]
async fn customer_verify_returns_valid_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/auth/customer/verify")
        .set_json(json!({"phone": "+5511912340001", "code": "123456", "name": "Alice"}));
    let (status, body) = call_public(req, configure_verify_ok).await;
    assert_eq!(status, StatusCode::OK);
    let token: TokenResponse = serde_json::from_str(&body).expect("Body must be a token response");
    let claims = TokenValidator::new(&get_auth_config()).validate(&token.token).expect("Token must validate");
    assert_eq!(claims.sub, 42);
    assert_eq!(claims.role, Role::Customer);
}

fn configure_verify_bad_code(cfg: &mut ServiceConfig) {
    let mut backend = MockVerificationBackend::new();
    backend.expect_take_verification().returning(|_, _| Err(VerificationError::InvalidCode));
    let api = VerificationApi::new(backend);
    cfg.app_data(web::Data::new(api)).app_data(web::Data::new(TokenIssuer::new(&get_auth_config()))).service(
        web::resource("/auth/customer/verify")
            .guard(guard::Post())
            .to(customer_auth_verify::<MockVerificationBackend>),
    );
}

#[actix_web::test]
async fn customer_verify_rejects_bad_code() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/auth/customer/verify")
        .set_json(json!({"phone": "+5511912340001", "code": "999999"}));
    let (status, body) = call_public(req, configure_verify_bad_code).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Invalid verification code"), "was: {body}");
}

fn configure_request(cfg: &mut ServiceConfig) {
    let mut backend = MockVerificationBackend::new();
    backend.expect_replace_verification().returning(|_, _, _, _| Ok(()));
    let api = VerificationApi::new(backend);
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/auth/customer/request")
            .guard(guard::Post())
            .to(customer_auth_request::<MockVerificationBackend>),
    );
}

#[actix_web::test]
async fn customer_request_issues_code() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/auth/customer/request").set_json(json!({"phone": "+55 11 91234-0001"}));
    let (status, _body) = call_public(req, configure_request).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn customer_request_rejects_garbage_phone() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/auth/customer/request").set_json(json!({"phone": "not a phone"}));
    let (status, body) = call_public(req, configure_request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid identifier"), "was: {body}");
}

fn configure_register_conflict(cfg: &mut ServiceConfig) {
    let mut backend = MockVerificationBackend::new();
    backend.expect_partner_contact_exists().returning(|_, _| Ok(true));
    let api = VerificationApi::new(backend);
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/auth/partner/register")
            .guard(guard::Post())
            .to(partner_auth_register::<MockVerificationBackend>),
    );
}

#[actix_web::test]
async fn partner_register_conflicts_on_existing_contact() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/auth/partner/register")
        .set_json(json!({"name": "Bob", "email": "bob@example.com", "phone": "+5511912340002"}));
    let (status, body) = call_public(req, configure_register_conflict).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already exists"), "was: {body}");
}

fn configure_partner_request_unknown(cfg: &mut ServiceConfig) {
    let mut backend = MockVerificationBackend::new();
    backend.expect_fetch_partner_by_phone().returning(|_| Ok(None));
    let api = VerificationApi::new(backend);
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/auth/partner/request")
            .guard(guard::Post())
            .to(partner_auth_request::<MockVerificationBackend>),
    );
}

#[actix_web::test]
async fn partner_request_unknown_number_is_not_found() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/auth/partner/request").set_json(json!({"phone": "+5511912340003"}));
    let (status, body) = call_public(req, configure_partner_request_unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No account found"), "was: {body}");
}
