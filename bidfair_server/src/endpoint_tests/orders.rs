use actix_web::{guard, http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bidfair_engine::{
    db_types::{OrderStatusType, Role, ServiceOrder},
    events::EventProducers,
    BidFlowApi,
    BidFlowError,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{
    helpers::{call_protected, issue_token},
    mocks::MockBidFlowBackend,
};
use crate::{
    middleware::AclMiddlewareFactory,
    routes::{create_order, my_orders},
};

pub fn sample_order(id: i64, customer_id: i64) -> ServiceOrder {
    ServiceOrder {
        id,
        customer_id,
        category_id: 1,
        title: "Leaking sink".to_string(),
        description: None,
        postal_code: "01310-100".to_string(),
        status: OrderStatusType::Open,
        created_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 2, 29, 13, 30, 0).unwrap(),
    }
}

fn configure_my_orders(cfg: &mut ServiceConfig) {
    let mut backend = MockBidFlowBackend::new();
    backend.expect_fetch_orders_for_customer().returning(|cid| Ok(vec![sample_order(1, cid)]));
    let api = BidFlowApi::new(backend, EventProducers::default());
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/orders")
            .guard(guard::Get())
            .wrap(AclMiddlewareFactory::new(Role::Customer))
            .to(my_orders::<MockBidFlowBackend>),
    );
}

#[actix_web::test]
async fn my_orders_requires_a_token() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::get().uri("/api/orders");
    let (status, body) = call_protected(req, configure_my_orders).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("An access token is required"), "was: {body}");
}

#[actix_web::test]
async fn my_orders_rejects_partner_tokens() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, Role::Partner);
    let req = TestRequest::get().uri("/api/orders").insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = call_protected(req, configure_my_orders).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("Insufficient permissions"), "was: {body}");
}

#[actix_web::test]
async fn my_orders_rejects_tampered_tokens() {
    let _ = env_logger::try_init().ok();
    let mut token = issue_token(7, Role::Customer);
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let req = TestRequest::get().uri("/api/orders").insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = call_protected(req, configure_my_orders).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.contains("Access token is invalid"), "was: {body}");
}

#[actix_web::test]
async fn my_orders_lists_own_orders() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, Role::Customer);
    let req = TestRequest::get().uri("/api/orders").insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = call_protected(req, configure_my_orders).await;
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<ServiceOrder> = serde_json::from_str(&body).expect("Body must be an order list");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].customer_id, 7);
    assert_eq!(orders[0].title, "Leaking sink");
}

fn configure_create_order(cfg: &mut ServiceConfig) {
    let mut backend = MockBidFlowBackend::new();
    backend.expect_insert_order().returning(|order| {
        if order.category_id == 1 {
            let mut created = sample_order(10, order.customer_id);
            created.title = order.title;
            Ok(created)
        } else {
            Err(BidFlowError::CategoryNotFound(order.category_id))
        }
    });
    let api = BidFlowApi::new(backend, EventProducers::default());
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/orders")
            .guard(guard::Post())
            .wrap(AclMiddlewareFactory::new(Role::Customer))
            .to(create_order::<MockBidFlowBackend>),
    );
}

#[actix_web::test]
async fn create_order_returns_created_order() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, Role::Customer);
    let req = TestRequest::post()
        .uri("/api/orders")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"category_id": 1, "title": "Fix the tap", "postal_code": "01310-100"}));
    let (status, body) = call_protected(req, configure_create_order).await;
    assert_eq!(status, StatusCode::CREATED);
    let order: ServiceOrder = serde_json::from_str(&body).expect("Body must be an order");
    assert_eq!(order.customer_id, 7);
    assert_eq!(order.title, "Fix the tap");
    assert_eq!(order.status, OrderStatusType::Open);
}

#[actix_web::test]
async fn create_order_with_unknown_category_is_not_found() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, Role::Customer);
    let req = TestRequest::post()
        .uri("/api/orders")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"category_id": 99, "title": "Fix the tap", "postal_code": "01310-100"}));
    let (status, body) = call_protected(req, configure_create_order).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Category 99 not found"), "was: {body}");
}
