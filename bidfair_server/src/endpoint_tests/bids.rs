use actix_web::{guard, http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use bf_common::MinorUnits;
use bidfair_engine::{
    db_types::{Bid, BidAcceptance, BidStatusType, OrderStatusType, Role},
    events::EventProducers,
    BidFlowApi,
    BidFlowError,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{
    helpers::{call_protected, issue_token},
    mocks::MockBidFlowBackend,
    orders::sample_order,
};
use crate::{
    data_objects::BidCreatedResponse,
    middleware::AclMiddlewareFactory,
    routes::{accept_bid, submit_bid},
};

fn sample_bid(id: i64, order_id: i64, partner_id: i64) -> Bid {
    Bid {
        id,
        order_id,
        partner_id,
        price: MinorUnits::from(15_000),
        message: None,
        status: BidStatusType::Pending,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
    }
}

fn configure_submit(cfg: &mut ServiceConfig) {
    let mut backend = MockBidFlowBackend::new();
    backend.expect_submit_bid().returning(|bid| {
        if bid.order_id == 5 {
            Ok(77)
        } else {
            Err(BidFlowError::DuplicateBid)
        }
    });
    let api = BidFlowApi::new(backend, EventProducers::default());
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/orders/{order_id}/bids")
            .guard(guard::Post())
            .wrap(AclMiddlewareFactory::new(Role::Partner))
            .to(submit_bid::<MockBidFlowBackend>),
    );
}

#[actix_web::test]
async fn submit_bid_returns_new_id() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(3, Role::Partner);
    let req = TestRequest::post()
        .uri("/api/orders/5/bids")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"price": 15000, "message": "Can come today"}));
    let (status, body) = call_protected(req, configure_submit).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: BidCreatedResponse = serde_json::from_str(&body).expect("Body must be a bid id");
    assert_eq!(created.id, 77);
}

#[actix_web::test]
async fn submit_bid_requires_partner_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(3, Role::Customer);
    let req = TestRequest::post()
        .uri("/api/orders/5/bids")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"price": 15000}));
    let (status, _body) = call_protected(req, configure_submit).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn submit_bid_rejects_non_positive_prices() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(3, Role::Partner);
    let req = TestRequest::post()
        .uri("/api/orders/5/bids")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"price": 0}));
    let (status, body) = call_protected(req, configure_submit).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("positive number of minor currency units"), "was: {body}");
}

#[actix_web::test]
async fn duplicate_bids_conflict() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(3, Role::Partner);
    let req = TestRequest::post()
        .uri("/api/orders/6/bids")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({"price": 15000}));
    let (status, body) = call_protected(req, configure_submit).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.contains("already submitted a bid"), "was: {body}");
}

fn configure_accept(cfg: &mut ServiceConfig) {
    let mut backend = MockBidFlowBackend::new();
    backend.expect_accept_bid().returning(|order_id, bid_id, requester_id| {
        if requester_id != 7 {
            return Err(BidFlowError::NotOrderOwner);
        }
        let mut order = sample_order(order_id, requester_id);
        order.status = OrderStatusType::Committed;
        let mut bid = sample_bid(bid_id, order_id, 3);
        bid.status = BidStatusType::Accepted;
        Ok(BidAcceptance {
            order,
            bid,
            rejected_bids: 2,
            customer_name: "Alice".to_string(),
            customer_phone: "+5511912340001".to_string(),
            partner_name: "Bob".to_string(),
            partner_phone: "+5511912340002".to_string(),
        })
    });
    let api = BidFlowApi::new(backend, EventProducers::default());
    cfg.app_data(web::Data::new(api)).service(
        web::resource("/orders/{order_id}/bids/{bid_id}/accept")
            .guard(guard::Post())
            .wrap(AclMiddlewareFactory::new(Role::Customer))
            .to(accept_bid::<MockBidFlowBackend>),
    );
}

#[actix_web::test]
async fn accept_bid_returns_no_content() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, Role::Customer);
    let req = TestRequest::post()
        .uri("/api/orders/5/bids/77/accept")
        .insert_header(("Authorization", format!("Bearer {token}")));
    let (status, _body) = call_protected(req, configure_accept).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn accept_bid_on_anothers_order_is_forbidden() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(8, Role::Customer);
    let req = TestRequest::post()
        .uri("/api/orders/5/bids/77/accept")
        .insert_header(("Authorization", format!("Bearer {token}")));
    let (status, body) = call_protected(req, configure_accept).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("not authorized to accept bids"), "was: {body}");
}
