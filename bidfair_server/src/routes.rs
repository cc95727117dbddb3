//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two MUST go
//! into a separate module. Keep this module neat and tidy 🙏
//!
//! Since each worker thread processes its requests sequentially, handlers which block the
//! current thread will cause the current worker to stop processing new requests. Express any
//! long, non-cpu-bound operation (I/O, database calls) as a future so workers can interleave
//! requests.

use actix_web::{get, web, HttpResponse};
use bidfair_engine::{
    db_types::{NewBid, NewOrder, Role},
    traits::{AccountManagement, BidFlowDatabase, VerificationManagement},
    AccountApi,
    BidFlowApi,
    StagedOrder,
    VerificationApi,
};
use log::*;

use crate::{
    auth::{AuthContext, TokenIssuer},
    data_objects::{
        BidCreatedResponse,
        CategoryAssignmentRequest,
        CustomerVerifyRequest,
        NewBidRequest,
        NewOrderRequest,
        OrderConfirmedResponse,
        PartnerRegisterRequest,
        PhoneRequest,
        StagedOrderRequest,
        TokenResponse,
        VerifyRequest,
    },
    errors::ServerError,
    notify,
};

//--------------------------------------   Public routes    ----------------------------------------------------------

/// Route handler for the health check endpoint
#[get("/health")]
pub async fn health() -> HttpResponse {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Route handler for listing all service categories.
pub async fn categories<B>(api: web::Data<AccountApi<B>>) -> Result<HttpResponse, ServerError>
where B: AccountManagement {
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Route handler for requesting a customer login code.
pub async fn customer_auth_request<B>(
    api: web::Data<VerificationApi<B>>,
    body: web::Json<PhoneRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement,
{
    let issued = api.request_customer_code(&body.phone).await?;
    notify::deliver_code(&issued);
    Ok(HttpResponse::NoContent().finish())
}

/// Route handler for verifying a customer login code. Returns a customer access token.
pub async fn customer_auth_verify<B>(
    api: web::Data<VerificationApi<B>>,
    signer: web::Data<TokenIssuer>,
    body: web::Json<CustomerVerifyRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement + AccountManagement,
{
    let customer = api.verify_customer(&body.phone, &body.code, body.name.as_deref()).await?;
    let token = signer.issue_token(customer.id, Role::Customer)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Route handler for staging a partner registration. The partner record is only created when
/// the code is verified.
pub async fn partner_auth_register<B>(
    api: web::Data<VerificationApi<B>>,
    body: web::Json<PartnerRegisterRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement + AccountManagement,
{
    let body = body.into_inner();
    let issued = api.register_partner(&body.name, &body.email, &body.phone, body.expertise).await?;
    notify::deliver_code(&issued);
    Ok(HttpResponse::NoContent().finish())
}

/// Route handler for requesting a partner login code. The partner must already exist.
pub async fn partner_auth_request<B>(
    api: web::Data<VerificationApi<B>>,
    body: web::Json<PhoneRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement + AccountManagement,
{
    let issued = api.request_partner_code(&body.phone).await?;
    notify::deliver_code(&issued);
    Ok(HttpResponse::NoContent().finish())
}

/// Route handler for verifying a partner code (registration or login). Returns a partner
/// access token.
pub async fn partner_auth_verify<B>(
    api: web::Data<VerificationApi<B>>,
    signer: web::Data<TokenIssuer>,
    body: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement + AccountManagement,
{
    let partner = api.verify_partner(&body.phone, &body.code).await?;
    let token = signer.issue_token(partner.id, Role::Partner)?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}

/// Route handler for staging an order without an authenticated session. The order fields ride
/// along with the verification code and are only persisted on confirmation.
pub async fn order_request<B>(
    api: web::Data<VerificationApi<B>>,
    body: web::Json<StagedOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement,
{
    let body = body.into_inner();
    let staged = StagedOrder {
        name: body.name,
        category_id: body.category_id,
        title: body.title,
        description: body.description,
        postal_code: body.postal_code,
    };
    let issued = api.request_order_code(&body.phone, staged).await?;
    notify::deliver_code(&issued);
    Ok(HttpResponse::NoContent().finish())
}

/// Route handler for confirming a staged order. Creates the customer account if needed and the
/// order itself.
pub async fn order_confirm<B>(
    api: web::Data<VerificationApi<B>>,
    body: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: VerificationManagement + AccountManagement + BidFlowDatabase,
{
    let (customer, order) = api.verify_staged_order(&body.phone, &body.code).await?;
    Ok(HttpResponse::Created().json(OrderConfirmedResponse { order_id: order.id, customer_id: customer.id }))
}

//--------------------------------------  Customer routes   ----------------------------------------------------------

/// Route handler for a customer creating an order from an authenticated session.
pub async fn create_order<B>(
    auth: AuthContext,
    api: web::Data<BidFlowApi<B>>,
    body: web::Json<NewOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: BidFlowDatabase,
{
    let body = body.into_inner();
    let mut order = NewOrder::new(auth.account_id, body.category_id, body.title, body.postal_code);
    if let Some(description) = body.description {
        order = order.with_description(description);
    }
    let order = api.create_order(order).await?;
    Ok(HttpResponse::Created().json(order))
}

/// Route handler for listing the authenticated customer's own orders.
pub async fn my_orders<B>(auth: AuthContext, api: web::Data<BidFlowApi<B>>) -> Result<HttpResponse, ServerError>
where B: BidFlowDatabase {
    let orders = api.orders_for_customer(auth.account_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Route handler for listing the bids on one of the authenticated customer's orders.
pub async fn order_bids<B>(
    auth: AuthContext,
    api: web::Data<BidFlowApi<B>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError>
where
    B: BidFlowDatabase,
{
    let order_id = path.into_inner();
    let bids = api.bids_for_owned_order(order_id, auth.account_id).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// Route handler for accepting a bid. Commits the order and rejects every other bid.
pub async fn accept_bid<B>(
    auth: AuthContext,
    api: web::Data<BidFlowApi<B>>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, ServerError>
where
    B: BidFlowDatabase,
{
    let (order_id, bid_id) = path.into_inner();
    api.accept_bid(order_id, bid_id, auth.account_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

//--------------------------------------  Partner routes    ----------------------------------------------------------

/// Route handler for listing open orders in the authenticated partner's categories.
pub async fn partner_open_orders<B>(
    auth: AuthContext,
    api: web::Data<BidFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: BidFlowDatabase,
{
    let orders = api.open_orders_for_partner(auth.account_id).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Route handler for replacing the authenticated partner's category assignments.
pub async fn assign_categories<B>(
    auth: AuthContext,
    api: web::Data<AccountApi<B>>,
    body: web::Json<CategoryAssignmentRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement,
{
    api.assign_categories(auth.account_id, &body.category_ids).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Route handler for submitting a bid on an open order.
pub async fn submit_bid<B>(
    auth: AuthContext,
    api: web::Data<BidFlowApi<B>>,
    path: web::Path<i64>,
    body: web::Json<NewBidRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: BidFlowDatabase,
{
    let order_id = path.into_inner();
    let body = body.into_inner();
    let mut bid = NewBid::new(order_id, auth.account_id, body.price);
    if let Some(message) = body.message {
        bid = bid.with_message(message);
    }
    let id = api.submit_bid(bid).await?;
    Ok(HttpResponse::Created().json(BidCreatedResponse { id }))
}
