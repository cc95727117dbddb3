use bf_common::MinorUnits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneRequest {
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerVerifyRequest {
    pub phone: String,
    pub code: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerRegisterRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub expertise: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub phone: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of the staged-order request: the order fields plus the phone to verify and the name to
/// record against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedOrderRequest {
    pub phone: String,
    pub name: String,
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmedResponse {
    pub order_id: i64,
    pub customer_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBidRequest {
    pub price: MinorUnits,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidCreatedResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAssignmentRequest {
    pub category_ids: Vec<i64>,
}
