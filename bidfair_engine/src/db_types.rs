use std::{fmt::Display, str::FromStr};

use bf_common::MinorUnits;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

//--------------------------------------   OrderStatusType   ---------------------------------------------------------
/// The lifecycle states of a service order.
///
/// Orders are created `Open` and accept bids only in that state. The accept-bid transaction is
/// the only code path that moves an order to `Committed`. `Completed` and `Cancelled` are
/// terminal states reserved for the fulfillment workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// The order is accepting bids.
    Open,
    /// A bid has been accepted; no further bids are possible.
    Committed,
    /// The work was carried out. Terminal.
    Completed,
    /// The order was withdrawn. Terminal.
    Cancelled,
}

impl OrderStatusType {
    pub fn accepts_bids(&self) -> bool {
        matches!(self, OrderStatusType::Open)
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::Open => write!(f, "Open"),
            OrderStatusType::Committed => write!(f, "Committed"),
            OrderStatusType::Completed => write!(f, "Completed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Open" => Ok(Self::Open),
            "Committed" => Ok(Self::Committed),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------    BidStatusType    ---------------------------------------------------------
/// The states of a bid. A bid is written exactly once after creation: `Pending → Accepted` or
/// `Pending → Rejected`, always from inside the accept-bid transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum BidStatusType {
    Pending,
    Accepted,
    Rejected,
}

impl Display for BidStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BidStatusType::Pending => write!(f, "Pending"),
            BidStatusType::Accepted => write!(f, "Accepted"),
            BidStatusType::Rejected => write!(f, "Rejected"),
        }
    }
}

impl FromStr for BidStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Accepted" => Ok(Self::Accepted),
            "Rejected" => Ok(Self::Rejected),
            s => Err(ConversionError(format!("Invalid bid status: {s}"))),
        }
    }
}

//--------------------------------------        Role         ---------------------------------------------------------
/// The two trust domains of the marketplace. Session credentials always carry exactly one role,
/// and every protected route checks it; a customer token can never be replayed against a
/// partner-only operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Partner,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Partner => write!(f, "partner"),
        }
    }
}

impl FromStr for Role {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "partner" => Ok(Self::Partner),
            s => Err(ConversionError(format!("Invalid role: {s}"))),
        }
    }
}

//--------------------------------------      Customer       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       Partner       ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    /// Free-text description of the partner's trade and experience.
    pub expertise: Option<String>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   ServiceCategory   ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceCategory {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

//--------------------------------------    ServiceOrder     ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: i64,
    pub customer_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub postal_code: String,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer_id: i64,
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub postal_code: String,
}

impl NewOrder {
    pub fn new(customer_id: i64, category_id: i64, title: String, postal_code: String) -> Self {
        Self { customer_id, category_id, title, description: None, postal_code }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }
}

//--------------------------------------         Bid         ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Bid {
    pub id: i64,
    pub order_id: i64,
    pub partner_id: i64,
    pub price: MinorUnits,
    pub message: Option<String>,
    pub status: BidStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       NewBid        ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBid {
    pub order_id: i64,
    pub partner_id: i64,
    pub price: MinorUnits,
    pub message: Option<String>,
}

impl NewBid {
    pub fn new(order_id: i64, partner_id: i64, price: MinorUnits) -> Self {
        Self { order_id, partner_id, price, message: None }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}

//--------------------------------------    Verification     ---------------------------------------------------------
/// A transient OTP record. At most one exists per identifier; it is deleted the moment it is
/// matched at consume time, whether the match succeeds or is rejected as expired.
#[derive(Debug, Clone, FromRow)]
pub struct Verification {
    pub id: i64,
    pub identifier: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
    /// JSON-encoded staged data for entity creation that completes only on successful
    /// verification (e.g. a pending order's fields before the owning customer exists).
    pub metadata: Option<String>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------    BidAcceptance    ---------------------------------------------------------
/// The result of a successful accept-bid transaction, including both parties' contact details
/// for the outbound notification hook.
#[derive(Debug, Clone)]
pub struct BidAcceptance {
    pub order: ServiceOrder,
    pub bid: Bid,
    /// Number of sibling bids that were moved to `Rejected`.
    pub rejected_bids: u64,
    pub customer_name: String,
    pub customer_phone: String,
    pub partner_name: String,
    pub partner_phone: String,
}
