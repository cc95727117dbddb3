use crate::{
    api::errors::BidFlowError,
    db_types::{Bid, BidAcceptance, NewBid, NewOrder, ServiceOrder},
};

/// Transactional storage contract for the bid-matching core.
///
/// The order row and its bids are the only contested shared state in the system, and they are
/// mutated exclusively through [`submit_bid`](Self::submit_bid) and
/// [`accept_bid`](Self::accept_bid). Both must run their precondition checks and writes inside
/// a single transaction; the status transitions must be guarded by conditional updates so that
/// concurrent attempts lose with [`BidFlowError::OrderClosed`] or
/// [`BidFlowError::BidAlreadyProcessed`] rather than silently clobbering each other.
#[allow(async_fn_in_trait)]
pub trait BidFlowDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    /// Inserts a new order in the `Open` state and returns it.
    async fn insert_order(&self, order: NewOrder) -> Result<ServiceOrder, BidFlowError>;

    async fn fetch_order(&self, order_id: i64) -> Result<Option<ServiceOrder>, BidFlowError>;

    /// Fetches all orders created by the given customer, newest first.
    async fn fetch_orders_for_customer(&self, customer_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError>;

    /// Fetches every `Open` order whose category is in the given partner's assignment set,
    /// newest first.
    async fn fetch_open_orders_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError>;

    async fn fetch_bids_for_order(&self, order_id: i64) -> Result<Vec<Bid>, BidFlowError>;

    /// In a single transaction: checks that the order exists and is open, that the partner is
    /// assigned to the order's category and has not already bid, then inserts a `Pending` bid
    /// and returns its id.
    ///
    /// The `(order_id, partner_id)` uniqueness constraint backs up the duplicate check; a
    /// unique violation caught from the insert must surface as [`BidFlowError::DuplicateBid`].
    async fn submit_bid(&self, bid: NewBid) -> Result<i64, BidFlowError>;

    /// In a single transaction: verifies the bid belongs to the order and the requester owns
    /// the order, then atomically accepts the target bid, rejects every sibling, and commits
    /// the order. All three writes succeed or none do.
    async fn accept_bid(&self, order_id: i64, bid_id: i64, requester_id: i64) -> Result<BidAcceptance, BidFlowError>;
}
