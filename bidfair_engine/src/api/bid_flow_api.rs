use std::fmt::Debug;

use log::*;

use crate::{
    api::errors::BidFlowError,
    db_types::{Bid, BidAcceptance, NewBid, NewOrder, ServiceOrder},
    events::{BidAcceptedEvent, EventProducers},
    traits::BidFlowDatabase,
};

/// `BidFlowApi` is the primary API for the order and bid lifecycle: customers post orders,
/// partners bid on them, and the customer commits an order by accepting exactly one bid.
pub struct BidFlowApi<B> {
    db: B,
    producers: EventProducers,
}

impl<B> Debug for BidFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BidFlowApi")
    }
}

impl<B> BidFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers }
    }
}

impl<B> BidFlowApi<B>
where B: BidFlowDatabase
{
    /// Create a new service order in the `Open` state on behalf of the given customer.
    pub async fn create_order(&self, order: NewOrder) -> Result<ServiceOrder, BidFlowError> {
        let order = self.db.insert_order(order).await?;
        debug!("📋️ Order #{} [{}] created for customer #{}", order.id, order.title, order.customer_id);
        Ok(order)
    }

    pub async fn fetch_order(&self, order_id: i64) -> Result<Option<ServiceOrder>, BidFlowError> {
        self.db.fetch_order(order_id).await
    }

    pub async fn orders_for_customer(&self, customer_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError> {
        self.db.fetch_orders_for_customer(customer_id).await
    }

    /// Every `Open` order in one of the partner's assigned categories.
    pub async fn open_orders_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError> {
        self.db.fetch_open_orders_for_partner(partner_id).await
    }

    /// The bids on an order, restricted to the order's owner.
    pub async fn bids_for_owned_order(&self, order_id: i64, customer_id: i64) -> Result<Vec<Bid>, BidFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(BidFlowError::OrderNotFound(order_id))?;
        if order.customer_id != customer_id {
            return Err(BidFlowError::NotOrderOwner);
        }
        self.db.fetch_bids_for_order(order_id).await
    }

    /// Submit a new bid on an open order.
    ///
    /// The price must be a positive number of minor currency units; everything else (order
    /// open, partner authorised for the category, no prior bid) is checked inside the storage
    /// transaction.
    pub async fn submit_bid(&self, bid: NewBid) -> Result<i64, BidFlowError> {
        if !bid.price.is_positive() {
            return Err(BidFlowError::InvalidPrice(bid.price.value()));
        }
        let bid_id = self.db.submit_bid(bid).await?;
        Ok(bid_id)
    }

    /// Accept one bid on an order the requester owns. Exactly one bid ends up `Accepted`, every
    /// sibling is `Rejected` and the order moves to `Committed`, all in one transaction. The
    /// bid-accepted hook fires after the transaction commits.
    pub async fn accept_bid(
        &self,
        order_id: i64,
        bid_id: i64,
        requester_id: i64,
    ) -> Result<BidAcceptance, BidFlowError> {
        let acceptance = self.db.accept_bid(order_id, bid_id, requester_id).await?;
        self.call_bid_accepted_hook(&acceptance).await;
        info!(
            "📋️ Bid #{bid_id} by {} accepted on order #{order_id}; {} other bids rejected",
            acceptance.partner_name, acceptance.rejected_bids
        );
        Ok(acceptance)
    }

    async fn call_bid_accepted_hook(&self, acceptance: &BidAcceptance) {
        for emitter in &self.producers.bid_accepted_producer {
            debug!("📋️ Notifying bid-accepted hook subscribers");
            let event = BidAcceptedEvent::from(acceptance);
            emitter.publish_event(event).await;
        }
    }
}
