use serde::{Deserialize, Serialize};

use crate::db_types::{Bid, BidAcceptance, ServiceOrder};

/// Published after the accept-bid transaction commits. Carries enough contact information for
/// the outbound notifier to message both parties without further database reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidAcceptedEvent {
    pub order: ServiceOrder,
    pub bid: Bid,
    pub customer_name: String,
    pub customer_phone: String,
    pub partner_name: String,
    pub partner_phone: String,
}

impl From<&BidAcceptance> for BidAcceptedEvent {
    fn from(acceptance: &BidAcceptance) -> Self {
        Self {
            order: acceptance.order.clone(),
            bid: acceptance.bid.clone(),
            customer_name: acceptance.customer_name.clone(),
            customer_phone: acceptance.customer_phone.clone(),
            partner_name: acceptance.partner_name.clone(),
            partner_phone: acceptance.partner_phone.clone(),
        }
    }
}
