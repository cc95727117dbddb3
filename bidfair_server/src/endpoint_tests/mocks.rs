use bidfair_engine::{
    db_types::{Bid, BidAcceptance, Customer, NewBid, NewOrder, Partner, ServiceCategory, ServiceOrder},
    traits::{AccountManagement, BidFlowDatabase, VerificationManagement},
    AccountApiError,
    BidFlowError,
    VerificationError,
};
use chrono::{DateTime, Utc};
use mockall::mock;

mock! {
    pub BidFlowBackend {}
    impl Clone for BidFlowBackend {
        fn clone(&self) -> Self;
    }
    impl BidFlowDatabase for BidFlowBackend {
        fn url(&self) -> &str;
        async fn insert_order(&self, order: NewOrder) -> Result<ServiceOrder, BidFlowError>;
        async fn fetch_order(&self, order_id: i64) -> Result<Option<ServiceOrder>, BidFlowError>;
        async fn fetch_orders_for_customer(&self, customer_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError>;
        async fn fetch_open_orders_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError>;
        async fn fetch_bids_for_order(&self, order_id: i64) -> Result<Vec<Bid>, BidFlowError>;
        async fn submit_bid(&self, bid: NewBid) -> Result<i64, BidFlowError>;
        async fn accept_bid(&self, order_id: i64, bid_id: i64, requester_id: i64) -> Result<BidAcceptance, BidFlowError>;
    }
}

mock! {
    pub VerificationBackend {}
    impl VerificationManagement for VerificationBackend {
        async fn replace_verification(
            &self,
            identifier: &str,
            code: &str,
            expires_at: DateTime<Utc>,
            metadata: Option<String>,
        ) -> Result<(), VerificationError>;
        async fn take_verification(&self, identifier: &str, code: &str) -> Result<Option<String>, VerificationError>;
    }
    impl AccountManagement for VerificationBackend {
        async fn fetch_customer(&self, customer_id: i64) -> Result<Option<Customer>, AccountApiError>;
        async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, AccountApiError>;
        async fn upsert_customer_on_verify(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError>;
        async fn upsert_customer_named(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError>;
        async fn fetch_partner(&self, partner_id: i64) -> Result<Option<Partner>, AccountApiError>;
        async fn fetch_partner_by_phone(&self, phone: &str) -> Result<Option<Partner>, AccountApiError>;
        async fn partner_contact_exists(&self, phone: &str, email: &str) -> Result<bool, AccountApiError>;
        async fn create_verified_partner(
            &self,
            phone: &str,
            name: &str,
            email: Option<String>,
            expertise: Option<String>,
        ) -> Result<Partner, AccountApiError>;
        async fn mark_partner_verified(&self, partner_id: i64) -> Result<(), AccountApiError>;
        async fn fetch_categories(&self) -> Result<Vec<ServiceCategory>, AccountApiError>;
        async fn fetch_categories_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceCategory>, AccountApiError>;
        async fn replace_partner_categories(&self, partner_id: i64, category_ids: &[i64]) -> Result<(), AccountApiError>;
    }
}

mock! {
    pub AccountBackend {}
    impl AccountManagement for AccountBackend {
        async fn fetch_customer(&self, customer_id: i64) -> Result<Option<Customer>, AccountApiError>;
        async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, AccountApiError>;
        async fn upsert_customer_on_verify(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError>;
        async fn upsert_customer_named(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError>;
        async fn fetch_partner(&self, partner_id: i64) -> Result<Option<Partner>, AccountApiError>;
        async fn fetch_partner_by_phone(&self, phone: &str) -> Result<Option<Partner>, AccountApiError>;
        async fn partner_contact_exists(&self, phone: &str, email: &str) -> Result<bool, AccountApiError>;
        async fn create_verified_partner(
            &self,
            phone: &str,
            name: &str,
            email: Option<String>,
            expertise: Option<String>,
        ) -> Result<Partner, AccountApiError>;
        async fn mark_partner_verified(&self, partner_id: i64) -> Result<(), AccountApiError>;
        async fn fetch_categories(&self) -> Result<Vec<ServiceCategory>, AccountApiError>;
        async fn fetch_categories_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceCategory>, AccountApiError>;
        async fn replace_partner_categories(&self, partner_id: i64, category_ids: &[i64]) -> Result<(), AccountApiError>;
    }
}
