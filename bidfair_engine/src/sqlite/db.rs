use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::debug;
use sqlx::SqlitePool;

use crate::{
    api::errors::{AccountApiError, BidFlowError, VerificationError},
    db_types::{Bid, BidAcceptance, BidStatusType, Customer, NewBid, NewOrder, Partner, ServiceCategory, ServiceOrder},
    sqlite::{accounts, bids, new_pool, orders, verifications, SqliteDatabaseError},
    traits::{AccountManagement, BidFlowDatabase, VerificationManagement},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn run_migrations(&self) -> Result<(), SqliteDatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

impl BidFlowDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn insert_order(&self, order: NewOrder) -> Result<ServiceOrder, BidFlowError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let categories = accounts::count_existing_categories(&[order.category_id], &mut tx).await?;
        if categories == 0 {
            return Err(BidFlowError::CategoryNotFound(order.category_id));
        }
        let inserted = orders::insert_order(&order, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        debug!("🗃️ Order #{} created in category #{}", inserted.id, inserted.category_id);
        Ok(inserted)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<ServiceOrder>, BidFlowError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(orders::fetch_order(order_id, &mut conn).await?)
    }

    async fn fetch_orders_for_customer(&self, customer_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(orders::fetch_orders_for_customer(customer_id, &mut conn).await?)
    }

    async fn fetch_open_orders_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceOrder>, BidFlowError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(orders::fetch_open_orders_for_partner(partner_id, &mut conn).await?)
    }

    async fn fetch_bids_for_order(&self, order_id: i64) -> Result<Vec<Bid>, BidFlowError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(bids::fetch_bids_for_order(order_id, &mut conn).await?)
    }

    async fn submit_bid(&self, bid: NewBid) -> Result<i64, BidFlowError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let order =
            orders::fetch_order(bid.order_id, &mut tx).await?.ok_or(BidFlowError::OrderNotFound(bid.order_id))?;
        if !order.status.accepts_bids() {
            return Err(BidFlowError::OrderClosed);
        }
        if !accounts::partner_has_category(bid.partner_id, order.category_id, &mut tx).await? {
            return Err(BidFlowError::PartnerNotAuthorized);
        }
        if bids::bid_exists(bid.order_id, bid.partner_id, &mut tx).await? {
            return Err(BidFlowError::DuplicateBid);
        }
        // the unique index turns an insert race into DuplicateBid here
        let bid_id = bids::insert_bid(&bid, &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        debug!("🗃️ Bid #{bid_id} submitted on order #{} by partner #{}", bid.order_id, bid.partner_id);
        Ok(bid_id)
    }

    async fn accept_bid(&self, order_id: i64, bid_id: i64, requester_id: i64) -> Result<BidAcceptance, BidFlowError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        // any early return before the commit rolls the whole transaction back
        let bid = bids::fetch_bid(bid_id, &mut tx)
            .await?
            .filter(|b| b.order_id == order_id)
            .ok_or(BidFlowError::BidNotFound(bid_id))?;
        let order = orders::fetch_order(order_id, &mut tx).await?.ok_or(BidFlowError::OrderNotFound(order_id))?;
        if order.customer_id != requester_id {
            return Err(BidFlowError::NotOrderOwner);
        }
        if bid.status != BidStatusType::Pending {
            return Err(BidFlowError::BidAlreadyProcessed);
        }
        if !order.status.accepts_bids() {
            return Err(BidFlowError::OrderClosed);
        }
        // Compare-and-set guards. The reads above are advisory; these conditional updates are
        // what actually serialise two concurrent accept attempts on the same order.
        if bids::mark_bid_if_pending(bid_id, BidStatusType::Accepted, &mut tx).await? == 0 {
            return Err(BidFlowError::BidAlreadyProcessed);
        }
        if orders::commit_order(order_id, &mut tx).await? == 0 {
            return Err(BidFlowError::OrderClosed);
        }
        let rejected_bids = bids::reject_sibling_bids(order_id, bid_id, &mut tx).await?;
        let (customer_name, customer_phone) = accounts::contact_for_customer(order.customer_id, &mut tx)
            .await?
            .ok_or_else(|| BidFlowError::DatabaseError(format!("Customer #{} vanished mid-accept", order.customer_id)))?;
        let (partner_name, partner_phone) = accounts::contact_for_partner(bid.partner_id, &mut tx)
            .await?
            .ok_or_else(|| BidFlowError::DatabaseError(format!("Partner #{} vanished mid-accept", bid.partner_id)))?;
        let bid = bids::fetch_bid(bid_id, &mut tx).await?.ok_or(BidFlowError::BidNotFound(bid_id))?;
        let order = orders::fetch_order(order_id, &mut tx).await?.ok_or(BidFlowError::OrderNotFound(order_id))?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        debug!("🗃️ Bid #{bid_id} accepted on order #{order_id}; {rejected_bids} sibling bids rejected");
        Ok(BidAcceptance { order, bid, rejected_bids, customer_name, customer_phone, partner_name, partner_phone })
    }
}

impl VerificationManagement for SqliteDatabase {
    async fn replace_verification(
        &self,
        identifier: &str,
        code: &str,
        expires_at: DateTime<Utc>,
        metadata: Option<String>,
    ) -> Result<(), VerificationError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        verifications::delete_for_identifier(identifier, &mut tx).await?;
        verifications::insert_verification(identifier, code, expires_at, metadata.as_deref(), &mut tx).await?;
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(())
    }

    async fn take_verification(&self, identifier: &str, code: &str) -> Result<Option<String>, VerificationError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let Some(verification) = verifications::fetch_matching(identifier, code, &mut tx).await? else {
            // nothing matched, nothing to consume
            return Err(VerificationError::InvalidCode);
        };
        // consumed on every matched outcome, expired included, so a replay always fails
        if verifications::delete_by_id(verification.id, &mut tx).await? == 0 {
            return Err(VerificationError::InvalidCode);
        }
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        if verification.expires_at < Utc::now() {
            debug!("🗃️ Expired verification for {identifier} consumed and rejected");
            return Err(VerificationError::CodeExpired);
        }
        Ok(verification.metadata)
    }
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_customer(&self, customer_id: i64) -> Result<Option<Customer>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::fetch_customer(customer_id, &mut conn).await?)
    }

    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::fetch_customer_by_phone(phone, &mut conn).await?)
    }

    async fn upsert_customer_on_verify(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let customer = match accounts::fetch_customer_by_phone(phone, &mut tx).await? {
            Some(existing) => {
                accounts::mark_customer_verified(existing.id, &mut tx).await?;
                accounts::fetch_customer(existing.id, &mut tx).await?.ok_or(AccountApiError::AccountNotFound)?
            },
            None => accounts::insert_verified_customer(phone, name, &mut tx).await?,
        };
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(customer)
    }

    async fn upsert_customer_named(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError> {
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        let customer = match accounts::fetch_customer_by_phone(phone, &mut tx).await? {
            Some(existing) => {
                accounts::rename_customer_verified(existing.id, name, &mut tx).await?;
                accounts::fetch_customer(existing.id, &mut tx).await?.ok_or(AccountApiError::AccountNotFound)?
            },
            None => accounts::insert_verified_customer(phone, name, &mut tx).await?,
        };
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(customer)
    }

    async fn fetch_partner(&self, partner_id: i64) -> Result<Option<Partner>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::fetch_partner(partner_id, &mut conn).await?)
    }

    async fn fetch_partner_by_phone(&self, phone: &str) -> Result<Option<Partner>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::fetch_partner_by_phone(phone, &mut conn).await?)
    }

    async fn partner_contact_exists(&self, phone: &str, email: &str) -> Result<bool, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::partner_contact_exists(phone, email, &mut conn).await?)
    }

    async fn create_verified_partner(
        &self,
        phone: &str,
        name: &str,
        email: Option<String>,
        expertise: Option<String>,
    ) -> Result<Partner, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::insert_verified_partner(phone, name, email.as_deref(), expertise.as_deref(), &mut conn).await?)
    }

    async fn mark_partner_verified(&self, partner_id: i64) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::mark_partner_verified(partner_id, &mut conn).await?)
    }

    async fn fetch_categories(&self) -> Result<Vec<ServiceCategory>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::fetch_categories(&mut conn).await?)
    }

    async fn fetch_categories_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceCategory>, AccountApiError> {
        let mut conn = self.pool.acquire().await.map_err(SqliteDatabaseError::from)?;
        Ok(accounts::fetch_categories_for_partner(partner_id, &mut conn).await?)
    }

    async fn replace_partner_categories(&self, partner_id: i64, category_ids: &[i64]) -> Result<(), AccountApiError> {
        let mut unique_ids: Vec<i64> = category_ids.to_vec();
        unique_ids.sort_unstable();
        unique_ids.dedup();
        let mut tx = self.pool.begin().await.map_err(SqliteDatabaseError::from)?;
        for id in &unique_ids {
            if accounts::count_existing_categories(&[*id], &mut tx).await? == 0 {
                return Err(AccountApiError::CategoryNotFound(*id));
            }
        }
        accounts::delete_partner_categories(partner_id, &mut tx).await?;
        for id in &unique_ids {
            accounts::insert_partner_category(partner_id, *id, &mut tx).await?;
        }
        tx.commit().await.map_err(SqliteDatabaseError::from)?;
        Ok(())
    }
}
