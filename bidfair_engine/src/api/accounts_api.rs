use std::fmt::Debug;

use crate::{
    api::errors::AccountApiError,
    db_types::{Customer, Partner, ServiceCategory},
    traits::AccountManagement,
};

/// Read access to customer and partner profiles, plus category assignment management.
pub struct AccountApi<B> {
    db: B,
}

impl<B> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi")
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn customer_by_id(&self, customer_id: i64) -> Result<Option<Customer>, AccountApiError> {
        self.db.fetch_customer(customer_id).await
    }

    pub async fn partner_by_id(&self, partner_id: i64) -> Result<Option<Partner>, AccountApiError> {
        self.db.fetch_partner(partner_id).await
    }

    pub async fn categories(&self) -> Result<Vec<ServiceCategory>, AccountApiError> {
        self.db.fetch_categories().await
    }

    pub async fn categories_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceCategory>, AccountApiError> {
        self.db.fetch_categories_for_partner(partner_id).await
    }

    /// Replace the partner's category assignments with exactly the given set.
    pub async fn assign_categories(&self, partner_id: i64, category_ids: &[i64]) -> Result<(), AccountApiError> {
        self.db.replace_partner_categories(partner_id, category_ids).await
    }
}
