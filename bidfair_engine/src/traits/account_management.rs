use crate::{
    api::errors::AccountApiError,
    db_types::{Customer, Partner, ServiceCategory},
};

/// Storage contract for customer, partner and category records.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    async fn fetch_customer(&self, customer_id: i64) -> Result<Option<Customer>, AccountApiError>;

    async fn fetch_customer_by_phone(&self, phone: &str) -> Result<Option<Customer>, AccountApiError>;

    /// Finds the customer owning `phone`, creating one with the given name if absent. In both
    /// cases the phone-verified timestamp is set to now. An existing customer's name and email
    /// are never overwritten by a mere login.
    async fn upsert_customer_on_verify(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError>;

    /// Like [`upsert_customer_on_verify`](Self::upsert_customer_on_verify), but an existing
    /// customer's name *is* replaced with the given one. Used by the staged-order flow, where
    /// the caller re-stated their name when requesting the code.
    async fn upsert_customer_named(&self, phone: &str, name: &str) -> Result<Customer, AccountApiError>;

    async fn fetch_partner(&self, partner_id: i64) -> Result<Option<Partner>, AccountApiError>;

    async fn fetch_partner_by_phone(&self, phone: &str) -> Result<Option<Partner>, AccountApiError>;

    /// True if a partner already owns either the phone number or the email address.
    async fn partner_contact_exists(&self, phone: &str, email: &str) -> Result<bool, AccountApiError>;

    /// Creates a partner record with its phone already verified. Used once, when a staged
    /// registration completes.
    async fn create_verified_partner(
        &self,
        phone: &str,
        name: &str,
        email: Option<String>,
        expertise: Option<String>,
    ) -> Result<Partner, AccountApiError>;

    /// Refreshes the phone-verified timestamp on an existing partner.
    async fn mark_partner_verified(&self, partner_id: i64) -> Result<(), AccountApiError>;

    async fn fetch_categories(&self) -> Result<Vec<ServiceCategory>, AccountApiError>;

    async fn fetch_categories_for_partner(&self, partner_id: i64) -> Result<Vec<ServiceCategory>, AccountApiError>;

    /// Replaces the partner's full category assignment set. Fails with
    /// [`AccountApiError::CategoryNotFound`] if any id is unknown, in which case the previous
    /// assignments are left untouched.
    async fn replace_partner_categories(&self, partner_id: i64, category_ids: &[i64]) -> Result<(), AccountApiError>;
}
