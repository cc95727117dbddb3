use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    api::errors::VerificationError,
    db_types::{Customer, NewOrder, Partner, ServiceOrder},
    helpers::{generate_otp_code, normalize_phone},
    traits::{AccountManagement, BidFlowDatabase, VerificationManagement},
};

/// How long an issued code stays valid.
pub const CODE_TTL_MINUTES: i64 = 10;

/// A partner registration captured at request time and replayed when the code is verified.
/// Until then, no partner record exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedPartner {
    pub name: String,
    pub email: String,
    pub expertise: Option<String>,
}

/// A service order captured at request time and created when the code is verified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedOrder {
    pub name: String,
    pub category_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub postal_code: String,
}

/// The result of issuing a code. The transport hands the code to whatever delivery channel is
/// configured; it is never echoed back in the HTTP response.
#[derive(Debug, Clone)]
pub struct IssuedCode {
    pub identifier: String,
    pub code: String,
}

/// `VerificationApi` owns the OTP ledger and the identity flows built on top of it: one live
/// code per phone number, consumed exactly once, optionally carrying staged data that only
/// becomes an account or an order once the caller proves control of the phone.
pub struct VerificationApi<B> {
    db: B,
}

impl<B> Debug for VerificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerificationApi")
    }
}

impl<B> VerificationApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }

    fn normalize(phone: &str) -> Result<String, VerificationError> {
        normalize_phone(phone).ok_or_else(|| VerificationError::InvalidIdentifier(phone.to_string()))
    }
}

impl<B> VerificationApi<B>
where B: VerificationManagement
{
    async fn issue(&self, identifier: String, metadata: Option<String>) -> Result<IssuedCode, VerificationError> {
        let code = generate_otp_code();
        let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);
        self.db.replace_verification(&identifier, &code, expires_at, metadata).await?;
        debug!("🔑️ Verification code issued for {identifier}, valid until {expires_at}");
        Ok(IssuedCode { identifier, code })
    }

    /// Issue a login code for a customer. The account need not exist yet; it is created when
    /// the code is verified.
    pub async fn request_customer_code(&self, phone: &str) -> Result<IssuedCode, VerificationError> {
        let identifier = Self::normalize(phone)?;
        self.issue(identifier, None).await
    }

    /// Issue a code whose verification will create the given order.
    pub async fn request_order_code(&self, phone: &str, staged: StagedOrder) -> Result<IssuedCode, VerificationError> {
        let identifier = Self::normalize(phone)?;
        let metadata = serde_json::to_string(&staged).map_err(|e| VerificationError::DatabaseError(e.to_string()))?;
        self.issue(identifier, Some(metadata)).await
    }
}

impl<B> VerificationApi<B>
where B: VerificationManagement + AccountManagement
{
    /// Stage a new partner profile and issue its registration code. The partner record is only
    /// created once [`verify_partner`](Self::verify_partner) succeeds.
    pub async fn register_partner(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        expertise: Option<String>,
    ) -> Result<IssuedCode, VerificationError> {
        let identifier = Self::normalize(phone)?;
        if self.db.partner_contact_exists(&identifier, email).await? {
            return Err(VerificationError::AccountAlreadyExists);
        }
        let staged = StagedPartner { name: name.to_string(), email: email.to_string(), expertise };
        let metadata = serde_json::to_string(&staged).map_err(|e| VerificationError::DatabaseError(e.to_string()))?;
        self.issue(identifier, Some(metadata)).await
    }

    /// Issue a login code for an existing partner.
    pub async fn request_partner_code(&self, phone: &str) -> Result<IssuedCode, VerificationError> {
        let identifier = Self::normalize(phone)?;
        if self.db.fetch_partner_by_phone(&identifier).await?.is_none() {
            return Err(VerificationError::AccountNotFound);
        }
        self.issue(identifier, None).await
    }

    /// Consume a customer login code. An unknown phone number becomes a new customer account,
    /// named after `name` if given and the phone number otherwise; a known account only has its
    /// verification timestamp refreshed.
    pub async fn verify_customer(
        &self,
        phone: &str,
        code: &str,
        name: Option<&str>,
    ) -> Result<Customer, VerificationError> {
        let identifier = Self::normalize(phone)?;
        self.db.take_verification(&identifier, code).await?;
        let customer = self.db.upsert_customer_on_verify(&identifier, name.unwrap_or(&identifier)).await?;
        info!("🔑️ Customer #{} verified by phone", customer.id);
        Ok(customer)
    }

    /// Consume a partner code. For an existing partner this is a login; otherwise the staged
    /// registration carried by the code is replayed to create the account. A fresh phone number
    /// with no staged profile means the code was never a registration code.
    pub async fn verify_partner(&self, phone: &str, code: &str) -> Result<Partner, VerificationError> {
        let identifier = Self::normalize(phone)?;
        let metadata = self.db.take_verification(&identifier, code).await?;
        let partner = match self.db.fetch_partner_by_phone(&identifier).await? {
            Some(existing) => {
                self.db.mark_partner_verified(existing.id).await?;
                self.db.fetch_partner(existing.id).await?.ok_or(VerificationError::AccountNotFound)?
            },
            None => {
                let staged = metadata.ok_or(VerificationError::InvalidCode)?;
                let staged: StagedPartner =
                    serde_json::from_str(&staged).map_err(|_| VerificationError::InvalidStagedData)?;
                self.db
                    .create_verified_partner(&identifier, &staged.name, Some(staged.email), staged.expertise)
                    .await?
            },
        };
        info!("🔑️ Partner #{} verified by phone", partner.id);
        Ok(partner)
    }
}

impl<B> VerificationApi<B>
where B: VerificationManagement + AccountManagement + BidFlowDatabase
{
    /// Consume a staged-order code: upsert the customer that requested it (their name is
    /// refreshed from the staged data) and create the order.
    pub async fn verify_staged_order(
        &self,
        phone: &str,
        code: &str,
    ) -> Result<(Customer, ServiceOrder), VerificationError> {
        let identifier = Self::normalize(phone)?;
        let metadata = self.db.take_verification(&identifier, code).await?.ok_or(VerificationError::InvalidStagedData)?;
        let staged: StagedOrder = serde_json::from_str(&metadata).map_err(|_| VerificationError::InvalidStagedData)?;
        let customer = self.db.upsert_customer_named(&identifier, &staged.name).await?;
        let mut order = NewOrder::new(customer.id, staged.category_id, staged.title, staged.postal_code);
        if let Some(description) = staged.description {
            order = order.with_description(description);
        }
        let order = self.db.insert_order(order).await?;
        info!("🔑️ Staged order #{} created for customer #{}", order.id, customer.id);
        Ok((customer, order))
    }
}
