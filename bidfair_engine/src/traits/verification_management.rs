use chrono::{DateTime, Utc};

use crate::api::errors::VerificationError;

/// Storage contract for the OTP ledger.
#[allow(async_fn_in_trait)]
pub trait VerificationManagement {
    /// Atomically replaces any live verification for `identifier` with a new one. At most one
    /// live code exists per identifier at any time.
    async fn replace_verification(
        &self,
        identifier: &str,
        code: &str,
        expires_at: DateTime<Utc>,
        metadata: Option<String>,
    ) -> Result<(), VerificationError>;

    /// Consumes the verification matching both `identifier` and `code` exactly.
    ///
    /// * No match: [`VerificationError::InvalidCode`]; nothing is deleted.
    /// * Match but expired: the row is deleted, then [`VerificationError::CodeExpired`].
    /// * Match and valid: the row is deleted and any staged metadata is returned.
    ///
    /// The delete happens in the same transaction as the lookup, so no code is ever usable
    /// twice regardless of outcome.
    async fn take_verification(&self, identifier: &str, code: &str) -> Result<Option<String>, VerificationError>;
}
