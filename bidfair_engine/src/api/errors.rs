use thiserror::Error;

/// Failure modes of the bid-matching flows.
///
/// Every variant except `DatabaseError` is a business-rule rejection: the transaction that
/// detected it rolls back and storage is left unchanged, but the caller is at fault.
/// `DatabaseError` is the only variant the transport should map to a 5xx.
#[derive(Debug, Clone, Error)]
pub enum BidFlowError {
    #[error("Bid price must be a positive number of minor currency units, got {0}")]
    InvalidPrice(i64),
    #[error("Service order {0} not found")]
    OrderNotFound(i64),
    #[error("Bid {0} not found")]
    BidNotFound(i64),
    #[error("Category {0} not found")]
    CategoryNotFound(i64),
    #[error("This service order is no longer accepting bids")]
    OrderClosed,
    #[error("You are not authorized to bid on this service category")]
    PartnerNotAuthorized,
    #[error("You have already submitted a bid for this service order")]
    DuplicateBid,
    #[error("This bid has already been processed")]
    BidAlreadyProcessed,
    #[error("You are not authorized to accept bids on this service order")]
    NotOrderOwner,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Failure modes of the OTP ledger and identity resolution.
#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("Invalid verification code")]
    InvalidCode,
    #[error("Verification code has expired")]
    CodeExpired,
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Verification is missing required staged data")]
    InvalidStagedData,
    #[error("An account with this phone number or email already exists")]
    AccountAlreadyExists,
    #[error("No account found for this phone number")]
    AccountNotFound,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AccountApiError> for VerificationError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::AccountNotFound => VerificationError::AccountNotFound,
            AccountApiError::CategoryNotFound(_) => VerificationError::InvalidStagedData,
            AccountApiError::DatabaseError(e) => VerificationError::DatabaseError(e),
        }
    }
}

impl From<BidFlowError> for VerificationError {
    fn from(e: BidFlowError) -> Self {
        match e {
            // a staged order can only fail on insert if its category has since disappeared
            BidFlowError::CategoryNotFound(_) => VerificationError::InvalidStagedData,
            BidFlowError::DatabaseError(e) => VerificationError::DatabaseError(e),
            other => VerificationError::DatabaseError(other.to_string()),
        }
    }
}

/// Failure modes of plain account and category queries.
#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Category {0} not found")]
    CategoryNotFound(i64),
    #[error("Account not found")]
    AccountNotFound,
    #[error("Database error: {0}")]
    DatabaseError(String),
}
