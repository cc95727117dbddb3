//! Interface contracts for marketplace database backends.
//!
//! A backend must implement three traits to power Bidfair:
//!
//! * [`BidFlowDatabase`]: the contested core. Transactional bid submission and acceptance,
//!   plus order reads and writes. This is the only component allowed to mutate order and bid
//!   status columns.
//! * [`VerificationManagement`]: the OTP ledger, with replace-on-issue and consume-on-match
//!   semantics for one-time codes.
//! * [`AccountManagement`]: customer, partner and category records, including the
//!   find-or-create-on-verify upserts.
mod account_management;
mod bid_flow_database;
mod verification_management;

pub use account_management::AccountManagement;
pub use bid_flow_database::BidFlowDatabase;
pub use verification_management::VerificationManagement;
