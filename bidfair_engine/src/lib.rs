//! Bidfair engine
//!
//! The core logic of the Bidfair marketplace: customers post service orders, vetted partners bid
//! on them, and the customer commits an order by accepting exactly one bid. This library is
//! transport-agnostic; the HTTP server lives in its own crate and talks to the engine through
//! the APIs exported here.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@sqlite`]). SQLite is the only backend. You should never need to
//!    access the database directly; use the public APIs instead. The exception is the data types
//!    used in the database, which are defined in the [`mod@db_types`] module and are public.
//! 2. The engine public API ([`BidFlowApi`], [`VerificationApi`], [`AccountApi`]). A storage
//!    backend implements the traits in [`mod@traits`] to power these APIs.
//!
//! The engine also emits events at significant points in the bid lifecycle. A simple actor
//! framework ([`mod@events`]) lets the server hook into these and perform custom actions, such
//! as notifying both parties when a bid is accepted.
mod api;

pub mod db_types;
pub mod events;
pub mod helpers;
pub mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    errors::{AccountApiError, BidFlowError, VerificationError},
    AccountApi,
    BidFlowApi,
    IssuedCode,
    StagedOrder,
    StagedPartner,
    VerificationApi,
    CODE_TTL_MINUTES,
};
pub use sqlite::SqliteDatabase;
pub use traits::{AccountManagement, BidFlowDatabase, VerificationManagement};
