mod accounts_api;
mod bid_flow_api;
pub mod errors;
mod verification_api;

pub use accounts_api::AccountApi;
pub use bid_flow_api::BidFlowApi;
pub use verification_api::{IssuedCode, StagedOrder, StagedPartner, VerificationApi, CODE_TTL_MINUTES};
