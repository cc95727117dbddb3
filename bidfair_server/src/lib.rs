//! # Bidfair server
//! This crate hosts the HTTP surface of the Bidfair marketplace. It is responsible for:
//! * the public authentication endpoints (OTP request and verify flows for customers and
//!   partners, including the staged-order flow),
//! * the role-guarded API endpoints for posting orders, bidding, and accepting bids,
//! * issuing and validating access tokens.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more
//! information.

pub mod auth;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod middleware;
pub mod notify;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
