//! # Affiliate ledger server
//! This crate hosts the HTTP server for the affiliate ledger. It is responsible for:
//! * Registering users and issuing access tokens.
//! * Listing the package catalog.
//! * Opening orders at Razorpay and verifying the payments that come back from the checkout widget.
//! * Serving the earnings and referral dashboards.
//!
//! All of the business logic lives in `affiliate_engine`; the handlers here only translate between HTTP and the
//! engine APIs.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/auth/register`, `/auth/login`, `/auth/me`, `/auth/referral-link`: accounts.
//! * `/packages`: the package catalog.
//! * `/payments/create-order`, `/payments/verify-payment`, `/payments/orders`: purchases.
//! * `/dashboard/stats`, `/dashboard/commissions`, `/dashboard/referrals`, `/dashboard/payouts`: dashboards.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
