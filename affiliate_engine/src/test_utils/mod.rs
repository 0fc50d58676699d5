//! Helpers for spinning up throwaway ledgers in tests. Only compiled with the `test_utils` feature.
mod fake_gateway;
pub mod prepare_env;

pub use fake_gateway::{FakeGateway, FAKE_GATEWAY_KEY_ID, FAKE_GATEWAY_SECRET};
