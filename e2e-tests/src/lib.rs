// e2e-tests/src/lib.rs
//
// Shared harness for wire-level E2E testing of the ops-server.

pub mod helpers;

pub use helpers::{TestApp, WsClient};
