// Library interface for orbitdeck-ops-server
// Exposes modules for integration testing

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod hub;
pub mod models;
pub mod protocol;
pub mod registry;
pub mod simulation;
pub mod store;
