pub mod api;
pub mod config;
pub mod env_boot;
pub mod error;
pub mod facade;
pub mod matcher;
pub mod mirror;
pub mod models;
pub mod store;
pub mod telemetry;
pub mod upstream;
pub mod webhooks;
