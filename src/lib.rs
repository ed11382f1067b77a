pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod dedup;
pub mod error;
pub mod models;
pub mod telemetry;
pub mod utils;
