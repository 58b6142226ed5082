pub mod api;
pub mod builder;
pub mod config;
pub mod core;
pub mod error;
pub mod exporter;
pub mod message;
pub mod models;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod mock;
