pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod output;
pub mod records;
pub mod utility;
pub mod views;
