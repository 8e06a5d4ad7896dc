//! Terminal admin screens backed by a local SQLite sample service.

pub mod app;
pub mod config;
pub mod error;
pub mod paths;
pub mod settings;
pub mod store;

pub use error::AppError;
