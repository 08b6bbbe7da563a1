//! Libris Library Catalog Server
//!
//! A small REST JSON API for managing a library catalog: add, update,
//! remove and search books, lend them out and take them back. The catalog
//! and the borrow ledger live together in a single JSON document on disk.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    pub metrics: metrics::Metrics,
}

impl AppState {
    /// Wire repository and services for the configured data file
    pub fn new(config: AppConfig) -> Self {
        let repository = repository::Repository::new(config.storage.data_file.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(repository)),
            metrics: metrics::Metrics::new(),
        }
    }
}
