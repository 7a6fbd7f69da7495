//! Infrastructure layer: repositories, application services, configuration.

pub mod config;
pub mod repository;
pub mod services;


pub use config::{InfraConfig, StorageBackend, connect_pool};
