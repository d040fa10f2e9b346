//! Infrastructure layer: repositories, the order application service, config.

pub mod config;
pub mod dto;
pub mod repository;
pub mod service;


pub use config::{ConfigError, ServiceConfig};
pub use repository::{InMemoryOrderRepository, OrderRepository, RepositoryError};
pub use service::{OrderApplicationService, OrderEnvelope, ServiceError};
