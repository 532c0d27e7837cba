//! # Microblog Core
//!
//! The domain layer of the microblog service.
//! Entities, pagination, ports and the feed/social/account services live here,
//! with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
