//! Infrastructure Layer
//!
//! This module contains all adapters (implementations) for the ports defined
//! in the application and domain layers. Following hexagonal architecture:
//!
//! - **Driven Adapters (Outbound)**
//!   - `persistence/`: In-memory stores that enforce the uniqueness rules
//!   - `events/`: Tracking event publishers
//!
//! - **Driver Adapters (Inbound)**
//!   - `http/`: REST API controllers
//!
//! - `config/`: Dependency injection container

pub mod config;
pub mod events;
pub mod http;
pub mod persistence;
