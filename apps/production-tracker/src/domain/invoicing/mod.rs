//! Invoicing Bounded Context
//!
//! Invoices group orders for billing and track what has been paid.

pub mod invoice;
pub mod repository;

pub use invoice::{Invoice, InvoiceAmounts};
pub use repository::InvoiceRepository;
