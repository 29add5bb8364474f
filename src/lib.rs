//! Cajero — cashier and billing backend for a university finance office.
//!
//! Exposes the invoice ledger, payment application, cash movement
//! recording, and the supporting catalogs over an HTTP API.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::catalog;
pub use modules::clients;
pub use modules::employees;
pub use modules::invoices;
pub use modules::movements;
pub use modules::payments;
pub use modules::reports;
