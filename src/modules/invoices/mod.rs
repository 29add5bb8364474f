// Invoice ledger: numbering, balances, status lifecycle

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Invoice, InvoiceStatus};
pub use repositories::InvoiceRepository;
pub use services::InvoiceService;
