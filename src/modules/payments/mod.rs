// Payment application, voiding, and ledger integrity verification

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Payment, PaymentStatus};
pub use repositories::PaymentRepository;
pub use services::{IntegrityChecker, PaymentService};
