pub mod catalog;
pub mod clients;
pub mod employees;
pub mod health;
pub mod invoices;
pub mod movements;
pub mod payments;
pub mod reports;
