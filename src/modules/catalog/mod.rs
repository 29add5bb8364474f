// Look-up catalogs: document types, services, payment methods, payment plans

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{CatalogEntry, CatalogKind, PaymentPlan};
pub use repositories::CatalogRepository;
