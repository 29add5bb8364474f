// Clients the finance office bills

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Client, ClientType};
pub use repositories::ClientRepository;
