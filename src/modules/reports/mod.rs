// Aggregate report data; rendering is a client concern

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use repositories::ReportRepository;
pub use services::ReportService;
