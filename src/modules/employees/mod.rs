// Cashier employees

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Employee, WorkShift};
pub use repositories::EmployeeRepository;
