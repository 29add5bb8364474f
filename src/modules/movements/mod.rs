// Cash movements recorded at the cashier window

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CashMovement, MovementRefs};
pub use repositories::{MovementFilter, MovementRepository};
pub use services::MovementService;
