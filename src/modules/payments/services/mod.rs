pub mod integrity;
pub mod payment_service;

pub use integrity::IntegrityChecker;
pub use payment_service::PaymentService;
