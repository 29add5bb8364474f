pub mod integrity_report;
pub mod payment;

pub use integrity_report::{FindingKind, IntegrityFinding, IntegrityReport};
pub use payment::{Payment, PaymentStatus};
