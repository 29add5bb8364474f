pub mod entry;
pub mod payment_plan;

pub use entry::{CatalogEntry, CatalogKind};
pub use payment_plan::PaymentPlan;
