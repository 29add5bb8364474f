pub mod invoice;

pub use invoice::{derive_status, Invoice, InvoiceStatus};
