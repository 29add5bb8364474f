pub mod invoice_service;
pub mod numbering;

pub use invoice_service::{InvoiceDetail, InvoiceService};
