pub mod invoice_repository;

pub use invoice_repository::InvoiceRepository;
