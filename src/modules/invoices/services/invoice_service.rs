use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::CatalogKind;
use crate::modules::catalog::repositories::CatalogRepository;
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::models::InvoiceStatus;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;

/// Invoice with its payment history, the detail view
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    pub invoice: Invoice,
    pub payments: Vec<Payment>,
}

/// Service for invoice ledger business logic
pub struct InvoiceService {
    invoice_repo: Arc<InvoiceRepository>,
    payment_repo: Arc<PaymentRepository>,
    client_repo: Arc<ClientRepository>,
    catalog_repo: Arc<CatalogRepository>,
    /// Payment term applied when no due date is given
    default_due_days: i64,
}

impl InvoiceService {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        payment_repo: Arc<PaymentRepository>,
        client_repo: Arc<ClientRepository>,
        catalog_repo: Arc<CatalogRepository>,
        default_due_days: i64,
    ) -> Self {
        Self {
            invoice_repo,
            payment_repo,
            client_repo,
            catalog_repo,
            default_due_days,
        }
    }

    /// Issue a new invoice. The total is fixed at billing time.
    pub async fn create_invoice(
        &self,
        client_id: i64,
        service_id: i64,
        total: Decimal,
        issued_on: Option<NaiveDate>,
        due_on: Option<NaiveDate>,
    ) -> Result<Invoice> {
        if !self.client_repo.is_active(client_id).await? {
            return Err(AppError::validation("Client is inactive or missing"));
        }
        if !self
            .catalog_repo
            .is_active(CatalogKind::ServiceItem, service_id)
            .await?
        {
            return Err(AppError::validation("Service is inactive or missing"));
        }

        let issued_on = issued_on.unwrap_or_else(|| Utc::now().date_naive());
        let due_on = due_on.unwrap_or(issued_on + Duration::days(self.default_due_days));

        let invoice = self
            .invoice_repo
            .create(client_id, service_id, issued_on, due_on, total)
            .await?;

        info!(
            invoice = %invoice.number,
            client_id,
            total = %invoice.total,
            "Invoice issued"
        );

        Ok(invoice)
    }

    /// Fetch one invoice with its payment history
    pub async fn get_invoice(&self, id: i64) -> Result<InvoiceDetail> {
        let invoice = self
            .invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;

        let payments = self.payment_repo.list_for_invoice(id).await?;

        Ok(InvoiceDetail { invoice, payments })
    }

    /// List invoices, optionally filtered by status and client
    pub async fn list_invoices(
        &self,
        status: Option<InvoiceStatus>,
        client_id: Option<i64>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Invoice>> {
        self.invoice_repo.list(status, client_id, limit, offset).await
    }

    /// Void an invoice. Allowed only while no payment has been applied.
    pub async fn void_invoice(&self, id: i64) -> Result<Invoice> {
        let invoice = self
            .invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", id)))?;

        invoice.can_void()?;

        // The stored paid amount could be stale; check the payments too
        if self.payment_repo.applied_count(id).await? > 0 {
            return Err(AppError::validation(format!(
                "Invoice {} has payments applied and cannot be voided",
                invoice.number
            )));
        }

        self.invoice_repo.mark_voided(id).await?;

        info!(invoice = %invoice.number, "Invoice voided");

        self.invoice_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::internal("Invoice vanished during void"))
    }
}
