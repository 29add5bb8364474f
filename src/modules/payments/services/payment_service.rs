// Payment application and invoice settlement.
//
// Every mutation ends with the same settlement step: the invoice's paid
// amount is re-derived from the sum of its Applied payments, so repeated
// recalculation is a no-op and the ledger invariant survives voids.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::core::{money, AppError, Result};
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::movements::models::CashMovement;
use crate::modules::payments::models::{Payment, PaymentStatus};
use crate::modules::payments::repositories::PaymentRepository;

/// Service for applying and voiding payments against invoices
pub struct PaymentService {
    invoice_repo: Arc<InvoiceRepository>,
    payment_repo: Arc<PaymentRepository>,
}

impl PaymentService {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        payment_repo: Arc<PaymentRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            payment_repo,
        }
    }

    /// Check whether an invoice exists and can take a payment of `amount`,
    /// without mutating anything. Used to validate explicit invoice
    /// linkage before a movement is persisted.
    pub async fn check_applicable(&self, invoice_id: i64, amount: Decimal) -> Result<()> {
        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", invoice_id)))?;

        invoice.accepts_payment(amount)
    }

    /// Apply a payment to an invoice.
    ///
    /// Rejects payments on voided invoices and amounts exceeding the
    /// pending balance. The insert and the settlement write share one
    /// transaction.
    pub async fn apply(
        &self,
        invoice_id: i64,
        amount: Decimal,
        method_id: Option<i64>,
        movement_id: Option<i64>,
    ) -> Result<(Payment, Invoice)> {
        let invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", invoice_id)))?;

        invoice.accepts_payment(amount)?;

        let mut payment = Payment::new(invoice_id, movement_id, method_id, amount)?;

        let mut tx = self.payment_repo.pool().begin().await?;
        payment.id = self.payment_repo.insert_with_tx(&mut tx, &payment).await?;

        let applied_sum = self
            .payment_repo
            .applied_sum_with_tx(&mut tx, invoice_id)
            .await?;

        let mut invoice = invoice;
        invoice.settle(applied_sum, Utc::now().date_naive());
        self.invoice_repo
            .update_settlement_with_tx(&mut tx, &invoice)
            .await?;

        tx.commit().await?;

        info!(
            invoice = %invoice.number,
            payment_id = payment.id,
            amount = %payment.amount,
            status = %invoice.status,
            "Payment applied"
        );

        Ok((payment, invoice))
    }

    /// Void a payment and resettle its invoice
    pub async fn void_payment(&self, payment_id: i64) -> Result<Invoice> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Payment {} not found", payment_id)))?;

        if payment.status == PaymentStatus::Voided {
            return Err(AppError::validation(format!(
                "Payment {} is already voided",
                payment_id
            )));
        }

        let mut invoice = self
            .invoice_repo
            .find_by_id(payment.invoice_id)
            .await?
            .ok_or_else(|| {
                AppError::internal(format!(
                    "Payment {} references missing invoice {}",
                    payment_id, payment.invoice_id
                ))
            })?;

        let mut tx = self.payment_repo.pool().begin().await?;
        self.payment_repo
            .mark_voided_with_tx(&mut tx, payment_id)
            .await?;

        let applied_sum = self
            .payment_repo
            .applied_sum_with_tx(&mut tx, payment.invoice_id)
            .await?;

        invoice.settle(applied_sum, Utc::now().date_naive());
        self.invoice_repo
            .update_settlement_with_tx(&mut tx, &invoice)
            .await?;

        tx.commit().await?;

        info!(
            invoice = %invoice.number,
            payment_id,
            "Payment voided"
        );

        Ok(invoice)
    }

    /// Recompute an invoice's settlement fields from its Applied payments.
    ///
    /// Idempotent; calling it with unchanged payments is a no-op.
    pub async fn recalculate(&self, invoice_id: i64) -> Result<Invoice> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(invoice_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice {} not found", invoice_id)))?;

        let applied_sum = self.payment_repo.applied_sum(invoice_id).await?;
        invoice.settle(applied_sum, Utc::now().date_naive());
        self.invoice_repo.update_settlement(&invoice).await?;

        Ok(invoice)
    }

    /// Try to apply a cash movement to the oldest open invoice for its
    /// client+service pair.
    ///
    /// Returns None when no open invoice exists or the movement amount
    /// does not fit the remaining balance; the movement then stands alone.
    pub async fn auto_apply(&self, movement: &CashMovement) -> Result<Option<Payment>> {
        let Some(invoice) = self
            .invoice_repo
            .find_oldest_open(movement.client_id, movement.service_id)
            .await?
        else {
            return Ok(None);
        };

        if movement.amount > invoice.pending + money::tolerance() {
            info!(
                movement_id = movement.id,
                invoice = %invoice.number,
                "Movement amount exceeds open balance; left unapplied"
            );
            return Ok(None);
        }

        let (payment, _) = self
            .apply(
                invoice.id,
                movement.amount,
                Some(movement.payment_method_id),
                Some(movement.id),
            )
            .await?;

        Ok(Some(payment))
    }
}
