// Cross-table integrity verification: MovimientoCaja <-> Pago <-> Factura.
//
// Read-only. Every amount comparison uses the one-cent reconciliation
// tolerance; status comparison goes through the same derive_status the
// settlement path uses.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::{money, Result};
use crate::modules::invoices::models::{derive_status, InvoiceStatus};
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::movements::repositories::MovementRepository;
use crate::modules::payments::models::{
    FindingKind, IntegrityFinding, IntegrityReport, PaymentStatus,
};
use crate::modules::payments::repositories::PaymentRepository;

/// Verifies amount consistency across movements, payments and invoices
pub struct IntegrityChecker {
    invoice_repo: Arc<InvoiceRepository>,
    payment_repo: Arc<PaymentRepository>,
    movement_repo: Arc<MovementRepository>,
}

impl IntegrityChecker {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        payment_repo: Arc<PaymentRepository>,
        movement_repo: Arc<MovementRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            payment_repo,
            movement_repo,
        }
    }

    /// Run a full pass over the ledger
    pub async fn run(&self) -> Result<IntegrityReport> {
        let invoices = self.invoice_repo.list_all().await?;
        let payments = self.payment_repo.list_all().await?;
        let today = Utc::now().date_naive();

        let mut findings = Vec::new();

        // Applied sums per invoice, computed once
        let mut applied_sums: HashMap<i64, Decimal> = HashMap::new();
        for payment in &payments {
            if payment.status == PaymentStatus::Applied {
                *applied_sums.entry(payment.invoice_id).or_default() += payment.amount;
            }
        }

        for invoice in &invoices {
            let applied = applied_sums
                .get(&invoice.id)
                .copied()
                .unwrap_or(Decimal::ZERO);

            if invoice.status == InvoiceStatus::Voided {
                if applied > Decimal::ZERO {
                    findings.push(IntegrityFinding {
                        kind: FindingKind::PaymentOnVoided,
                        invoice_id: Some(invoice.id),
                        payment_id: None,
                        message: format!(
                            "Voided invoice {} carries {} in applied payments",
                            invoice.number, applied
                        ),
                    });
                }
                continue;
            }

            if !money::approx_eq(applied, invoice.paid) {
                findings.push(IntegrityFinding {
                    kind: FindingKind::PaidMismatch,
                    invoice_id: Some(invoice.id),
                    payment_id: None,
                    message: format!(
                        "Invoice {}: applied payments sum to {} but paid is {}",
                        invoice.number, applied, invoice.paid
                    ),
                });
            }

            if !invoice.is_balanced() {
                findings.push(IntegrityFinding {
                    kind: FindingKind::Unbalanced,
                    invoice_id: Some(invoice.id),
                    payment_id: None,
                    message: format!(
                        "Invoice {}: paid {} + pending {} != total {}",
                        invoice.number, invoice.paid, invoice.pending, invoice.total
                    ),
                });
            }

            let expected = derive_status(invoice.total, invoice.paid, invoice.due_on, today);
            if invoice.status != expected {
                findings.push(IntegrityFinding {
                    kind: FindingKind::StaleStatus,
                    invoice_id: Some(invoice.id),
                    payment_id: None,
                    message: format!(
                        "Invoice {}: stored status {} but derived status is {}",
                        invoice.number, invoice.status, expected
                    ),
                });
            }
        }

        // Movement-linked payments must echo the movement amount
        for payment in &payments {
            let Some(movement_id) = payment.movement_id else {
                continue;
            };

            match self.movement_repo.find_by_id(movement_id).await? {
                Some(movement) => {
                    if !money::approx_eq(payment.amount, movement.amount) {
                        findings.push(IntegrityFinding {
                            kind: FindingKind::MovementMismatch,
                            invoice_id: Some(payment.invoice_id),
                            payment_id: Some(payment.id),
                            message: format!(
                                "Payment {} amount {} differs from movement {} amount {}",
                                payment.id, payment.amount, movement_id, movement.amount
                            ),
                        });
                    }
                }
                None => {
                    findings.push(IntegrityFinding {
                        kind: FindingKind::MissingMovement,
                        invoice_id: Some(payment.invoice_id),
                        payment_id: Some(payment.id),
                        message: format!(
                            "Payment {} references missing movement {}",
                            payment.id, movement_id
                        ),
                    });
                }
            }
        }

        let report = IntegrityReport {
            checked_invoices: invoices.len(),
            checked_payments: payments.len(),
            findings,
        };

        if report.is_consistent() {
            info!(
                invoices = report.checked_invoices,
                payments = report.checked_payments,
                "Integrity check passed"
            );
        } else {
            warn!(
                invoices = report.checked_invoices,
                payments = report.checked_payments,
                findings = report.findings.len(),
                "Integrity check found discrepancies"
            );
        }

        Ok(report)
    }
}
