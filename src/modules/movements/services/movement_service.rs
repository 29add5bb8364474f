// Recording cash movements at the cashier window.
//
// A movement first validates every catalog/people reference against the
// active pick lists, then is persisted, then the payment applier gets a
// chance to settle it against an invoice: the one explicitly named by
// the cashier, or the oldest open invoice for the client+service pair.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use crate::core::{AppError, Result};
use crate::modules::catalog::models::CatalogKind;
use crate::modules::catalog::repositories::CatalogRepository;
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::employees::repositories::EmployeeRepository;
use crate::modules::movements::models::{CashMovement, MovementRefs};
use crate::modules::movements::repositories::{MovementFilter, MovementRepository};
use crate::modules::payments::models::Payment;
use crate::modules::payments::repositories::PaymentRepository;
use crate::modules::payments::services::PaymentService;

/// A recorded movement together with the payment it produced, if any
#[derive(Debug, Serialize)]
pub struct RecordedMovement {
    pub movement: CashMovement,
    pub payment: Option<Payment>,
}

/// Service for cash movement business logic
pub struct MovementService {
    movement_repo: Arc<MovementRepository>,
    payment_repo: Arc<PaymentRepository>,
    payment_service: Arc<PaymentService>,
    catalog_repo: Arc<CatalogRepository>,
    client_repo: Arc<ClientRepository>,
    employee_repo: Arc<EmployeeRepository>,
}

impl MovementService {
    pub fn new(
        movement_repo: Arc<MovementRepository>,
        payment_repo: Arc<PaymentRepository>,
        payment_service: Arc<PaymentService>,
        catalog_repo: Arc<CatalogRepository>,
        client_repo: Arc<ClientRepository>,
        employee_repo: Arc<EmployeeRepository>,
    ) -> Self {
        Self {
            movement_repo,
            payment_repo,
            payment_service,
            catalog_repo,
            client_repo,
            employee_repo,
        }
    }

    /// Record a movement and attempt payment application.
    ///
    /// With `invoice_id` the payment goes to that invoice (validated
    /// before the movement is persisted); without it the oldest open
    /// invoice for client+service is tried and the movement stands alone
    /// when nothing fits.
    pub async fn record(
        &self,
        refs: MovementRefs,
        amount: Decimal,
        description: Option<String>,
        invoice_id: Option<i64>,
    ) -> Result<RecordedMovement> {
        self.validate_refs(&refs).await?;

        let movement = CashMovement::new(refs, amount, description)?;

        // Fail before persisting when the named invoice cannot take it
        if let Some(invoice_id) = invoice_id {
            self.payment_service
                .check_applicable(invoice_id, movement.amount)
                .await?;
        }

        let movement = self.movement_repo.create(&movement).await?;

        let payment = match invoice_id {
            Some(invoice_id) => {
                let (payment, _) = self
                    .payment_service
                    .apply(
                        invoice_id,
                        movement.amount,
                        Some(movement.payment_method_id),
                        Some(movement.id),
                    )
                    .await?;
                Some(payment)
            }
            None => self.payment_service.auto_apply(&movement).await?,
        };

        info!(
            movement_id = movement.id,
            amount = %movement.amount,
            applied = payment.is_some(),
            "Movement recorded"
        );

        Ok(RecordedMovement { movement, payment })
    }

    /// List movements for the consulta/reporte screens
    pub async fn list(&self, filter: &MovementFilter) -> Result<Vec<CashMovement>> {
        self.movement_repo.list(filter).await
    }

    /// Delete a movement; rejected while an Applied payment links to it
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.payment_repo.applied_exists_for_movement(id).await? {
            return Err(AppError::validation(format!(
                "Movement {} backs an applied payment; void the payment first",
                id
            )));
        }

        self.movement_repo.delete(id).await
    }

    async fn validate_refs(&self, refs: &MovementRefs) -> Result<()> {
        if !self.employee_repo.is_active(refs.employee_id).await? {
            return Err(AppError::validation("Employee is inactive or missing"));
        }
        if !self.client_repo.is_active(refs.client_id).await? {
            return Err(AppError::validation("Client is inactive or missing"));
        }

        let catalog_checks = [
            (CatalogKind::ServiceItem, refs.service_id),
            (CatalogKind::DocumentType, refs.document_type_id),
            (CatalogKind::PaymentMethod, refs.payment_method_id),
        ];
        for (kind, id) in catalog_checks {
            if !self.catalog_repo.is_active(kind, id).await? {
                return Err(AppError::validation(format!(
                    "{} is inactive or missing",
                    kind.label()
                )));
            }
        }

        if !self.catalog_repo.plan_is_active(refs.payment_plan_id).await? {
            return Err(AppError::validation("Payment plan is inactive or missing"));
        }

        Ok(())
    }
}
