//! Operator payment repository.
//!
//! Tracks what the agency owes each operator. Status moves
//! PENDING → OVERDUE (sweep) and PENDING/OVERDUE → PAID (settlement); a paid
//! obligation is never reopened.

use chrono::{NaiveDate, Utc};
use maleta_core::operator_payments::{
    OperatorPaymentError, OperatorPaymentStatus as CoreStatus,
};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{operator_payments, sea_orm_active_enums::OperatorPaymentStatus};

/// Operator payment store failures.
#[derive(Debug, thiserror::Error)]
pub enum OperatorPaymentStoreError {
    /// Rejected by the obligation rules.
    #[error(transparent)]
    Invalid(#[from] OperatorPaymentError),

    /// Operator payment not found.
    #[error("Operator payment not found: {0}")]
    NotFound(Uuid),

    /// Store failure.
    #[error("operator payment store: {0}")]
    Database(#[from] DbErr),
}

/// Input for opening an operator obligation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOperatorPaymentInput {
    /// Operation that generated the debt.
    pub operation_id: Uuid,
    /// Operator owed.
    pub operator_id: Uuid,
    /// Amount owed.
    pub amount: Decimal,
    /// Currency owed.
    pub currency: Currency,
    /// Due date (see `calculate_due_date`).
    pub due_date: NaiveDate,
    /// Anything the back office wants to remember about the obligation.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Operator payment repository.
#[derive(Debug, Clone)]
pub struct OperatorPaymentRepository {
    db: DatabaseConnection,
}

impl OperatorPaymentRepository {
    /// Repository over the given connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a PENDING obligation with nothing paid.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not positive or the insert fails.
    pub async fn create_payment(
        &self,
        input: CreateOperatorPaymentInput,
    ) -> Result<operator_payments::Model, OperatorPaymentStoreError> {
        if input.amount <= Decimal::ZERO {
            return Err(OperatorPaymentError::NonPositiveAmount.into());
        }

        let now = Utc::now().into();
        let payment = operator_payments::ActiveModel {
            id: Set(Uuid::now_v7()),
            operation_id: Set(input.operation_id),
            operator_id: Set(input.operator_id),
            amount: Set(input.amount),
            currency: Set(input.currency.into()),
            due_date: Set(input.due_date),
            status: Set(OperatorPaymentStatus::Pending),
            paid_amount: Set(Decimal::ZERO),
            ledger_movement_id: Set(None),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            operator_payment_id = %payment.id,
            operation_id = %payment.operation_id,
            due_date = %payment.due_date,
            "Operator payment opened"
        );
        Ok(payment)
    }

    /// Loads one obligation.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids.
    pub async fn get(&self, id: Uuid) -> Result<operator_payments::Model, OperatorPaymentStoreError> {
        operator_payments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(OperatorPaymentStoreError::NotFound(id))
    }

    /// Marks an obligation as fully paid and links the movement that paid it.
    ///
    /// Does not create the movement. Marking an already paid obligation
    /// returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown ids, or a database error.
    pub async fn mark_as_paid(
        &self,
        id: Uuid,
        ledger_movement_id: Option<Uuid>,
    ) -> Result<operator_payments::Model, OperatorPaymentStoreError> {
        let payment = self.get(id).await?;
        let current = CoreStatus::from(payment.status);
        if current == CoreStatus::Paid {
            debug!(operator_payment_id = %id, "Operator payment already paid");
            return Ok(payment);
        }
        current.transition(CoreStatus::Paid)?;

        let amount = payment.amount;
        let mut active: operator_payments::ActiveModel = payment.into();
        active.status = Set(OperatorPaymentStatus::Paid);
        active.paid_amount = Set(amount);
        active.ledger_movement_id = Set(ledger_movement_id);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        info!(operator_payment_id = %id, "Operator payment marked as paid");
        Ok(updated)
    }

    /// PENDING obligations whose due date is before `today`, soonest first.
    ///
    /// These are the rows the next sweep will flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_overdue_payments(
        &self,
        operator_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Vec<operator_payments::Model>, OperatorPaymentStoreError> {
        self.past_due(&[OperatorPaymentStatus::Pending], operator_id, today)
            .await
    }

    /// Every unpaid obligation past its due date: PENDING rows not yet swept
    /// and rows already flagged OVERDUE.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn get_unpaid_past_due(
        &self,
        operator_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Vec<operator_payments::Model>, OperatorPaymentStoreError> {
        self.past_due(
            &[OperatorPaymentStatus::Pending, OperatorPaymentStatus::Overdue],
            operator_id,
            today,
        )
        .await
    }

    async fn past_due(
        &self,
        statuses: &[OperatorPaymentStatus],
        operator_id: Option<Uuid>,
        today: NaiveDate,
    ) -> Result<Vec<operator_payments::Model>, OperatorPaymentStoreError> {
        let mut query = operator_payments::Entity::find()
            .filter(operator_payments::Column::Status.is_in(statuses.iter().copied()))
            .filter(operator_payments::Column::DueDate.lt(today));
        if let Some(operator_id) = operator_id {
            query = query.filter(operator_payments::Column::OperatorId.eq(operator_id));
        }

        let payments = query
            .order_by_asc(operator_payments::Column::DueDate)
            .all(&self.db)
            .await?;
        Ok(payments)
    }

    /// Flags every PENDING obligation due before `today` as OVERDUE.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn sweep_overdue(&self, today: NaiveDate) -> Result<u64, OperatorPaymentStoreError> {
        let result = operator_payments::Entity::update_many()
            .set(operator_payments::ActiveModel {
                status: Set(OperatorPaymentStatus::Overdue),
                updated_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .filter(operator_payments::Column::Status.eq(OperatorPaymentStatus::Pending))
            .filter(operator_payments::Column::DueDate.lt(today))
            .exec(&self.db)
            .await?;

        info!(%today, swept = result.rows_affected, "Overdue operator payments swept");
        Ok(result.rows_affected)
    }

    /// Obligations of one operation, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_operation(
        &self,
        operation_id: Uuid,
    ) -> Result<Vec<operator_payments::Model>, OperatorPaymentStoreError> {
        let payments = operator_payments::Entity::find()
            .filter(operator_payments::Column::OperationId.eq(operation_id))
            .order_by_asc(operator_payments::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(payments)
    }
}
