//! FX reconciler: detects exchange differences on operations and books them
//! as FX_GAIN / FX_LOSS movements.
//!
//! Detection is pure (`maleta_core::fx`). This layer loads the figures, guards
//! against double booking and writes the movement.

use chrono::Utc;
use maleta_core::currency::{
    CurrencyError, TotalItem, format_amount, format_with_conversion, sum_multi_currency, to_base,
};
use maleta_core::fx::{
    FxError, FxOutcome, FxSide, FxType, decide_cumulative, detect_pairwise, is_within_dedup_window,
    resolve_rate_with_fallback,
};
use maleta_core::ledger::{DefaultAccountToken, MovementInput, PaymentMethod};
use maleta_shared::AccountingPolicy;
use maleta_shared::types::{Currency, Money};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::exchange_rate::ExchangeRateRepository;
use super::ledger::{LedgerRepository, LedgerStoreError};
use crate::entities::{
    ledger_movements, operations, payments,
    sea_orm_active_enums::{CurrencyCode, MovementType, PayerType, PaymentDirection, SettlementStatus},
};

/// Reconciliation failures.
#[derive(Debug, thiserror::Error)]
pub enum FxStoreError {
    /// Detection failed or the operation is missing.
    #[error(transparent)]
    Fx(#[from] FxError),

    /// Booking the movement failed.
    #[error(transparent)]
    Ledger(#[from] LedgerStoreError),

    /// Loading operations or payments failed.
    #[error("fx store: {0}")]
    Database(#[from] DbErr),
}

/// Input for the pairwise comparison.
#[derive(Debug, Clone, Deserialize)]
pub struct PairwiseFxInput {
    /// Operation to book against; detection only when absent.
    #[serde(default)]
    pub operation_id: Option<Uuid>,
    /// Sale side.
    pub sale: FxSide,
    /// Payment side.
    pub payment: FxSide,
}

/// Detection result and the movement booked for it, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FxBooking {
    /// What was detected.
    #[serde(flatten)]
    pub outcome: FxOutcome,
    /// Movement written; `None` when nothing was booked or it was a duplicate.
    pub movement_id: Option<Uuid>,
}

impl FxBooking {
    const fn detected_only(outcome: FxOutcome) -> Self {
        Self {
            outcome,
            movement_id: None,
        }
    }
}

/// FX reconciler.
#[derive(Debug, Clone)]
pub struct FxReconciler {
    db: DatabaseConnection,
    rates: ExchangeRateRepository,
    ledger: LedgerRepository,
    policy: AccountingPolicy,
}

impl FxReconciler {
    /// Creates a reconciler sharing `db` with its rate and ledger repositories.
    #[must_use]
    pub fn new(db: DatabaseConnection, policy: AccountingPolicy) -> Self {
        Self {
            rates: ExchangeRateRepository::new(db.clone()),
            ledger: LedgerRepository::new(db.clone()),
            db,
            policy,
        }
    }

    /// Compares one sale with one payment and books the difference when an
    /// operation is given.
    ///
    /// # Errors
    ///
    /// Returns an error if a USD side lacks a rate or booking fails.
    pub async fn calculate_and_record_fx(
        &self,
        input: PairwiseFxInput,
        user_id: Uuid,
    ) -> Result<FxBooking, FxStoreError> {
        let outcome =
            detect_pairwise(&input.sale, &input.payment, self.policy.pairwise_fx_threshold)?;
        let (Some(fx_type), Some(operation_id)) = (outcome.fx_type, input.operation_id) else {
            return Ok(FxBooking::detected_only(outcome));
        };

        // The difference is expressed in the sale currency
        let sale = input.sale;
        let amount_ars = to_base(outcome.amount, sale.currency, sale.rate).map_err(FxError::from)?;
        let notes = format!(
            "Venta: {} | Pago: {}",
            format_with_conversion(sale.amount, sale.currency, sale.rate),
            format_with_conversion(input.payment.amount, input.payment.currency, input.payment.rate),
        );

        let movement_id = self
            .book(
                operation_id,
                fx_type,
                Money::new(outcome.amount, sale.currency),
                sale.rate,
                amount_ars,
                notes,
                None,
                user_id,
            )
            .await?;

        Ok(FxBooking {
            outcome,
            movement_id: Some(movement_id),
        })
    }

    /// Compares an operation's sale total with everything customers paid in
    /// `payment_currency` and books the difference in ARS.
    ///
    /// Each paid row converts at its own stored rate; `payment_rate` only
    /// covers rows stored without one.
    ///
    /// Skips booking when `settlement_key` already produced an FX movement
    /// for the operation, or when the operation's last FX movement is inside
    /// the dedup window.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation does not exist, a query fails or
    /// booking fails.
    pub async fn reconcile_operation_payment(
        &self,
        operation_id: Uuid,
        payment_currency: Currency,
        payment_rate: Option<Decimal>,
        settlement_key: Option<&str>,
        user_id: Uuid,
    ) -> Result<FxBooking, FxStoreError> {
        let operation = operations::Entity::find_by_id(operation_id)
            .one(&self.db)
            .await?
            .ok_or(FxError::OperationNotFound(operation_id))?;

        let (Some(sale_total), Some(sale_currency)) =
            (operation.sale_amount_total, operation.sale_currency.map(Currency::from))
        else {
            debug!(%operation_id, "Operation has no sale total, nothing to reconcile");
            return Ok(FxBooking::detected_only(FxOutcome::none()));
        };
        if sale_currency == payment_currency {
            return Ok(FxBooking::detected_only(FxOutcome::none()));
        }

        let sale_rate = self.sale_rate(&operation, sale_currency).await?;
        let payment_rate = self.usable_rate(payment_currency, payment_rate).await;

        let paid = payments::Entity::find()
            .filter(payments::Column::OperationId.eq(operation_id))
            .filter(payments::Column::Status.eq(SettlementStatus::Paid))
            .filter(payments::Column::Direction.eq(PaymentDirection::Income))
            .filter(payments::Column::PayerType.eq(PayerType::Customer))
            .filter(payments::Column::Currency.eq(CurrencyCode::from(payment_currency)))
            .all(&self.db)
            .await?;
        let paid_items: Vec<TotalItem> = paid
            .iter()
            .map(|p| TotalItem {
                money: Money::new(p.amount, payment_currency),
                rate: p.exchange_rate.filter(|r| *r > Decimal::ZERO).or(payment_rate),
            })
            .collect();
        let paid_ars = sum_multi_currency(&paid_items)
            .base_total
            .ok_or(FxError::Currency(CurrencyError::MissingRate(payment_currency)))?;
        let sale_ars = to_base(sale_total, sale_currency, sale_rate).map_err(FxError::from)?;

        let outcome = decide_cumulative(sale_ars, paid_ars, self.policy.fx_noise_threshold);
        let Some(fx_type) = outcome.fx_type else {
            debug!(%operation_id, %sale_ars, %paid_ars, "FX difference below threshold");
            return Ok(FxBooking::detected_only(outcome));
        };

        if self.is_duplicate(operation_id, settlement_key).await? {
            debug!(%operation_id, ?settlement_key, "FX movement already booked, skipping");
            return Ok(FxBooking::detected_only(outcome));
        }

        let notes = format!(
            "Venta: {} | Cobrado: {} | Total cobrado en ARS: {}",
            format_with_conversion(sale_total, sale_currency, sale_rate),
            format_amount(paid.iter().map(|p| p.amount).sum::<Decimal>(), payment_currency),
            format_amount(paid_ars, Currency::Ars),
        );

        let movement_id = self
            .book(
                operation_id,
                fx_type,
                Money::new(outcome.amount, Currency::Ars),
                None,
                outcome.amount,
                notes,
                settlement_key.map(str::to_string),
                user_id,
            )
            .await?;

        Ok(FxBooking {
            outcome,
            movement_id: Some(movement_id),
        })
    }

    /// Rate the sale was booked at: the first INCOME movement's rate, else the
    /// rate on the departure (or creation) date, then the fallback chain.
    async fn sale_rate(
        &self,
        operation: &operations::Model,
        sale_currency: Currency,
    ) -> Result<Option<Decimal>, FxStoreError> {
        if sale_currency.is_base() {
            return Ok(None);
        }

        let first_income = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::OperationId.eq(operation.id))
            .filter(ledger_movements::Column::MovementType.eq(MovementType::Income))
            .order_by_asc(ledger_movements::Column::CreatedAt)
            .one(&self.db)
            .await?;

        let booked = match first_income.and_then(|m| m.exchange_rate) {
            Some(rate) => Some(rate),
            None => {
                let date = operation
                    .departure_date
                    .unwrap_or_else(|| operation.created_at.date_naive());
                self.rates.get_rate(date, sale_currency, Currency::Ars).await
            }
        };
        Ok(self.usable_rate(sale_currency, booked).await)
    }

    /// Applies the fallback chain to a USD rate; ARS needs no rate.
    async fn usable_rate(&self, currency: Currency, rate: Option<Decimal>) -> Option<Decimal> {
        if currency.is_base() {
            return None;
        }
        if rate.is_some_and(|r| r > Decimal::ZERO) {
            return rate;
        }
        let latest = self.rates.get_latest_rate(currency, Currency::Ars).await;
        let resolved = resolve_rate_with_fallback(rate, latest, self.policy.fallback_usd_rate);
        debug!(%currency, %resolved, "Using fallback exchange rate");
        Some(resolved)
    }

    async fn is_duplicate(&self, operation_id: Uuid, settlement_key: Option<&str>) -> Result<bool, DbErr> {
        let fx_types = [MovementType::FxGain, MovementType::FxLoss];

        if let Some(key) = settlement_key {
            let keyed = ledger_movements::Entity::find()
                .filter(ledger_movements::Column::OperationId.eq(operation_id))
                .filter(ledger_movements::Column::MovementType.is_in(fx_types))
                .filter(ledger_movements::Column::IdempotencyKey.eq(key))
                .one(&self.db)
                .await?;
            if keyed.is_some() {
                return Ok(true);
            }
        }

        let last = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::OperationId.eq(operation_id))
            .filter(ledger_movements::Column::MovementType.is_in(fx_types))
            .order_by_desc(ledger_movements::Column::CreatedAt)
            .one(&self.db)
            .await?;

        Ok(is_within_dedup_window(
            last.map(|m| m.created_at.with_timezone(&Utc)),
            Utc::now(),
            self.policy.fx_dedup_window_minutes,
        ))
    }

    #[allow(clippy::too_many_arguments)]
    async fn book(
        &self,
        operation_id: Uuid,
        fx_type: FxType,
        amount: Money,
        rate: Option<Decimal>,
        amount_ars: Decimal,
        notes: String,
        idempotency_key: Option<String>,
        user_id: Uuid,
    ) -> Result<Uuid, FxStoreError> {
        let account_id = self
            .ledger
            .get_or_create_default_account(DefaultAccountToken::Cash, Currency::Ars, user_id)
            .await?;

        let concept = match fx_type {
            FxType::FxGain => "Diferencia de cambio (ganancia)",
            FxType::FxLoss => "Diferencia de cambio (pérdida)",
        };

        let movement_id = self
            .ledger
            .record_movement(MovementInput {
                operation_id: Some(operation_id),
                lead_id: None,
                movement_type: fx_type.movement_type(),
                concept: concept.to_string(),
                currency: amount.currency,
                amount_original: amount.amount,
                exchange_rate: if amount.currency.is_base() { None } else { rate },
                amount_ars_equivalent: Some(amount_ars),
                method: PaymentMethod::Cash,
                account_id,
                seller_id: None,
                operator_id: None,
                receipt_number: None,
                notes: Some(notes),
                idempotency_key,
                created_by: user_id,
            })
            .await?;

        info!(
            %operation_id,
            %movement_id,
            fx_type = fx_type.movement_type().as_str(),
            amount = %amount_ars,
            "FX movement booked"
        );
        Ok(movement_id)
    }
}
