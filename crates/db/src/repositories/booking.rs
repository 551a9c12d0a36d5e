//! Booking workflow.
//!
//! Composes VAT, ledger, operator payments and the FX reconciler. Every step
//! is idempotent per operation (or per payment), so a run that failed halfway
//! can simply be retried: steps already done are detected and skipped.

use chrono::NaiveDate;
use maleta_core::currency::{CurrencyError, from_base, to_base};
use maleta_core::ledger::{
    ControlAccount, DefaultAccountToken, MovementInput, MovementType as CoreMovementType,
    PaymentMethod, settlement_archetype,
};
use maleta_core::operator_payments::{ProductType, calculate_due_date};
use maleta_core::vat::{VatCalculator, VatError};
use maleta_shared::AccountingPolicy;
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, Set};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::exchange_rate::ExchangeRateRepository;
use super::fx::{FxBooking, FxReconciler, FxStoreError};
use super::ledger::{LedgerRepository, LedgerStoreError};
use super::operator_payment::{
    CreateOperatorPaymentInput, OperatorPaymentRepository, OperatorPaymentStoreError,
};
use super::vat::{PurchaseVatInput, SaleVatInput, VatRepository, VatStoreError};
use crate::entities::{
    operations, operator_payments, payments,
    sea_orm_active_enums::{OperatorPaymentStatus, PayerType, PaymentDirection, SettlementStatus},
};

const INCOME_KEY: &str = "booking:income";
const EXPENSE_KEY: &str = "booking:expense";

/// Why a booking step could not complete.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// Operation not found.
    #[error("Operation not found: {0}")]
    OperationNotFound(Uuid),

    /// Customer payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// The payment is not money coming in from the customer.
    #[error("Payment {0} is not a customer collection")]
    NotACustomerCollection(Uuid),

    /// Operation lacks the sale total or currency.
    #[error("Operation {0} has no sale amount")]
    MissingSaleAmount(Uuid),

    /// No rate could be resolved for a USD amount.
    #[error("No exchange rate for {currency} on or before {date}")]
    MissingRate {
        /// Foreign currency.
        currency: Currency,
        /// Date the rate was needed for.
        date: NaiveDate,
    },

    /// Conversion failed.
    #[error(transparent)]
    Currency(#[from] CurrencyError),

    /// Ledger step failed.
    #[error(transparent)]
    Ledger(#[from] LedgerStoreError),

    /// VAT step failed.
    #[error(transparent)]
    Vat(#[from] VatStoreError),

    /// FX step failed.
    #[error(transparent)]
    Fx(#[from] FxStoreError),

    /// Operator payment step failed.
    #[error(transparent)]
    OperatorPayment(#[from] OperatorPaymentStoreError),

    /// Direct query issued by the service failed.
    #[error("store: {0}")]
    Database(#[from] DbErr),
}

/// What `book_operation` produced (or found already in place).
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummary {
    /// Operation booked.
    pub operation_id: Uuid,
    /// Sale VAT row.
    pub sale_vat_id: Uuid,
    /// Purchase VAT row; `None` without operator cost.
    pub purchase_vat_id: Option<Uuid>,
    /// Receivable movement.
    pub income_movement_id: Uuid,
    /// Payable movement; `None` without operator cost.
    pub expense_movement_id: Option<Uuid>,
    /// Operator obligation; `None` without operator cost or operator.
    pub operator_payment_id: Option<Uuid>,
}

/// Result of settling a customer payment.
#[derive(Debug, Clone, Serialize)]
pub struct SettlementSummary {
    /// Payment settled.
    pub payment_id: Uuid,
    /// Cash movement recording the collection.
    pub movement_id: Uuid,
    /// FX reconciliation run after the collection.
    pub fx: FxBooking,
}

/// Booking workflow service.
#[derive(Debug, Clone)]
pub struct BookingService {
    db: DatabaseConnection,
    rates: ExchangeRateRepository,
    ledger: LedgerRepository,
    vat: VatRepository,
    fx: FxReconciler,
    operator_payments: OperatorPaymentRepository,
}

impl BookingService {
    /// Wires the workflow on one connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy VAT rate is invalid.
    pub fn new(db: DatabaseConnection, policy: &AccountingPolicy) -> Result<Self, VatError> {
        let calculator = VatCalculator::new(policy.vat_rate)?;
        Ok(Self {
            rates: ExchangeRateRepository::new(db.clone()),
            ledger: LedgerRepository::new(db.clone()),
            vat: VatRepository::new(db.clone(), calculator),
            fx: FxReconciler::new(db.clone(), policy.clone()),
            operator_payments: OperatorPaymentRepository::new(db.clone()),
            db,
        })
    }

    /// Books VAT, receivable, payable and operator obligation for an
    /// operation. Steps already done are skipped.
    ///
    /// The receivable and payable land on the control accounts; cash and
    /// bank accounts only move when a payment is settled.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation is missing or incomplete, a USD
    /// amount has no rate, or any step fails. Steps completed before the
    /// failure stay committed.
    pub async fn book_operation(
        &self,
        operation_id: Uuid,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<BookingSummary, BookingError> {
        let operation = operations::Entity::find_by_id(operation_id)
            .one(&self.db)
            .await?
            .ok_or(BookingError::OperationNotFound(operation_id))?;

        let (Some(sale_total), Some(sale_currency)) =
            (operation.sale_amount_total, operation.sale_currency.map(Currency::from))
        else {
            return Err(BookingError::MissingSaleAmount(operation_id));
        };
        let cost = operation.operator_cost.unwrap_or(Decimal::ZERO);
        let cost_currency = operation
            .operator_cost_currency
            .map_or(sale_currency, Currency::from);
        let operation_date = operation.created_at.date_naive();

        let sale_rate = self.resolve_rate(sale_currency, None, operation_date).await?;
        let cost_rate = self.resolve_rate(cost_currency, None, operation_date).await?;
        let cost_in_sale_currency = if cost_currency == sale_currency {
            cost
        } else {
            from_base(to_base(cost, cost_currency, cost_rate)?, sale_currency, sale_rate)?
        };

        // 1. VAT
        let sale_vat = self
            .vat
            .create_sale_vat(SaleVatInput {
                operation_id,
                sale_amount_total: sale_total,
                operator_cost: cost_in_sale_currency,
                currency: sale_currency,
                sale_date: operation_date,
            })
            .await?;
        let purchase_vat = if cost > Decimal::ZERO {
            let row = self
                .vat
                .create_purchase_vat(PurchaseVatInput {
                    operation_id,
                    operator_id: operation.operator_id,
                    operator_cost_total: cost,
                    currency: cost_currency,
                    purchase_date: operation.purchase_date.unwrap_or(operation_date),
                })
                .await?;
            Some(row.id)
        } else {
            None
        };

        // 2. Receivable
        let income_movement_id = self
            .book_once(
                &operation,
                CoreMovementType::Income,
                INCOME_KEY,
                sale_total,
                sale_currency,
                sale_rate,
                user_id,
            )
            .await?;

        // 3. Payable
        let expense_movement_id = if cost > Decimal::ZERO {
            Some(
                self.book_once(
                    &operation,
                    CoreMovementType::Expense,
                    EXPENSE_KEY,
                    cost,
                    cost_currency,
                    cost_rate,
                    user_id,
                )
                .await?,
            )
        } else {
            None
        };

        // 4. Operator obligation
        let operator_payment_id = match operation.operator_id {
            Some(operator_id) if cost > Decimal::ZERO => {
                Some(self.open_obligation(&operation, operator_id, cost, cost_currency, today).await?)
            }
            _ => None,
        };

        info!(%operation_id, "Operation booked");
        Ok(BookingSummary {
            operation_id,
            sale_vat_id: sale_vat.id,
            purchase_vat_id: purchase_vat,
            income_movement_id,
            expense_movement_id,
            operator_payment_id,
        })
    }

    /// Collects a customer payment: marks it PAID, records the cash movement
    /// on the default account for its method, then reconciles FX for the
    /// operation using the payment id as settlement key.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment is missing or is not a customer
    /// INCOME, its method's account keeps another currency, a USD payment has
    /// no rate, or any step fails.
    pub async fn settle_customer_payment(
        &self,
        payment_id: Uuid,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<SettlementSummary, BookingError> {
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.db)
            .await?
            .ok_or(BookingError::PaymentNotFound(payment_id))?;
        if payment.payer_type != PayerType::Customer
            || payment.direction != PaymentDirection::Income
        {
            return Err(BookingError::NotACustomerCollection(payment_id));
        }

        let operation_id = payment.operation_id;
        let currency = Currency::from(payment.currency);
        let method = PaymentMethod::from(payment.method);
        let token = DefaultAccountToken::from(method);
        settlement_archetype(token, currency).map_err(LedgerStoreError::from)?;
        let rate = self
            .resolve_rate(currency, payment.exchange_rate, payment.date_paid.unwrap_or(today))
            .await?;
        let key = payment_id.to_string();

        let movement_id = if let Some(existing) = payment.ledger_movement_id {
            debug!(%payment_id, "Payment already collected");
            existing
        } else {
            let movement_id = match self
                .ledger
                .find_by_idempotency_key(operation_id, CoreMovementType::Income, &key)
                .await?
            {
                Some(movement) => movement.id,
                None => {
                    let account_id = self
                        .ledger
                        .get_or_create_default_account(token, currency, user_id)
                        .await?;
                    self.ledger
                        .record_movement(MovementInput {
                            operation_id: Some(operation_id),
                            lead_id: None,
                            movement_type: CoreMovementType::Income,
                            concept: "Cobro de cliente".to_string(),
                            currency,
                            amount_original: payment.amount,
                            exchange_rate: rate,
                            amount_ars_equivalent: Some(to_base(payment.amount, currency, rate)?),
                            method,
                            account_id,
                            seller_id: None,
                            operator_id: None,
                            receipt_number: None,
                            notes: None,
                            idempotency_key: Some(key.clone()),
                            created_by: user_id,
                        })
                        .await?
                }
            };

            let mut active: payments::ActiveModel = payment.into();
            active.status = Set(SettlementStatus::Paid);
            active.date_paid = Set(Some(today));
            active.exchange_rate = Set(rate);
            active.ledger_movement_id = Set(Some(movement_id));
            active.updated_at = Set(chrono::Utc::now().into());
            active.update(&self.db).await?;
            info!(%payment_id, %operation_id, %movement_id, "Customer payment collected");
            movement_id
        };

        let fx = self
            .fx
            .reconcile_operation_payment(operation_id, currency, rate, Some(&key), user_id)
            .await?;

        Ok(SettlementSummary {
            payment_id,
            movement_id,
            fx,
        })
    }

    /// Pays an operator obligation: records the OPERATOR_PAYMENT movement and
    /// marks the obligation PAID. Already paid obligations are returned as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the obligation is missing, the method's account
    /// keeps another currency, a USD amount has no rate, or any step fails.
    pub async fn settle_operator_payment(
        &self,
        operator_payment_id: Uuid,
        method: PaymentMethod,
        rate: Option<Decimal>,
        user_id: Uuid,
        today: NaiveDate,
    ) -> Result<operator_payments::Model, BookingError> {
        let obligation = self.operator_payments.get(operator_payment_id).await?;
        if obligation.status == OperatorPaymentStatus::Paid {
            debug!(%operator_payment_id, "Operator payment already settled");
            return Ok(obligation);
        }

        let currency = Currency::from(obligation.currency);
        let token = DefaultAccountToken::from(method);
        settlement_archetype(token, currency).map_err(LedgerStoreError::from)?;
        let rate = self.resolve_rate(currency, rate, today).await?;
        let account_id = self
            .ledger
            .get_or_create_default_account(token, currency, user_id)
            .await?;

        let movement_id = self
            .ledger
            .record_movement(MovementInput {
                operation_id: Some(obligation.operation_id),
                lead_id: None,
                movement_type: CoreMovementType::OperatorPayment,
                concept: "Pago a operador".to_string(),
                currency,
                amount_original: obligation.amount,
                exchange_rate: rate,
                amount_ars_equivalent: Some(to_base(obligation.amount, currency, rate)?),
                method,
                account_id,
                seller_id: None,
                operator_id: Some(obligation.operator_id),
                receipt_number: None,
                notes: obligation.notes.clone(),
                idempotency_key: Some(format!("operator-payment:{operator_payment_id}")),
                created_by: user_id,
            })
            .await?;

        let paid = self
            .operator_payments
            .mark_as_paid(operator_payment_id, Some(movement_id))
            .await?;
        Ok(paid)
    }

    /// Rate for a USD amount: the given one, the rate in effect on `date`,
    /// then the latest known. ARS needs no rate.
    async fn resolve_rate(
        &self,
        currency: Currency,
        given: Option<Decimal>,
        date: NaiveDate,
    ) -> Result<Option<Decimal>, BookingError> {
        if currency.is_base() {
            return Ok(None);
        }
        if let Some(rate) = given.filter(|r| *r > Decimal::ZERO) {
            return Ok(Some(rate));
        }
        if let Some(rate) = self.rates.get_rate(date, currency, Currency::Ars).await {
            return Ok(Some(rate));
        }
        self.rates
            .get_latest_rate(currency, Currency::Ars)
            .await
            .map(Some)
            .ok_or(BookingError::MissingRate { currency, date })
    }

    #[allow(clippy::too_many_arguments)]
    async fn book_once(
        &self,
        operation: &operations::Model,
        movement_type: CoreMovementType,
        key: &str,
        amount: Decimal,
        currency: Currency,
        rate: Option<Decimal>,
        user_id: Uuid,
    ) -> Result<Uuid, BookingError> {
        if let Some(existing) = self
            .ledger
            .find_by_idempotency_key(operation.id, movement_type, key)
            .await?
        {
            debug!(operation_id = %operation.id, movement_type = movement_type.as_str(), "Already booked");
            return Ok(existing.id);
        }

        let control = match movement_type {
            CoreMovementType::Income => ControlAccount::Receivables,
            _ => ControlAccount::Payables,
        };
        let account_id = self
            .ledger
            .get_or_create_control_account(control, currency, user_id)
            .await?;

        let concept = match (movement_type, operation.file_code.as_deref()) {
            (CoreMovementType::Income, Some(code)) => format!("Venta {code}"),
            (CoreMovementType::Income, None) => "Venta".to_string(),
            (_, Some(code)) => format!("Costo operador {code}"),
            (_, None) => "Costo operador".to_string(),
        };

        let movement_id = self
            .ledger
            .record_movement(MovementInput {
                operation_id: Some(operation.id),
                lead_id: None,
                movement_type,
                concept,
                currency,
                amount_original: amount,
                exchange_rate: rate,
                amount_ars_equivalent: Some(to_base(amount, currency, rate)?),
                method: PaymentMethod::Other,
                account_id,
                seller_id: operation.seller_id,
                operator_id: operation.operator_id,
                receipt_number: None,
                notes: None,
                idempotency_key: Some(key.to_string()),
                created_by: user_id,
            })
            .await?;
        Ok(movement_id)
    }

    async fn open_obligation(
        &self,
        operation: &operations::Model,
        operator_id: Uuid,
        cost: Decimal,
        currency: Currency,
        today: NaiveDate,
    ) -> Result<Uuid, BookingError> {
        let existing = self.operator_payments.list_for_operation(operation.id).await?;
        if let Some(first) = existing.first() {
            debug!(operation_id = %operation.id, "Operator payment already open");
            return Ok(first.id);
        }

        let product = operation
            .product_type
            .map_or(ProductType::Other, ProductType::from);
        let due_date = calculate_due_date(
            product,
            operation.purchase_date,
            operation.checkin_date,
            operation.departure_date,
            today,
        );

        let created = self
            .operator_payments
            .create_payment(CreateOperatorPaymentInput {
                operation_id: operation.id,
                operator_id,
                amount: cost,
                currency,
                due_date,
                notes: None,
            })
            .await?;
        Ok(created.id)
    }
}
