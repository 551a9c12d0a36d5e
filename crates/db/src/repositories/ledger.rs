//! Ledger repository: movements, financial accounts and balances.
//!
//! Movements are append-only. Balances are always folded from the journal;
//! `financial_accounts.current_balance` is a projection refreshed on demand.

use chrono::Utc;
use maleta_core::ledger::{
    AccountBalance, AccountCategory, BalanceLine, ControlAccount, DefaultAccountToken,
    LedgerError, MovementFilter, MovementInput, MovementType as CoreMovementType, Polarity,
    compute_balance, control_archetype, default_archetype, validate_movement,
};
use maleta_shared::types::{AccountId, Currency};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{
    chart_of_accounts, commission_records, financial_accounts, ledger_movements,
    sea_orm_active_enums::{CurrencyCode, FinancialAccountType, MovementType, SettlementStatus},
};

/// Failures of the persistent ledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerStoreError {
    /// Movement failed validation; nothing was written.
    #[error(transparent)]
    Invalid(#[from] LedgerError),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Store failure. Nothing was written.
    #[error("ledger store: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a financial account.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAccountInput {
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: FinancialAccountType,
    /// Account currency.
    pub currency: Currency,
    /// Opening balance.
    #[serde(default)]
    pub initial_balance: Decimal,
    /// Chart-of-accounts link (drives ASSET/LIABILITY polarity).
    #[serde(default)]
    pub chart_account_id: Option<Uuid>,
}

/// Ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Repository over the given connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Validates and appends one movement, returning its id.
    ///
    /// COMMISSION movements linked to an operation also settle that
    /// operation's pending commission records; a failure there is logged and
    /// does not undo the movement.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The movement fails validation (nothing is written)
    /// - The insert fails
    pub async fn record_movement(&self, input: MovementInput) -> Result<Uuid, LedgerStoreError> {
        let ars_equivalent = validate_movement(&input)?;

        let movement = ledger_movements::ActiveModel {
            id: Set(Uuid::now_v7()),
            operation_id: Set(input.operation_id),
            lead_id: Set(input.lead_id),
            movement_type: Set(input.movement_type.into()),
            concept: Set(input.concept),
            currency: Set(input.currency.into()),
            amount_original: Set(input.amount_original),
            exchange_rate: Set(input.exchange_rate),
            amount_ars_equivalent: Set(ars_equivalent),
            method: Set(input.method.into()),
            account_id: Set(input.account_id),
            seller_id: Set(input.seller_id),
            operator_id: Set(input.operator_id),
            receipt_number: Set(input.receipt_number),
            notes: Set(input.notes),
            idempotency_key: Set(input.idempotency_key),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        info!(
            movement_id = %movement.id,
            movement_type = input.movement_type.as_str(),
            amount_ars = %ars_equivalent,
            "Ledger movement recorded"
        );

        if input.movement_type == CoreMovementType::Commission
            && let Some(operation_id) = input.operation_id
            && let Err(err) = self.settle_commissions(operation_id).await
        {
            warn!(
                error = %err,
                %operation_id,
                "Failed to mark commission records as paid"
            );
        }

        Ok(movement.id)
    }

    async fn settle_commissions(&self, operation_id: Uuid) -> Result<u64, DbErr> {
        let result = commission_records::Entity::update_many()
            .set(commission_records::ActiveModel {
                status: Set(SettlementStatus::Paid),
                date_paid: Set(Some(Utc::now().date_naive())),
                ..Default::default()
            })
            .filter(commission_records::Column::OperationId.eq(operation_id))
            .filter(commission_records::Column::Status.eq(SettlementStatus::Pending))
            .exec(&self.db)
            .await?;

        debug!(%operation_id, settled = result.rows_affected, "Commission records settled");
        Ok(result.rows_affected)
    }

    /// Balance of an account folded from its movements.
    ///
    /// Amounts are taken in the account's own currency: the ARS equivalent
    /// for ARS accounts, the original amount for USD accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or a query fails.
    pub async fn get_account_balance(
        &self,
        account_id: Uuid,
    ) -> Result<AccountBalance, LedgerStoreError> {
        let account = financial_accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerStoreError::AccountNotFound(account_id))?;
        self.balance_of(&account).await
    }

    async fn balance_of(
        &self,
        account: &financial_accounts::Model,
    ) -> Result<AccountBalance, LedgerStoreError> {
        let category: Option<AccountCategory> = match account.chart_account_id {
            Some(chart_id) => chart_of_accounts::Entity::find_by_id(chart_id)
                .one(&self.db)
                .await?
                .map(|chart| chart.category.into()),
            None => None,
        };
        let polarity = Polarity::for_category(category);

        let movements = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::AccountId.eq(account.id))
            .all(&self.db)
            .await?;

        let currency = Currency::from(account.currency);
        let movement_count = movements.len();
        let lines = movements.into_iter().map(|m| BalanceLine {
            movement_type: m.movement_type.into(),
            amount: match currency {
                Currency::Ars => m.amount_ars_equivalent,
                Currency::Usd => m.amount_original,
            },
        });
        let balance = compute_balance(account.initial_balance, polarity, lines);

        Ok(AccountBalance {
            account_id: AccountId::from(account.id),
            currency,
            initial_balance: account.initial_balance,
            movement_count,
            balance,
        })
    }

    /// Recomputes the balance and stores it in `current_balance`.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist or a query fails.
    pub async fn refresh_cached_balance(
        &self,
        account_id: Uuid,
    ) -> Result<AccountBalance, LedgerStoreError> {
        let account = financial_accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(LedgerStoreError::AccountNotFound(account_id))?;
        let balance = self.balance_of(&account).await?;

        let mut active: financial_accounts::ActiveModel = account.into();
        active.current_balance = Set(balance.balance);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await?;

        debug!(%account_id, balance = %balance.balance, "Cached balance refreshed");
        Ok(balance)
    }

    /// Moves every movement of a lead onto an operation. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub async fn transfer_lead_to_operation(
        &self,
        lead_id: Uuid,
        operation_id: Uuid,
    ) -> Result<u64, LedgerStoreError> {
        let result = ledger_movements::Entity::update_many()
            .set(ledger_movements::ActiveModel {
                operation_id: Set(Some(operation_id)),
                lead_id: Set(None),
                ..Default::default()
            })
            .filter(ledger_movements::Column::LeadId.eq(lead_id))
            .exec(&self.db)
            .await?;

        info!(
            %lead_id,
            %operation_id,
            transferred = result.rows_affected,
            "Lead movements transferred"
        );
        Ok(result.rows_affected)
    }

    /// Finds the canonical account for a payment token, creating it if
    /// needed.
    ///
    /// Two concurrent first calls may both create an account; the oldest one
    /// wins on later lookups.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or the insert fails.
    pub async fn get_or_create_default_account(
        &self,
        token: DefaultAccountToken,
        currency: Currency,
        user_id: Uuid,
    ) -> Result<Uuid, LedgerStoreError> {
        let archetype = default_archetype(token, currency);
        let account_type = FinancialAccountType::from(archetype.account_type);
        let currency_code = CurrencyCode::from(archetype.currency);

        let existing = financial_accounts::Entity::find()
            .filter(financial_accounts::Column::AccountType.eq(account_type))
            .filter(financial_accounts::Column::Currency.eq(currency_code))
            .filter(financial_accounts::Column::IsActive.eq(true))
            .order_by_asc(financial_accounts::Column::CreatedAt)
            .one(&self.db)
            .await?;

        if let Some(account) = existing {
            return Ok(account.id);
        }

        let now = Utc::now().into();
        let created = financial_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(archetype.name.to_string()),
            account_type: Set(account_type),
            currency: Set(currency_code),
            initial_balance: Set(Decimal::ZERO),
            current_balance: Set(Decimal::ZERO),
            is_active: Set(true),
            chart_account_id: Set(None),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            account_id = %created.id,
            account_type = archetype.account_type.as_str(),
            "Default account created"
        );
        Ok(created.id)
    }

    /// Finds the receivable or payable account for a currency, creating it
    /// (and its chart entry) if needed.
    ///
    /// The account is linked to the chart so payables fold with LIABILITY
    /// polarity.
    ///
    /// # Errors
    ///
    /// Returns an error if a query or an insert fails.
    pub async fn get_or_create_control_account(
        &self,
        kind: ControlAccount,
        currency: Currency,
        user_id: Uuid,
    ) -> Result<Uuid, LedgerStoreError> {
        let archetype = control_archetype(kind, currency);
        let account_type = FinancialAccountType::from(archetype.account.account_type);
        let currency_code = CurrencyCode::from(currency);

        let existing = financial_accounts::Entity::find()
            .filter(financial_accounts::Column::AccountType.eq(account_type))
            .filter(financial_accounts::Column::Currency.eq(currency_code))
            .filter(financial_accounts::Column::IsActive.eq(true))
            .order_by_asc(financial_accounts::Column::CreatedAt)
            .one(&self.db)
            .await?;

        if let Some(account) = existing {
            return Ok(account.id);
        }

        let now = Utc::now().into();
        let chart = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::Code.eq(archetype.chart_code))
            .one(&self.db)
            .await?;
        let chart_id = match chart {
            Some(entry) => entry.id,
            None => {
                let entry = chart_of_accounts::ActiveModel {
                    id: Set(Uuid::now_v7()),
                    code: Set(archetype.chart_code.to_string()),
                    name: Set(archetype.chart_name.to_string()),
                    category: Set(archetype.category.into()),
                    is_active: Set(true),
                    created_at: Set(now),
                }
                .insert(&self.db)
                .await?;
                warn!(code = archetype.chart_code, "Chart entry was missing, created");
                entry.id
            }
        };

        let created = financial_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(archetype.account.name.to_string()),
            account_type: Set(account_type),
            currency: Set(currency_code),
            initial_balance: Set(Decimal::ZERO),
            current_balance: Set(Decimal::ZERO),
            is_active: Set(true),
            chart_account_id: Set(Some(chart_id)),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(
            account_id = %created.id,
            account_type = archetype.account.account_type.as_str(),
            "Control account created"
        );
        Ok(created.id)
    }

    /// Creates a financial account.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub async fn create_account(
        &self,
        input: CreateAccountInput,
        user_id: Uuid,
    ) -> Result<financial_accounts::Model, LedgerStoreError> {
        let now = Utc::now().into();
        let account = financial_accounts::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            account_type: Set(input.account_type),
            currency: Set(input.currency.into()),
            initial_balance: Set(input.initial_balance),
            current_balance: Set(input.initial_balance),
            is_active: Set(true),
            chart_account_id: Set(input.chart_account_id),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(account_id = %account.id, name = %account.name, "Financial account created");
        Ok(account)
    }

    /// Lists movements matching the filter, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_movements(
        &self,
        filter: &MovementFilter,
    ) -> Result<Vec<ledger_movements::Model>, LedgerStoreError> {
        let mut query = ledger_movements::Entity::find();
        if let Some(operation_id) = filter.operation_id {
            query = query.filter(ledger_movements::Column::OperationId.eq(operation_id));
        }
        if let Some(account_id) = filter.account_id {
            query = query.filter(ledger_movements::Column::AccountId.eq(account_id));
        }
        if let Some(lead_id) = filter.lead_id {
            query = query.filter(ledger_movements::Column::LeadId.eq(lead_id));
        }
        if let Some(movement_type) = filter.movement_type {
            query = query
                .filter(ledger_movements::Column::MovementType.eq(MovementType::from(movement_type)));
        }

        let movements = query
            .order_by_asc(ledger_movements::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(movements)
    }

    /// Finds the movement an event already produced, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_idempotency_key(
        &self,
        operation_id: Uuid,
        movement_type: CoreMovementType,
        key: &str,
    ) -> Result<Option<ledger_movements::Model>, LedgerStoreError> {
        let found = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::OperationId.eq(operation_id))
            .filter(ledger_movements::Column::MovementType.eq(MovementType::from(movement_type)))
            .filter(ledger_movements::Column::IdempotencyKey.eq(key))
            .one(&self.db)
            .await?;
        Ok(found)
    }
}
