//! Exchange rate repository.
//!
//! Reads never fail loudly: a store error while looking up a rate is logged
//! and treated as "no rate found". Writes propagate their errors.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use maleta_core::currency::{CurrencyError, RatePoint, resolve_rates_batch, validate_rate_input};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, Statement,
};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::entities::{
    exchange_rates,
    sea_orm_active_enums::{CurrencyCode, RateSource},
};

/// Failure of a rate write.
#[derive(Debug, thiserror::Error)]
pub enum ExchangeRateError {
    /// Malformed rate input.
    #[error(transparent)]
    Invalid(#[from] CurrencyError),

    /// Store rejected the write.
    #[error("exchange rate store: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating or updating the rate of one day.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertRateInput {
    /// Day the rate applies from.
    pub rate_date: NaiveDate,
    /// Foreign currency.
    #[serde(default = "default_from")]
    pub from_currency: Currency,
    /// Target currency.
    #[serde(default = "default_to")]
    pub to_currency: Currency,
    /// 1 `from_currency` = `rate` `to_currency`.
    pub rate: Decimal,
    /// Where the rate came from.
    #[serde(default = "default_source")]
    pub source: RateSource,
    /// Free-text annotation, e.g. the quote it was copied from.
    #[serde(default)]
    pub notes: Option<String>,
    /// User recording the rate.
    #[serde(default)]
    pub created_by: Option<Uuid>,
}

fn default_from() -> Currency {
    Currency::Usd
}

fn default_to() -> Currency {
    Currency::Ars
}

fn default_source() -> RateSource {
    RateSource::Manual
}

/// Reads and writes the `exchange_rates` table.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
}

impl ExchangeRateRepository {
    /// Wraps a pooled connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Rate in effect on `date` (latest rate on or before it).
    ///
    /// Tries the `get_exchange_rate` SQL function first and falls back to a
    /// direct query when it fails or returns NULL.
    pub async fn get_rate(&self, date: NaiveDate, from: Currency, to: Currency) -> Option<Decimal> {
        if from == to {
            return Some(Decimal::ONE);
        }

        match self.rate_from_function(date, from, to).await {
            Ok(Some(rate)) => return Some(rate),
            Ok(None) => debug!(%date, %from, %to, "get_exchange_rate returned no rate"),
            Err(err) => warn!(error = %err, %date, "get_exchange_rate failed, querying table"),
        }

        match self.find_rate_on_or_before(date, from, to).await {
            Ok(found) => found.map(|m| m.rate),
            Err(err) => {
                warn!(error = %err, %date, %from, %to, "Exchange rate lookup failed");
                None
            }
        }
    }

    async fn rate_from_function(
        &self,
        date: NaiveDate,
        from: Currency,
        to: Currency,
    ) -> Result<Option<Decimal>, DbErr> {
        let stmt = Statement::from_sql_and_values(
            self.db.get_database_backend(),
            "SELECT get_exchange_rate($1, $2::currency_code, $3::currency_code) AS rate",
            [date.into(), from.code().into(), to.code().into()],
        );
        let Some(row) = self.db.query_one(stmt).await? else {
            return Ok(None);
        };
        row.try_get::<Option<Decimal>>("", "rate")
    }

    async fn find_rate_on_or_before(
        &self,
        date: NaiveDate,
        from: Currency,
        to: Currency,
    ) -> Result<Option<exchange_rates::Model>, DbErr> {
        exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(CurrencyCode::from(from)))
            .filter(exchange_rates::Column::ToCurrency.eq(CurrencyCode::from(to)))
            .filter(exchange_rates::Column::RateDate.lte(date))
            .order_by_desc(exchange_rates::Column::RateDate)
            .one(&self.db)
            .await
    }

    /// Most recent rate for the pair regardless of date.
    pub async fn get_latest_rate(&self, from: Currency, to: Currency) -> Option<Decimal> {
        let result = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(CurrencyCode::from(from)))
            .filter(exchange_rates::Column::ToCurrency.eq(CurrencyCode::from(to)))
            .order_by_desc(exchange_rates::Column::RateDate)
            .one(&self.db)
            .await;

        match result {
            Ok(found) => found.map(|m| m.rate),
            Err(err) => {
                warn!(error = %err, %from, %to, "Latest exchange rate lookup failed");
                None
            }
        }
    }

    /// Creates or updates the rate for `(rate_date, from, to)`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Rate is not positive
    /// - From and to currencies are the same
    /// - The write fails
    pub async fn upsert_rate(
        &self,
        input: UpsertRateInput,
    ) -> Result<exchange_rates::Model, ExchangeRateError> {
        validate_rate_input(input.from_currency, input.to_currency, input.rate)?;

        let existing = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::RateDate.eq(input.rate_date))
            .filter(exchange_rates::Column::FromCurrency.eq(CurrencyCode::from(input.from_currency)))
            .filter(exchange_rates::Column::ToCurrency.eq(CurrencyCode::from(input.to_currency)))
            .one(&self.db)
            .await?;

        let now = Utc::now().into();

        let saved = if let Some(existing_rate) = existing {
            let mut active: exchange_rates::ActiveModel = existing_rate.into();
            active.rate = Set(input.rate);
            active.source = Set(input.source);
            active.notes = Set(input.notes);
            active.updated_at = Set(now);
            // created_by/created_at keep the original author
            active.update(&self.db).await?
        } else {
            exchange_rates::ActiveModel {
                id: Set(Uuid::now_v7()),
                rate_date: Set(input.rate_date),
                from_currency: Set(input.from_currency.into()),
                to_currency: Set(input.to_currency.into()),
                rate: Set(input.rate),
                source: Set(input.source),
                notes: Set(input.notes),
                created_by: Set(input.created_by),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?
        };

        info!(
            rate_id = %saved.id,
            rate_date = %saved.rate_date,
            rate = %saved.rate,
            "Exchange rate saved"
        );
        Ok(saved)
    }

    /// Resolves many dates with a single range query.
    ///
    /// Dates without a prior rate map to `Decimal::ZERO`.
    pub async fn get_rates_batch(
        &self,
        dates: &[NaiveDate],
        from: Currency,
        to: Currency,
    ) -> HashMap<NaiveDate, Decimal> {
        let Some(max_date) = dates.iter().max().copied() else {
            return HashMap::new();
        };

        let rows = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(CurrencyCode::from(from)))
            .filter(exchange_rates::Column::ToCurrency.eq(CurrencyCode::from(to)))
            .filter(exchange_rates::Column::RateDate.lte(max_date))
            .order_by_asc(exchange_rates::Column::RateDate)
            .all(&self.db)
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, dates = dates.len(), "Batch exchange rate lookup failed");
                Vec::new()
            });

        let points: Vec<RatePoint> = rows
            .into_iter()
            .map(|m| RatePoint::new(m.rate_date, m.rate))
            .collect();
        resolve_rates_batch(&points, dates)
    }

    /// Lists every rate of the pair, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_rates(
        &self,
        from: Currency,
        to: Currency,
    ) -> Result<Vec<exchange_rates::Model>, ExchangeRateError> {
        let rates = exchange_rates::Entity::find()
            .filter(exchange_rates::Column::FromCurrency.eq(CurrencyCode::from(from)))
            .filter(exchange_rates::Column::ToCurrency.eq(CurrencyCode::from(to)))
            .order_by_desc(exchange_rates::Column::RateDate)
            .all(&self.db)
            .await?;

        Ok(rates)
    }
}
