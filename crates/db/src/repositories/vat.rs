//! VAT (IVA) repository.
//!
//! One sale row and one purchase row per operation. Creation is insert-once so
//! the booking workflow can be re-run safely.

use chrono::{NaiveDate, Utc};
use maleta_core::vat::{MonthlyVat, VatCalculator, VatError, month_bounds};
use maleta_shared::types::Currency;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect, Set,
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::entities::{iva_purchases, iva_sales, sea_orm_active_enums::CurrencyCode};

/// VAT record failures.
#[derive(Debug, thiserror::Error)]
pub enum VatStoreError {
    /// Invalid amounts, rate or period.
    #[error(transparent)]
    Invalid(#[from] VatError),

    /// Insert or aggregate query failed.
    #[error("vat store: {0}")]
    Database(#[from] DbErr),
}

/// Sale side of an operation.
#[derive(Debug, Clone)]
pub struct SaleVatInput {
    /// Operation the VAT belongs to.
    pub operation_id: Uuid,
    /// Gross sale total.
    pub sale_amount_total: Decimal,
    /// Operator cost deducted to get the margin.
    pub operator_cost: Decimal,
    /// Currency of both amounts.
    pub currency: Currency,
    /// Date the sale counts for.
    pub sale_date: NaiveDate,
}

/// Purchase side of an operation.
#[derive(Debug, Clone)]
pub struct PurchaseVatInput {
    /// Operation the VAT belongs to.
    pub operation_id: Uuid,
    /// Operator invoicing the cost.
    pub operator_id: Option<Uuid>,
    /// VAT-inclusive operator cost.
    pub operator_cost_total: Decimal,
    /// Currency of the cost.
    pub currency: Currency,
    /// Date the purchase counts for.
    pub purchase_date: NaiveDate,
}

#[derive(Debug, FromQueryResult)]
struct VatTotal {
    total: Option<Decimal>,
}

/// VAT repository.
#[derive(Debug, Clone)]
pub struct VatRepository {
    db: DatabaseConnection,
    calculator: VatCalculator,
}

impl VatRepository {
    /// Creates a VAT repository using `calculator` for every computation.
    #[must_use]
    pub const fn new(db: DatabaseConnection, calculator: VatCalculator) -> Self {
        Self { db, calculator }
    }

    /// The calculator in use.
    #[must_use]
    pub const fn calculator(&self) -> &VatCalculator {
        &self.calculator
    }

    /// Books sale VAT for an operation unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts or a failed query/insert.
    pub async fn create_sale_vat(&self, input: SaleVatInput) -> Result<iva_sales::Model, VatStoreError> {
        if let Some(existing) = self.find_sale(input.operation_id).await? {
            debug!(operation_id = %input.operation_id, "Sale VAT already booked");
            return Ok(existing);
        }

        let vat = self
            .calculator
            .calculate_sale_vat(input.sale_amount_total, input.operator_cost)?;
        let now = Utc::now().into();

        let row = iva_sales::ActiveModel {
            id: Set(Uuid::now_v7()),
            operation_id: Set(input.operation_id),
            sale_amount_total: Set(input.sale_amount_total),
            net_amount: Set(vat.net),
            iva_amount: Set(vat.vat),
            currency: Set(input.currency.into()),
            sale_date: Set(input.sale_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(operation_id = %row.operation_id, iva = %row.iva_amount, "Sale VAT booked");
        Ok(row)
    }

    /// Books purchase VAT for an operation unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative cost or a failed query/insert.
    pub async fn create_purchase_vat(
        &self,
        input: PurchaseVatInput,
    ) -> Result<iva_purchases::Model, VatStoreError> {
        if let Some(existing) = self.find_purchase(input.operation_id).await? {
            debug!(operation_id = %input.operation_id, "Purchase VAT already booked");
            return Ok(existing);
        }

        let vat = self.calculator.calculate_purchase_vat(input.operator_cost_total)?;
        let now = Utc::now().into();

        let row = iva_purchases::ActiveModel {
            id: Set(Uuid::now_v7()),
            operation_id: Set(input.operation_id),
            operator_id: Set(input.operator_id),
            operator_cost_total: Set(input.operator_cost_total),
            net_amount: Set(vat.net),
            iva_amount: Set(vat.vat),
            currency: Set(input.currency.into()),
            purchase_date: Set(input.purchase_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        info!(operation_id = %row.operation_id, iva = %row.iva_amount, "Purchase VAT booked");
        Ok(row)
    }

    /// Recomputes sale VAT after the operation amounts changed.
    ///
    /// Returns `None` when the operation has no sale VAT row.
    ///
    /// # Errors
    ///
    /// Returns an error for negative amounts or a failed query/update.
    pub async fn update_sale_vat(
        &self,
        operation_id: Uuid,
        sale_amount_total: Decimal,
        operator_cost: Decimal,
    ) -> Result<Option<iva_sales::Model>, VatStoreError> {
        let Some(existing) = self.find_sale(operation_id).await? else {
            debug!(%operation_id, "No sale VAT to update");
            return Ok(None);
        };

        let vat = self.calculator.calculate_sale_vat(sale_amount_total, operator_cost)?;
        let mut active: iva_sales::ActiveModel = existing.into();
        active.sale_amount_total = Set(sale_amount_total);
        active.net_amount = Set(vat.net);
        active.iva_amount = Set(vat.vat);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        info!(%operation_id, iva = %updated.iva_amount, "Sale VAT updated");
        Ok(Some(updated))
    }

    /// Recomputes purchase VAT after the operator cost changed.
    ///
    /// Returns `None` when the operation has no purchase VAT row.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative cost or a failed query/update.
    pub async fn update_purchase_vat(
        &self,
        operation_id: Uuid,
        operator_cost_total: Decimal,
    ) -> Result<Option<iva_purchases::Model>, VatStoreError> {
        let Some(existing) = self.find_purchase(operation_id).await? else {
            debug!(%operation_id, "No purchase VAT to update");
            return Ok(None);
        };

        let vat = self.calculator.calculate_purchase_vat(operator_cost_total)?;
        let mut active: iva_purchases::ActiveModel = existing.into();
        active.operator_cost_total = Set(operator_cost_total);
        active.net_amount = Set(vat.net);
        active.iva_amount = Set(vat.vat);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        info!(%operation_id, iva = %updated.iva_amount, "Purchase VAT updated");
        Ok(Some(updated))
    }

    /// Removes both VAT rows of an operation. Returns the number deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails.
    pub async fn delete_vat_for_operation(&self, operation_id: Uuid) -> Result<u64, VatStoreError> {
        let sales = iva_sales::Entity::delete_many()
            .filter(iva_sales::Column::OperationId.eq(operation_id))
            .exec(&self.db)
            .await?;
        let purchases = iva_purchases::Entity::delete_many()
            .filter(iva_purchases::Column::OperationId.eq(operation_id))
            .exec(&self.db)
            .await?;

        let deleted = sales.rows_affected + purchases.rows_affected;
        info!(%operation_id, deleted, "VAT rows deleted");
        Ok(deleted)
    }

    /// VAT position for a calendar month in one currency.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid month or a failed query.
    pub async fn get_monthly_vat_payable(
        &self,
        year: i32,
        month: u32,
        currency: Currency,
    ) -> Result<MonthlyVat, VatStoreError> {
        let (start, end) = month_bounds(year, month)?;
        let currency = CurrencyCode::from(currency);

        let sales = iva_sales::Entity::find()
            .select_only()
            .column_as(Expr::col(iva_sales::Column::IvaAmount).sum(), "total")
            .filter(iva_sales::Column::Currency.eq(currency))
            .filter(iva_sales::Column::SaleDate.gte(start))
            .filter(iva_sales::Column::SaleDate.lt(end))
            .into_model::<VatTotal>()
            .one(&self.db)
            .await?
            .and_then(|t| t.total)
            .unwrap_or(Decimal::ZERO);

        let purchases = iva_purchases::Entity::find()
            .select_only()
            .column_as(Expr::col(iva_purchases::Column::IvaAmount).sum(), "total")
            .filter(iva_purchases::Column::Currency.eq(currency))
            .filter(iva_purchases::Column::PurchaseDate.gte(start))
            .filter(iva_purchases::Column::PurchaseDate.lt(end))
            .into_model::<VatTotal>()
            .one(&self.db)
            .await?
            .and_then(|t| t.total)
            .unwrap_or(Decimal::ZERO);

        Ok(MonthlyVat::new(sales, purchases))
    }

    async fn find_sale(&self, operation_id: Uuid) -> Result<Option<iva_sales::Model>, DbErr> {
        iva_sales::Entity::find()
            .filter(iva_sales::Column::OperationId.eq(operation_id))
            .one(&self.db)
            .await
    }

    async fn find_purchase(&self, operation_id: Uuid) -> Result<Option<iva_purchases::Model>, DbErr> {
        iva_purchases::Entity::find()
            .filter(iva_purchases::Column::OperationId.eq(operation_id))
            .one(&self.db)
            .await
    }
}
