//! `SeaORM` Entity for iva_sales table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CurrencyCode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "iva_sales")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub operation_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub sale_amount_total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub net_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub iva_amount: Decimal,
    pub currency: CurrencyCode,
    pub sale_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
