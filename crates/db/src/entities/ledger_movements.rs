//! `SeaORM` Entity for ledger_movements table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CurrencyCode, MovementType, PaymentMethod};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub operation_id: Option<Uuid>,
    pub lead_id: Option<Uuid>,
    #[sea_orm(column_name = "type")]
    pub movement_type: MovementType,
    pub concept: String,
    pub currency: CurrencyCode,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount_original: Decimal,
    #[sea_orm(column_type = "Decimal(Some((18, 4)))", nullable)]
    pub exchange_rate: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))")]
    pub amount_ars_equivalent: Decimal,
    pub method: PaymentMethod,
    pub account_id: Uuid,
    pub seller_id: Option<Uuid>,
    pub operator_id: Option<Uuid>,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub idempotency_key: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::financial_accounts::Entity",
        from = "Column::AccountId",
        to = "super::financial_accounts::Column::Id"
    )]
    FinancialAccounts,
}

impl Related<super::financial_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinancialAccounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
