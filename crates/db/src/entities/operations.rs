//! `SeaORM` Entity for operations table.
//!
//! Bookings are owned by the wider back-office; the accounting layer reads
//! them.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CurrencyCode, ProductType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "operations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub file_code: Option<String>,
    pub seller_id: Option<Uuid>,
    pub operator_id: Option<Uuid>,
    pub product_type: Option<ProductType>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))", nullable)]
    pub sale_amount_total: Option<Decimal>,
    pub sale_currency: Option<CurrencyCode>,
    #[sea_orm(column_type = "Decimal(Some((18, 2)))", nullable)]
    pub operator_cost: Option<Decimal>,
    pub operator_cost_currency: Option<CurrencyCode>,
    pub purchase_date: Option<Date>,
    pub checkin_date: Option<Date>,
    pub departure_date: Option<Date>,
    pub lead_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::operator_payments::Entity")]
    OperatorPayments,
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::operator_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OperatorPayments.def()
    }
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
