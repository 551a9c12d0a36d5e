//! Schema history. Applied in order by `maleta-migrator`; each step is raw SQL
//! so the enums, checks and the rate function stay readable as Postgres.

pub use sea_orm_migration::prelude::*;

mod m20251001_000001_accounting_schema;
mod m20251001_000002_exchange_rate_function;

/// Ordered list of schema steps.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_accounting_schema::Migration),
            Box::new(m20251001_000002_exchange_rate_function::Migration),
        ]
    }
}
