//! `get_exchange_rate` SQL function.
//!
//! Returns the rate in effect on a date (latest `rate_date <= p_date`) or NULL.
//! Callers fall back to a direct query when the function is missing or fails.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(GET_EXCHANGE_RATE_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP FUNCTION IF EXISTS get_exchange_rate(DATE, currency_code, currency_code);",
        )
        .await?;
        Ok(())
    }
}

const GET_EXCHANGE_RATE_SQL: &str = r"
CREATE OR REPLACE FUNCTION get_exchange_rate(
    p_date DATE,
    p_from_currency currency_code DEFAULT 'USD',
    p_to_currency currency_code DEFAULT 'ARS'
) RETURNS NUMERIC(18, 4) AS $$
DECLARE
    found_rate NUMERIC(18, 4);
BEGIN
    IF p_from_currency = p_to_currency THEN
        RETURN 1;
    END IF;

    SELECT er.rate INTO found_rate
    FROM exchange_rates er
    WHERE er.from_currency = p_from_currency
      AND er.to_currency = p_to_currency
      AND er.rate_date <= p_date
    ORDER BY er.rate_date DESC
    LIMIT 1;

    RETURN found_rate;
END;
$$ LANGUAGE plpgsql STABLE;
";
