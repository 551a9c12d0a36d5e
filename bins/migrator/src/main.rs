//! Applies the accounting schema.
//!
//! Wraps the stock sea-orm-migration CLI (`up`, `down`, `status`, `fresh`,
//! `refresh`). The target comes from `DATABASE_URL`, optionally via `.env`.

use maleta_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
