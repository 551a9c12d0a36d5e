//! Maintenance tasks for Maleta, meant to be run from cron.
//!
//! Usage:
//!   maintenance sweep-overdue            - Flag past-due operator payments as OVERDUE
//!   maintenance refresh-rates            - Store today's official USD/ARS quote
//!   maintenance refresh-rates --rate N   - Store a given quote instead of fetching one

use anyhow::{Context, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use maleta_db::repositories::{ExchangeRateRepository, OperatorPaymentRepository, UpsertRateInput};
use maleta_db::{connect, entities::sea_orm_active_enums::RateSource};
use maleta_shared::{AccountingPolicy, AppConfig, types::Currency};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "maintenance")]
#[command(about = "Scheduled maintenance tasks for the Maleta ledger")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mark PENDING operator payments due before today as OVERDUE.
    SweepOverdue {
        /// Day to sweep as of (defaults to today, UTC).
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Fetch and store the USD/ARS quote for today.
    RefreshRates {
        /// Store this rate instead of querying the provider.
        #[arg(long)]
        rate: Option<Decimal>,
        /// Day the rate applies to (defaults to today, UTC).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

/// Quote returned by the rate provider. Only the selling price is used.
#[derive(Debug, Deserialize)]
struct Quote {
    venta: Decimal,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maleta=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = connect(&config.database).await?;

    match cli.command {
        Command::SweepOverdue { today } => {
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let swept = OperatorPaymentRepository::new(db).sweep_overdue(today).await?;
            info!(%today, swept, "Overdue sweep finished");
        }
        Command::RefreshRates { rate, date } => {
            let date = date.unwrap_or_else(|| Utc::now().date_naive());
            let (rate, source, notes) = match rate {
                Some(rate) => (rate, RateSource::Manual, "Entered via maintenance CLI".to_owned()),
                None => (
                    fetch_quote(&config.accounting).await?,
                    RateSource::Api,
                    format!("Fetched from {}", config.accounting.rate_refresh_url),
                ),
            };
            let saved = ExchangeRateRepository::new(db)
                .upsert_rate(UpsertRateInput {
                    rate_date: date,
                    from_currency: Currency::Usd,
                    to_currency: Currency::Ars,
                    rate,
                    source,
                    notes: Some(notes),
                    created_by: None,
                })
                .await?;
            info!(rate_id = %saved.id, %date, rate = %saved.rate, source = ?saved.source, "Exchange rate refreshed");
        }
    }

    Ok(())
}

async fn fetch_quote(policy: &AccountingPolicy) -> anyhow::Result<Decimal> {
    let response = reqwest::Client::new()
        .get(&policy.rate_refresh_url)
        .send()
        .await
        .context("Rate provider unreachable")?;

    if !response.status().is_success() {
        bail!("Rate provider answered {}", response.status());
    }

    let quote: Quote = response.json().await.context("Unexpected rate provider payload")?;
    if quote.venta <= Decimal::ZERO {
        warn!(rate = %quote.venta, "Provider returned a non-positive rate");
        bail!("Provider returned a non-positive rate: {}", quote.venta);
    }
    Ok(quote.venta)
}
