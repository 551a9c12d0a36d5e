//! Operator payment due dates.

use chrono::{Duration, NaiveDate};

use super::types::ProductType;

/// Days after purchase to pay an airline.
pub const AIR_PAYMENT_DAYS: i64 = 10;
/// Days before check-in to prepay a hotel.
pub const HOTEL_PREPAYMENT_DAYS: i64 = 30;
/// Term used when nothing better is known.
pub const DEFAULT_PAYMENT_DAYS: i64 = 30;

/// Due date of an operator obligation.
///
/// Rules, first match wins:
/// 1. AIR with a purchase date: purchase + 10 days
/// 2. HOTEL with a check-in date: check-in − 30 days
/// 3. any product with a departure date: the departure date
/// 4. otherwise: today + 30 days
#[must_use]
pub fn calculate_due_date(
    product_type: ProductType,
    purchase_date: Option<NaiveDate>,
    checkin_date: Option<NaiveDate>,
    departure_date: Option<NaiveDate>,
    today: NaiveDate,
) -> NaiveDate {
    match (product_type, purchase_date, checkin_date, departure_date) {
        (ProductType::Air, Some(purchase), _, _) => purchase + Duration::days(AIR_PAYMENT_DAYS),
        (ProductType::Hotel, _, Some(checkin), _) => checkin - Duration::days(HOTEL_PREPAYMENT_DAYS),
        (_, _, _, Some(departure)) => departure,
        _ => today + Duration::days(DEFAULT_PAYMENT_DAYS),
    }
}
