//! Foreign-exchange gain/loss detection.
//!
//! Two forms are supported:
//! - pairwise: one sale against one payment ([`detect_pairwise`])
//! - cumulative: a sale total against everything paid so far ([`decide_cumulative`])
//!
//! Both are pure; persistence and deduplication against the ledger live in the
//! db crate.

pub mod detector;
pub mod error;

#[cfg(test)]
mod props;

pub use detector::{
    FxOutcome, FxSide, FxType, decide_cumulative, detect_pairwise, is_within_dedup_window,
    resolve_rate_with_fallback,
};
pub use error::FxError;
