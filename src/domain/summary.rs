//! Summary builder: raw transactions + price quote to statement rows.
//!
//! Pure transformation. No network, no storage, no clock: every field is
//! derived from the supplied records and quote, and row order follows the
//! input transaction order.

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::RawTransaction;

/// Direction of a transaction relative to the reported address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Received,
    Sent,
}

/// One row of the statement report. Field order defines the report columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Transaction hash
    pub txid: String,

    /// RFC 3339 timestamp of the transaction
    pub timestamp: String,

    /// Classification relative to the reported address
    pub direction: Direction,

    /// Signed net amount in whole coins
    pub amount_btc: Decimal,

    /// Running balance across the supplied transaction order
    pub balance_btc: Decimal,

    /// Quote price used for valuation (USD per coin)
    pub price_usd: Decimal,

    /// Fiat value of the net amount at the quote price
    pub value_usd: Decimal,
}

/// Build statement rows for `address` from its raw history and a price quote.
///
/// Order-preserving: row `i` derives from transaction `i`.
pub fn summarize(transactions: &[RawTransaction], address: &str, price: Decimal) -> Vec<SummaryRow> {
    let mut balance = Decimal::ZERO;

    transactions
        .iter()
        .map(|tx| {
            // Satoshi amounts carry 8 decimal places in whole coins.
            let net = Decimal::new(tx.net_effect(address), 8);
            balance += net;

            SummaryRow {
                txid: tx.hash.clone(),
                timestamp: format_timestamp(tx.time),
                direction: if net.is_sign_negative() {
                    Direction::Sent
                } else {
                    Direction::Received
                },
                amount_btc: net,
                balance_btc: balance,
                price_usd: price,
                value_usd: (net * price).round_dp(2),
            }
        })
        .collect()
}

fn format_timestamp(unix_seconds: i64) -> String {
    DateTime::from_timestamp(unix_seconds, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}
