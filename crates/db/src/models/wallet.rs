//! Wallet ledger models.

use serde::Serialize;
use sqlx::FromRow;
use tradepost_core::types::{DbId, Timestamp};

/// Transaction type values as stored in `wallet_transactions.tx_type`.
pub mod tx_type {
    pub const PURCHASE: &str = "purchase";
    pub const SALE: &str = "sale";
}

/// Transaction status values as stored in `wallet_transactions.status`.
pub mod tx_status {
    pub const COMPLETED: &str = "completed";
}

/// A row from the append-only `wallet_transactions` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WalletTransaction {
    pub id: DbId,
    pub user_id: DbId,
    pub listing_id: Option<DbId>,
    pub amount_cents: i64,
    pub tx_type: String,
    pub status: String,
    pub idempotency_key: Option<String>,
    pub created_at: Timestamp,
}

/// Result of a purchase.
///
/// `already_processed` marks an idempotent replay: the receipt is the
/// original one and nothing was charged again.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReceipt {
    pub transaction: WalletTransaction,
    pub listing: super::listing::Listing,
    pub commission_cents: i64,
    pub seller_receives_cents: i64,
    pub already_processed: bool,
}
