use crate::error::Result;
use crate::models::{AssetTransfer, CreditSignalRecord, WalletAge};
use crate::rpc::RpcClient;
use crate::transfers::get_transaction_history;
use crate::wallet::get_wallet_balance;
use alloy_primitives::Address;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::{debug, info};

const RECENT_ACTIVITY_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryStats {
    pub transaction_count: usize,
    pub unique_contacts: usize,
    pub total_value: f64,
    pub last_month_activity_count: usize,
}

fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Age in whole days of the oldest dated transfer in `transfers`.
///
/// Transfers without a parsable timestamp are ignored. When none parse, the earliest
/// non-empty raw timestamp is reported with an age of 0.
pub fn wallet_age_from(transfers: &[AssetTransfer], now: DateTime<Utc>) -> WalletAge {
    let oldest = transfers
        .iter()
        .filter_map(|t| parse_timestamp(&t.block_timestamp).map(|at| (at, t)))
        .min_by_key(|(at, _)| *at);

    if let Some((first_at, first)) = oldest {
        return WalletAge {
            age: (now - first_at).num_days().max(0),
            first_tx_date: Some(first.block_timestamp.clone()),
        };
    }

    let first_raw = transfers
        .iter()
        .map(|t| t.block_timestamp.as_str())
        .filter(|ts| !ts.is_empty())
        .min();
    if let Some(raw) = first_raw {
        debug!("No parsable transfer timestamp, first raw value {:?}", raw);
    }

    WalletAge {
        age: 0,
        first_tx_date: first_raw.map(str::to_string),
    }
}

/// Single pass over the history: counterparties, summed value and recent activity.
pub fn history_stats(transfers: &[AssetTransfer], now: DateTime<Utc>) -> HistoryStats {
    let window_start = now - Duration::days(RECENT_ACTIVITY_WINDOW_DAYS);
    let mut contacts: HashSet<String> = HashSet::new();
    let mut total_value = 0.0;
    let mut last_month_activity_count = 0;

    for transfer in transfers {
        contacts.insert(transfer.from.to_lowercase());
        if let Some(to) = &transfer.to {
            contacts.insert(to.to_lowercase());
        }

        if let Some(value) = transfer.value.filter(|v| v.is_finite()) {
            total_value += value;
        }

        if parse_timestamp(&transfer.block_timestamp).is_some_and(|t| t >= window_start) {
            last_month_activity_count += 1;
        }
    }

    HistoryStats {
        transaction_count: transfers.len(),
        unique_contacts: contacts.len(),
        total_value,
        last_month_activity_count,
    }
}

pub async fn get_wallet_age(client: &RpcClient, address: Address) -> Result<WalletAge> {
    let history = get_transaction_history(client, address).await?;
    Ok(wallet_age_from(&history, Utc::now()))
}

/// Collect balance, wallet age and history concurrently. Any failure fails the record.
pub async fn get_credit_score_data(
    client: &RpcClient,
    address: Address,
    display_address: &str,
) -> Result<CreditSignalRecord> {
    let (balance, age, history) = tokio::try_join!(
        get_wallet_balance(client, address, display_address),
        get_wallet_age(client, address),
        get_transaction_history(client, address),
    )?;

    let stats = history_stats(&history, Utc::now());
    info!(
        "Credit signals for {}: {} transfers, {} contacts, age {} days",
        address, stats.transaction_count, stats.unique_contacts, age.age
    );

    Ok(CreditSignalRecord {
        address: display_address.to_string(),
        chain_id: client.chain_id(),
        balance: balance.balance,
        wallet_age_days: age.age,
        first_transaction: age.first_tx_date,
        transaction_count: stats.transaction_count,
        unique_contacts: stats.unique_contacts,
        total_value: stats.total_value,
        last_month_activity_count: stats.last_month_activity_count,
    })
}
