use crate::error::Result;
use crate::models::AssetTransfer;
use crate::rpc::RpcClient;
use alloy_primitives::Address;
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};
use tracing::{debug, info};

const TRANSFER_CATEGORIES: [&str; 4] = ["external", "erc20", "erc721", "erc1155"];
const MAX_COUNT: &str = "0x3e8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    fn filter_key(&self) -> &'static str {
        match self {
            Direction::Sent => "fromAddress",
            Direction::Received => "toAddress",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetTransfersPage {
    #[serde(default)]
    transfers: Vec<RawTransfer>,
    page_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransfer {
    from: String,
    to: Option<String>,
    #[serde(default, deserialize_with = "numeric_value")]
    value: Option<f64>,
    asset: Option<String>,
    category: String,
    hash: Option<String>,
    metadata: Option<TransferMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferMetadata {
    block_timestamp: Option<String>,
}

/// Numbers and numeric strings become values. Anything else is treated as absent.
fn numeric_value<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()))
}

impl From<RawTransfer> for AssetTransfer {
    fn from(raw: RawTransfer) -> Self {
        AssetTransfer {
            from: raw.from,
            to: raw.to,
            value: raw.value,
            asset: raw.asset,
            category: raw.category,
            hash: raw.hash,
            block_timestamp: raw
                .metadata
                .and_then(|m| m.block_timestamp)
                .unwrap_or_default(),
        }
    }
}

/// Fetch the first page of transfers in one direction. Later pages are not requested.
pub async fn fetch_transfers(
    client: &RpcClient,
    direction: Direction,
    address: Address,
) -> Result<Vec<AssetTransfer>> {
    let mut filter = json!({
        "fromBlock": "0x0",
        "toBlock": "latest",
        "category": TRANSFER_CATEGORIES,
        "withMetadata": true,
        "excludeZeroValue": true,
        "maxCount": MAX_COUNT,
    });
    filter[direction.filter_key()] = json!(address.to_string());

    let page: AssetTransfersPage = client
        .raw_request("alchemy_getAssetTransfers", vec![filter])
        .await?;

    if let Some(page_key) = &page.page_key {
        debug!(
            "More {:?} transfers available for {} (pageKey {}), keeping first page",
            direction, address, page_key
        );
    }

    Ok(page.transfers.into_iter().map(AssetTransfer::from).collect())
}

/// Concatenate both directions and order newest first.
///
/// Timestamps are ISO-8601 UTC strings from a single provider, so byte order matches
/// time order. Entries are not de-duplicated: a self-transfer appears once per direction.
pub fn merge_transfers(
    sent: Vec<AssetTransfer>,
    received: Vec<AssetTransfer>,
) -> Vec<AssetTransfer> {
    let mut all = sent;
    all.extend(received);
    all.sort_by(|a, b| b.block_timestamp.cmp(&a.block_timestamp));
    all
}

pub async fn get_transaction_history(
    client: &RpcClient,
    address: Address,
) -> Result<Vec<AssetTransfer>> {
    let (sent, received) = tokio::try_join!(
        fetch_transfers(client, Direction::Sent, address),
        fetch_transfers(client, Direction::Received, address),
    )?;

    info!(
        "Fetched {} sent and {} received transfers for {}",
        sent.len(),
        received.len(),
        address
    );

    Ok(merge_transfers(sent, received))
}
