use crate::chains::Network;
use crate::config::Config;
use crate::error::{GatewayError, Result};
use crate::models::Nft;
use alloy_primitives::Address;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedNftsResponse {
    #[serde(default)]
    owned_nfts: Vec<OwnedNft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OwnedNft {
    id: NftId,
    title: Option<String>,
    description: Option<String>,
    #[serde(default)]
    media: Vec<NftMedia>,
    metadata: Option<NftMetadata>,
    contract_metadata: Option<ContractMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NftId {
    token_id: String,
}

#[derive(Debug, Deserialize)]
struct NftMedia {
    gateway: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NftMetadata {
    image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContractMetadata {
    name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<OwnedNft> for Nft {
    fn from(owned: OwnedNft) -> Self {
        let gateway_image = owned.media.into_iter().find_map(|m| non_empty(m.gateway));
        let image = gateway_image.or_else(|| non_empty(owned.metadata.and_then(|m| m.image)));

        Nft {
            token_id: owned.id.token_id,
            name: non_empty(owned.title),
            description: non_empty(owned.description),
            image,
            collection: non_empty(owned.contract_metadata.and_then(|c| c.name)),
        }
    }
}

/// NFTs held by `owner`, first page of the provider's NFT API.
pub async fn get_nfts_for_wallet(
    http: &reqwest::Client,
    config: &Config,
    chain_id: u64,
    owner: Address,
) -> Result<Vec<Nft>> {
    let network = Network::from_chain_id(chain_id);
    let url = format!("{}/getNFTs", config.nft_url(network.as_str()));

    let response = http
        .get(&url)
        .query(&[("owner", owner.to_string()), ("withMetadata", "true".to_string())])
        .timeout(config.request_timeout)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::ExternalApi(format!(
            "NFT API error: {} - {}",
            status, body
        )));
    }

    let page: OwnedNftsResponse = response.json().await?;
    info!("{} owns {} NFTs on {}", owner, page.owned_nfts.len(), network.as_str());

    Ok(page.owned_nfts.into_iter().map(Nft::from).collect())
}
