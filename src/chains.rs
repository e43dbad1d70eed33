use tracing::warn;

/// Provider networks the gateway can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    EthMainnet,
    EthGoerli,
    EthSepolia,
    PolygonMainnet,
    PolygonMumbai,
    PolygonAmoy,
    ArbMainnet,
    ArbGoerli,
    ArbSepolia,
    OptMainnet,
    OptGoerli,
    OptSepolia,
    BaseMainnet,
    BaseGoerli,
    BaseSepolia,
}

const NETWORKS: &[(u64, Network)] = &[
    (1, Network::EthMainnet),
    (5, Network::EthGoerli),
    (11155111, Network::EthSepolia),
    (137, Network::PolygonMainnet),
    (80001, Network::PolygonMumbai),
    (80002, Network::PolygonAmoy),
    (42161, Network::ArbMainnet),
    (421613, Network::ArbGoerli),
    (421614, Network::ArbSepolia),
    (10, Network::OptMainnet),
    (420, Network::OptGoerli),
    (11155420, Network::OptSepolia),
    (8453, Network::BaseMainnet),
    (84531, Network::BaseGoerli),
    (84532, Network::BaseSepolia),
];

impl Network {
    /// Look up the network for a chain id. Unknown ids fall back to Ethereum mainnet.
    pub fn from_chain_id(chain_id: u64) -> Network {
        Self::lookup(chain_id).unwrap_or_else(|| {
            warn!(
                "Unknown chain id {}, falling back to {}",
                chain_id,
                Network::EthMainnet.as_str()
            );
            Network::EthMainnet
        })
    }

    pub fn lookup(chain_id: u64) -> Option<Network> {
        NETWORKS
            .iter()
            .find(|(id, _)| *id == chain_id)
            .map(|(_, network)| *network)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::EthMainnet => "eth-mainnet",
            Network::EthGoerli => "eth-goerli",
            Network::EthSepolia => "eth-sepolia",
            Network::PolygonMainnet => "polygon-mainnet",
            Network::PolygonMumbai => "polygon-mumbai",
            Network::PolygonAmoy => "polygon-amoy",
            Network::ArbMainnet => "arb-mainnet",
            Network::ArbGoerli => "arb-goerli",
            Network::ArbSepolia => "arb-sepolia",
            Network::OptMainnet => "opt-mainnet",
            Network::OptGoerli => "opt-goerli",
            Network::OptSepolia => "opt-sepolia",
            Network::BaseMainnet => "base-mainnet",
            Network::BaseGoerli => "base-goerli",
            Network::BaseSepolia => "base-sepolia",
        }
    }

    /// Asset platform slug used by the CoinGecko token price API.
    /// Testnets map to their mainnet platform.
    pub fn coingecko_platform(&self) -> &'static str {
        match self {
            Network::EthMainnet | Network::EthGoerli | Network::EthSepolia => "ethereum",
            Network::PolygonMainnet | Network::PolygonMumbai | Network::PolygonAmoy => {
                "polygon-pos"
            }
            Network::ArbMainnet | Network::ArbGoerli | Network::ArbSepolia => "arbitrum-one",
            Network::OptMainnet | Network::OptGoerli | Network::OptSepolia => {
                "optimistic-ethereum"
            }
            Network::BaseMainnet | Network::BaseGoerli | Network::BaseSepolia => "base",
        }
    }
}

pub fn network_name(chain_id: u64) -> &'static str {
    Network::from_chain_id(chain_id).as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_chain_ids_map_to_provider_networks() {
        assert_eq!(network_name(1), "eth-mainnet");
        assert_eq!(network_name(11155111), "eth-sepolia");
        assert_eq!(network_name(137), "polygon-mainnet");
        assert_eq!(network_name(80001), "polygon-mumbai");
        assert_eq!(network_name(42161), "arb-mainnet");
        assert_eq!(network_name(10), "opt-mainnet");
        assert_eq!(network_name(8453), "base-mainnet");
        assert_eq!(network_name(84532), "base-sepolia");
    }

    #[test]
    fn unknown_chain_id_falls_back_to_eth_mainnet() {
        assert_eq!(network_name(999999), "eth-mainnet");
        assert_eq!(network_name(0), "eth-mainnet");
        assert!(Network::lookup(999999).is_none());
    }

    #[test]
    fn table_maps_each_network_once() {
        let mut seen = std::collections::HashSet::new();
        for (id, network) in NETWORKS {
            assert_eq!(Network::from_chain_id(*id), *network);
            assert!(seen.insert(network.as_str()), "{} listed twice", network.as_str());
        }
        assert_eq!(seen.len(), NETWORKS.len());
    }
}
