use crate::error::{GatewayError, Result};
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Inbound request body: an action name and its positional parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainRequest {
    pub action: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

impl ChainRequest {
    pub fn new(action: &str, params: Vec<Value>) -> Self {
        Self {
            action: action.to_string(),
            params,
        }
    }
}

/// An address as given by the caller, kept verbatim for echoing back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParam {
    pub raw: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    GetWalletBalance { address: AddressParam, chain_id: u64 },
    GetTransactionHistory { address: AddressParam, chain_id: u64 },
    GetWalletAge { address: AddressParam, chain_id: u64 },
    GetCreditScoreData { address: AddressParam, chain_id: u64 },
    GetTokenInfo { token: AddressParam, chain_id: u64 },
    GetTokenBalances { address: AddressParam, chain_id: u64 },
    GetNftsForWallet { address: AddressParam, chain_id: u64 },
    GetTokenPrices { tokens: Vec<String>, chain_id: u64 },
    GetGasPrice { chain_id: u64 },
    GetBlockNumber { chain_id: u64 },
    ValidateContract { address: AddressParam, chain_id: u64 },
}

pub const ACTION_NAMES: [&str; 11] = [
    "getWalletBalance",
    "getTransactionHistory",
    "getWalletAge",
    "getCreditScoreData",
    "getTokenInfo",
    "getTokenBalances",
    "getNFTsForWallet",
    "getTokenPrices",
    "getGasPrice",
    "getBlockNumber",
    "validateContract",
];

impl Action {
    pub fn parse(request: &ChainRequest) -> Result<Action> {
        let params = Params {
            action: &request.action,
            values: &request.params,
        };

        let action = match request.action.as_str() {
            "getWalletBalance" => Action::GetWalletBalance {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getTransactionHistory" => Action::GetTransactionHistory {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getWalletAge" => Action::GetWalletAge {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getCreditScoreData" => Action::GetCreditScoreData {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getTokenInfo" => Action::GetTokenInfo {
                token: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getTokenBalances" => Action::GetTokenBalances {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getNFTsForWallet" => Action::GetNftsForWallet {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getTokenPrices" => Action::GetTokenPrices {
                tokens: params.string_list(0)?,
                chain_id: params.chain_id(1)?,
            },
            "getGasPrice" => Action::GetGasPrice {
                chain_id: params.chain_id(0)?,
            },
            "getBlockNumber" => Action::GetBlockNumber {
                chain_id: params.chain_id(0)?,
            },
            "validateContract" => Action::ValidateContract {
                address: params.address(0)?,
                chain_id: params.chain_id(1)?,
            },
            other => return Err(GatewayError::UnsupportedAction(other.to_string())),
        };

        Ok(action)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::GetWalletBalance { .. } => "getWalletBalance",
            Action::GetTransactionHistory { .. } => "getTransactionHistory",
            Action::GetWalletAge { .. } => "getWalletAge",
            Action::GetCreditScoreData { .. } => "getCreditScoreData",
            Action::GetTokenInfo { .. } => "getTokenInfo",
            Action::GetTokenBalances { .. } => "getTokenBalances",
            Action::GetNftsForWallet { .. } => "getNFTsForWallet",
            Action::GetTokenPrices { .. } => "getTokenPrices",
            Action::GetGasPrice { .. } => "getGasPrice",
            Action::GetBlockNumber { .. } => "getBlockNumber",
            Action::ValidateContract { .. } => "validateContract",
        }
    }

    pub fn chain_id(&self) -> u64 {
        match self {
            Action::GetWalletBalance { chain_id, .. }
            | Action::GetTransactionHistory { chain_id, .. }
            | Action::GetWalletAge { chain_id, .. }
            | Action::GetCreditScoreData { chain_id, .. }
            | Action::GetTokenInfo { chain_id, .. }
            | Action::GetTokenBalances { chain_id, .. }
            | Action::GetNftsForWallet { chain_id, .. }
            | Action::GetTokenPrices { chain_id, .. }
            | Action::GetGasPrice { chain_id }
            | Action::GetBlockNumber { chain_id }
            | Action::ValidateContract { chain_id, .. } => *chain_id,
        }
    }
}

struct Params<'a> {
    action: &'a str,
    values: &'a [Value],
}

impl Params<'_> {
    fn get(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| {
            GatewayError::InvalidParams(format!(
                "{} expects a parameter at position {}",
                self.action, index
            ))
        })
    }

    fn address(&self, index: usize) -> Result<AddressParam> {
        let raw = self.get(index)?.as_str().ok_or_else(|| {
            GatewayError::InvalidParams(format!(
                "{}: parameter {} must be an address string",
                self.action, index
            ))
        })?;
        let address = Address::from_str(raw.trim()).map_err(|_| {
            GatewayError::InvalidParams(format!("{}: invalid address {}", self.action, raw))
        })?;

        Ok(AddressParam {
            raw: raw.to_string(),
            address,
        })
    }

    /// Chain ids arrive as JSON numbers or numeric strings.
    fn chain_id(&self, index: usize) -> Result<u64> {
        let value = self.get(index)?;
        let parsed = match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            GatewayError::InvalidParams(format!(
                "{}: invalid chain id {}",
                self.action, value
            ))
        })
    }

    fn string_list(&self, index: usize) -> Result<Vec<String>> {
        let invalid = || {
            GatewayError::InvalidParams(format!(
                "{}: parameter {} must be a list of addresses",
                self.action, index
            ))
        };
        self.get(index)?
            .as_array()
            .ok_or_else(invalid)?
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(invalid))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn parses_every_known_action() {
        for name in ACTION_NAMES {
            let params = match name {
                "getGasPrice" | "getBlockNumber" => vec![json!(1)],
                "getTokenPrices" => vec![json!([WALLET]), json!(1)],
                _ => vec![json!(WALLET), json!(1)],
            };
            let action = Action::parse(&ChainRequest::new(name, params)).unwrap();
            assert_eq!(action.name(), name);
            assert_eq!(action.chain_id(), 1);
        }
    }

    #[test]
    fn unknown_action_is_unsupported() {
        let err = Action::parse(&ChainRequest::new("mintTokens", vec![])).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedAction(name) if name == "mintTokens"));
    }

    #[test]
    fn chain_id_accepts_numeric_strings() {
        let action =
            Action::parse(&ChainRequest::new("getWalletBalance", vec![json!(WALLET), json!("137")]))
                .unwrap();
        assert_eq!(action.chain_id(), 137);
    }

    #[test]
    fn address_is_kept_verbatim() {
        let lower = WALLET.to_lowercase();
        let action =
            Action::parse(&ChainRequest::new("validateContract", vec![json!(lower), json!(1)]))
                .unwrap();
        match action {
            Action::ValidateContract { address, .. } => assert_eq!(address.raw, lower),
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[test]
    fn missing_or_malformed_params_are_rejected() {
        let missing = Action::parse(&ChainRequest::new("getWalletAge", vec![json!(WALLET)]));
        assert!(matches!(missing, Err(GatewayError::InvalidParams(_))));

        let bad_address =
            Action::parse(&ChainRequest::new("getWalletAge", vec![json!("0x123"), json!(1)]));
        assert!(matches!(bad_address, Err(GatewayError::InvalidParams(_))));

        let bad_chain =
            Action::parse(&ChainRequest::new("getGasPrice", vec![json!(-1)]));
        assert!(matches!(bad_chain, Err(GatewayError::InvalidParams(_))));
    }
}
