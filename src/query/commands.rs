use crate::action::ChainRequest;
use crate::gateway::Gateway;
use crate::query::formatters::{OutputFormat, format_result};
use anyhow::Result;
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub enum QueryCommand {
    Balance { address: String },
    History { address: String, limit: usize, offset: usize },
    Age { address: String },
    Credit { address: String },
    TokenInfo { token: String },
    TokenBalances { address: String },
    Nfts { address: String },
    Prices { tokens: Vec<String> },
    GasPrice,
    BlockNumber,
    ValidateContract { address: String },
}

impl QueryCommand {
    pub fn to_request(&self, chain_id: u64) -> ChainRequest {
        let (action, params) = match self {
            QueryCommand::Balance { address } => ("getWalletBalance", vec![json!(address)]),
            QueryCommand::History { address, .. } => {
                ("getTransactionHistory", vec![json!(address)])
            }
            QueryCommand::Age { address } => ("getWalletAge", vec![json!(address)]),
            QueryCommand::Credit { address } => ("getCreditScoreData", vec![json!(address)]),
            QueryCommand::TokenInfo { token } => ("getTokenInfo", vec![json!(token)]),
            QueryCommand::TokenBalances { address } => {
                ("getTokenBalances", vec![json!(address)])
            }
            QueryCommand::Nfts { address } => ("getNFTsForWallet", vec![json!(address)]),
            QueryCommand::Prices { tokens } => ("getTokenPrices", vec![json!(tokens)]),
            QueryCommand::GasPrice => ("getGasPrice", vec![]),
            QueryCommand::BlockNumber => ("getBlockNumber", vec![]),
            QueryCommand::ValidateContract { address } => {
                ("validateContract", vec![json!(address)])
            }
        };

        let mut params = params;
        params.push(json!(chain_id));
        ChainRequest::new(action, params)
    }

    /// Trim a list result to the requested window. Other results pass through.
    fn page(&self, value: Value) -> Value {
        match (self, value) {
            (QueryCommand::History { limit, offset, .. }, Value::Array(items)) => {
                Value::Array(items.into_iter().skip(*offset).take(*limit).collect())
            }
            (_, value) => value,
        }
    }
}

pub async fn cmd_run(
    gateway: &Gateway,
    command: &QueryCommand,
    chain_id: u64,
    format: &OutputFormat,
) -> Result<()> {
    let request = command.to_request(chain_id);
    let value = gateway.handle(&request).await?;
    let output = format_result(&command.page(value), format);
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;

    const WALLET: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    #[test]
    fn chain_id_is_appended_last() {
        let request = QueryCommand::Balance {
            address: WALLET.to_string(),
        }
        .to_request(137);
        assert_eq!(request.action, "getWalletBalance");
        assert_eq!(request.params, vec![json!(WALLET), json!(137)]);

        let request = QueryCommand::GasPrice.to_request(10);
        assert_eq!(request.params, vec![json!(10)]);
    }

    #[test]
    fn every_command_parses_as_an_action() {
        let commands = vec![
            QueryCommand::Balance { address: WALLET.into() },
            QueryCommand::History { address: WALLET.into(), limit: 10, offset: 0 },
            QueryCommand::Age { address: WALLET.into() },
            QueryCommand::Credit { address: WALLET.into() },
            QueryCommand::TokenInfo { token: WALLET.into() },
            QueryCommand::TokenBalances { address: WALLET.into() },
            QueryCommand::Nfts { address: WALLET.into() },
            QueryCommand::Prices { tokens: vec![WALLET.into()] },
            QueryCommand::GasPrice,
            QueryCommand::BlockNumber,
            QueryCommand::ValidateContract { address: WALLET.into() },
        ];
        for command in commands {
            let action = Action::parse(&command.to_request(8453)).unwrap();
            assert_eq!(action.chain_id(), 8453);
        }
    }

    #[test]
    fn history_is_paged() {
        let command = QueryCommand::History {
            address: WALLET.into(),
            limit: 2,
            offset: 1,
        };
        let paged = command.page(json!([1, 2, 3, 4]));
        assert_eq!(paged, json!([2, 3]));
    }
}
