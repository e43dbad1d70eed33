pub mod abi;
pub mod action;
pub mod chains;
pub mod config;
pub mod credit;
pub mod error;
pub mod gateway;
pub mod models;
pub mod nfts;
pub mod prices;
pub mod query;
pub mod rpc;
pub mod server;
pub mod tokens;
pub mod transfers;
pub mod wallet;

pub use action::{Action, ChainRequest};
pub use config::Config;
pub use error::{GatewayError, Result};
pub use gateway::Gateway;
