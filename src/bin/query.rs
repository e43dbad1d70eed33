use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use veegox_gateway::config::Config;
use veegox_gateway::gateway::Gateway;
use veegox_gateway::query::commands::{QueryCommand, cmd_run};
use veegox_gateway::query::formatters::OutputFormat;

#[derive(Parser)]
#[command(name = "query")]
#[command(about = "Query wallet and token data through the chain gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "table")]
    format: String,

    #[arg(short, long, default_value = "1")]
    chain_id: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Balance {
        address: String,
    },
    History {
        address: String,
        #[arg(long, default_value = "100")]
        limit: usize,
        #[arg(long, default_value = "0")]
        offset: usize,
    },
    Age {
        address: String,
    },
    Credit {
        address: String,
    },
    TokenInfo {
        token: String,
    },
    TokenBalances {
        address: String,
    },
    Nfts {
        address: String,
    },
    Prices {
        #[arg(required = true)]
        tokens: Vec<String>,
    },
    GasPrice,
    BlockNumber,
    ValidateContract {
        address: String,
    },
}

impl From<Commands> for QueryCommand {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Balance { address } => QueryCommand::Balance { address },
            Commands::History {
                address,
                limit,
                offset,
            } => QueryCommand::History {
                address,
                limit,
                offset,
            },
            Commands::Age { address } => QueryCommand::Age { address },
            Commands::Credit { address } => QueryCommand::Credit { address },
            Commands::TokenInfo { token } => QueryCommand::TokenInfo { token },
            Commands::TokenBalances { address } => QueryCommand::TokenBalances { address },
            Commands::Nfts { address } => QueryCommand::Nfts { address },
            Commands::Prices { tokens } => QueryCommand::Prices { tokens },
            Commands::GasPrice => QueryCommand::GasPrice,
            Commands::BlockNumber => QueryCommand::BlockNumber,
            Commands::ValidateContract { address } => QueryCommand::ValidateContract { address },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "veegox_gateway=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let config = Config::from_env()?;
    let gateway = Gateway::new(config)?;

    cmd_run(&gateway, &cli.command.into(), cli.chain_id, &format).await?;

    Ok(())
}
