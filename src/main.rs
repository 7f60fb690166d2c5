//! Coreum flash loan operator CLI.
//!
//! Inspects network parameters and deployed contracts, runs read-only smart
//! queries over REST and prints ready-to-sign execute commands.
//!
//! ```text
//! flash-loan [-n testnet|mainnet] [-c config.toml] <command>
//!     networks | config | status
//!     deploy all | flash-loan [--admin <addr>] [--fee <ratio>] [--denom <denom>]
//!     contract info <flash-loan|simple-receiver|ibc-receiver>
//!     contract query-config | query-balance | query-provided <address>
//!     contract provide <amount> | withdraw | loan <amount> [--receiver <addr>]
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use std::path::PathBuf;

use flash_loan_client::chain::LcdClient;
use flash_loan_client::config::{load_or_default, AppConfig};
use flash_loan_client::contract::{ConfigResponse, ExecuteRequest, InstantiateMsg, QueryMsg};
use flash_loan_client::network::{ContractName, NetworkId, NetworkProfile, NetworkRegistry};
use flash_loan_client::observability::logging::init_logging;
use flash_loan_client::Operation;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "flash-loan")]
#[command(about = "Interact with the Coreum flash loan contracts", long_about = None)]
struct Cli {
    /// Network to use; defaults to the configured one.
    #[arg(short, long, global = true)]
    network: Option<NetworkId>,

    /// Optional TOML config file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available networks
    Networks,
    /// Show the active network and contract addresses
    Config,
    /// Check that the REST endpoint serves the expected chain
    Status,
    /// Show deployment parameters for the contracts
    #[command(subcommand)]
    Deploy(DeployCommand),
    /// Interact with deployed contracts
    #[command(subcommand)]
    Contract(ContractCommand),
}

#[derive(Subcommand)]
enum DeployCommand {
    /// List the contracts a full deployment creates
    All,
    /// Show the flash loan instantiate message
    FlashLoan {
        /// Admin address for the contract
        #[arg(long)]
        admin: Option<String>,
        /// Fee ratio
        #[arg(long, default_value = "0.003")]
        fee: String,
        /// Loan denomination (native denom or cw20 address); defaults to the native denom
        #[arg(long)]
        denom: Option<String>,
    },
}

#[derive(Subcommand)]
enum ContractCommand {
    /// Show a contract's address and endpoints
    Info { contract: ContractArg },
    /// Query the flash loan pool configuration
    QueryConfig,
    /// Query the pool balance
    QueryBalance,
    /// Query the liquidity provided by an address
    QueryProvided { address: String },
    /// Provide liquidity (smallest unit of the native denom)
    Provide { amount: String },
    /// Withdraw liquidity plus earned fees
    Withdraw,
    /// Request a flash loan
    Loan {
        amount: String,
        /// Receiver contract; defaults to the configured simple receiver.
        #[arg(long)]
        receiver: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ContractArg {
    FlashLoan,
    SimpleReceiver,
    IbcReceiver,
}

impl From<ContractArg> for ContractName {
    fn from(arg: ContractArg) -> Self {
        match arg {
            ContractArg::FlashLoan => ContractName::FlashLoan,
            ContractArg::SimpleReceiver => ContractName::SimpleReceiver,
            ContractArg::IbcReceiver => ContractName::IbcReceiver,
        }
    }
}

struct Context {
    config: AppConfig,
    network: NetworkId,
    registry: NetworkRegistry,
}

impl Context {
    fn profile(&self) -> &'static NetworkProfile {
        self.registry.resolve(self.network)
    }

    fn contract(&self, name: ContractName) -> Option<&str> {
        self.registry.contract_address(self.network, name)
    }

    fn flash_loan(&self) -> CliResult<String> {
        self.contract(ContractName::FlashLoan)
            .map(str::to_string)
            .ok_or_else(|| {
                format!(
                    "Flash loan contract not deployed on {}. Set {}FLASH_LOAN_CONTRACT_ADDRESS",
                    self.network,
                    if self.network == NetworkId::Mainnet { "MAINNET_" } else { "" }
                )
                .into()
            })
    }

    fn lcd(&self) -> CliResult<LcdClient> {
        Ok(LcdClient::for_network(
            self.profile(),
            self.config.lcd.failover_urls(self.network),
            self.config.lcd.timeout_secs,
        )?)
    }
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let config = load_or_default(cli.config.as_deref())?;
    init_logging(&config.observability);

    let network = cli.network.unwrap_or(config.network);
    tracing::debug!(%network, "Configuration loaded");

    let ctx = Context {
        registry: NetworkRegistry::new(config.contracts.clone()),
        config,
        network,
    };

    match cli.command {
        Commands::Networks => networks(),
        Commands::Config => show_config(&ctx),
        Commands::Status => status(&ctx).await?,
        Commands::Deploy(command) => deploy(&ctx, command)?,
        Commands::Contract(command) => contract(&ctx, command).await?,
    }

    Ok(())
}

fn networks() {
    println!("{:<10} {:<16} {}", "NETWORK", "CHAIN ID", "RPC ENDPOINT");
    for id in NetworkId::ALL {
        let profile = flash_loan_client::network::resolve(id);
        println!("{:<10} {:<16} {}", id, profile.chain_id, profile.rpc);
    }
}

fn show_config(ctx: &Context) {
    let profile = ctx.profile();
    println!("Network:        {}", ctx.network);
    println!("Chain ID:       {}", profile.chain_id);
    println!("RPC Endpoint:   {}", profile.rpc);
    println!("REST Endpoint:  {}", profile.rest);
    println!("Native Denom:   {}", profile.native_denom());
    println!("Address Prefix: {}", profile.account_prefix());
    println!("Gas Price:      {}", profile.default_gas_price());

    println!("\nContract Addresses:");
    for name in ContractName::ALL {
        match ctx.contract(name) {
            Some(address) => println!("  [x] {}: {}", name.label(), address),
            None => println!("  [ ] {}: Not deployed", name.label()),
        }
    }
}

const DEPLOY_SCRIPT: &str = "./scripts/deploy.sh";

fn deploy(ctx: &Context, command: DeployCommand) -> CliResult<()> {
    let profile = ctx.profile();
    match command {
        DeployCommand::All => {
            println!("A full deployment on {} creates:", ctx.network);
            for (i, name) in ContractName::ALL.iter().enumerate() {
                println!("  {}. {}", i + 1, name.label());
            }
        }
        DeployCommand::FlashLoan { admin, fee, denom } => {
            let denom = denom.unwrap_or_else(|| profile.native_denom().to_string());
            let msg = InstantiateMsg::new(admin, &fee, &denom, profile.account_prefix());
            println!("Flash Loan instantiate on {} ({})", ctx.network, profile.chain_id);
            println!("Admin:      {}", msg.admin.as_deref().unwrap_or("None"));
            println!("Fee:        {}", msg.fee);
            println!("Loan Denom: {}", denom);
            println!("\nInstantiate Message: {}", serde_json::to_string_pretty(&msg)?);
        }
    }
    println!("\nUse the deployment script for the actual deployment: {}", DEPLOY_SCRIPT);
    Ok(())
}

async fn status(ctx: &Context) -> CliResult<()> {
    let profile = ctx.profile();
    let lcd = ctx.lcd()?;
    lcd.verify_chain_id(profile.chain_id).await?;
    println!("{} REST endpoint serves {}", ctx.network, profile.chain_id);
    Ok(())
}

async fn contract(ctx: &Context, command: ContractCommand) -> CliResult<()> {
    match command {
        ContractCommand::Info { contract } => {
            let name = ContractName::from(contract);
            let profile = ctx.profile();
            println!("{} Contract Info", name.label());
            println!("Network:          {}", ctx.network);
            println!("Chain ID:         {}", profile.chain_id);
            println!("Contract Address: {}", ctx.contract(name).unwrap_or("Not deployed"));
            println!("RPC Endpoint:     {}", profile.rpc);
        }
        ContractCommand::QueryConfig => {
            let response = query(ctx, Operation::query_config()).await?;
            print_json(&response)?;
            if let Ok(config) = serde_json::from_value::<ConfigResponse>(response) {
                println!("Fee:        {}", config.fee);
                println!("Loan Denom: {}", config.loan_denom_label());
            }
        }
        ContractCommand::QueryBalance => {
            print_json(&query(ctx, Operation::query_balance()).await?)?;
        }
        ContractCommand::QueryProvided { address } => {
            print_json(&query(ctx, Operation::query_provided(&address)?).await?)?;
        }
        ContractCommand::Provide { amount } => {
            describe_execute(ctx, Operation::provide(&amount)?)?;
        }
        ContractCommand::Withdraw => {
            describe_execute(ctx, Operation::withdraw())?;
        }
        ContractCommand::Loan { amount, receiver } => {
            let receiver = match receiver {
                Some(receiver) => receiver,
                None => ctx
                    .contract(ContractName::SimpleReceiver)
                    .map(str::to_string)
                    .ok_or("No --receiver given and no simple receiver contract configured")?,
            };
            describe_execute(ctx, Operation::loan(&receiver, &amount)?)?;
        }
    }
    Ok(())
}

async fn query(ctx: &Context, operation: Operation) -> CliResult<Value> {
    let msg: QueryMsg = match operation {
        Operation::Query(msg) => msg,
        Operation::Execute(_) => return Err("expected a query operation".into()),
    };
    let contract = ctx.flash_loan()?;
    println!("Querying {}: {}", contract, serde_json::to_string(&msg)?);
    Ok(ctx.lcd()?.query_contract_smart(&contract, &msg).await?)
}

fn describe_execute(ctx: &Context, operation: Operation) -> CliResult<()> {
    let request: ExecuteRequest = match operation {
        Operation::Execute(request) => request,
        Operation::Query(_) => return Err("expected an execute operation".into()),
    };
    let contract = ctx.flash_loan()?;
    let profile = ctx.profile();
    let msg = serde_json::to_string(&request.message())?;
    let funds = request.funds(profile.native_denom());

    println!("Execute Message: {}", serde_json::to_string_pretty(&request.message())?);
    if let ExecuteRequest::Loan { receiver, .. } = &request {
        println!("Receiver: {}", receiver);
    }

    let mut command = format!(
        "cored tx wasm execute {} '{}' --chain-id {} --node {} --gas auto --gas-prices {}",
        contract,
        msg,
        profile.chain_id,
        profile.rpc,
        profile.default_gas_price()
    );
    if !funds.is_empty() {
        let amount = funds.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
        println!("Funds: {}", amount);
        command.push_str(&format!(" --amount {}", amount));
    }

    println!("\nSign and broadcast with:\n  {}", command);
    Ok(())
}

fn print_json(value: &Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
