//! Compiled-in network profiles and the contract address table.

use crate::config::schema::ContractsConfig;
use crate::network::types::{
    Bech32Config, Currency, FeeCurrency, GasPrice, GasPriceStep, NetworkId, NetworkProfile,
};

/// BIP-44 coin type registered for Coreum keys.
pub const COREUM_COIN_TYPE: u32 = 990;

const TESTCORE: Currency = Currency {
    coin_denom: "TESTCORE",
    coin_minimal_denom: "utestcore",
    coin_decimals: 6,
};

const CORE: Currency = Currency {
    coin_denom: "CORE",
    coin_minimal_denom: "ucore",
    coin_decimals: 6,
};

const GAS_PRICE_STEP: GasPriceStep = GasPriceStep {
    low: 0.0625,
    average: 0.1,
    high: 0.25,
};

pub static COREUM_TESTNET: NetworkProfile = NetworkProfile {
    id: NetworkId::Testnet,
    chain_id: "coreum-testnet-1",
    chain_name: "Coreum Testnet",
    rpc: "https://full-node.testnet-1.coreum.dev:26657",
    rest: "https://full-node.testnet-1.coreum.dev:1317",
    stake_currency: TESTCORE,
    bech32_config: Bech32Config {
        bech32_prefix_acc_addr: "testcore",
        bech32_prefix_acc_pub: "testcorepub",
        bech32_prefix_val_addr: "testcorevaloper",
        bech32_prefix_val_pub: "testcorevaloperpub",
        bech32_prefix_cons_addr: "testcorevalcons",
        bech32_prefix_cons_pub: "testcorevalconspub",
    },
    currencies: &[TESTCORE],
    fee_currencies: &[FeeCurrency {
        currency: TESTCORE,
        gas_price_step: GAS_PRICE_STEP,
    }],
};

pub static COREUM_MAINNET: NetworkProfile = NetworkProfile {
    id: NetworkId::Mainnet,
    chain_id: "coreum-mainnet-1",
    chain_name: "Coreum",
    rpc: "https://full-node.mainnet-1.coreum.dev:26657",
    rest: "https://full-node.mainnet-1.coreum.dev:1317",
    stake_currency: CORE,
    bech32_config: Bech32Config {
        bech32_prefix_acc_addr: "core",
        bech32_prefix_acc_pub: "corepub",
        bech32_prefix_val_addr: "corevaloper",
        bech32_prefix_val_pub: "corevaloperpub",
        bech32_prefix_cons_addr: "corevalcons",
        bech32_prefix_cons_pub: "corevalconspub",
    },
    currencies: &[CORE],
    fee_currencies: &[FeeCurrency {
        currency: CORE,
        gas_price_step: GAS_PRICE_STEP,
    }],
};

/// Look up the profile of a network. Total over [`NetworkId`].
pub fn resolve(network: NetworkId) -> &'static NetworkProfile {
    match network {
        NetworkId::Testnet => &COREUM_TESTNET,
        NetworkId::Mainnet => &COREUM_MAINNET,
    }
}

/// Contracts the client knows how to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContractName {
    FlashLoan,
    SimpleReceiver,
    IbcReceiver,
}

impl ContractName {
    pub const ALL: [ContractName; 3] = [
        ContractName::FlashLoan,
        ContractName::SimpleReceiver,
        ContractName::IbcReceiver,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ContractName::FlashLoan => "Flash Loan",
            ContractName::SimpleReceiver => "Simple Receiver",
            ContractName::IbcReceiver => "IBC Receiver",
        }
    }
}

/// Immutable lookup of network parameters and deployed contracts.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    contracts: ContractsConfig,
}

impl NetworkRegistry {
    pub fn new(contracts: ContractsConfig) -> Self {
        Self { contracts }
    }

    pub fn resolve(&self, network: NetworkId) -> &'static NetworkProfile {
        resolve(network)
    }

    /// Address of a named contract, or `None` when it is not deployed on `network`.
    pub fn contract_address(&self, network: NetworkId, name: ContractName) -> Option<&str> {
        let table = self.contracts.for_network(network);
        let address = match name {
            ContractName::FlashLoan => &table.flash_loan,
            ContractName::SimpleReceiver => &table.simple_receiver,
            ContractName::IbcReceiver => &table.ibc_receiver,
        };
        let address = address.trim();
        if address.is_empty() {
            None
        } else {
            Some(address)
        }
    }

    pub fn native_denom(&self, network: NetworkId) -> &'static str {
        resolve(network).native_denom()
    }

    pub fn default_gas_price(&self, network: NetworkId) -> GasPrice {
        resolve(network).default_gas_price()
    }
}
