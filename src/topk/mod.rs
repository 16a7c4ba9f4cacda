pub mod config;
pub mod database;
pub mod error;
pub mod expansion;
pub mod frontier;
pub mod memory;
pub mod mining;
pub mod output;
pub mod rule;
pub mod state;
pub mod top_set;

pub use config::{MinerConfig, Redundancy};
pub use database::{TransactionStore, VerticalIndex};
pub use error::{MiningError, Result};
pub use frontier::CandidateFrontier;
pub use memory::MiningStats;
pub use mining::{top_k_non_redundant_rules, top_k_rules, MiningResult, TopKMiner};
pub use output::{format_rules, write_rules};
pub use rule::{AssociationRule, RuleCandidate};
pub use state::{MiningPhase, MiningSession};
pub use top_set::TopKSet;
