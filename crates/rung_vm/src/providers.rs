//! Deterministic in-memory providers.
//!
//! Tests, demos and the CLI exercise the VM against these; real deployments
//! plug their own `ChainProvider`/`TierProvider` at the same seam.

use std::collections::HashMap;

use primitive_types::U256;

use crate::exec::{ChainProvider, TierProvider};

/// Fixed chain observables with map-backed token state.
#[derive(Debug, Clone, Default)]
pub struct StaticChain {
    pub block_number: U256,
    pub block_timestamp: U256,
    pub caller: U256,
    pub this_address: U256,
    pub erc20_balances: HashMap<(U256, U256), U256>,
    pub erc20_supplies: HashMap<U256, U256>,
    pub erc721_balances: HashMap<(U256, U256), U256>,
    pub erc721_owners: HashMap<(U256, U256), U256>,
}

impl ChainProvider for StaticChain {
    fn block_number(&self) -> U256 {
        self.block_number
    }

    fn block_timestamp(&self) -> U256 {
        self.block_timestamp
    }

    fn caller(&self) -> U256 {
        self.caller
    }

    fn this_address(&self) -> U256 {
        self.this_address
    }

    fn erc20_balance_of(&self, token: U256, account: U256) -> U256 {
        self.erc20_balances.get(&(token, account)).copied().unwrap_or_default()
    }

    fn erc20_total_supply(&self, token: U256) -> U256 {
        self.erc20_supplies.get(&token).copied().unwrap_or_default()
    }

    fn erc721_balance_of(&self, token: U256, account: U256) -> U256 {
        self.erc721_balances.get(&(token, account)).copied().unwrap_or_default()
    }

    fn erc721_owner_of(&self, token: U256, id: U256) -> U256 {
        self.erc721_owners.get(&(token, id)).copied().unwrap_or_default()
    }
}

/// Map of account to report; unknown accounts hold nothing.
#[derive(Debug, Clone, Default)]
pub struct StaticTier {
    pub reports: HashMap<U256, U256>,
}

impl StaticTier {
    pub fn with_report(mut self, account: U256, report: U256) -> Self {
        self.reports.insert(account, report);
        self
    }
}

impl TierProvider for StaticTier {
    fn report(&self, account: U256, _context: &[U256]) -> U256 {
        self.reports.get(&account).copied().unwrap_or(rung_tier::NEVER_REPORT)
    }

    fn report_time_for_tier(&self, account: U256, tier: u32, context: &[U256]) -> u32 {
        let report = self.report(account, context);
        rung_tier::time_for_tier(report, tier).unwrap_or(rung_tier::NEVER_LANE)
    }
}
