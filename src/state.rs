use crate::error::Error;
use crate::flows::SummaryUpdate;
use alloy_primitives::{Address, U256};
use leptos::prelude::*;

/// Lifecycle of one transaction-producing flow. `Submitting` is the only
/// state in which a duplicate dispatch must be blocked.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum TxStatus {
    #[default]
    Idle,
    Submitting,
    Confirmed,
    Failed(Error),
}

impl TxStatus {
    /// Enters `Submitting`; returns false (and changes nothing) if a
    /// submission is already in flight.
    pub fn begin(&mut self) -> bool {
        if matches!(self, TxStatus::Submitting) {
            return false;
        }
        *self = TxStatus::Submitting;
        true
    }

    pub fn finish(&mut self, result: Result<(), Error>) {
        *self = match result {
            Ok(()) => TxStatus::Confirmed,
            Err(error) => TxStatus::Failed(error),
        };
    }

    /// Returns to `Idle` once the result has been surfaced to the user.
    pub fn acknowledge(&mut self) {
        if !matches!(self, TxStatus::Submitting) {
            *self = TxStatus::Idle;
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, TxStatus::Submitting)
    }

    pub fn error(&self) -> Option<&Error> {
        match self {
            TxStatus::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// A reactive wrapper around [`TxStatus`], one per flow.
#[derive(Copy, Clone)]
pub struct TxFlow {
    pub status: RwSignal<TxStatus>,
}

impl TxFlow {
    pub fn new() -> Self {
        Self {
            status: RwSignal::new(TxStatus::Idle),
        }
    }

    pub fn begin(&self) -> bool {
        self.status
            .try_update(|status| status.begin())
            .unwrap_or(false)
    }

    pub fn finish(&self, result: Result<(), Error>) {
        self.status.update(|status| status.finish(result));
    }

    pub fn acknowledge(&self) {
        self.status.update(|status| status.acknowledge());
    }

    pub fn pending(&self) -> Signal<bool> {
        let status = self.status;
        Signal::derive(move || status.with(TxStatus::is_submitting))
    }

    pub fn error(&self) -> Signal<Option<Error>> {
        let status = self.status;
        Signal::derive(move || status.with(|status| status.error().cloned()))
    }

    pub fn confirmed(&self) -> Signal<bool> {
        let status = self.status;
        Signal::derive(move || status.with(|status| matches!(status, TxStatus::Confirmed)))
    }
}

impl Default for TxFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Copy, Clone)]
pub struct WalletSignals {
    pub accounts: RwSignal<Vec<Address>>,
    pub balance: RwSignal<Option<String>>,
}

impl WalletSignals {
    pub fn new() -> Self {
        Self {
            accounts: RwSignal::new(Vec::new()),
            balance: RwSignal::new(None),
        }
    }

    /// The first connected account is treated as "the" active account.
    pub fn active_account(&self) -> Option<Address> {
        self.accounts.with(|accounts| accounts.first().copied())
    }

    /// Replaces the session, reporting whether the active account changed so
    /// callers can drop state that belonged to the previous account.
    pub fn apply_session(&self, accounts: Vec<Address>, balance: String) -> bool {
        let changed = self.active_account() != accounts.first().copied();
        self.accounts.set(accounts);
        self.balance.set(Some(balance));
        changed
    }

    pub fn is_connected(&self) -> bool {
        self.accounts.with(|accounts| !accounts.is_empty())
    }

    pub fn clear(&self) {
        self.accounts.set(Vec::new());
        self.balance.set(None);
    }
}

impl Default for WalletSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// A confirmed on-chain authorization for the swap contract to move one token.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApprovalRecord {
    pub nft_address: Address,
    pub nft_id: U256,
}

#[derive(Copy, Clone)]
pub struct Approvals(pub RwSignal<Vec<ApprovalRecord>>);

impl Approvals {
    pub fn new() -> Self {
        Self(RwSignal::new(Vec::new()))
    }

    pub fn push(&self, record: ApprovalRecord) {
        self.0.update(|records| {
            // re-approving the same token replaces the old record
            records.retain(|existing| existing != &record);
            records.push(record);
        });
    }

    pub fn clear(&self) {
        self.0.set(Vec::new());
    }
}

impl Default for Approvals {
    fn default() -> Self {
        Self::new()
    }
}

/// Display-only projection of the contract's summary fields. Each field keeps
/// its previous value when a refresh fails to read it.
#[derive(Copy, Clone)]
pub struct SummarySignals {
    pub total_supply: RwSignal<Option<String>>,
    pub wl_sale_price: RwSignal<Option<String>>,
    pub wl_sale_price_2: RwSignal<Option<String>>,
    pub public_sale_price: RwSignal<Option<String>>,
}

impl SummarySignals {
    pub fn new() -> Self {
        Self {
            total_supply: RwSignal::new(None),
            wl_sale_price: RwSignal::new(None),
            wl_sale_price_2: RwSignal::new(None),
            public_sale_price: RwSignal::new(None),
        }
    }

    pub fn apply(&self, update: SummaryUpdate) {
        fn merge(signal: RwSignal<Option<String>>, value: Option<String>) {
            if value.is_some() {
                signal.set(value);
            }
        }
        merge(self.total_supply, update.total_supply);
        merge(self.wl_sale_price, update.wl_sale_price);
        merge(self.wl_sale_price_2, update.wl_sale_price_2);
        merge(self.public_sale_price, update.public_sale_price);
    }
}

impl Default for SummarySignals {
    fn default() -> Self {
        Self::new()
    }
}
