pub use tamago_sdk::constants::SWAP_CONTRACT;

/// How long a flow waits on transaction confirmation before failing with a
/// timeout. Adjustable in the settings menu.
pub const DEFAULT_CONFIRMATION_TIMEOUT_MINUTES: u64 = 3;
