use alloy_primitives::{address, Address};

/// Fixed deployment of the TamagoSwap contract.
pub static SWAP_CONTRACT: Address = address!("a166a057B75161f4412608ffA5c97Ba7d10Fb66f");
