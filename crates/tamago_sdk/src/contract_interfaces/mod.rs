pub mod erc721;
pub mod tamago_swap;
