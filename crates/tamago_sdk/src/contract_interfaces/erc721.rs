use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

sol! {
    interface IERC721 {
        function approve(address to, uint256 tokenId) external;
        function getApproved(uint256 tokenId) external view returns (address operator);
    }
}

/// Calldata authorizing `operator` to transfer `token_id` on the owner's behalf.
pub fn approve_calldata(operator: Address, token_id: U256) -> Bytes {
    Bytes::from(
        IERC721::approveCall {
            to: operator,
            tokenId: token_id,
        }
        .abi_encode(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256};

    #[test]
    fn approve_selector_and_fields() {
        let hash = keccak256(b"approve(address,uint256)");
        assert_eq!(IERC721::approveCall::SELECTOR, [hash[0], hash[1], hash[2], hash[3]]);

        let operator = address!("a166a057B75161f4412608ffA5c97Ba7d10Fb66f");
        let data = approve_calldata(operator, U256::from(7u64));

        let decoded = IERC721::approveCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded.to, operator);
        assert_eq!(decoded.tokenId, U256::from(7u64));
    }
}
