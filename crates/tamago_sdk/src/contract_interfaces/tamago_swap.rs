use crate::Error;
use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};
use eip1193::Provider;
use tracing::trace;

sol! {
    interface ITamagoSwap {
        function proposeSwap(address secondUser, address[] nftAddresses, uint256[] nftIds) external;
        function acceptSwap(address secondUser, address[] nftAddresses, uint256[] nftIds) external;

        function totalSupply() external view returns (uint256 supply);
        function wlSalePrice() external view returns (uint256 price);
        function wlSalePrice2() external view returns (uint256 price);
        function publicSalePrice() external view returns (uint256 price);
    }
}

/// Read access plus calldata construction for one deployment of the swap
/// contract. Writes go through the wallet, so the write side only builds
/// calldata; the caller attaches the sender and submits.
pub struct TamagoSwap<'a, P: Provider> {
    provider: &'a P,
    pub address: Address,
}

impl<'a, P: Provider> TamagoSwap<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    async fn query_u256<C>(&self, call: C, extract: fn(C::Return) -> U256) -> Result<U256, Error>
    where
        C: SolCall,
    {
        let data = self
            .provider
            .call(self.address, Bytes::from(call.abi_encode()))
            .await?;

        trace!("query returned {} bytes", data.len());

        C::abi_decode_returns(&data, true)
            .map(extract)
            .map_err(Error::abi)
    }

    pub async fn total_supply(&self) -> Result<U256, Error> {
        self.query_u256(ITamagoSwap::totalSupplyCall {}, |ret| ret.supply)
            .await
    }

    pub async fn wl_sale_price(&self) -> Result<U256, Error> {
        self.query_u256(ITamagoSwap::wlSalePriceCall {}, |ret| ret.price)
            .await
    }

    pub async fn wl_sale_price_2(&self) -> Result<U256, Error> {
        self.query_u256(ITamagoSwap::wlSalePrice2Call {}, |ret| ret.price)
            .await
    }

    pub async fn public_sale_price(&self) -> Result<U256, Error> {
        self.query_u256(ITamagoSwap::publicSalePriceCall {}, |ret| ret.price)
            .await
    }
}

pub fn propose_swap_calldata(
    second_user: Address,
    nft_addresses: Vec<Address>,
    nft_ids: Vec<U256>,
) -> Bytes {
    Bytes::from(
        ITamagoSwap::proposeSwapCall {
            secondUser: second_user,
            nftAddresses: nft_addresses,
            nftIds: nft_ids,
        }
        .abi_encode(),
    )
}

pub fn accept_swap_calldata(
    second_user: Address,
    nft_addresses: Vec<Address>,
    nft_ids: Vec<U256>,
) -> Bytes {
    Bytes::from(
        ITamagoSwap::acceptSwapCall {
            secondUser: second_user,
            nftAddresses: nft_addresses,
            nftIds: nft_ids,
        }
        .abi_encode(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, keccak256};

    #[test]
    fn selectors_match_signatures() {
        let expected = |signature: &str| {
            let hash = keccak256(signature.as_bytes());
            [hash[0], hash[1], hash[2], hash[3]]
        };

        assert_eq!(
            ITamagoSwap::proposeSwapCall::SELECTOR,
            expected("proposeSwap(address,address[],uint256[])")
        );
        assert_eq!(
            ITamagoSwap::acceptSwapCall::SELECTOR,
            expected("acceptSwap(address,address[],uint256[])")
        );
        assert_eq!(
            ITamagoSwap::totalSupplyCall::SELECTOR,
            expected("totalSupply()")
        );
    }

    #[test]
    fn propose_calldata_preserves_pairing() {
        let counterparty = address!("00000000000000000000000000000000000000bb");
        let nft_a = address!("0000000000000000000000000000000000001111");
        let nft_b = address!("0000000000000000000000000000000000002222");

        let data = propose_swap_calldata(
            counterparty,
            vec![nft_a, nft_b],
            vec![U256::from(7u64), U256::from(9u64)],
        );
        assert_eq!(&data[..4], ITamagoSwap::proposeSwapCall::SELECTOR);

        let decoded = ITamagoSwap::proposeSwapCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded.secondUser, counterparty);
        assert_eq!(decoded.nftAddresses, vec![nft_a, nft_b]);
        assert_eq!(decoded.nftIds, vec![U256::from(7u64), U256::from(9u64)]);
    }

    #[test]
    fn total_supply_decodes_a_single_word() {
        let mut word = [0u8; 32];
        word[31] = 42;

        let decoded = ITamagoSwap::totalSupplyCall::abi_decode_returns(&word, true).unwrap();
        assert_eq!(decoded.supply, U256::from(42u64));

        // short return data is a schema mismatch, not a zero
        assert!(ITamagoSwap::totalSupplyCall::abi_decode_returns(&word[..16], true).is_err());
    }
}
