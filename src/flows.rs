//! The flow layer: one async function per user intent, each taking the wallet
//! capability explicitly so tests can substitute a double. All validation
//! happens here, before anything touches the network.

use crate::{error::Error, state::ApprovalRecord, utils::display_ether};
use alloy_primitives::{Address, U256};
use eip1193::{Provider, TransactionRequest};
use std::{str::FromStr, time::Duration};
use tamago_sdk::contract_interfaces::{erc721, tamago_swap, tamago_swap::TamagoSwap};
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq)]
pub struct WalletSession {
    pub accounts: Vec<Address>,
    /// Native balance of the first account, in the display denomination.
    pub balance: String,
}

pub async fn connect_wallet<P: Provider>(provider: &P) -> Result<WalletSession, Error> {
    let accounts = provider.request_accounts().await?;
    let active = accounts
        .first()
        .copied()
        .ok_or_else(|| Error::Remote("wallet returned no accounts".to_string()))?;

    let balance = provider.balance(active).await?;
    debug!("connected as {active}, balance {balance} wei");

    Ok(WalletSession {
        accounts,
        balance: display_ether(balance),
    })
}

/// One refresh of the contract summary. Fields are independent: a failed read
/// logs and yields `None`, it never aborts the rest of the fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryUpdate {
    pub total_supply: Option<String>,
    pub wl_sale_price: Option<String>,
    pub wl_sale_price_2: Option<String>,
    pub public_sale_price: Option<String>,
}

pub async fn fetch_summary<P: Provider>(provider: &P, contract: Address) -> SummaryUpdate {
    let swap = TamagoSwap::new(provider, contract);

    SummaryUpdate {
        total_supply: read_field("totalSupply", swap.total_supply().await),
        wl_sale_price: read_field("wlSalePrice", swap.wl_sale_price().await),
        wl_sale_price_2: read_field("wlSalePrice2", swap.wl_sale_price_2().await),
        public_sale_price: read_field("publicSalePrice", swap.public_sale_price().await),
    }
}

fn read_field(name: &str, result: Result<U256, tamago_sdk::Error>) -> Option<String> {
    result
        .inspect_err(|err| error!("{name} query failed: {err}"))
        .ok()
        .map(|value| value.to_string())
}

/// Submits `approve(swap_contract, nft_id)` against the NFT contract and
/// waits for confirmation. Returns the record the propose flow consumes.
pub async fn approve_nft<P: Provider>(
    provider: &P,
    owner: Address,
    operator: Address,
    nft_address: &str,
    nft_id: &str,
    timeout: Duration,
) -> Result<ApprovalRecord, Error> {
    let nft_address = parse_address("NFT contract address", nft_address)?;
    let nft_id = parse_token_id("NFT token id", nft_id)?;

    let data = erc721::approve_calldata(operator, nft_id);
    submit(provider, owner, nft_address, data, timeout).await?;

    Ok(ApprovalRecord {
        nft_address,
        nft_id,
    })
}

/// Proposes a swap of every approved token to `counterparty`. Fails locally,
/// with zero network calls, when nothing has been approved yet.
pub async fn propose_swap<P: Provider>(
    provider: &P,
    owner: Address,
    contract: Address,
    counterparty: &str,
    approvals: &[ApprovalRecord],
    timeout: Duration,
) -> Result<(), Error> {
    if approvals.is_empty() {
        return Err(Error::validation(
            "approve at least one NFT before proposing a swap",
        ));
    }
    let counterparty = parse_address("counterparty address", counterparty)?;

    let (nft_addresses, nft_ids) = approvals
        .iter()
        .map(|record| (record.nft_address, record.nft_id))
        .unzip();

    let data = tamago_swap::propose_swap_calldata(counterparty, nft_addresses, nft_ids);
    submit(provider, owner, contract, data, timeout).await
}

/// Accepts a previously proposed swap. This is a write, so it goes through
/// the signing capability like every other transaction-producing flow.
pub async fn accept_swap<P: Provider>(
    provider: &P,
    owner: Address,
    contract: Address,
    counterparty: &str,
    nft_addresses: &str,
    nft_ids: &str,
    timeout: Duration,
) -> Result<(), Error> {
    let counterparty = parse_address("counterparty address", counterparty)?;

    let nft_addresses = parse_list(nft_addresses, |item| {
        parse_address("NFT contract address", item)
    })?;
    let nft_ids = parse_list(nft_ids, |item| parse_token_id("NFT token id", item))?;

    if nft_addresses.is_empty() {
        return Err(Error::validation("no NFTs given to accept"));
    }
    if nft_addresses.len() != nft_ids.len() {
        return Err(Error::validation(
            "NFT address and token id lists differ in length",
        ));
    }

    let data = tamago_swap::accept_swap_calldata(counterparty, nft_addresses, nft_ids);
    submit(provider, owner, contract, data, timeout).await
}

async fn submit<P: Provider>(
    provider: &P,
    from: Address,
    to: Address,
    data: alloy_primitives::Bytes,
    timeout: Duration,
) -> Result<(), Error> {
    let tx = TransactionRequest::new(from, to, data);
    let tx_hash = provider.send_transaction(tx).await?;
    info!("transaction submitted: {tx_hash}");

    let receipt = provider.wait_for_transaction(&tx_hash, timeout).await?;
    info!("transaction confirmed in block {:?}", receipt.block_number);

    Ok(())
}

fn parse_address(field: &str, input: &str) -> Result<Address, Error> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    Address::from_str(input).map_err(|_| Error::validation(format!("{field} is not an address")))
}

fn parse_token_id(field: &str, input: &str) -> Result<U256, Error> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::validation(format!("{field} is required")));
    }
    U256::from_str(input).map_err(|_| Error::validation(format!("{field} is not a valid id")))
}

fn parse_list<T>(input: &str, parse: impl Fn(&str) -> Result<T, Error>) -> Result<Vec<T>, Error> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, Bytes};
    use alloy_sol_types::SolCall;
    use async_trait::async_trait;
    use eip1193::TransactionReceipt;
    use futures::executor::block_on;
    use std::cell::RefCell;
    use tamago_sdk::contract_interfaces::tamago_swap::ITamagoSwap;

    const OWNER: Address = address!("00000000000000000000000000000000000000aa");
    const COUNTERPARTY: Address = address!("00000000000000000000000000000000000000bb");
    const SWAP: Address = address!("a166a057B75161f4412608ffA5c97Ba7d10Fb66f");
    const NFT_A: Address = address!("0000000000000000000000000000000000001111");

    const TIMEOUT: Duration = Duration::from_secs(180);

    /// Scripted wallet double. Records every call and transaction so tests
    /// can assert on exactly what reached the "network".
    struct MockProvider {
        available: bool,
        balance: U256,
        calls: RefCell<Vec<Bytes>>,
        sent: RefCell<Vec<TransactionRequest>>,
        failing_selectors: Vec<[u8; 4]>,
        wait_result: Result<(), eip1193::Error>,
    }

    impl Default for MockProvider {
        fn default() -> Self {
            Self {
                available: true,
                balance: U256::from(1_000_000_000_000_000_000u128),
                calls: RefCell::new(Vec::new()),
                sent: RefCell::new(Vec::new()),
                failing_selectors: Vec::new(),
                wait_result: Ok(()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Provider for MockProvider {
        async fn request_accounts(&self) -> Result<Vec<Address>, eip1193::Error> {
            if !self.available {
                return Err(eip1193::Error::ProviderUnavailable);
            }
            Ok(vec![OWNER])
        }

        async fn balance(&self, _account: Address) -> Result<U256, eip1193::Error> {
            Ok(self.balance)
        }

        async fn call(&self, _to: Address, data: Bytes) -> Result<Bytes, eip1193::Error> {
            let selector: [u8; 4] = data[..4].try_into().unwrap();
            self.calls.borrow_mut().push(data);

            if self.failing_selectors.contains(&selector) {
                return Err(eip1193::Error::Js("execution reverted".into()));
            }
            let mut word = [0u8; 32];
            word[31] = 7;
            Ok(Bytes::from(word.to_vec()))
        }

        async fn send_transaction(
            &self,
            tx: TransactionRequest,
        ) -> Result<String, eip1193::Error> {
            self.sent.borrow_mut().push(tx);
            Ok("0xtxhash".to_string())
        }

        async fn transaction_receipt(
            &self,
            tx_hash: &str,
        ) -> Result<Option<TransactionReceipt>, eip1193::Error> {
            Ok(Some(TransactionReceipt {
                transaction_hash: tx_hash.to_string(),
                block_number: Some("0x10".to_string()),
                status: Some("0x1".to_string()),
            }))
        }

        // Overridden so native tests never touch the browser clock.
        async fn wait_for_transaction(
            &self,
            tx_hash: &str,
            _timeout: Duration,
        ) -> Result<TransactionReceipt, eip1193::Error> {
            self.wait_result.clone()?;
            Ok(self.transaction_receipt(tx_hash).await?.unwrap())
        }
    }

    fn sent_calldata(mock: &MockProvider, index: usize) -> Bytes {
        let sent = mock.sent.borrow();
        eip1193::parse_bytes(&sent[index].data).unwrap()
    }

    #[test]
    fn connect_reports_accounts_and_display_balance() {
        let mock = MockProvider::default();
        let session = block_on(connect_wallet(&mock)).unwrap();

        assert_eq!(session.accounts, vec![OWNER]);
        assert_eq!(session.balance, "1.0");
    }

    #[test]
    fn connect_without_wallet_is_capability_unavailable() {
        let mock = MockProvider {
            available: false,
            ..Default::default()
        };
        let err = block_on(connect_wallet(&mock)).unwrap_err();

        assert_eq!(err, Error::CapabilityUnavailable);
        assert!(mock.sent.borrow().is_empty());
    }

    #[test]
    fn propose_with_no_approvals_fails_before_the_network() {
        let mock = MockProvider::default();
        let err = block_on(propose_swap(
            &mock,
            OWNER,
            SWAP,
            &COUNTERPARTY.to_string(),
            &[],
            TIMEOUT,
        ))
        .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(mock.sent.borrow().is_empty());
        assert!(mock.calls.borrow().is_empty());
    }

    #[test]
    fn approval_then_proposal_pairs_address_and_id() {
        let mock = MockProvider::default();

        let record = block_on(approve_nft(
            &mock,
            OWNER,
            SWAP,
            &NFT_A.to_string(),
            "7",
            TIMEOUT,
        ))
        .unwrap();
        assert_eq!(record.nft_address, NFT_A);
        assert_eq!(record.nft_id, U256::from(7u64));

        block_on(propose_swap(
            &mock,
            OWNER,
            SWAP,
            &COUNTERPARTY.to_string(),
            &[record],
            TIMEOUT,
        ))
        .unwrap();

        // approval went to the NFT contract, proposal to the swap contract
        {
            let sent = mock.sent.borrow();
            assert_eq!(sent.len(), 2);
            assert_eq!(sent[0].to, NFT_A.to_string());
            assert_eq!(sent[1].to, SWAP.to_string());
            assert_eq!(sent[1].from.as_deref(), Some(OWNER.to_string().as_str()));
        }

        let proposal = sent_calldata(&mock, 1);
        let decoded = ITamagoSwap::proposeSwapCall::abi_decode(&proposal, true).unwrap();
        assert_eq!(decoded.secondUser, COUNTERPARTY);
        assert_eq!(decoded.nftAddresses, vec![NFT_A]);
        assert_eq!(decoded.nftIds, vec![U256::from(7u64)]);
    }

    #[test]
    fn approval_validates_inputs_before_submitting() {
        let mock = MockProvider::default();

        let err = block_on(approve_nft(&mock, OWNER, SWAP, "", "7", TIMEOUT)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = block_on(approve_nft(
            &mock,
            OWNER,
            SWAP,
            &NFT_A.to_string(),
            "not-a-number",
            TIMEOUT,
        ))
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        assert!(mock.sent.borrow().is_empty());
    }

    #[test]
    fn summary_fetch_tolerates_a_single_failing_field() {
        let mock = MockProvider {
            failing_selectors: vec![ITamagoSwap::wlSalePrice2Call::SELECTOR],
            ..Default::default()
        };

        let update = block_on(fetch_summary(&mock, SWAP));

        assert_eq!(update.total_supply.as_deref(), Some("7"));
        assert_eq!(update.wl_sale_price.as_deref(), Some("7"));
        assert_eq!(update.wl_sale_price_2, None);
        assert_eq!(update.public_sale_price.as_deref(), Some("7"));
        // all four reads were attempted
        assert_eq!(mock.calls.borrow().len(), 4);
    }

    #[test]
    fn confirmation_timeout_fails_the_flow() {
        let mock = MockProvider {
            wait_result: Err(eip1193::Error::ConfirmationTimeout),
            ..Default::default()
        };

        let err = block_on(approve_nft(
            &mock,
            OWNER,
            SWAP,
            &NFT_A.to_string(),
            "7",
            TIMEOUT,
        ))
        .unwrap_err();

        assert_eq!(err, Error::Timeout);
    }

    #[test]
    fn reverted_transaction_surfaces_as_remote_error() {
        let mock = MockProvider {
            wait_result: Err(eip1193::Error::Reverted("0xtxhash".into())),
            ..Default::default()
        };

        let err = block_on(propose_swap(
            &mock,
            OWNER,
            SWAP,
            &COUNTERPARTY.to_string(),
            &[ApprovalRecord {
                nft_address: NFT_A,
                nft_id: U256::from(7u64),
            }],
            TIMEOUT,
        ))
        .unwrap_err();

        assert!(matches!(err, Error::Remote(_)));
    }

    #[test]
    fn accept_submits_a_signed_transaction() {
        let mock = MockProvider::default();

        block_on(accept_swap(
            &mock,
            OWNER,
            SWAP,
            &COUNTERPARTY.to_string(),
            &format!("{NFT_A}, {NFT_A}"),
            "7, 9",
            TIMEOUT,
        ))
        .unwrap();

        let sent = mock.sent.borrow();
        assert_eq!(sent.len(), 1);
        // accept is a write: it must carry the sender, not go out read-only
        assert_eq!(sent[0].from.as_deref(), Some(OWNER.to_string().as_str()));
        drop(sent);

        let decoded =
            ITamagoSwap::acceptSwapCall::abi_decode(&sent_calldata(&mock, 0), true).unwrap();
        assert_eq!(decoded.nftIds, vec![U256::from(7u64), U256::from(9u64)]);
    }

    #[test]
    fn accept_rejects_mismatched_lists() {
        let mock = MockProvider::default();

        let err = block_on(accept_swap(
            &mock,
            OWNER,
            SWAP,
            &COUNTERPARTY.to_string(),
            &NFT_A.to_string(),
            "7, 9",
            TIMEOUT,
        ))
        .unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert!(mock.sent.borrow().is_empty());
    }
}
