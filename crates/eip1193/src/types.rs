use alloy_primitives::{hex, Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Parameter object for `eth_sendTransaction` and `eth_call`. All numeric
/// fields cross the JS boundary as 0x-prefixed hex strings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TransactionRequest {
    pub fn new(from: Address, to: Address, data: Bytes) -> Self {
        Self {
            from: Some(from.to_string()),
            to: to.to_string(),
            data: data.to_string(),
            value: None,
        }
    }

    /// A read-only call shape, with no sender attached.
    pub fn call(to: Address, data: Bytes) -> Self {
        Self {
            from: None,
            to: to.to_string(),
            data: data.to_string(),
            value: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TransactionReceipt {
    /// Post-Byzantium receipts carry `status: 0x1` on success.
    pub fn succeeded(&self) -> bool {
        matches!(self.status.as_deref(), Some("0x1") | None)
    }
}

/// Parses a 0x-prefixed hex quantity as returned by `eth_getBalance` and friends.
pub fn parse_quantity(value: &str) -> Result<U256, crate::Error> {
    let digits = value.strip_prefix("0x").unwrap_or(value);
    U256::from_str_radix(digits, 16)
        .map_err(|_| crate::Error::Generic(format!("invalid hex quantity: {value}")))
}

/// Parses 0x-prefixed return data from `eth_call`.
pub fn parse_bytes(value: &str) -> Result<Bytes, crate::Error> {
    hex::decode(value)
        .map(Bytes::from)
        .map_err(|_| crate::Error::Generic(format!("invalid hex data: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn transaction_request_hex_shapes() {
        let from = address!("00000000000000000000000000000000000000aa");
        let to = address!("a166a057B75161f4412608ffA5c97Ba7d10Fb66f");
        let tx = TransactionRequest::new(from, to, Bytes::from(vec![0x12, 0x34]));

        assert_eq!(tx.data, "0x1234");
        assert!(tx.to.starts_with("0x"));
        assert_eq!(tx.from.as_deref(), Some(from.to_string().as_str()));

        let json = serde_json::to_value(&tx).unwrap();
        // `value` must be absent entirely, not null, or some wallets reject the tx
        assert!(json.get("value").is_none());
    }

    #[test]
    fn receipt_status() {
        let ok = TransactionReceipt {
            transaction_hash: "0xabc".into(),
            block_number: Some("0x10".into()),
            status: Some("0x1".into()),
        };
        let reverted = TransactionReceipt {
            status: Some("0x0".into()),
            ..ok.clone()
        };
        assert!(ok.succeeded());
        assert!(!reverted.succeeded());
    }

    #[test]
    fn quantities() {
        assert_eq!(parse_quantity("0xde0b6b3a7640000").unwrap(), U256::from(10u128.pow(18)));
        assert_eq!(parse_quantity("0x0").unwrap(), U256::ZERO);
        assert!(parse_quantity("0xzz").is_err());
    }
}
