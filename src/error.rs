// The Serialize and Deserialize traits are derived to ensure that Errors can be
// transmitted to or from a server, which is necessary for them to function as Resources.
#[derive(thiserror::Error, serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No wallet found! Install or unlock a browser wallet and try again.")]
    CapabilityUnavailable,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Transaction failed: {0}")]
    Remote(String),

    #[error("Timed out waiting for the transaction to confirm")]
    Timeout,

    #[error("Contract interface mismatch: {0}")]
    SchemaMismatch(String),

    #[error("An error occurred: {0}")]
    Generic(String),
}

impl Error {
    pub fn generic(message: impl ToString) -> Self {
        let message = message.to_string();
        Error::Generic(message)
    }

    pub fn validation(message: impl ToString) -> Self {
        let message = message.to_string();
        Error::Validation(message)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Self::Generic(value.to_string())
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Self::Generic(value)
    }
}

impl From<eip1193::Error> for Error {
    fn from(error: eip1193::Error) -> Self {
        match error {
            eip1193::Error::ProviderUnavailable => Error::CapabilityUnavailable,
            eip1193::Error::Rejected { message, .. } => Error::Remote(message),
            eip1193::Error::Reverted(tx_hash) => {
                Error::Remote(format!("transaction {tx_hash} reverted"))
            }
            eip1193::Error::ConfirmationTimeout => Error::Timeout,
            other => Error::Generic(other.to_string()),
        }
    }
}

impl From<tamago_sdk::Error> for Error {
    fn from(error: tamago_sdk::Error) -> Self {
        match error {
            tamago_sdk::Error::Provider(inner) => inner.into(),
            tamago_sdk::Error::Abi(message) => Error::SchemaMismatch(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_to_the_taxonomy() {
        assert_eq!(
            Error::from(eip1193::Error::ProviderUnavailable),
            Error::CapabilityUnavailable
        );
        assert_eq!(
            Error::from(eip1193::Error::ConfirmationTimeout),
            Error::Timeout
        );
        assert_eq!(
            Error::from(eip1193::Error::Rejected {
                code: 4001,
                message: "User denied transaction signature.".into()
            }),
            Error::Remote("User denied transaction signature.".into())
        );
        assert!(matches!(
            Error::from(tamago_sdk::Error::Abi("type check failed".into())),
            Error::SchemaMismatch(_)
        ));
    }
}
