#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Provider(#[from] eip1193::Error),

    /// Return data did not match the compiled contract interface.
    #[error("ABI mismatch: {0}")]
    Abi(String),
}

impl Error {
    pub fn abi(error: alloy_sol_types::Error) -> Self {
        Error::Abi(error.to_string())
    }
}
