use serde::{Deserialize, Serialize};
use web_sys::{js_sys, wasm_bindgen};

#[derive(thiserror::Error, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("No injected Ethereum provider is available!")]
    ProviderUnavailable,

    #[error("Request rejected ({code}): {message}")]
    Rejected { code: i32, message: String },

    #[error("Transaction {0} reverted")]
    Reverted(String),

    #[error("Timed out waiting for transaction confirmation")]
    ConfirmationTimeout,

    #[error("{0}")]
    Js(String),

    #[error("Serialization Error: {0}")]
    Serialization(String),

    #[error("{0}")]
    Generic(String),
}

impl Error {
    pub fn generic(value: impl std::fmt::Display) -> Self {
        Self::Generic(value.to_string())
    }

    /// Maps a value thrown by `request` into either a structured EIP-1193
    /// provider error (an object with `code` and `message`) or a plain JS error.
    pub fn rpc(value: wasm_bindgen::JsValue) -> Self {
        let code = js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("code"))
            .ok()
            .and_then(|code| code.as_f64());
        let message = js_sys::Reflect::get(&value, &wasm_bindgen::JsValue::from_str("message"))
            .ok()
            .and_then(|message| message.as_string());

        match (code, message) {
            (Some(code), Some(message)) => Error::Rejected {
                code: code as i32,
                message,
            },
            _ => value.into(),
        }
    }
}

impl From<wasm_bindgen::JsValue> for Error {
    fn from(error: wasm_bindgen::JsValue) -> Self {
        let message = js_sys::Error::from(error)
            .message()
            .as_string()
            .unwrap_or("unknown JS error".to_string());
        Error::Js(message)
    }
}

impl From<serde_wasm_bindgen::Error> for Error {
    fn from(error: serde_wasm_bindgen::Error) -> Self {
        let message = error.to_string();
        Error::Serialization(message)
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
