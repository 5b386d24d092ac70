use crate::{
    types::{parse_bytes, parse_quantity, TransactionReceipt, TransactionRequest},
    Error,
};
use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use send_wrapper::SendWrapper;
use serde::de::DeserializeOwned;
use std::{rc::Rc, str::FromStr, time::Duration};
use tracing::{debug, trace};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    js_sys,
    wasm_bindgen::{JsCast, JsValue},
};

pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(4);

/// The capability surface the UI flows depend on. Implemented by the injected
/// browser provider, and by test doubles.
#[async_trait(?Send)]
pub trait Provider {
    async fn request_accounts(&self) -> Result<Vec<Address>, Error>;

    async fn balance(&self, account: Address) -> Result<U256, Error>;

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error>;

    /// Submits a signed transaction through the wallet and returns its hash.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, Error>;

    async fn transaction_receipt(&self, tx_hash: &str)
        -> Result<Option<TransactionReceipt>, Error>;

    /// Polls until the transaction is mined or `timeout` elapses. A mined
    /// receipt with a failure status becomes `Error::Reverted`.
    async fn wait_for_transaction(
        &self,
        tx_hash: &str,
        timeout: Duration,
    ) -> Result<TransactionReceipt, Error> {
        let deadline = js_sys::Date::now() + timeout.as_millis() as f64;

        loop {
            if let Some(receipt) = self.transaction_receipt(tx_hash).await? {
                debug!("{receipt:?}");
                return match receipt.succeeded() {
                    true => Ok(receipt),
                    false => Err(Error::Reverted(tx_hash.to_string())),
                };
            }
            if js_sys::Date::now() > deadline {
                return Err(Error::ConfirmationTimeout);
            }
            sleep(RECEIPT_POLL_INTERVAL).await;
        }
    }
}

/// The `window.ethereum` object itself.
#[derive(Debug, Clone)]
pub struct InjectedProvider {
    inner: SendWrapper<Rc<JsValue>>,
}

impl From<JsValue> for InjectedProvider {
    fn from(value: JsValue) -> Self {
        Self {
            inner: SendWrapper::new(Rc::new(value)),
        }
    }
}

impl InjectedProvider {
    /// One round trip of `ethereum.request({ method, params })`.
    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: js_sys::Array,
    ) -> Result<T, Error> {
        let inner = self.inner.clone();

        SendWrapper::new(async move {
            trace!("eip-1193 request: {method}");

            let args = js_sys::Object::new();
            js_sys::Reflect::set(&args, &JsValue::from_str("method"), &JsValue::from_str(method))?;
            js_sys::Reflect::set(&args, &JsValue::from_str("params"), &params)?;

            let request = js_sys::Reflect::get(&inner, &JsValue::from_str("request"))?;
            let request: js_sys::Function = request
                .dyn_into()
                .map_err(|_| Error::Generic("provider.request is not a function".into()))?;

            let promise: js_sys::Promise = request.call1(&inner, &args)?.dyn_into()?;
            let result = JsFuture::from(promise).await.map_err(Error::rpc)?;

            serde_wasm_bindgen::from_value(result).map_err(Into::into)
        })
        .await
    }
}

#[async_trait(?Send)]
impl Provider for InjectedProvider {
    async fn request_accounts(&self) -> Result<Vec<Address>, Error> {
        let accounts: Vec<String> = self
            .request("eth_requestAccounts", js_sys::Array::new())
            .await?;

        accounts
            .iter()
            .map(|account| {
                Address::from_str(account)
                    .map_err(|_| Error::Generic(format!("invalid account address: {account}")))
            })
            .collect()
    }

    async fn balance(&self, account: Address) -> Result<U256, Error> {
        let params = js_sys::Array::new();
        params.push(&JsValue::from_str(&account.to_string()));
        params.push(&JsValue::from_str("latest"));

        let balance: String = self.request("eth_getBalance", params).await?;
        parse_quantity(&balance)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Error> {
        let request = TransactionRequest::call(to, data);

        let params = js_sys::Array::new();
        params.push(&serde_wasm_bindgen::to_value(&request)?);
        params.push(&JsValue::from_str("latest"));

        let data: String = self.request("eth_call", params).await?;
        parse_bytes(&data)
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<String, Error> {
        let params = js_sys::Array::new();
        params.push(&serde_wasm_bindgen::to_value(&tx)?);

        self.request("eth_sendTransaction", params).await
    }

    async fn transaction_receipt(
        &self,
        tx_hash: &str,
    ) -> Result<Option<TransactionReceipt>, Error> {
        let params = js_sys::Array::new();
        params.push(&JsValue::from_str(tx_hash));

        self.request("eth_getTransactionReceipt", params).await
    }
}

/// Resolves after `duration`, scheduled on the browser event loop.
async fn sleep(duration: Duration) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .expect("no window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                duration.as_millis() as i32,
            )
            .expect("setTimeout failed");
    });
    let _ = JsFuture::from(promise).await;
}
