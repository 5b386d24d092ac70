use tracing::warn;
use web_sys::{
    js_sys,
    wasm_bindgen::{closure::Closure, JsCast, JsValue},
};

mod error;
mod provider;
mod types;

pub use error::Error;
pub use provider::{InjectedProvider, Provider, RECEIPT_POLL_INTERVAL};
pub use types::{parse_bytes, parse_quantity, TransactionReceipt, TransactionRequest};

pub struct Ethereum {}

impl Ethereum {
    fn injected() -> Option<JsValue> {
        web_sys::window()
            .and_then(|window| {
                js_sys::Reflect::get(&window, &JsValue::from_str("ethereum")).ok()
            })
            .filter(|ethereum| !ethereum.is_undefined() && !ethereum.is_null())
    }

    pub fn is_available() -> bool {
        Self::injected().is_some()
    }

    pub fn provider() -> Result<InjectedProvider, Error> {
        Self::injected()
            .map(InjectedProvider::from)
            .ok_or(Error::ProviderUnavailable)
    }

    /// Subscribes to a provider event such as `accountsChanged` or
    /// `chainChanged`. The listener lives for the lifetime of the page.
    pub fn on(event: &str, callback: impl Fn() + 'static) {
        let Some(ethereum) = Self::injected() else {
            warn!("cannot subscribe to '{event}': no injected provider");
            return;
        };

        let closure = Closure::<dyn Fn(JsValue)>::new(move |_payload: JsValue| callback());

        let subscribe = js_sys::Reflect::get(&ethereum, &JsValue::from_str("on"))
            .ok()
            .and_then(|on| on.dyn_into::<js_sys::Function>().ok());

        match subscribe {
            Some(on) => {
                let _ = on.call2(
                    &ethereum,
                    &JsValue::from_str(event),
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            None => warn!("provider does not support event subscriptions"),
        }
    }
}
