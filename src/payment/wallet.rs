//! Wallet session management.
//!
//! The connector itself is plain data (address + chain id) so it can sit in
//! a shared resource; actually reaching the signing provider happens in the
//! cfg-split `provider` module below. In the browser that is the injected
//! EIP-1193 object (`window.ethereum`); native builds resolve a dev session
//! from the `COINFORGE_WALLET` environment variable or report that no
//! provider exists. Disconnecting only clears local state — revoking the
//! on-chain permission is outside this system's control.

use bevy::log::info;

use super::error::PaymentError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletSession {
    pub address: String,
    pub chain_id: u64,
}

#[derive(Debug, Default)]
pub struct WalletConnector {
    session: Option<WalletSession>,
}

impl WalletConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests access to the host environment's signing session. Re-connect
    /// while already connected is allowed and simply re-resolves the address.
    pub async fn connect(&mut self) -> Result<WalletSession, PaymentError> {
        let session = provider::connect().await?;
        self.attach(session.clone());
        Ok(session)
    }

    /// Adopts a session resolved elsewhere. The async glue resolves the
    /// provider outside the connector's lock and attaches the result here;
    /// headless tests attach directly.
    pub fn attach(&mut self, session: WalletSession) {
        info!(
            "[Wallet] Connected {} on chain {}",
            session.address, session.chain_id
        );
        self.session = Some(session);
    }

    pub fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            info!("[Wallet] Disconnected {}", session.address);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn address(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.address.as_str())
    }

    pub fn chain_id(&self) -> Result<u64, PaymentError> {
        self.session
            .as_ref()
            .map(|s| s.chain_id)
            .ok_or(PaymentError::NotConnected)
    }

    pub fn session(&self) -> Option<&WalletSession> {
        self.session.as_ref()
    }
}

/// Resolves a session from the host environment without touching any
/// connector state. Async glue code pairs this with [`WalletConnector::attach`].
pub async fn resolve_session() -> Result<WalletSession, PaymentError> {
    provider::connect().await
}

// ═══════════════════════════════════════════════════════════════════════
// PROVIDER ACCESS
// ═══════════════════════════════════════════════════════════════════════

#[cfg(target_arch = "wasm32")]
mod provider {
    use super::WalletSession;
    use crate::payment::error::{normalize_user_rejection, PaymentError};
    use js_sys::{Array, Function, Object, Promise, Reflect};
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;

    /// The EIP-1193 provider a browser wallet injects, if any.
    fn injected_provider() -> Option<JsValue> {
        let window = web_sys::window()?;
        let provider = Reflect::get(window.as_ref(), &JsValue::from_str("ethereum")).ok()?;
        if provider.is_undefined() || provider.is_null() {
            None
        } else {
            Some(provider)
        }
    }

    async fn request(provider: &JsValue, method: &str) -> Result<JsValue, PaymentError> {
        let request_fn: Function = Reflect::get(provider, &JsValue::from_str("request"))
            .ok()
            .and_then(|f| f.dyn_into().ok())
            .ok_or_else(|| PaymentError::Wallet("provider has no request()".into()))?;
        let args = Object::new();
        Reflect::set(
            &args,
            &JsValue::from_str("method"),
            &JsValue::from_str(method),
        )
        .map_err(|_| PaymentError::Wallet("could not build request args".into()))?;
        let promise: Promise = request_fn
            .call1(provider, &args)
            .map_err(js_error)?
            .dyn_into()
            .map_err(|_| PaymentError::Wallet(format!("{method} did not return a promise")))?;
        JsFuture::from(promise).await.map_err(js_error)
    }

    fn js_error(value: JsValue) -> PaymentError {
        // EIP-1193 reserves 4001 for "user rejected the request".
        let code = Reflect::get(&value, &JsValue::from_str("code"))
            .ok()
            .and_then(|c| c.as_f64());
        if code == Some(4001.0) {
            return PaymentError::UserRejected;
        }
        let message = Reflect::get(&value, &JsValue::from_str("message"))
            .ok()
            .and_then(|m| m.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        normalize_user_rejection(PaymentError::Wallet(message))
    }

    pub async fn connect() -> Result<WalletSession, PaymentError> {
        let provider = injected_provider().ok_or(PaymentError::NoWalletDetected)?;
        let accounts = request(&provider, "eth_requestAccounts").await?;
        let address = Array::from(&accounts)
            .get(0)
            .as_string()
            .ok_or_else(|| PaymentError::Wallet("provider returned no accounts".into()))?;
        let chain_hex = request(&provider, "eth_chainId")
            .await?
            .as_string()
            .ok_or_else(|| PaymentError::Wallet("provider returned no chain id".into()))?;
        let chain_id = u64::from_str_radix(chain_hex.trim_start_matches("0x"), 16)
            .map_err(|_| PaymentError::Wallet(format!("unparseable chain id {chain_hex}")))?;
        Ok(WalletSession { address, chain_id })
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod provider {
    use super::WalletSession;
    use crate::payment::error::PaymentError;

    /// Dev session for desktop builds: `COINFORGE_WALLET=0xaddress[@chainid]`.
    pub const DEV_WALLET_ENV: &str = "COINFORGE_WALLET";

    pub async fn connect() -> Result<WalletSession, PaymentError> {
        let raw = std::env::var(DEV_WALLET_ENV).map_err(|_| PaymentError::NoWalletDetected)?;
        let (address, chain) = raw.split_once('@').unwrap_or((raw.as_str(), "8453"));
        if address.is_empty() {
            return Err(PaymentError::NoWalletDetected);
        }
        let chain_id = chain
            .parse()
            .map_err(|_| PaymentError::Wallet(format!("unparseable chain id in {DEV_WALLET_ENV}")))?;
        Ok(WalletSession {
            address: address.to_string(),
            chain_id,
        })
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn queries_reflect_the_session() {
        let mut wallet = WalletConnector::new();
        assert!(!wallet.is_connected());
        assert!(wallet.address().is_none());
        assert!(matches!(wallet.chain_id(), Err(PaymentError::NotConnected)));

        wallet.attach(WalletSession {
            address: "0xabc".into(),
            chain_id: 8453,
        });
        assert!(wallet.is_connected());
        assert_eq!(wallet.address(), Some("0xabc"));
        assert_eq!(wallet.chain_id().unwrap(), 8453);

        wallet.disconnect();
        assert!(!wallet.is_connected());
    }

    #[test]
    fn connect_resolves_the_dev_session_or_reports_no_wallet() {
        // One test body: both cases mutate the same process-wide variable.
        std::env::set_var(provider::DEV_WALLET_ENV, "0xdeadbeef@10");
        let mut wallet = WalletConnector::new();
        let session = block_on(wallet.connect()).unwrap();
        assert_eq!(session.address, "0xdeadbeef");
        assert_eq!(session.chain_id, 10);
        assert!(wallet.is_connected());

        // Re-connect while connected re-resolves the address.
        std::env::set_var(provider::DEV_WALLET_ENV, "0xfeed@10");
        let session = block_on(wallet.connect()).unwrap();
        assert_eq!(session.address, "0xfeed");

        std::env::remove_var(provider::DEV_WALLET_ENV);
        let mut fresh = WalletConnector::new();
        assert!(matches!(
            block_on(fresh.connect()),
            Err(PaymentError::NoWalletDetected)
        ));
    }
}
