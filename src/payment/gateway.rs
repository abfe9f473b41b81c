//! Typed client for the cross-chain intent service.
//!
//! Every endpoint is a single-shot JSON POST authenticated with both a
//! bearer token and an API key. There is no automatic retry anywhere; a
//! transient failure surfaces to the caller immediately. The four lifecycle
//! calls live behind [`IntentApi`] so the purchase orchestrator can run
//! against a scripted double in tests; catalog and history queries are
//! inherent methods on the concrete client.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::PaymentError;
use super::types::{
    ChainInfo, CommitAck, CommitRequest, EmptyRequest, ExecuteAck, ExecuteRequest, Intent,
    IntentLookupRequest, IntentPage, IntentReceipt, Quote, QuoteRequest, SearchIntentsRequest,
    TokenInfo, TokenPrice,
};

/// Default spacing between receipt polls.
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 2_000;
/// Default ceiling on the whole poll loop.
pub const RECEIPT_TIMEOUT_MS: u64 = 300_000;

/// The intent lifecycle: quote a transfer, lock its rate, trigger it, watch
/// it settle. `wait_receipt` is a blocking helper over `poll_receipt`; the
/// timeout is not a cancellation — the intent may still settle upstream.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait IntentApi {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, PaymentError>;

    async fn commit(&self, intent: &Intent) -> Result<CommitAck, PaymentError>;

    async fn execute(
        &self,
        intent_id: &str,
        signature: Option<&str>,
    ) -> Result<ExecuteAck, PaymentError>;

    async fn poll_receipt(&self, intent_id: &str) -> Result<IntentReceipt, PaymentError>;

    async fn wait_receipt(
        &self,
        intent_id: &str,
        timeout_ms: u64,
        poll_interval_ms: u64,
    ) -> Result<IntentReceipt, PaymentError> {
        let mut waited_ms = 0u64;
        loop {
            let receipt = self.poll_receipt(intent_id).await?;
            if receipt.status.is_terminal() {
                return Ok(receipt);
            }
            if waited_ms >= timeout_ms {
                return Err(PaymentError::Timeout {
                    intent_id: intent_id.to_string(),
                    waited_ms,
                });
            }
            futures_timer::Delay::new(Duration::from_millis(poll_interval_ms)).await;
            waited_ms = waited_ms.saturating_add(poll_interval_ms);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// CLIENT
// ═══════════════════════════════════════════════════════════════════════

pub struct PaymentGateway {
    client: Client,
    base_url: String,
    api_key: String,
    bearer_token: String,
}

impl PaymentGateway {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        bearer_token: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            bearer_token: bearer_token.into(),
        }
    }

    // ── Read-only catalog and history queries ──────────────────────────

    pub async fn get_intent(&self, intent_id: &str) -> Result<Intent, PaymentError> {
        self.post_json("/v1/getIntent", &IntentLookupRequest { intent_id })
            .await
    }

    pub async fn search_intents(
        &self,
        request: &SearchIntentsRequest,
    ) -> Result<IntentPage, PaymentError> {
        self.post_json("/v1/searchIntents", request).await
    }

    pub async fn get_chains(&self) -> Result<Vec<ChainInfo>, PaymentError> {
        self.post_json("/v1/getChains", &EmptyRequest {}).await
    }

    pub async fn get_token_list(&self) -> Result<Vec<TokenInfo>, PaymentError> {
        self.post_json("/v1/getTokenList", &EmptyRequest {}).await
    }

    pub async fn get_token_prices(&self) -> Result<Vec<TokenPrice>, PaymentError> {
        self.post_json("/v1/getTokenPrices", &EmptyRequest {}).await
    }

    // ── Plumbing ───────────────────────────────────────────────────────

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, PaymentError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("authorization", format!("Bearer {}", self.bearer_token))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(remote_error(status.as_u16(), &bytes));
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl IntentApi for PaymentGateway {
    async fn quote(&self, request: &QuoteRequest) -> Result<Quote, PaymentError> {
        self.post_json("/v1/quoteIntent", request).await
    }

    async fn commit(&self, intent: &Intent) -> Result<CommitAck, PaymentError> {
        self.post_json("/v1/commitIntent", &CommitRequest { intent })
            .await
    }

    async fn execute(
        &self,
        intent_id: &str,
        signature: Option<&str>,
    ) -> Result<ExecuteAck, PaymentError> {
        self.post_json(
            "/v1/executeIntent",
            &ExecuteRequest {
                intent_id,
                signature,
            },
        )
        .await
    }

    async fn poll_receipt(&self, intent_id: &str) -> Result<IntentReceipt, PaymentError> {
        self.post_json("/v1/getIntentReceipt", &IntentLookupRequest { intent_id })
            .await
    }
}

/// Boxed form the orchestrator holds; `Send + Sync` bounds apply to the
/// client value itself, not its (wasm-local) futures.
pub type BoxedIntentApi = Box<dyn IntentApi + Send + Sync>;

// ═══════════════════════════════════════════════════════════════════════
// ERROR BODY DECODING
// ═══════════════════════════════════════════════════════════════════════

/// Shape most provider error bodies take; both spellings observed.
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Surfaces the provider's own message verbatim when the body carries one,
/// else a generic status-coded message.
fn remote_error(status: u16, body: &[u8]) -> PaymentError {
    let message = serde_json::from_slice::<ProviderError>(body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .unwrap_or_else(|| format!("request failed with status {status}"));
    PaymentError::Remote { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_is_surfaced_verbatim() {
        let err = remote_error(422, br#"{"message":"unsupported chain 777"}"#);
        match err {
            PaymentError::Remote { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "unsupported chain 777");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn error_field_spelling_is_accepted_too() {
        let err = remote_error(400, br#"{"error":"no route found"}"#);
        match err {
            PaymentError::Remote { message, .. } => assert_eq!(message, "no route found"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unparseable_bodies_get_a_status_coded_message() {
        let err = remote_error(502, b"<html>Bad Gateway</html>");
        match err {
            PaymentError::Remote { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "request failed with status 502");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
