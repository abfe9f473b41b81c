//! Wire types for the cross-chain intent service.
//!
//! Field names follow the service's camelCase JSON. Currency amounts travel
//! as exact base-unit integer strings, never floats.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// INTENT LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════

/// One requested cross-chain value transfer, as minted by the quote step.
/// Immutable once committed; settlement progress lives in [`IntentReceipt`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Intent {
    pub intent_id: String,
    pub origin_chain_id: u64,
    pub destination_chain_id: u64,
    pub origin_token: String,
    pub destination_token: String,
    pub origin_amount: String,
    pub destination_amount: String,
    pub owner: String,
    pub recipient: String,
    /// Quote validity deadline, epoch seconds. Not checked client-side; an
    /// expired commit fails server-side.
    pub expires_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Refunded,
}

impl IntentStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            IntentStatus::Completed | IntentStatus::Failed | IntentStatus::Refunded
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            IntentStatus::Pending => "pending",
            IntentStatus::Processing => "processing",
            IntentStatus::Completed => "completed",
            IntentStatus::Failed => "failed",
            IntentStatus::Refunded => "refunded",
        }
    }
}

/// Settlement status of one committed intent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentReceipt {
    pub intent_id: String,
    pub status: IntentStatus,
    #[serde(default)]
    pub origin_tx_hash: Option<String>,
    #[serde(default)]
    pub destination_tx_hash: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ═══════════════════════════════════════════════════════════════════════
// REQUESTS
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TradeType {
    /// The origin amount is fixed; the destination amount floats.
    ExactInput,
    /// The destination amount is fixed; the origin amount floats.
    ExactOutput,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub owner: String,
    pub origin_chain_id: u64,
    pub origin_token: String,
    pub amount: String,
    pub destination_chain_id: u64,
    pub destination_token: String,
    pub recipient: String,
    pub trade_type: TradeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_bps: Option<u32>,
    /// Routing hint: pin the quote to a specific bridge/filler.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Optional contract call to run on the destination after delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calldata: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CommitRequest<'a> {
    pub intent: &'a Intent,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest<'a> {
    pub intent_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentLookupRequest<'a> {
    pub intent_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchIntentsRequest {
    pub owner: String,
    pub limit: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IntentStatus>,
}

#[derive(Debug, Serialize)]
pub struct EmptyRequest {}

// ═══════════════════════════════════════════════════════════════════════
// RESPONSES
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub name: String,
    pub amount: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    pub provider: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub intent: Intent,
    pub origin_amount: String,
    pub destination_amount: String,
    #[serde(default)]
    pub fees: Vec<Fee>,
    /// Fractional price impact of the route, e.g. 0.0008.
    #[serde(default)]
    pub price_impact: f64,
    /// Estimated seconds to settlement.
    #[serde(rename = "eta", default)]
    pub eta_seconds: u64,
    #[serde(default)]
    pub route: Vec<RouteStep>,
}

/// The rate lock returned by the commit step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAck {
    pub intent_id: String,
    pub expires_at: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteAck {
    pub tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentPage {
    pub intents: Vec<Intent>,
    pub total: u64,
}

// ── Catalog data ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: String,
    pub native_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub chain_id: u64,
    pub address: String,
    pub symbol: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    pub chain_id: u64,
    pub address: String,
    pub usd: f64,
}

// ═══════════════════════════════════════════════════════════════════════
// AMOUNT FORMATTING
// ═══════════════════════════════════════════════════════════════════════

/// Display price → exact base-unit integer string (0.99 with 6 decimals →
/// "990000"). Negative or non-finite inputs collapse to "0".
pub fn base_units(amount: f64, decimals: u32) -> String {
    if !amount.is_finite() || amount <= 0.0 {
        return "0".to_string();
    }
    let scaled = (amount * 10f64.powi(decimals as i32)).round();
    (scaled as u128).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_units_are_exact() {
        assert_eq!(base_units(0.99, 6), "990000");
        assert_eq!(base_units(4.99, 6), "4990000");
        assert_eq!(base_units(1.0, 18), "1000000000000000000");
        assert_eq!(base_units(0.0, 6), "0");
        assert_eq!(base_units(-2.0, 6), "0");
    }

    #[test]
    fn receipt_parses_provider_json() {
        let json = r#"{
            "intentId": "int_123",
            "status": "processing",
            "originTxHash": "0xabc"
        }"#;
        let receipt: IntentReceipt = serde_json::from_str(json).unwrap();
        assert_eq!(receipt.intent_id, "int_123");
        assert_eq!(receipt.status, IntentStatus::Processing);
        assert_eq!(receipt.origin_tx_hash.as_deref(), Some("0xabc"));
        assert!(receipt.destination_tx_hash.is_none());
        assert!(!receipt.status.is_terminal());
    }

    #[test]
    fn terminal_statuses() {
        assert!(IntentStatus::Completed.is_terminal());
        assert!(IntentStatus::Failed.is_terminal());
        assert!(IntentStatus::Refunded.is_terminal());
        assert!(!IntentStatus::Pending.is_terminal());
        assert!(!IntentStatus::Processing.is_terminal());
    }

    #[test]
    fn quote_request_uses_camel_case_wire_names() {
        let req = QuoteRequest {
            owner: "0xowner".into(),
            origin_chain_id: 8453,
            origin_token: "0xusdc".into(),
            amount: "990000".into(),
            destination_chain_id: 8453,
            destination_token: "0xusdc".into(),
            recipient: "0xtreasury".into(),
            trade_type: TradeType::ExactInput,
            slippage_bps: Some(50),
            provider: None,
            calldata: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["originChainId"], 8453);
        assert_eq!(json["tradeType"], "exactInput");
        assert_eq!(json["slippageBps"], 50);
        assert!(json.get("provider").is_none());
    }
}
