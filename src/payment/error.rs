//! Error taxonomy for the payment stack.
//!
//! The first three variants are the remote family (bad status, transport
//! failure, undecodable body). Wallet-side failures carry their provider
//! message unless they smell like a user rejection, which normalizes to
//! [`PaymentError::UserRejected`] so the UI can treat it as a non-event.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Non-2xx from the intent service. The message is the provider's own
    /// when the body carried one.
    #[error("payment service error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The request never completed (DNS, TLS, connection reset). Single-shot
    /// calls, so this surfaces immediately; retrying is the caller's call.
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx with a body we could not decode.
    #[error("malformed gateway response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// `wait_receipt` ran out of time. The intent may still settle later;
    /// `poll_receipt` remains the only way to find out.
    #[error("no receipt after {waited_ms} ms for intent {intent_id}")]
    Timeout { intent_id: String, waited_ms: u64 },

    #[error("wallet is not connected")]
    NotConnected,

    #[error("no wallet provider detected in this environment")]
    NoWalletDetected,

    #[error("rejected by user")]
    UserRejected,

    /// Provider-side wallet failure that is not a rejection.
    #[error("wallet provider error: {0}")]
    Wallet(String),
}

/// Folds rejection-flavored provider/service messages into the distinguished
/// [`PaymentError::UserRejected`]; everything else passes through unchanged.
pub fn normalize_user_rejection(err: PaymentError) -> PaymentError {
    let message = match &err {
        PaymentError::Remote { message, .. } => message,
        PaymentError::Wallet(message) => message,
        _ => return err,
    };
    let lower = message.to_lowercase();
    if lower.contains("reject") || lower.contains("denied") || lower.contains("user cancel") {
        PaymentError::UserRejected
    } else {
        err
    }
}
