//! Notifications delivered over the server-push event stream.

use serde::{Deserialize, Serialize};

use crate::{AccountRecord, ProductRecord};

/// A single push notification.
///
/// On the wire each event is a JSON object with a kebab-case `type` tag and
/// an optional `content` payload, e.g.
/// `{"type": "qr-code", "content": {"code": "4006381333931"}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum PushEvent {
    /// An account was identified (card, barcode or manual lookup).
    Account(AccountRecord),
    /// A product was identified.
    Product(ProductRecord),
    /// A barcode / QR code was scanned that matched nothing.
    QrCode { code: String },
    /// An NFC card was placed on the reader.
    NfcCard { id: String, name: String, writeable: bool },
    /// The NFC card was removed from the reader.
    RemoveNfcCard,
    /// The reader produced a payment token for the pending amount.
    PaymentToken { token: String },
    /// The pending payment-token request timed out.
    Timeout,
}

impl PushEvent {
    /// The wire tag of this event, useful for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Account(_) => "account",
            Self::Product(_) => "product",
            Self::QrCode { .. } => "qr-code",
            Self::NfcCard { .. } => "nfc-card",
            Self::RemoveNfcCard => "remove-nfc-card",
            Self::PaymentToken { .. } => "payment-token",
            Self::Timeout => "timeout",
        }
    }
}
