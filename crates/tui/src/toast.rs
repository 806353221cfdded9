//! Toast notifications for records found by the scanner.

use std::time::{Duration, Instant};

use paydesk_types::PushEvent;

use crate::app::Card;

/// Label of the single toast action (Ctrl+O).
pub const ACTION_LABEL: &str = "Show?";

/// A transient one-line notification with an action that opens its record.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub action: Card,
    pub expires_at: Instant,
}

impl Toast {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Text and target card for events that announce a record.
pub fn announcement(event: &PushEvent, currency_symbol: &str) -> Option<(String, Card)> {
    match event {
        PushEvent::Product(product) => {
            // A zero or missing price is left out.
            let price = product
                .current_price
                .filter(|price| price.0 != 0)
                .map(|price| format!(" ({})", price.with_symbol(currency_symbol)))
                .unwrap_or_default();
            Some((
                format!("Found product: '{}'{price}", product.name),
                Card::Product(product.clone()),
            ))
        }
        PushEvent::Account(account) => Some((
            format!("Found account: '{}'", account.name),
            Card::Account(account.clone()),
        )),
        PushEvent::QrCode { code } => Some((format!("New barcode scanned: '{code}'"), Card::QrCode(code.clone()))),
        _ => None,
    }
}

/// Decide whether `event` deserves a toast given the card on screen.
pub fn route(
    event: &PushEvent,
    shown: Option<&Card>,
    currency_symbol: &str,
    lifetime: Duration,
    now: Instant,
) -> Option<Toast> {
    if shown.is_some_and(|card| card.shows(event)) {
        return None;
    }
    let (message, action) = announcement(event, currency_symbol)?;
    Some(Toast {
        message,
        action,
        expires_at: now + lifetime,
    })
}
