//! # Paydesk terminal UI
//!
//! A payment-terminal screen for the Paydesk backend, built on Ratatui and
//! Crossterm:
//!
//! - an amount field driven by the masked money editor
//! - a pay button that requests a payment token and redeems it when the
//!   reader delivers one
//! - a card panel showing the last scanned account, product, barcode or NFC
//!   card
//! - toasts announcing records found by the scanner
//!
//! The state lives in [`app::App`] and changes only through messages; the
//! runtime in `ui::runtime` owns the terminal, the push stream and the
//! network tasks.

pub mod app;
mod cmd;
pub mod toast;
mod ui;

use anyhow::Result;
use paydesk_api::PaydeskClient;
use paydesk_util::PaydeskConfig;

/// Run the payment terminal until the user quits.
///
/// # Errors
///
/// Fails when the terminal cannot be switched to raw mode or the alternate
/// screen, or when drawing fails.
pub async fn run(config: PaydeskConfig, client: PaydeskClient) -> Result<()> {
    ui::runtime::run_app(config, client).await
}
