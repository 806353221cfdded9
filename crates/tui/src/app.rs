//! Application state and logic for the payment terminal.
//!
//! `App` is the pure core of the TUI: it owns the amount field, the card
//! panel, the pay button and the toast, reacts to [`Msg`]s and asks the
//! runtime for side effects through [`Effect`]s. Nothing in here touches the
//! terminal or the network.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use paydesk_types::{AccountRecord, Cents, FieldState, ProductRecord, PushEvent, Selection};
use paydesk_util::{MoneyInput, PaydeskConfig, TextField};
use tracing::{debug, info, warn};

use crate::toast::{self, Toast};

/// The amount shown when the terminal starts.
const INITIAL_AMOUNT: &str = "0.00";

/// The record currently shown in the card panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Card {
    Account(AccountRecord),
    Product(ProductRecord),
    QrCode(String),
    NfcCard { id: String, name: String, writeable: bool },
}

impl Card {
    /// Whether this card already shows the record `event` refers to.
    pub fn shows(&self, event: &PushEvent) -> bool {
        match (self, event) {
            (Card::Account(shown), PushEvent::Account(incoming)) => shown.id == incoming.id,
            (Card::Product(shown), PushEvent::Product(incoming)) => shown.id == incoming.id,
            (Card::QrCode(shown), PushEvent::QrCode { code }) => shown == code,
            (Card::NfcCard { id: shown, .. }, PushEvent::NfcCard { id, .. }) => shown == id,
            _ => false,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Card::Account(_) => "Account",
            Card::Product(_) => "Product",
            Card::QrCode(_) => "Barcode",
            Card::NfcCard { .. } => "NFC card",
        }
    }
}

/// Outcome shown briefly on the pay button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub until: Instant,
}

/// State of the pay button.
///
/// `loading` and `flash` are independent: a request can fail while the
/// terminal still waits for the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PayButton {
    pub loading: bool,
    pub flash: Option<Flash>,
}

/// Result of redeeming a payment token.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    /// The backend booked the payment and returned the updated account.
    Accepted(AccountRecord),
    /// The backend answered `200 OK` but the body was not an account.
    ///
    /// The payment is booked all the same.
    AcceptedUnreadable(String),
    /// The backend answered with a non-success status.
    Rejected(String),
    /// The request never got an answer.
    Failed(String),
}

/// Messages that update the application state.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Periodic tick used to expire toasts and flashes.
    Tick,
    /// Terminal resized.
    Resize(u16, u16),
    /// A notification from the push stream.
    Push(PushEvent),
    /// `POST /request-payment-token` could not be sent.
    PaymentTokenRequestFailed(String),
    /// The payment request finished.
    PaymentCompleted(PaymentOutcome),
}

/// Side effects requested by state changes, executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RequestPaymentToken(Cents),
    Pay { amount: Cents, token: String },
    Reauthenticate,
}

/// The terminal's amount input: a plain text buffer with a selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmountField {
    state: FieldState,
}

impl AmountField {
    pub fn new(text: &str) -> Self {
        Self {
            state: FieldState::with_caret(text, text.chars().count()),
        }
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn move_left(&mut self) {
        let Selection { start, end } = self.state.selection;
        let caret = if start == end { start.saturating_sub(1) } else { start };
        self.state.selection = Selection::caret(caret);
    }

    pub fn move_right(&mut self) {
        let Selection { start, end } = self.state.selection;
        let caret = if start == end { (end + 1).min(self.state.len()) } else { end };
        self.state.selection = Selection::caret(caret);
    }

    pub fn move_home(&mut self) {
        self.state.selection = Selection::caret(0);
    }

    pub fn move_end(&mut self) {
        self.state.selection = Selection::caret(self.state.len());
    }

    pub fn select_all(&mut self) {
        self.state.selection = Selection::new(0, self.state.len());
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        let Selection { start, end } = self.state.selection;
        if start == end && start > 0 {
            self.remove_range(start - 1, start);
        } else {
            self.remove_range(start, end);
        }
    }

    /// Delete the selection, or the character after the caret.
    pub fn delete(&mut self) {
        let Selection { start, end } = self.state.selection;
        if start == end {
            self.remove_range(start, (start + 1).min(self.state.len()));
        } else {
            self.remove_range(start, end);
        }
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let text: String = self
            .state
            .text
            .chars()
            .enumerate()
            .filter(|(index, _)| *index < start || *index >= end)
            .map(|(_, c)| c)
            .collect();
        self.state = FieldState::with_caret(text, start);
    }
}

impl TextField for AmountField {
    fn text(&self) -> &str {
        &self.state.text
    }

    fn set_text(&mut self, text: String) {
        self.state.text = text;
        self.state.selection = self.state.selection.clamp(self.state.len());
    }

    fn selection(&self) -> Selection {
        self.state.selection
    }

    fn set_selection(&mut self, selection: Selection) {
        self.state.selection = selection.clamp(self.state.len());
    }
}

/// The main application state.
pub struct App {
    pub config: PaydeskConfig,
    /// Backend the terminal talks to, shown in the title bar.
    pub base_url: String,
    pub amount: MoneyInput<AmountField>,
    pub card: Option<Card>,
    pub pay_button: PayButton,
    pub toast: Option<Toast>,
    /// Animation frame for the waiting indicator.
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: PaydeskConfig, base_url: impl Into<String>) -> Result<Self> {
        let mut amount =
            MoneyInput::attach(AmountField::new(INITIAL_AMOUNT)).context("amount field rejected the money editor")?;
        amount.on_focus();
        Ok(Self {
            config,
            base_url: base_url.into(),
            amount,
            card: None,
            pay_button: PayButton::default(),
            toast: None,
            throbber_idx: 0,
            should_quit: false,
        })
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.config.flash_millis)
    }

    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(self.config.toast_seconds)
    }

    /// Whether anything on screen changes without input.
    pub fn is_animating(&self) -> bool {
        self.pay_button.loading || self.pay_button.flash.is_some() || self.toast.is_some()
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        self.update_at(msg, Instant::now())
    }

    /// Apply `msg` as if it arrived at `now`.
    pub fn update_at(&mut self, msg: Msg, now: Instant) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.expire(now);
                if self.pay_button.loading {
                    self.throbber_idx = self.throbber_idx.wrapping_add(1);
                }
                Vec::new()
            }
            Msg::Resize(..) => Vec::new(),
            Msg::Push(event) => self.handle_push(event, now),
            Msg::PaymentTokenRequestFailed(error) => {
                warn!(%error, "payment token request failed");
                self.pay_button.loading = false;
                self.flash(FlashKind::Error, now);
                Vec::new()
            }
            Msg::PaymentCompleted(outcome) => self.handle_payment_outcome(outcome, now),
        }
    }

    /// Enter: start waiting for the reader, or stop waiting.
    pub fn press_pay(&mut self) -> Vec<Effect> {
        self.press_pay_at(Instant::now())
    }

    pub fn press_pay_at(&mut self, now: Instant) -> Vec<Effect> {
        if self.pay_button.loading {
            debug!("payment cancelled");
            self.pay_button.loading = false;
            return Vec::new();
        }

        let Some(amount) = self.current_amount() else {
            self.flash(FlashKind::Error, now);
            return Vec::new();
        };
        info!(%amount, "requesting payment token");
        self.pay_button.loading = true;
        self.throbber_idx = 0;
        vec![Effect::RequestPaymentToken(amount)]
    }

    /// Ctrl+O: show the record the toast announced.
    pub fn take_toast_action(&mut self) {
        if let Some(toast) = self.toast.take() {
            self.card = Some(toast.action);
        }
    }

    pub fn dismiss_toast(&mut self) {
        self.toast = None;
    }

    /// The amount field converted to cents.
    pub fn current_amount(&self) -> Option<Cents> {
        Cents::from_amount_text(self.amount.field().text())
    }

    fn handle_push(&mut self, event: PushEvent, now: Instant) -> Vec<Effect> {
        debug!(kind = event.kind(), "push event");
        if let Some(toast) = toast::route(&event, self.card.as_ref(), &self.config.currency_symbol, self.toast_duration(), now) {
            self.toast = Some(toast);
        }

        match event {
            PushEvent::Account(account) => self.card = Some(Card::Account(account)),
            PushEvent::Product(product) => self.card = Some(Card::Product(product)),
            PushEvent::QrCode { code } => self.card = Some(Card::QrCode(code)),
            PushEvent::NfcCard { id, name, writeable } => self.card = Some(Card::NfcCard { id, name, writeable }),
            PushEvent::RemoveNfcCard => self.card = None,
            PushEvent::PaymentToken { token } => match self.current_amount() {
                Some(amount) => return vec![Effect::Pay { amount, token }],
                None => {
                    warn!("payment token arrived but the amount is not a number");
                    self.pay_button.loading = false;
                    self.flash(FlashKind::Error, now);
                }
            },
            PushEvent::Timeout => {
                info!("payment timed out");
                self.pay_button.loading = false;
                self.flash(FlashKind::Error, now);
            }
        }
        Vec::new()
    }

    fn handle_payment_outcome(&mut self, outcome: PaymentOutcome, now: Instant) -> Vec<Effect> {
        self.pay_button.loading = false;
        match outcome {
            PaymentOutcome::Accepted(account) => {
                self.flash(FlashKind::Success, now);
                self.card = Some(Card::Account(account));
                vec![Effect::Reauthenticate]
            }
            PaymentOutcome::AcceptedUnreadable(error) => {
                warn!(%error, "payment booked but the response could not be read");
                self.flash(FlashKind::Success, now);
                vec![Effect::Reauthenticate]
            }
            PaymentOutcome::Rejected(status) => {
                warn!(%status, "payment rejected");
                self.flash(FlashKind::Error, now);
                vec![Effect::Reauthenticate]
            }
            PaymentOutcome::Failed(error) => {
                warn!(%error, "payment failed");
                self.flash(FlashKind::Error, now);
                Vec::new()
            }
        }
    }

    fn flash(&mut self, kind: FlashKind, now: Instant) {
        self.pay_button.flash = Some(Flash {
            kind,
            until: now + self.flash_duration(),
        });
    }

    fn expire(&mut self, now: Instant) {
        if self.pay_button.flash.is_some_and(|flash| now >= flash.until) {
            self.pay_button.flash = None;
        }
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.toast = None;
        }
    }
}
