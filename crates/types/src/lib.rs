//! Shared type definitions for the Paydesk workspace.
//!
//! The types here are deliberately free of I/O: the editor core, the HTTP
//! adapters and the terminal UI all exchange these values.
//!
//! - [`FieldState`] / [`Selection`]: the text and caret of a money field
//! - [`KeyInput`] / [`MoneyKey`]: a classified keystroke with its modifiers
//! - [`Cents`]: integer money amounts and their two-decimal rendering
//! - [`PushEvent`]: notifications delivered over the server-push stream
//! - Records and search rows returned by the backend

mod events;
mod field;
mod key;
mod money;
mod records;

pub use events::PushEvent;
pub use field::{FieldState, Selection};
pub use key::{KeyDisposition, KeyInput, MoneyKey, StepKey};
pub use money::{Cents, parse_leading_float};
pub use records::{
    AccountRecord, AccountRow, CategoryRow, PaymentRequest, PaymentResponse, PaymentTokenRequest, ProductRecord,
    ProductRow,
};
