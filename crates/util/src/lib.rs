//! Paydesk utilities: the masked money input editor, configuration loading
//! and text helpers shared by the API client, the TUI and the CLI.

pub mod config;
pub mod markup;
pub mod money_input;

pub use config::{ConfigError, PaydeskConfig, default_config_path};
pub use markup::strip_markup;
pub use money_input::{MoneyInput, TextField, Transition, transition};
