//! UI components of the payment terminal screen.

pub mod amount;
pub mod card;
pub mod component;
pub mod hint_bar;
pub mod pay_button;

pub use amount::AmountComponent;
pub use card::CardComponent;
pub use component::Component;
pub use hint_bar::HintBarComponent;
pub use pay_button::PayButtonComponent;
