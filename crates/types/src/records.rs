//! Backend records and request/response payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};

use crate::Cents;

/// An account as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub name: String,
    /// Current balance.
    #[serde(default)]
    pub credit: Cents,
    #[serde(default)]
    pub mail: Option<String>,
    #[serde(default)]
    pub permission: Option<String>,
}

/// A product as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub current_price: Option<Cents>,
    #[serde(default)]
    pub category: Option<String>,
}

/// One row of the account search endpoint.
///
/// The `*_search` fields are pre-rendered by the server and may contain
/// highlight markup around the matched substring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub name_search: String,
    #[serde(default)]
    pub mail_search: String,
    #[serde(default)]
    pub permission: String,
    #[serde(default)]
    pub permission_search: String,
}

impl AccountRow {
    /// Default-permission accounts show an empty permission column.
    pub fn shows_permission(&self) -> bool {
        self.permission != "DEFAULT"
    }
}

/// One row of the product search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub name_search: String,
    #[serde(default)]
    pub category_search: String,
    #[serde(default)]
    pub current_price_search: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One row of the category search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: String,
    pub name_search: String,
    #[serde(default)]
    pub current_price_search: String,
}

/// Body of `POST /request-payment-token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTokenRequest {
    pub amount: Cents,
}

/// Body of `POST /api/v1/transaction/payment`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Cents,
    pub token: String,
    /// Purchased products by id; the terminal always sends an empty map.
    #[serde(default)]
    pub products: JsonMap<String, Value>,
}

impl PaymentRequest {
    pub fn new(amount: Cents, token: impl Into<String>) -> Self {
        Self {
            amount,
            token: token.into(),
            products: JsonMap::new(),
        }
    }
}

/// Successful payment response carrying the updated account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub account: AccountRecord,
}
