//! # Effect execution
//!
//! Translates [`Effect`]s requested by the pure [`App`](crate::app::App)
//! into backend calls. Every effect runs on its own task; tasks whose result
//! matters to the UI resolve to a [`Msg`] that the runtime feeds back into
//! the app.

use paydesk_api::{ApiError, PaydeskClient};
use paydesk_types::PaymentResponse;
use tokio::task::{JoinHandle, spawn};
use tracing::warn;

use crate::app::{Effect, Msg, PaymentOutcome};

/// Spawn one task per effect.
pub fn spawn_effects(client: &PaydeskClient, effects: Vec<Effect>) -> Vec<JoinHandle<Option<Msg>>> {
    effects
        .into_iter()
        .map(|effect| spawn_effect(client.clone(), effect))
        .collect()
}

fn spawn_effect(client: PaydeskClient, effect: Effect) -> JoinHandle<Option<Msg>> {
    match effect {
        Effect::RequestPaymentToken(amount) => spawn(async move {
            client
                .request_payment_token(amount)
                .await
                .err()
                .map(|error| Msg::PaymentTokenRequestFailed(error.to_string()))
        }),
        Effect::Pay { amount, token } => spawn(async move {
            let result = client.pay(amount, &token).await;
            Some(Msg::PaymentCompleted(payment_outcome(result)))
        }),
        Effect::Reauthenticate => spawn(async move {
            if let Err(error) = client.reauthenticate().await {
                warn!(%error, "reauthentication failed");
            }
            None
        }),
    }
}

/// Classify the result of a payment request for the UI.
pub fn payment_outcome(result: Result<PaymentResponse, ApiError>) -> PaymentOutcome {
    match result {
        Ok(response) => PaymentOutcome::Accepted(response.account),
        // `pay` only decodes after a `200 OK`.
        Err(ApiError::Decode(error)) => PaymentOutcome::AcceptedUnreadable(error.to_string()),
        Err(ApiError::Status { status, .. }) => PaymentOutcome::Rejected(status.to_string()),
        Err(error) => PaymentOutcome::Failed(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paydesk_types::{AccountRecord, Cents};
    use reqwest::StatusCode;

    #[test]
    fn classifies_payment_results() {
        let account = AccountRecord {
            id: "a1".into(),
            name: "Alice".into(),
            credit: Cents(-250),
            mail: None,
            permission: None,
        };
        assert_eq!(
            payment_outcome(Ok(PaymentResponse { account: account.clone() })),
            PaymentOutcome::Accepted(account)
        );

        let rejected = payment_outcome(Err(ApiError::Status {
            status: StatusCode::PAYMENT_REQUIRED,
            body: String::new(),
        }));
        assert_eq!(rejected, PaymentOutcome::Rejected("402 Payment Required".into()));

        let decode_error = serde_json::from_str::<PaymentResponse>("{}").unwrap_err();
        assert!(matches!(
            payment_outcome(Err(ApiError::Decode(decode_error))),
            PaymentOutcome::AcceptedUnreadable(_)
        ));

        let invalid = ApiError::InvalidBaseUrl {
            url: "ftp://x".into(),
            reason: "unsupported scheme".into(),
        };
        assert!(matches!(payment_outcome(Err(invalid)), PaymentOutcome::Failed(_)));
    }
}
