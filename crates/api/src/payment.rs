//! Payment-terminal requests.
//!
//! Paying is a two-step exchange. [`PaydeskClient::request_payment_token`]
//! asks the reader to collect a token for an amount; the token later arrives
//! as a `payment-token` push event and is redeemed with
//! [`PaydeskClient::pay`]. Afterwards the terminal session is renewed with
//! [`PaydeskClient::reauthenticate`].

use paydesk_types::{Cents, PaymentRequest, PaymentResponse, PaymentTokenRequest};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use crate::{ApiError, PaydeskClient, decode_json};

const PAYMENT_TARGET: &str = "paydesk_payment";

impl PaydeskClient {
    /// Ask the reader for a payment token covering `amount`.
    ///
    /// Only transport failures are errors; the token itself arrives on the
    /// push stream, or a `timeout` event does.
    pub async fn request_payment_token(&self, amount: Cents) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, "/request-payment-token")
            .json(&PaymentTokenRequest { amount })
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            debug!(target: PAYMENT_TARGET, %amount, "payment token requested");
        } else {
            warn!(target: PAYMENT_TARGET, %amount, %status, "payment token request was not accepted");
        }
        Ok(())
    }

    /// Redeem a payment token.
    ///
    /// Returns the updated account on `200 OK`; any other status is an
    /// [`ApiError::Status`]. A `200 OK` whose body is not a
    /// [`PaymentResponse`] is an [`ApiError::Decode`], although the payment
    /// has been booked.
    pub async fn pay(&self, amount: Cents, token: &str) -> Result<PaymentResponse, ApiError> {
        let response = self
            .request(Method::POST, "/api/v1/transaction/payment")
            .json(&PaymentRequest::new(amount, token))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(target: PAYMENT_TARGET, %amount, %status, "payment rejected");
            return Err(ApiError::Status { status, body });
        }

        let payment: PaymentResponse = decode_json(response).await?;
        info!(
            target: PAYMENT_TARGET,
            %amount,
            account = %payment.account.id,
            credit = %payment.account.credit,
            "payment accepted"
        );
        Ok(payment)
    }

    /// Renew the terminal's session after a payment attempt.
    pub async fn reauthenticate(&self) -> Result<(), ApiError> {
        let response = self.request(Method::GET, "/reauthenticate").send().await?;
        debug!(target: PAYMENT_TARGET, status = %response.status(), "reauthenticated");
        Ok(())
    }
}
