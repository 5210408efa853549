//! Google Pay Wallet client abstraction.
//!
//! The Wallet SDK itself is platform code; [`WalletClient`] is the slice of
//! it the helper needs: a readiness check and the payment sheet.

use async_trait::async_trait;
use everypay_gpay_types::{IsReadyToPayRequest, PaymentData, PaymentDataRequest, error_codes};
use thiserror::Error;

use crate::error::GooglePayError;

/// Failure reported by the Wallet SDK
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The user dismissed the payment sheet
    #[error("Payment canceled by user")]
    Canceled,

    /// No host activity to present the sheet from
    #[error("Activity not available")]
    ActivityUnavailable,

    /// Wallet returned a non-success status
    #[error("Google Pay payment error: {message} (code: {code})")]
    Status { code: i32, message: String },

    #[error("{0}")]
    Other(String),
}

impl WalletError {
    /// Map a readiness check failure
    pub fn into_readiness_error(self) -> GooglePayError {
        match self {
            WalletError::ActivityUnavailable => self.into(),
            other => GooglePayError::native(
                error_codes::E_UNABLE_TO_DETERMINE_GOOGLE_PAY_READINESS,
                other.to_string(),
            ),
        }
    }
}

impl From<WalletError> for GooglePayError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Canceled => GooglePayError::canceled(err.to_string()),
            WalletError::ActivityUnavailable => {
                GooglePayError::native(error_codes::E_ACTIVITY_DOES_NOT_EXIST, err.to_string())
            }
            WalletError::Status { code, .. } => GooglePayError::payment(err.to_string())
                .with_details(serde_json::json!({ "statusCode": code })),
            WalletError::Other(message) => GooglePayError::payment(message),
        }
    }
}

/// Google Pay Wallet operations
#[async_trait]
pub trait WalletClient: Send + Sync {
    async fn is_ready_to_pay(&self, request: &IsReadyToPayRequest) -> Result<bool, WalletError>;

    /// Present the payment sheet and wait for the user
    async fn load_payment_data(
        &self,
        request: &PaymentDataRequest,
    ) -> Result<PaymentData, WalletError>;
}
