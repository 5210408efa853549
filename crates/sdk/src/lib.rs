//! EveryPay Google Pay SDK
//!
//! Payment orchestration for a Google Pay button backed by EveryPay, the
//! native bridge contract it drives, and a thin client for the EveryPay
//! REST API.
//!
//! # Overview
//!
//! - [`GooglePayButton`] - Button controller: mode detection, initialization,
//!   single-flight payment and token operations, callback dispatch
//! - [`NativeBridge`] - Async contract of the native Google Pay module
//! - [`GooglePay`] - Platform-gated public API over a bridge
//! - [`EverypayGooglePayHelper`] - Bridge implementation over a
//!   [`WalletClient`] and the EveryPay API
//! - [`EveryPayClient`] - `open_session`, `payments/oneoff` and
//!   `payment_data` calls
//!
//! # Backend mode
//!
//! ```ignore
//! use everypay_gpay_sdk::{
//!     GooglePay, GooglePayButton, GooglePayButtonProps, PaymentHandler, PaymentPayload,
//! };
//!
//! struct Checkout;
//!
//! #[async_trait::async_trait]
//! impl PaymentHandler for Checkout {
//!     async fn on_press(&self, payload: PaymentPayload) -> everypay_gpay_sdk::Result<serde_json::Value> {
//!         // Forward the token to your backend, which calls payment_data
//!         Ok(serde_json::to_value(payload).unwrap_or_default())
//!     }
//! }
//!
//! let props = GooglePayButtonProps::new(config).with_backend_data(backend_data);
//! let button = GooglePayButton::new(props, GooglePay::new(bridge), Arc::new(Checkout))?;
//! button.mount().await;
//! button.tap().await;
//! ```
//!
//! # SDK mode
//!
//! Put `apiUsername`, `apiSecret` and `apiUrl` in the config and supply
//! per-payment fields with [`GooglePayButtonProps::with_sdk_payment`], or set
//! `requestToken` and a token label to fetch a recurring-payment token.

pub mod bridge;
pub mod button;
pub mod error;
pub mod helper;
pub mod requests;
pub mod util;
pub mod view;
pub mod wallet;

#[cfg(test)]
mod test;

// Re-export main types at crate root
pub use bridge::{GooglePay, NativeBridge, Platform};
pub use button::{
    BackendModeParams, ButtonState, GooglePayButton, GooglePayButtonProps, Mode, ModeParams,
    PaymentHandler, PaymentPayload, PressOutcome, SdkModeParams, SdkOperation,
};
pub use error::{ErrorKind, GooglePayError, Result};
pub use everypay_gpay_types as types;
pub use helper::EverypayGooglePayHelper;
pub use requests::{EveryPayClient, RequestError};
pub use util::{base64_encode, basic_auth_header, bearer_auth_header};
pub use view::{BUTTON_TEST_ID, ButtonView};
pub use wallet::{WalletClient, WalletError};
