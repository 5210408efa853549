//! Shared data model for the EveryPay Google Pay integration.
//!
//! Everything in this crate is plain data: the configuration handed to the
//! payment button, the payloads exchanged with the native Google Pay layer,
//! the Google Pay request descriptors and the EveryPay REST wire types.
//! Field names on the wire match what existing JavaScript and Android
//! callers send, so every struct carries explicit serde renames.

pub mod backend;
pub mod button;
pub mod config;
pub mod constants;
pub mod everypay;
pub mod google_pay;
pub mod token;

pub use backend::{BackendData, InitResult, SdkPaymentData};
pub use button::{ButtonTheme, ButtonType};
pub use config::{CardAuthMethod, CardNetwork, EverypayConfig, GooglePayEnvironment};
pub use constants::{defaults, error_codes, estonian_defaults};
pub use google_pay::{
    AllowedPaymentMethod, CardParameters, GooglePayToken, IsReadyToPayRequest, MerchantInfo,
    ParseTokenError, PaymentData, PaymentDataRequest, TokenizationParameters,
    TokenizationSpecification, TransactionInfo,
};
pub use token::{
    CcDetails, IntermediateSigningKey, PaymentDetails, SdkPaymentResult, TokenData,
    TokenRequestResult,
};

/// Default manifest file name used by the command line tool
pub const MANIFEST_FILE_NAME: &str = "everypay.yaml";
