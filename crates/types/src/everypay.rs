//! EveryPay API v4 request and response bodies
//!
//! Responses deserialize leniently: fields EveryPay leaves out default to
//! empty values, and anything not modelled here is kept in `extra`.

use chrono::{SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::{
    google_pay::GooglePayToken,
    token::{CcDetails, IntermediateSigningKey, TokenData},
};

pub const OPEN_SESSION_PATH: &str = "/api/v4/google_pay/open_session";
pub const ONEOFF_PAYMENT_PATH: &str = "/api/v4/payments/oneoff";
pub const PAYMENT_DATA_PATH: &str = "/api/v4/google_pay/payment_data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    pub api_username: String,
    pub account_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenSessionResponse {
    pub googlepay_merchant_identifier: String,
    pub googlepay_ep_merchant_id: String,
    pub googlepay_gateway_merchant_id: String,
    pub merchant_name: String,
    pub google_pay_gateway_id: String,
    pub acq_branding_domain_igw: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

/// Body of `POST /api/v4/payments/oneoff`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantInfoRequest {
    pub api_username: String,
    pub account_name: String,
    pub amount: f64,
    pub label: String,
    pub currency_code: String,
    pub country_code: String,
    pub order_reference: String,
    pub nonce: String,
    pub mobile_payment: bool,
    pub customer_url: String,
    pub customer_ip: String,
    pub customer_email: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_token: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_agreement: Option<String>,
}

impl MerchantInfoRequest {
    /// Create a one-off payment body with a fresh nonce and the current timestamp
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        api_username: impl Into<String>,
        account_name: impl Into<String>,
        amount: f64,
        label: impl Into<String>,
        currency_code: impl Into<String>,
        country_code: impl Into<String>,
        order_reference: impl Into<String>,
        customer_email: impl Into<String>,
    ) -> Self {
        Self {
            api_username: api_username.into(),
            account_name: account_name.into(),
            amount,
            label: label.into(),
            currency_code: currency_code.into(),
            country_code: country_code.into(),
            order_reference: order_reference.into(),
            nonce: uuid::Uuid::new_v4().to_string(),
            mobile_payment: true,
            customer_url: String::new(),
            customer_ip: String::new(),
            customer_email: customer_email.into(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            request_token: None,
            token_agreement: None,
        }
    }

    pub fn with_customer_url(mut self, customer_url: impl Into<String>) -> Self {
        self.customer_url = customer_url.into();
        self
    }

    pub fn with_customer_ip(mut self, customer_ip: impl Into<String>) -> Self {
        self.customer_ip = customer_ip.into();
        self
    }

    /// Ask EveryPay to store the card for merchant-initiated transactions
    pub fn with_token_request(mut self, token_agreement: impl Into<String>) -> Self {
        self.request_token = Some(true);
        self.token_agreement = Some(token_agreement.into());
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethod {
    pub source: String,
    pub display_name: String,
    pub country_code: Option<String>,
    pub payment_link: String,
    pub logo_url: String,
    pub applepay_available: bool,
    pub googlepay_available: bool,
    pub wallet_display_name: String,
    pub available: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantInfoResponse {
    pub account_name: String,
    pub order_reference: String,
    pub email: Option<String>,
    pub customer_ip: Option<String>,
    pub customer_url: String,
    pub payment_created_at: String,
    pub initial_amount: f64,
    pub standing_amount: f64,
    pub payment_reference: String,
    pub payment_link: String,
    pub payment_methods: Vec<PaymentMethod>,
    pub api_username: String,
    pub payment_state: String,
    pub payment_method: Option<String>,
    pub mobile_access_token: String,
    pub currency: String,
    pub descriptor_country: String,
    pub googlepay_merchant_identifier: String,
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

/// Body of `POST /api/v4/google_pay/payment_data`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProcessRequest {
    pub payment_reference: String,
    pub token_consent_agreed: bool,
    pub signature: String,
    #[serde(rename = "intermediateSigningKey")]
    pub intermediate_signing_key: IntermediateSigningKey,
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    #[serde(rename = "signedMessage")]
    pub signed_message: String,
}

impl PaymentProcessRequest {
    pub fn from_token(
        payment_reference: impl Into<String>,
        token: GooglePayToken,
        token_consent_agreed: bool,
    ) -> Self {
        Self {
            payment_reference: payment_reference.into(),
            token_consent_agreed,
            signature: token.signature,
            intermediate_signing_key: token.intermediate_signing_key,
            protocol_version: token.protocol_version,
            signed_message: token.signed_message,
        }
    }

    /// Body for token data a backend-mode app handed over
    pub fn from_token_data(data: &TokenData) -> Self {
        Self {
            payment_reference: data.payment_reference.clone(),
            token_consent_agreed: data.token_consent_agreed,
            signature: data.signature.clone(),
            intermediate_signing_key: data.intermediate_signing_key.clone(),
            protocol_version: data.protocol_version.clone(),
            signed_message: data.signed_message.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessCcDetails {
    pub token: Option<String>,
    pub last_four_digits: Option<String>,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl From<ProcessCcDetails> for CcDetails {
    fn from(details: ProcessCcDetails) -> Self {
        CcDetails {
            token: details.token,
            last_four_digits: details.last_four_digits,
            month: details.month,
            year: details.year,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentProcessResponse {
    /// Payment state; interpreted by the caller
    pub state: String,
    pub payment_reference: Option<String>,
    pub cc_details: Option<ProcessCcDetails>,
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

impl PaymentProcessResponse {
    /// States after which EveryPay will not settle the payment
    pub fn is_failed(&self) -> bool {
        matches!(self.state.as_str(), "failed" | "abandoned" | "voided")
    }
}
