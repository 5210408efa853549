//! Google Pay API request descriptors and payment data.
//!
//! These mirror the JSON objects the Google Pay Wallet API accepts
//! (`IsReadyToPayRequest`, `PaymentDataRequest`) and returns (`PaymentData`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    backend::BackendData,
    config::{CardAuthMethod, CardNetwork, EverypayConfig},
    defaults,
    token::IntermediateSigningKey,
};

pub const CARD_PAYMENT_METHOD: &str = "CARD";
pub const PAYMENT_GATEWAY_TOKENIZATION: &str = "PAYMENT_GATEWAY";
pub const TOTAL_PRICE_STATUS_FINAL: &str = "FINAL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardParameters {
    pub allowed_auth_methods: Vec<CardAuthMethod>,
    pub allowed_card_networks: Vec<CardNetwork>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationParameters {
    pub gateway: String,
    pub gateway_merchant_id: String,
}

/// Tells the payment sheet which processor receives the encrypted card token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizationSpecification {
    #[serde(rename = "type")]
    pub spec_type: String,
    pub parameters: TokenizationParameters,
}

impl TokenizationSpecification {
    pub fn payment_gateway(gateway: impl Into<String>, gateway_merchant_id: impl Into<String>) -> Self {
        Self {
            spec_type: PAYMENT_GATEWAY_TOKENIZATION.to_string(),
            parameters: TokenizationParameters {
                gateway: gateway.into(),
                gateway_merchant_id: gateway_merchant_id.into(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedPaymentMethod {
    #[serde(rename = "type")]
    pub method_type: String,
    pub parameters: CardParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokenization_specification: Option<TokenizationSpecification>,
}

impl AllowedPaymentMethod {
    /// CARD method with networks and auth methods from the config (or defaults)
    pub fn card(config: &EverypayConfig) -> Self {
        Self {
            method_type: CARD_PAYMENT_METHOD.to_string(),
            parameters: CardParameters {
                allowed_auth_methods: config.auth_methods(),
                allowed_card_networks: config.card_networks(),
            },
            tokenization_specification: None,
        }
    }

    pub fn with_tokenization(mut self, spec: TokenizationSpecification) -> Self {
        self.tokenization_specification = Some(spec);
        self
    }
}

/// Readiness check request; never carries a tokenization specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IsReadyToPayRequest {
    pub api_version: u8,
    pub api_version_minor: u8,
    pub allowed_payment_methods: Vec<AllowedPaymentMethod>,
}

impl IsReadyToPayRequest {
    pub fn from_config(config: &EverypayConfig) -> Self {
        Self {
            api_version: defaults::API_VERSION,
            api_version_minor: defaults::API_VERSION_MINOR,
            allowed_payment_methods: vec![AllowedPaymentMethod::card(config)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantInfo {
    pub merchant_id: String,
    pub merchant_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInfo {
    pub total_price_status: String,
    pub total_price: String,
    pub currency_code: String,
    pub country_code: String,
    pub total_price_label: String,
}

/// Request shown to the Google Pay payment sheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDataRequest {
    pub api_version: u8,
    pub api_version_minor: u8,
    pub allowed_payment_methods: Vec<AllowedPaymentMethod>,
    pub merchant_info: MerchantInfo,
    pub transaction_info: TransactionInfo,
}

impl PaymentDataRequest {
    pub fn new(
        config: &EverypayConfig,
        tokenization: TokenizationSpecification,
        merchant_info: MerchantInfo,
        transaction_info: TransactionInfo,
    ) -> Self {
        Self {
            api_version: defaults::API_VERSION,
            api_version_minor: defaults::API_VERSION_MINOR,
            allowed_payment_methods: vec![
                AllowedPaymentMethod::card(config).with_tokenization(tokenization),
            ],
            merchant_info,
            transaction_info,
        }
    }

    /// Payment sheet request built entirely from backend-provided data
    pub fn from_backend_data(config: &EverypayConfig, data: &BackendData) -> Self {
        Self::new(
            config,
            TokenizationSpecification::payment_gateway(&data.gateway_id, &data.gateway_merchant_id),
            MerchantInfo {
                merchant_id: data.merchant_id.clone(),
                merchant_name: data.merchant_name.clone(),
            },
            TransactionInfo {
                total_price_status: TOTAL_PRICE_STATUS_FINAL.to_string(),
                total_price: data.amount.to_string(),
                currency_code: data.currency.clone(),
                country_code: data.country_code.clone(),
                total_price_label: data.label.clone(),
            },
        )
    }
}

#[derive(Debug, Error)]
pub enum ParseTokenError {
    #[error("Invalid payment data JSON: {0}")]
    PaymentData(serde_json::Error),

    #[error("Invalid tokenization data: {0}")]
    Token(serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenizationData {
    token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentMethodData {
    tokenization_data: TokenizationData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentDataEnvelope {
    payment_method_data: PaymentMethodData,
}

/// Encrypted gateway token the payment sheet hands back
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePayToken {
    pub signature: String,
    pub intermediate_signing_key: IntermediateSigningKey,
    pub protocol_version: String,
    pub signed_message: String,
}

/// Raw payment data JSON returned by the payment sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentData(pub String);

impl PaymentData {
    pub fn as_json(&self) -> &str {
        &self.0
    }

    /// Extract the gateway token from `paymentMethodData.tokenizationData.token`.
    ///
    /// The token itself is a JSON document encoded as a string.
    pub fn token(&self) -> Result<GooglePayToken, ParseTokenError> {
        let envelope: PaymentDataEnvelope =
            serde_json::from_str(&self.0).map_err(ParseTokenError::PaymentData)?;
        serde_json::from_str(&envelope.payment_method_data.tokenization_data.token)
            .map_err(ParseTokenError::Token)
    }
}
