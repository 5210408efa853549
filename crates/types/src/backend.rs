use serde::{Deserialize, Serialize};

use crate::{
    defaults,
    everypay::{MerchantInfoResponse, OpenSessionResponse},
};

/// Payment data produced by the merchant's backend for backend mode.
///
/// Combines the `open_session` and `payments/oneoff` responses. The
/// orchestrator passes it through to the native layer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendData {
    pub merchant_id: String,
    pub merchant_name: String,
    pub gateway_id: String,
    pub gateway_merchant_id: String,
    pub currency: String,
    pub country_code: String,
    pub payment_reference: String,
    pub mobile_access_token: String,
    pub amount: f64,
    pub label: String,
}

impl BackendData {
    /// Assemble backend data from the two EveryPay responses a merchant
    /// backend collects before handing control to the app
    pub fn from_responses(
        session: &OpenSessionResponse,
        merchant_info: &MerchantInfoResponse,
        amount: f64,
        label: impl Into<String>,
    ) -> Self {
        let merchant_name = if session.merchant_name.is_empty() {
            defaults::MERCHANT_NAME.to_string()
        } else {
            session.merchant_name.clone()
        };

        Self {
            merchant_id: session.googlepay_merchant_identifier.clone(),
            merchant_name,
            gateway_id: session.google_pay_gateway_id.to_lowercase(),
            gateway_merchant_id: session.googlepay_gateway_merchant_id.clone(),
            currency: merchant_info.currency.clone(),
            country_code: merchant_info.descriptor_country.clone(),
            payment_reference: merchant_info.payment_reference.clone(),
            mobile_access_token: merchant_info.mobile_access_token.clone(),
            amount,
            label: label.into(),
        }
    }
}

/// Payment fields the caller supplies per operation in SDK mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkPaymentData {
    /// Decimal amount as a string, e.g. `"10.50"`
    pub amount: String,
    pub label: String,
    pub order_reference: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_ip: Option<String>,
}

impl SdkPaymentData {
    pub fn new(
        amount: f64,
        label: impl Into<String>,
        order_reference: impl Into<String>,
        customer_email: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.to_string(),
            label: label.into(),
            order_reference: order_reference.into(),
            customer_email: customer_email.into(),
            customer_ip: None,
        }
    }

    pub fn with_customer_ip(mut self, customer_ip: impl Into<String>) -> Self {
        self.customer_ip = Some(customer_ip.into());
        self
    }

    /// Parse the amount, if it is a valid decimal number
    pub fn amount_value(&self) -> Option<f64> {
        self.amount.trim().parse::<f64>().ok()
    }
}

/// Result of a native initialization call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitResult {
    pub is_ready: bool,
    pub gateway_id: String,
    pub gateway_merchant_id: String,
}
