use serde::{Deserialize, Serialize};

/// Signing key material from the Google Pay token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntermediateSigningKey {
    /// JSON-stringified key object
    pub signed_key: String,
    #[serde(default)]
    pub signatures: Vec<String>,
}

/// Google Pay token data returned in backend mode.
///
/// Opaque to the library; the caller forwards it to its backend, which
/// submits it to EveryPay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub payment_reference: String,
    pub mobile_access_token: String,
    pub signature: String,
    pub intermediate_signing_key: IntermediateSigningKey,
    pub protocol_version: String,
    /// JSON-stringified message
    pub signed_message: String,
    pub token_consent_agreed: bool,
}

/// Stored card credential details
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcDetails {
    /// Merchant-initiated transaction token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_four_digits: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    /// Four-digit year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub payment_reference: String,
    pub payment_state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc_details: Option<CcDetails>,
}

/// Token request result; the token data plus the MIT token details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestResult {
    #[serde(flatten)]
    pub token_data: TokenData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
}

impl TokenRequestResult {
    /// The merchant-initiated transaction token, if EveryPay returned one
    pub fn mit_token(&self) -> Option<&str> {
        self.payment_details
            .as_ref()
            .and_then(|d| d.cc_details.as_ref())
            .and_then(|cc| cc.token.as_deref())
    }
}

/// Result of an SDK-mode payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SdkPaymentResult {
    pub status: String,
    /// Payment state reported by EveryPay (e.g. `settled`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_state: Option<String>,
    /// Raw Google Pay payment data JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_data: Option<String>,
}
