use serde::{Deserialize, Serialize};

use crate::defaults;

/// Google Pay environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GooglePayEnvironment {
    #[default]
    Test,
    Production,
}

impl std::fmt::Display for GooglePayEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GooglePayEnvironment::Test => write!(f, "TEST"),
            GooglePayEnvironment::Production => write!(f, "PRODUCTION"),
        }
    }
}

/// Card networks accepted on the payment sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardNetwork {
    Mastercard,
    Visa,
}

/// Card authentication methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardAuthMethod {
    /// Card number only (cards on file)
    #[serde(rename = "PAN_ONLY")]
    PanOnly,
    /// Device token authenticated with a 3-D Secure cryptogram
    #[serde(rename = "CRYPTOGRAM_3DS")]
    Cryptogram3ds,
}

/// EveryPay configuration handed to the button and the native layer.
///
/// Backend mode only needs the environment and country code; SDK mode also
/// needs the API credentials, since the library then talks to EveryPay
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EverypayConfig {
    #[serde(default)]
    pub environment: GooglePayEnvironment,

    #[serde(default = "default_country_code")]
    pub country_code: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,

    /// Base URL of the EveryPay API (e.g. `https://igw-demo.every-pay.com`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_card_networks: Option<Vec<CardNetwork>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_card_auth_methods: Option<Vec<CardAuthMethod>>,

    /// Request a merchant-initiated transaction token instead of paying
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub request_token: bool,
}

fn default_country_code() -> String {
    defaults::COUNTRY_CODE.to_string()
}

impl Default for EverypayConfig {
    fn default() -> Self {
        Self {
            environment: GooglePayEnvironment::default(),
            country_code: default_country_code(),
            api_username: None,
            api_secret: None,
            api_url: None,
            account_name: None,
            customer_url: None,
            currency_code: None,
            allowed_card_networks: None,
            allowed_card_auth_methods: None,
            request_token: false,
        }
    }
}

impl EverypayConfig {
    /// Create a configuration for the given environment and country
    pub fn new(environment: GooglePayEnvironment, country_code: impl Into<String>) -> Self {
        Self {
            environment,
            country_code: country_code.into(),
            ..Default::default()
        }
    }

    /// Set the API credentials used in SDK mode
    pub fn with_credentials(
        mut self,
        api_username: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        self.api_username = Some(api_username.into());
        self.api_secret = Some(api_secret.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = Some(api_url.into());
        self
    }

    pub fn with_account_name(mut self, account_name: impl Into<String>) -> Self {
        self.account_name = Some(account_name.into());
        self
    }

    pub fn with_customer_url(mut self, customer_url: impl Into<String>) -> Self {
        self.customer_url = Some(customer_url.into());
        self
    }

    pub fn with_currency_code(mut self, currency_code: impl Into<String>) -> Self {
        self.currency_code = Some(currency_code.into());
        self
    }

    pub fn with_card_networks(mut self, networks: impl Into<Vec<CardNetwork>>) -> Self {
        self.allowed_card_networks = Some(networks.into());
        self
    }

    pub fn with_auth_methods(mut self, methods: impl Into<Vec<CardAuthMethod>>) -> Self {
        self.allowed_card_auth_methods = Some(methods.into());
        self
    }

    /// Switch the button from paying to requesting a recurring-payment token
    pub fn with_request_token(mut self, request_token: bool) -> Self {
        self.request_token = request_token;
        self
    }

    /// Whether both SDK-mode credentials are present and non-empty
    pub fn has_sdk_credentials(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        present(&self.api_username) && present(&self.api_secret)
    }

    pub fn currency_code(&self) -> &str {
        self.currency_code
            .as_deref()
            .unwrap_or(defaults::CURRENCY_CODE)
    }

    pub fn account_name(&self) -> &str {
        self.account_name
            .as_deref()
            .unwrap_or(defaults::ACCOUNT_NAME)
    }

    pub fn customer_url(&self) -> &str {
        self.customer_url
            .as_deref()
            .unwrap_or(defaults::CUSTOMER_URL)
    }

    /// Card networks from the config, falling back to VISA and MASTERCARD
    pub fn card_networks(&self) -> Vec<CardNetwork> {
        match &self.allowed_card_networks {
            Some(networks) if !networks.is_empty() => networks.clone(),
            _ => defaults::ALLOWED_CARD_NETWORKS.to_vec(),
        }
    }

    /// Auth methods from the config, falling back to PAN_ONLY and CRYPTOGRAM_3DS
    pub fn auth_methods(&self) -> Vec<CardAuthMethod> {
        match &self.allowed_card_auth_methods {
            Some(methods) if !methods.is_empty() => methods.clone(),
            _ => defaults::ALLOWED_AUTH_METHODS.to_vec(),
        }
    }
}
