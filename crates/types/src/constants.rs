/// Defaults applied when the caller leaves a configuration field empty
pub mod defaults {
    use crate::config::{CardAuthMethod, CardNetwork};

    pub const COUNTRY_CODE: &str = "EE";
    pub const CURRENCY_CODE: &str = "EUR";
    pub const GATEWAY: &str = "everypay";
    pub const ACCOUNT_NAME: &str = "EUR3D1";
    pub const CUSTOMER_URL: &str = "https://www.everypay.com";
    pub const MERCHANT_NAME: &str = "-";

    /// Google Pay API version sent with every request
    pub const API_VERSION: u8 = 2;
    pub const API_VERSION_MINOR: u8 = 0;

    /// Token agreement used when requesting a merchant-initiated transaction token
    pub const TOKEN_AGREEMENT: &str = "unscheduled";

    pub const ALLOWED_CARD_NETWORKS: [CardNetwork; 2] = [CardNetwork::Mastercard, CardNetwork::Visa];
    pub const ALLOWED_AUTH_METHODS: [CardAuthMethod; 2] =
        [CardAuthMethod::PanOnly, CardAuthMethod::Cryptogram3ds];
}

/// Presets for the Estonian market
pub mod estonian_defaults {
    use crate::config::{CardAuthMethod, CardNetwork};

    pub const COUNTRY_CODE: &str = "ET";
    pub const CURRENCY_CODE: &str = "EUR";
    pub const ALLOWED_CARD_NETWORKS: [CardNetwork; 2] = [CardNetwork::Visa, CardNetwork::Mastercard];
    // 3-D Secure only
    pub const ALLOWED_AUTH_METHODS: [CardAuthMethod; 1] = [CardAuthMethod::Cryptogram3ds];
    pub const GATEWAY: &str = "everypay";
}

/// Error code strings shared with the native layer and existing callers.
///
/// These values cross language boundaries and must not change.
pub mod error_codes {
    /// User dismissed the payment sheet
    pub const E_PAYMENT_CANCELED: &str = "E_PAYMENT_CANCELED";
    /// Generic payment failure reported by the native layer
    pub const E_PAYMENT_ERROR: &str = "E_PAYMENT_ERROR";
    /// Native initialization failed
    pub const E_INIT_ERROR: &str = "INIT_ERROR";
    /// No host activity to present the payment sheet from
    pub const E_ACTIVITY_DOES_NOT_EXIST: &str = "E_ACTIVITY_DOES_NOT_EXIST";
    pub const E_UNABLE_TO_DETERMINE_GOOGLE_PAY_READINESS: &str =
        "E_UNABLE_TO_DETERMINE_GOOGLE_PAY_READINESS";

    pub const UNSUPPORTED_PLATFORM: &str = "UNSUPPORTED_PLATFORM";
    pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
    pub const INITIALIZATION_FAILED: &str = "INITIALIZATION_FAILED";
    pub const PAYMENT_CANCELLED: &str = "PAYMENT_CANCELLED";
    pub const PAYMENT_FAILED: &str = "PAYMENT_FAILED";
    pub const INVALID_PAYMENT_DATA: &str = "INVALID_PAYMENT_DATA";
    pub const NOT_INITIALIZED: &str = "NOT_INITIALIZED";
    pub const PAYMENT_ERROR: &str = "PAYMENT_ERROR";
    pub const PAYMENT_PARSE_ERROR: &str = "PAYMENT_PARSE_ERROR";
    pub const GOOGLE_PAY_UNAVAILABLE: &str = "GOOGLE_PAY_UNAVAILABLE";
    /// The caller's own press callback failed
    pub const CALLBACK_ERROR: &str = "CALLBACK_ERROR";
}
