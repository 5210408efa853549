//! Native bridge contract and the platform-gated public API.
//!
//! [`NativeBridge`] is the async surface the platform Google Pay module
//! exposes. [`GooglePay`] wraps a bridge and refuses every call on hosts
//! that cannot run Google Pay.

use std::sync::Arc;

use async_trait::async_trait;
use everypay_gpay_types::{
    BackendData, EverypayConfig, InitResult, SdkPaymentData, SdkPaymentResult, TokenData,
    TokenRequestResult,
};
use tracing::debug;

use crate::error::{GooglePayError, Result};

/// Async operations implemented by the native Google Pay integration.
///
/// Every fallible call rejects with a [`GooglePayError`] whose `code` is one
/// of the strings in [`everypay_gpay_types::error_codes`].
#[async_trait]
pub trait NativeBridge: Send + Sync {
    /// `initializeWithBackendData`
    async fn initialize_with_backend_data(
        &self,
        config: &EverypayConfig,
        backend_data: &BackendData,
    ) -> Result<InitResult>;

    /// `initializeSDKMode`
    async fn initialize_sdk_mode(&self, config: &EverypayConfig) -> Result<InitResult>;

    /// `makePaymentWithBackendData`
    async fn make_payment_with_backend_data(&self, backend_data: &BackendData)
    -> Result<TokenData>;

    /// `makePaymentSDKMode`
    async fn make_payment_sdk_mode(&self, payment_data: &SdkPaymentData)
    -> Result<SdkPaymentResult>;

    /// `requestTokenWithBackendData`
    async fn request_token_with_backend_data(
        &self,
        backend_data: &BackendData,
    ) -> Result<TokenData>;

    /// `requestTokenSDKMode`
    async fn request_token_sdk_mode(&self, label: &str) -> Result<TokenRequestResult>;

    /// `isProcessingPayment`
    fn is_processing_payment(&self) -> bool;
}

/// Host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Platform of the compile target
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Other
        }
    }

    pub fn supports_google_pay(&self) -> bool {
        matches!(self, Platform::Android)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Android => write!(f, "android"),
            Platform::Ios => write!(f, "ios"),
            Platform::Other => write!(f, "other"),
        }
    }
}

/// Public Google Pay API, gated on the host platform
#[derive(Clone)]
pub struct GooglePay {
    platform: Platform,
    bridge: Arc<dyn NativeBridge>,
}

impl std::fmt::Debug for GooglePay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePay")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}

impl GooglePay {
    /// Wrap a bridge for the platform this binary was built for
    pub fn new(bridge: Arc<dyn NativeBridge>) -> Self {
        Self::with_platform(Platform::current(), bridge)
    }

    pub fn with_platform(platform: Platform, bridge: Arc<dyn NativeBridge>) -> Self {
        Self { platform, bridge }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Fail with `UNSUPPORTED_PLATFORM` unless running on Android
    pub fn ensure_supported(&self) -> Result<()> {
        if self.platform.supports_google_pay() {
            Ok(())
        } else {
            debug!(platform = %self.platform, "Google Pay unavailable on platform");
            Err(GooglePayError::platform_unsupported(format!(
                "Google Pay is only supported on Android (current platform: {})",
                self.platform
            )))
        }
    }

    pub async fn initialize_with_backend_data(
        &self,
        config: &EverypayConfig,
        backend_data: &BackendData,
    ) -> Result<InitResult> {
        self.ensure_supported()?;
        self.bridge
            .initialize_with_backend_data(config, backend_data)
            .await
    }

    pub async fn initialize_sdk_mode(&self, config: &EverypayConfig) -> Result<InitResult> {
        self.ensure_supported()?;
        self.bridge.initialize_sdk_mode(config).await
    }

    pub async fn make_payment_with_backend_data(
        &self,
        backend_data: &BackendData,
    ) -> Result<TokenData> {
        self.ensure_supported()?;
        self.bridge.make_payment_with_backend_data(backend_data).await
    }

    pub async fn make_payment_sdk_mode(
        &self,
        payment_data: &SdkPaymentData,
    ) -> Result<SdkPaymentResult> {
        self.ensure_supported()?;
        self.bridge.make_payment_sdk_mode(payment_data).await
    }

    pub async fn request_token_with_backend_data(
        &self,
        backend_data: &BackendData,
    ) -> Result<TokenData> {
        self.ensure_supported()?;
        self.bridge
            .request_token_with_backend_data(backend_data)
            .await
    }

    pub async fn request_token_sdk_mode(&self, label: &str) -> Result<TokenRequestResult> {
        self.ensure_supported()?;
        self.bridge.request_token_sdk_mode(label).await
    }

    /// Always `false` off Android
    pub fn is_processing_payment(&self) -> bool {
        self.platform.supports_google_pay() && self.bridge.is_processing_payment()
    }
}
