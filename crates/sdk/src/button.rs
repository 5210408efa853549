//! Payment orchestrator behind the Google Pay button.
//!
//! A [`GooglePayButton`] resolves its props into exactly one integration
//! mode, initializes the native layer on [`mount`](GooglePayButton::mount),
//! and runs at most one payment or token operation at a time on
//! [`press`](GooglePayButton::press). Results go to the caller's
//! [`PaymentHandler`].

use std::{panic::AssertUnwindSafe, sync::Arc};

use async_trait::async_trait;
use everypay_gpay_types::{
    AllowedPaymentMethod, BackendData, ButtonTheme, ButtonType, EverypayConfig, InitResult,
    SdkPaymentData, SdkPaymentResult, TokenData, TokenRequestResult, TokenizationSpecification,
};
use futures::FutureExt;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    bridge::GooglePay,
    error::{ErrorKind, GooglePayError, Result},
};

/// Caller-supplied button properties
#[derive(Debug, Clone, Default)]
pub struct GooglePayButtonProps {
    pub config: EverypayConfig,
    /// Present in backend mode only
    pub backend_data: Option<BackendData>,
    /// Payment fields for SDK-mode payments
    pub sdk_payment: Option<SdkPaymentData>,
    /// Label for SDK-mode token requests
    pub token_label: Option<String>,
    pub theme: ButtonTheme,
    pub button_type: ButtonType,
    pub disabled: bool,
}

impl GooglePayButtonProps {
    pub fn new(config: EverypayConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn with_backend_data(mut self, backend_data: BackendData) -> Self {
        self.backend_data = Some(backend_data);
        self
    }

    pub fn with_sdk_payment(mut self, payment: SdkPaymentData) -> Self {
        self.sdk_payment = Some(payment);
        self
    }

    pub fn with_token_label(mut self, label: impl Into<String>) -> Self {
        self.token_label = Some(label.into());
        self
    }

    pub fn with_theme(mut self, theme: ButtonTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_button_type(mut self, button_type: ButtonType) -> Self {
        self.button_type = button_type;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

/// Integration mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The caller's backend talks to EveryPay
    Backend,
    /// This library talks to EveryPay with the caller's credentials
    Sdk,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Backend => write!(f, "backend"),
            Mode::Sdk => write!(f, "sdk"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendModeParams {
    pub backend_data: BackendData,
    pub request_token: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SdkOperation {
    Payment(SdkPaymentData),
    TokenRequest { label: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SdkModeParams {
    pub operation: SdkOperation,
}

/// Props resolved into exactly one mode
#[derive(Debug, Clone, PartialEq)]
pub enum ModeParams {
    Backend(BackendModeParams),
    Sdk(SdkModeParams),
}

fn valid_amount(amount: f64) -> bool {
    amount.is_finite() && amount >= 0.0
}

impl ModeParams {
    /// Decide the mode from the props.
    ///
    /// `backendData` selects backend mode; SDK credentials without it select
    /// SDK mode. Both or neither is an `INVALID_CONFIG` error.
    pub fn resolve(props: &GooglePayButtonProps) -> Result<Self> {
        let config = &props.config;
        let request_token = config.request_token;

        match (&props.backend_data, config.has_sdk_credentials()) {
            (Some(_), true) => Err(GooglePayError::configuration(
                "Provide either backendData (backend mode) or apiUsername and apiSecret (SDK mode), not both",
            )),
            (None, false) => Err(GooglePayError::configuration(
                "Either backendData (backend mode) or apiUsername and apiSecret (SDK mode) is required",
            )),
            (Some(backend_data), false) => {
                if props.sdk_payment.is_some() {
                    return Err(GooglePayError::configuration(
                        "SDK payment fields cannot be combined with backendData",
                    ));
                }
                if !valid_amount(backend_data.amount) {
                    return Err(GooglePayError::configuration(format!(
                        "Invalid amount in backendData: {}",
                        backend_data.amount
                    )));
                }
                Ok(ModeParams::Backend(BackendModeParams {
                    backend_data: backend_data.clone(),
                    request_token,
                }))
            }
            (None, true) if request_token => {
                let label = props
                    .token_label
                    .as_deref()
                    .filter(|label| !label.trim().is_empty())
                    .ok_or_else(|| {
                        GooglePayError::configuration(
                            "tokenLabel is required for SDK-mode token requests",
                        )
                    })?;
                Ok(ModeParams::Sdk(SdkModeParams {
                    operation: SdkOperation::TokenRequest {
                        label: label.to_string(),
                    },
                }))
            }
            (None, true) => {
                let payment = props.sdk_payment.as_ref().ok_or_else(|| {
                    GooglePayError::configuration(
                        "SDK mode requires amount, label, orderReference and customerEmail",
                    )
                })?;
                if !payment.amount_value().is_some_and(valid_amount) {
                    return Err(GooglePayError::configuration(format!(
                        "Invalid amount: {}",
                        payment.amount
                    )));
                }
                Ok(ModeParams::Sdk(SdkModeParams {
                    operation: SdkOperation::Payment(payment.clone()),
                }))
            }
        }
    }

    pub fn mode(&self) -> Mode {
        match self {
            ModeParams::Backend(_) => Mode::Backend,
            ModeParams::Sdk(_) => Mode::Sdk,
        }
    }

    /// Whether a press requests a recurring-payment token
    pub fn is_token_request(&self) -> bool {
        match self {
            ModeParams::Backend(params) => params.request_token,
            ModeParams::Sdk(params) => matches!(params.operation, SdkOperation::TokenRequest { .. }),
        }
    }
}

/// Lifecycle of a button instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Uninitialized,
    Initializing,
    Ready,
    Processing,
    /// Initialization failed or Google Pay is not ready on this device
    Unavailable,
}

impl std::fmt::Display for ButtonState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ButtonState::Uninitialized => write!(f, "uninitialized"),
            ButtonState::Initializing => write!(f, "initializing"),
            ButtonState::Ready => write!(f, "ready"),
            ButtonState::Processing => write!(f, "processing"),
            ButtonState::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// What the native layer returned for a press
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PaymentPayload {
    /// Backend-mode payment or token request
    Token(TokenData),
    /// SDK-mode payment
    Payment(SdkPaymentResult),
    /// SDK-mode token request
    TokenRequest(TokenRequestResult),
}

/// Caller hooks for a button.
///
/// `on_press` receives the native result and usually hands it to the
/// caller's backend; whatever it returns is passed to `on_payment_success`.
#[async_trait]
pub trait PaymentHandler: Send + Sync {
    async fn on_press(&self, payload: PaymentPayload) -> Result<serde_json::Value>;

    fn on_payment_success(&self, _result: serde_json::Value) {}

    fn on_payment_error(&self, _error: GooglePayError) {}

    fn on_payment_canceled(&self) {}
}

/// Result of a single press
#[derive(Debug, Clone, PartialEq)]
pub enum PressOutcome {
    /// The press was dropped (not ready, disabled or busy) or the button
    /// was unmounted before the native call settled
    Ignored,
    Succeeded(serde_json::Value),
    Canceled,
    Failed(GooglePayError),
}

#[derive(Debug)]
struct Inner {
    state: ButtonState,
    init_result: Option<InitResult>,
    processing: bool,
    disabled: bool,
    unmounted: bool,
}

/// Holds the processing flag for one operation.
///
/// Dropping it clears the flag and leaves a transient state, whatever path
/// the operation took.
struct ProcessingGuard {
    inner: Arc<Mutex<Inner>>,
}

impl ProcessingGuard {
    /// Take the flag and enter `state` if `can_start` allows it and no
    /// operation is running
    fn try_acquire(
        inner: &Arc<Mutex<Inner>>,
        state: ButtonState,
        can_start: impl FnOnce(&Inner) -> bool,
    ) -> Option<Self> {
        let mut guard = inner.lock();
        if guard.processing || guard.unmounted || !can_start(&guard) {
            return None;
        }
        guard.processing = true;
        guard.state = state;
        Some(Self {
            inner: inner.clone(),
        })
    }
}

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.processing = false;
        if inner.unmounted {
            return;
        }
        match inner.state {
            ButtonState::Processing => inner.state = ButtonState::Ready,
            ButtonState::Initializing => inner.state = ButtonState::Unavailable,
            _ => {}
        }
    }
}

/// Google Pay button controller.
///
/// Cloning yields another handle to the same instance; separate instances
/// never share state.
#[derive(Clone)]
pub struct GooglePayButton {
    props: Arc<GooglePayButtonProps>,
    params: Arc<ModeParams>,
    google_pay: GooglePay,
    handler: Arc<dyn PaymentHandler>,
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for GooglePayButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GooglePayButton")
            .field("mode", &self.params.mode())
            .field("inner", &*self.inner.lock())
            .finish_non_exhaustive()
    }
}

impl GooglePayButton {
    /// Validate props and platform. Fails before any bridge call.
    pub fn new(
        props: GooglePayButtonProps,
        google_pay: GooglePay,
        handler: Arc<dyn PaymentHandler>,
    ) -> Result<Self> {
        google_pay.ensure_supported()?;
        let params = ModeParams::resolve(&props)?;
        debug!(mode = %params.mode(), token_request = params.is_token_request(), "Button created");

        let inner = Inner {
            state: ButtonState::Uninitialized,
            init_result: None,
            processing: false,
            disabled: props.disabled,
            unmounted: false,
        };
        Ok(Self {
            props: Arc::new(props),
            params: Arc::new(params),
            google_pay,
            handler,
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    pub fn mode(&self) -> Mode {
        self.params.mode()
    }

    pub fn params(&self) -> &ModeParams {
        &self.params
    }

    pub fn props(&self) -> &GooglePayButtonProps {
        &self.props
    }

    pub fn state(&self) -> ButtonState {
        self.inner.lock().state
    }

    pub fn is_processing(&self) -> bool {
        self.inner.lock().processing
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.lock().disabled
    }

    pub fn is_unmounted(&self) -> bool {
        self.inner.lock().unmounted
    }

    pub fn init_result(&self) -> Option<InitResult> {
        self.inner.lock().init_result.clone()
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.inner.lock().disabled = disabled;
    }

    /// Payment methods for the native button; empty until initialized
    pub fn allowed_payment_methods(&self) -> Vec<AllowedPaymentMethod> {
        let inner = self.inner.lock();
        match &inner.init_result {
            Some(init) => vec![
                AllowedPaymentMethod::card(&self.props.config).with_tokenization(
                    TokenizationSpecification::payment_gateway(
                        &init.gateway_id,
                        &init.gateway_merchant_id,
                    ),
                ),
            ],
            None => Vec::new(),
        }
    }

    /// Initialize the native layer for this button's mode.
    ///
    /// Runs from `Uninitialized`, or from `Unavailable` to retry a failed
    /// initialization. A failure goes to `on_payment_error`.
    pub async fn mount(&self) -> ButtonState {
        let Some(guard) =
            ProcessingGuard::try_acquire(&self.inner, ButtonState::Initializing, |inner| {
                matches!(
                    inner.state,
                    ButtonState::Uninitialized | ButtonState::Unavailable
                )
            })
        else {
            return self.state();
        };

        let mode = self.params.mode();
        info!(mode = %mode, "Initializing Google Pay button");
        let result = match self.params.as_ref() {
            ModeParams::Backend(params) => {
                self.google_pay
                    .initialize_with_backend_data(&self.props.config, &params.backend_data)
                    .await
            }
            ModeParams::Sdk(_) => self.google_pay.initialize_sdk_mode(&self.props.config).await,
        };

        let error = {
            let mut inner = self.inner.lock();
            if inner.unmounted {
                debug!(mode = %mode, "Button unmounted during initialization");
                None
            } else {
                match result {
                    Ok(init) => {
                        inner.state = if init.is_ready {
                            ButtonState::Ready
                        } else {
                            ButtonState::Unavailable
                        };
                        info!(
                            mode = %mode,
                            is_ready = init.is_ready,
                            gateway_id = %init.gateway_id,
                            "Google Pay initialized"
                        );
                        inner.init_result = Some(init);
                        None
                    }
                    Err(err) => {
                        inner.state = ButtonState::Unavailable;
                        inner.init_result = None;
                        warn!(mode = %mode, code = %err.code, "Google Pay initialization failed");
                        Some(err)
                    }
                }
            }
        };
        drop(guard);

        if let Some(err) = error {
            self.handler.on_payment_error(err);
        }
        self.state()
    }

    /// Handle one user tap.
    ///
    /// Ignored unless the button is `Ready`, enabled and idle; a tap during
    /// an operation is dropped, never queued.
    pub async fn press(&self) -> PressOutcome {
        let Some(guard) =
            ProcessingGuard::try_acquire(&self.inner, ButtonState::Processing, |inner| {
                !inner.disabled && inner.state == ButtonState::Ready
            })
        else {
            debug!(state = %self.state(), "Press ignored");
            return PressOutcome::Ignored;
        };

        let mode = self.params.mode();
        info!(mode = %mode, token_request = self.params.is_token_request(), "Payment started");

        let outcome = match self.run_native_operation().await {
            Ok(_) if self.is_unmounted() => {
                drop(guard);
                debug!(mode = %mode, "Button unmounted, native result discarded");
                return PressOutcome::Ignored;
            }
            Ok(payload) => match self.run_press_callback(payload).await {
                Ok(result) => PressOutcome::Succeeded(result),
                Err(err) => PressOutcome::Failed(err.with_kind(ErrorKind::Callback)),
            },
            Err(err) if err.is_canceled() => PressOutcome::Canceled,
            Err(err) => PressOutcome::Failed(err),
        };
        drop(guard);

        if self.is_unmounted() {
            debug!(mode = %mode, "Button unmounted, result discarded");
            return outcome;
        }

        match &outcome {
            PressOutcome::Succeeded(result) => {
                info!(mode = %mode, "Payment succeeded");
                self.handler.on_payment_success(result.clone());
            }
            PressOutcome::Canceled => {
                info!(mode = %mode, "Payment canceled by user");
                self.handler.on_payment_canceled();
            }
            PressOutcome::Failed(err) => {
                warn!(mode = %mode, kind = %err.kind, code = %err.code, "Payment failed");
                self.handler.on_payment_error(err.clone());
            }
            PressOutcome::Ignored => {}
        }
        outcome
    }

    /// Suppress every later state update and callback
    pub fn unmount(&self) {
        let mut inner = self.inner.lock();
        if !inner.unmounted {
            debug!(state = %inner.state, processing = inner.processing, "Button unmounted");
        }
        inner.unmounted = true;
    }

    async fn run_native_operation(&self) -> Result<PaymentPayload> {
        match self.params.as_ref() {
            ModeParams::Backend(params) if params.request_token => self
                .google_pay
                .request_token_with_backend_data(&params.backend_data)
                .await
                .map(PaymentPayload::Token),
            ModeParams::Backend(params) => self
                .google_pay
                .make_payment_with_backend_data(&params.backend_data)
                .await
                .map(PaymentPayload::Token),
            ModeParams::Sdk(SdkModeParams {
                operation: SdkOperation::Payment(payment),
            }) => self
                .google_pay
                .make_payment_sdk_mode(payment)
                .await
                .map(PaymentPayload::Payment),
            ModeParams::Sdk(SdkModeParams {
                operation: SdkOperation::TokenRequest { label },
            }) => self
                .google_pay
                .request_token_sdk_mode(label)
                .await
                .map(PaymentPayload::TokenRequest),
        }
    }

    /// Run `on_press` inside the press, turning a panic into an error.
    ///
    /// Nothing is detached: dropping the press drops the callback with it,
    /// so the processing flag never outlives the work it covers.
    async fn run_press_callback(&self, payload: PaymentPayload) -> Result<serde_json::Value> {
        match AssertUnwindSafe(self.handler.on_press(payload))
            .catch_unwind()
            .await
        {
            Ok(result) => result,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                Err(GooglePayError::callback(format!(
                    "Press callback panicked: {reason}"
                )))
            }
        }
    }
}
