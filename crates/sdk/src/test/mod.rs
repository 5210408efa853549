use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use everypay_gpay_types::{
    BackendData, EverypayConfig, GooglePayEnvironment, IntermediateSigningKey, PaymentData,
    SdkPaymentData, TokenData, error_codes,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::{
    ButtonState, ErrorKind, GooglePay, GooglePayButton, GooglePayButtonProps, GooglePayError,
    NativeBridge, PaymentHandler, PaymentPayload, Platform, PressOutcome, Result,
};


pub use mock_bridge::MockBridge;
pub use mock_wallet::MockWallet;

use mock_bridge::{GATEWAY_MERCHANT_ID, MIT_TOKEN};

pub fn sample_backend_data() -> BackendData {
    BackendData {
        merchant_id: "BCR2DN4T".to_string(),
        merchant_name: "Test Merchant".to_string(),
        gateway_id: "everypay".to_string(),
        gateway_merchant_id: GATEWAY_MERCHANT_ID.to_string(),
        currency: "EUR".to_string(),
        country_code: "EE".to_string(),
        payment_reference: "backend-ref-456".to_string(),
        mobile_access_token: "backend-mat-789".to_string(),
        amount: 10.0,
        label: "Test Payment".to_string(),
    }
}

pub fn sdk_config() -> EverypayConfig {
    EverypayConfig::new(GooglePayEnvironment::Test, "EE")
        .with_credentials("test-user", "test-secret")
        .with_api_url("https://igw-demo.every-pay.com")
}

pub fn sample_token_data(
    payment_reference: &str,
    mobile_access_token: &str,
    token_consent_agreed: bool,
) -> TokenData {
    TokenData {
        payment_reference: payment_reference.to_string(),
        mobile_access_token: mobile_access_token.to_string(),
        signature: "MEUCIQDtest-signature".to_string(),
        intermediate_signing_key: IntermediateSigningKey {
            signed_key: r#"{"keyValue":"test-key","keyExpiration":"1893456000000"}"#.to_string(),
            signatures: vec!["MEYCIQtest-key-signature".to_string()],
        },
        protocol_version: "ECv2".to_string(),
        signed_message: r#"{"encryptedMessage":"test","ephemeralPublicKey":"test","tag":"test"}"#
            .to_string(),
        token_consent_agreed,
    }
}

/// Payment sheet response carrying an ECv2 gateway token
pub fn sample_payment_data() -> PaymentData {
    let token = serde_json::json!({
        "signature": "MEUCIQDtest-signature",
        "intermediateSigningKey": {
            "signedKey": "{\"keyValue\":\"test-key\",\"keyExpiration\":\"1893456000000\"}",
            "signatures": ["MEYCIQtest-key-signature"]
        },
        "protocolVersion": "ECv2",
        "signedMessage": "{\"encryptedMessage\":\"test\"}"
    });
    let data = serde_json::json!({
        "apiVersion": 2,
        "apiVersionMinor": 0,
        "paymentMethodData": {
            "type": "CARD",
            "description": "Visa 1234",
            "info": { "cardNetwork": "VISA", "cardDetails": "1234" },
            "tokenizationData": { "type": "PAYMENT_GATEWAY", "token": token.to_string() }
        }
    });
    PaymentData(data.to_string())
}

enum PressBehavior {
    Echo,
    Fail(GooglePayError),
    Panic,
}

#[derive(Default)]
struct Recorded {
    pressed: Vec<PaymentPayload>,
    successes: Vec<serde_json::Value>,
    errors: Vec<GooglePayError>,
    cancels: usize,
}

/// Handler that records every callback
pub struct RecordingHandler {
    behavior: PressBehavior,
    recorded: Mutex<Recorded>,
}

impl RecordingHandler {
    /// `on_press` answers `{"confirmed": true, "payload": <payload>}`
    pub fn new() -> Self {
        Self::with_behavior(PressBehavior::Echo)
    }

    pub fn failing(error: GooglePayError) -> Self {
        Self::with_behavior(PressBehavior::Fail(error))
    }

    pub fn panicking() -> Self {
        Self::with_behavior(PressBehavior::Panic)
    }

    fn with_behavior(behavior: PressBehavior) -> Self {
        Self {
            behavior,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    pub fn pressed(&self) -> Vec<PaymentPayload> {
        self.recorded.lock().pressed.clone()
    }

    pub fn successes(&self) -> Vec<serde_json::Value> {
        self.recorded.lock().successes.clone()
    }

    pub fn errors(&self) -> Vec<GooglePayError> {
        self.recorded.lock().errors.clone()
    }

    pub fn cancels(&self) -> usize {
        self.recorded.lock().cancels
    }
}

#[async_trait]
impl PaymentHandler for RecordingHandler {
    async fn on_press(&self, payload: PaymentPayload) -> Result<serde_json::Value> {
        self.recorded.lock().pressed.push(payload.clone());
        match &self.behavior {
            PressBehavior::Echo => Ok(serde_json::json!({
                "confirmed": true,
                "payload": payload,
            })),
            PressBehavior::Fail(error) => Err(error.clone()),
            PressBehavior::Panic => panic!("backend unreachable"),
        }
    }

    fn on_payment_success(&self, result: serde_json::Value) {
        self.recorded.lock().successes.push(result);
    }

    fn on_payment_error(&self, error: GooglePayError) {
        self.recorded.lock().errors.push(error);
    }

    fn on_payment_canceled(&self) {
        self.recorded.lock().cancels += 1;
    }
}

/// Handler whose `on_press` waits until released
#[derive(Default)]
pub struct GatedHandler {
    gate: Notify,
    started: Notify,
    running: AtomicUsize,
    max_running: AtomicUsize,
    finished: AtomicUsize,
}

struct Running<'a>(&'a AtomicUsize);

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl GatedHandler {
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub async fn wait_started(&self) {
        self.started.notified().await;
    }

    /// Callbacks currently inside `on_press`
    pub fn running(&self) -> usize {
        self.running.load(Ordering::SeqCst)
    }

    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }

    pub fn finished(&self) -> usize {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentHandler for GatedHandler {
    async fn on_press(&self, _payload: PaymentPayload) -> Result<serde_json::Value> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        let _running = Running(&self.running);
        self.started.notify_one();

        self.gate.notified().await;
        self.finished.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::json!({ "confirmed": true }))
    }
}

fn android(bridge: &Arc<MockBridge>) -> GooglePay {
    GooglePay::with_platform(Platform::Android, bridge.clone())
}

fn backend_button(bridge: &Arc<MockBridge>, handler: &Arc<RecordingHandler>) -> GooglePayButton {
    backend_button_with(bridge, handler.clone())
}

fn backend_button_with(
    bridge: &Arc<MockBridge>,
    handler: Arc<dyn PaymentHandler>,
) -> GooglePayButton {
    let props = GooglePayButtonProps::new(EverypayConfig::new(GooglePayEnvironment::Test, "EE"))
        .with_backend_data(sample_backend_data());
    GooglePayButton::new(props, android(bridge), handler).unwrap()
}

#[tokio::test]
async fn test_backend_mode_end_to_end() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    assert_eq!(button.mount().await, ButtonState::Ready);
    let init = button.init_result().unwrap();
    assert!(init.is_ready);
    assert_eq!(init.gateway_id, "everypay");
    assert_eq!(init.gateway_merchant_id, "test-gateway-123");

    let outcome = button.press().await;
    let PressOutcome::Succeeded(result) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };

    let pressed = handler.pressed();
    assert_eq!(pressed.len(), 1);
    let PaymentPayload::Token(token) = &pressed[0] else {
        panic!("expected token data");
    };
    assert!(token.token_consent_agreed);
    assert_eq!(token.payment_reference, "backend-ref-456");

    // The callback's result reaches on_payment_success untouched
    assert_eq!(handler.successes(), vec![result.clone()]);
    assert_eq!(result["confirmed"], true);
    assert_eq!(result["payload"]["tokenConsentAgreed"], true);
    assert!(handler.errors().is_empty());
    assert_eq!(button.state(), ButtonState::Ready);
    assert!(!button.is_processing());
}

#[tokio::test]
async fn test_second_press_while_processing_is_ignored() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    bridge.hold_operations();
    let first = tokio::spawn({
        let button = button.clone();
        async move { button.press().await }
    });
    bridge.wait_started().await;

    assert!(button.is_processing());
    assert_eq!(button.state(), ButtonState::Processing);
    assert!(bridge.is_processing_payment());
    assert_eq!(button.press().await, PressOutcome::Ignored);
    assert_eq!(button.press().await, PressOutcome::Ignored);
    assert_eq!(bridge.calls().make_payment_with_backend_data, 1);

    bridge.release();
    assert!(matches!(first.await.unwrap(), PressOutcome::Succeeded(_)));
    assert!(!button.is_processing());

    assert!(matches!(button.press().await, PressOutcome::Succeeded(_)));
    assert_eq!(bridge.calls().make_payment_with_backend_data, 2);
    assert_eq!(handler.successes().len(), 2);
}

#[tokio::test]
async fn test_instances_do_not_share_processing_flag() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let first = backend_button(&bridge, &handler);
    let second = backend_button(&Arc::new(MockBridge::ready()), &handler);
    first.mount().await;
    second.mount().await;

    bridge.hold_operations();
    let pending = tokio::spawn({
        let first = first.clone();
        async move { first.press().await }
    });
    bridge.wait_started().await;

    assert!(first.is_processing());
    assert!(!second.is_processing());
    assert!(matches!(second.press().await, PressOutcome::Succeeded(_)));

    bridge.release();
    assert!(matches!(pending.await.unwrap(), PressOutcome::Succeeded(_)));
}

#[tokio::test]
async fn test_cancellation_routes_to_on_payment_canceled() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    bridge.fail_next_operation(GooglePayError::native(
        error_codes::E_PAYMENT_CANCELED,
        "Payment canceled by user",
    ));
    assert_eq!(button.press().await, PressOutcome::Canceled);

    assert_eq!(handler.cancels(), 1);
    assert!(handler.errors().is_empty());
    assert!(handler.pressed().is_empty());
    assert!(!button.is_processing());
}

#[tokio::test]
async fn test_failure_keeps_error_fields_intact() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    let details = serde_json::json!({ "reason": "insufficient_funds" });
    bridge.fail_next_operation(
        GooglePayError::native("PAYMENT_FAILED", "Payment declined").with_details(details.clone()),
    );
    assert!(matches!(button.press().await, PressOutcome::Failed(_)));

    let errors = handler.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, "PAYMENT_FAILED");
    assert_eq!(errors[0].message, "Payment declined");
    assert_eq!(errors[0].details, Some(details));
    assert_eq!(errors[0].kind, ErrorKind::Payment);
    assert_eq!(handler.cancels(), 0);
    assert_eq!(button.state(), ButtonState::Ready);
}

#[tokio::test]
async fn test_payment_recovers_after_error() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    bridge.fail_next_operation(GooglePayError::payment("Network error"));
    assert!(matches!(button.press().await, PressOutcome::Failed(_)));
    assert!(!button.is_processing());

    let outcome = button.press().await;
    assert!(matches!(outcome, PressOutcome::Succeeded(_)));
    let PaymentPayload::Token(token) = &handler.pressed()[0] else {
        panic!("expected token data");
    };
    assert_eq!(token.protocol_version, "ECv2");
}

#[tokio::test]
async fn test_init_failure_then_retry() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    bridge.fail_next_init(GooglePayError::initialization("Google Pay not available"));
    assert_eq!(button.mount().await, ButtonState::Unavailable);
    assert!(button.init_result().is_none());
    assert!(button.render().is_none());
    assert_eq!(button.press().await, PressOutcome::Ignored);

    let errors = handler.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, error_codes::E_INIT_ERROR);
    assert_eq!(errors[0].kind, ErrorKind::Initialization);
    assert!(!button.is_processing());

    // No automatic retry
    assert_eq!(bridge.calls().initialize_with_backend_data, 1);

    assert_eq!(button.mount().await, ButtonState::Ready);
    assert!(button.init_result().unwrap().is_ready);
    assert_eq!(bridge.calls().initialize_with_backend_data, 2);
}

#[tokio::test]
async fn test_mount_is_idempotent_once_ready() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    button.mount().await;
    button.mount().await;
    assert_eq!(bridge.calls().initialize_with_backend_data, 1);
}

#[tokio::test]
async fn test_tokenization_spec_only_after_init() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    assert!(button.allowed_payment_methods().is_empty());
    assert!(button.render().is_none());

    button.mount().await;
    let methods = button.allowed_payment_methods();
    assert_eq!(methods.len(), 1);
    let spec = methods[0].tokenization_specification.as_ref().unwrap();
    assert_eq!(spec.spec_type, "PAYMENT_GATEWAY");
    assert_eq!(spec.parameters.gateway, "everypay");
    assert_eq!(spec.parameters.gateway_merchant_id, "test-gateway-123");
    assert_eq!(methods[0].parameters.allowed_card_networks.len(), 2);
}

#[tokio::test]
async fn test_sdk_token_request() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let props = GooglePayButtonProps::new(sdk_config().with_request_token(true))
        .with_token_label("Card verification");
    let button = GooglePayButton::new(props, android(&bridge), handler.clone()).unwrap();

    assert_eq!(button.mount().await, ButtonState::Ready);
    assert_eq!(bridge.calls().initialize_sdk_mode, 1);
    assert!(matches!(button.press().await, PressOutcome::Succeeded(_)));

    assert_eq!(bridge.calls().request_token_sdk_mode, 1);
    assert_eq!(bridge.calls().make_payment_sdk_mode, 0);
    assert_eq!(bridge.last_token_label().as_deref(), Some("Card verification"));

    let PaymentPayload::TokenRequest(result) = &handler.pressed()[0] else {
        panic!("expected token request result");
    };
    let mit_token = result.mit_token().unwrap();
    assert!(!mit_token.is_empty());
    assert_eq!(mit_token, MIT_TOKEN);
    assert_ne!(mit_token, result.token_data.payment_reference);
    assert_eq!(
        result.payment_details.as_ref().unwrap().payment_state,
        "settled"
    );
}

#[tokio::test]
async fn test_sdk_payment_and_backend_token_selection() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let props = GooglePayButtonProps::new(sdk_config())
        .with_sdk_payment(SdkPaymentData::new(10.0, "Test", "order-1", "a@b.c"));
    let button = GooglePayButton::new(props, android(&bridge), handler.clone()).unwrap();
    button.mount().await;
    button.press().await;
    assert_eq!(bridge.calls().make_payment_sdk_mode, 1);
    assert!(matches!(&handler.pressed()[0], PaymentPayload::Payment(r) if r.status == "success"));

    let bridge = Arc::new(MockBridge::ready());
    let props = GooglePayButtonProps::new(
        EverypayConfig::new(GooglePayEnvironment::Test, "EE").with_request_token(true),
    )
    .with_backend_data(sample_backend_data());
    let button = GooglePayButton::new(props, android(&bridge), handler.clone()).unwrap();
    button.mount().await;
    button.press().await;
    assert_eq!(bridge.calls().request_token_with_backend_data, 1);
    assert_eq!(bridge.calls().make_payment_with_backend_data, 0);
}

#[tokio::test]
async fn test_config_errors_fail_before_any_call() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());

    let both = GooglePayButtonProps::new(sdk_config()).with_backend_data(sample_backend_data());
    let err = GooglePayButton::new(both, android(&bridge), handler.clone()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);

    let neither = GooglePayButtonProps::new(EverypayConfig::new(GooglePayEnvironment::Test, "EE"));
    let err = GooglePayButton::new(neither, android(&bridge), handler.clone()).unwrap_err();
    assert_eq!(err.code, error_codes::INVALID_CONFIG);

    let props = GooglePayButtonProps::new(EverypayConfig::default())
        .with_backend_data(sample_backend_data());
    let err = GooglePayButton::new(
        props,
        GooglePay::with_platform(Platform::Ios, bridge.clone()),
        handler.clone(),
    )
    .unwrap_err();
    assert_eq!(err.kind, ErrorKind::PlatformUnsupported);

    assert_eq!(bridge.calls().total(), 0);
    assert!(handler.errors().is_empty());
}

#[tokio::test]
async fn test_callback_error_goes_to_on_payment_error() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::failing(
        GooglePayError::callback("Backend rejected token")
            .with_details(serde_json::json!({ "status": 502 })),
    ));
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    assert!(matches!(button.press().await, PressOutcome::Failed(_)));
    let errors = handler.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Callback);
    assert_eq!(errors[0].code, error_codes::CALLBACK_ERROR);
    assert_eq!(errors[0].message, "Backend rejected token");
    assert_eq!(errors[0].details.as_ref().unwrap()["status"], 502);
    assert!(handler.successes().is_empty());
    assert!(!button.is_processing());
}

#[tokio::test]
async fn test_callback_cancel_code_is_still_a_callback_error() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::failing(GooglePayError::native(
        error_codes::E_PAYMENT_CANCELED,
        "caller aborted",
    )));
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    button.press().await;
    assert_eq!(handler.cancels(), 0);
    assert_eq!(handler.errors()[0].kind, ErrorKind::Callback);
    assert_eq!(handler.errors()[0].code, error_codes::E_PAYMENT_CANCELED);
}

#[tokio::test]
async fn test_panicking_callback_clears_processing_flag() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::panicking());
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    let PressOutcome::Failed(err) = button.press().await else {
        panic!("expected failure");
    };
    assert_eq!(err.kind, ErrorKind::Callback);
    assert_eq!(err.code, error_codes::CALLBACK_ERROR);
    assert!(err.message.contains("backend unreachable"));
    assert_eq!(handler.errors().len(), 1);
    assert!(!button.is_processing());
    assert_eq!(button.state(), ButtonState::Ready);
}

#[tokio::test]
async fn test_unmount_during_payment_discards_result() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);
    button.mount().await;

    bridge.hold_operations();
    let pending = tokio::spawn({
        let button = button.clone();
        async move { button.press().await }
    });
    bridge.wait_started().await;

    button.unmount();
    bridge.release();
    assert_eq!(pending.await.unwrap(), PressOutcome::Ignored);

    assert!(handler.pressed().is_empty());
    assert!(handler.successes().is_empty());
    assert!(handler.errors().is_empty());
    assert!(!button.is_processing());
    // State updates stop at unmount
    assert_eq!(button.state(), ButtonState::Processing);
    assert_eq!(button.press().await, PressOutcome::Ignored);
}

#[tokio::test]
async fn test_unmounted_button_does_not_initialize() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    button.unmount();
    assert_eq!(button.mount().await, ButtonState::Uninitialized);
    assert_eq!(bridge.calls().total(), 0);
}

#[tokio::test]
async fn test_aborted_press_drops_callback_with_processing_flag() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(GatedHandler::default());
    let button = backend_button_with(&bridge, handler.clone());
    button.mount().await;

    let first = tokio::spawn({
        let button = button.clone();
        async move { button.press().await }
    });
    handler.wait_started().await;
    assert!(button.is_processing());
    assert_eq!(button.press().await, PressOutcome::Ignored);

    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    // No callback keeps running once the flag is released
    assert_eq!(handler.running(), 0);
    assert_eq!(handler.finished(), 0);
    assert!(!button.is_processing());
    assert_eq!(button.state(), ButtonState::Ready);

    let second = tokio::spawn({
        let button = button.clone();
        async move { button.press().await }
    });
    handler.wait_started().await;
    assert_eq!(button.press().await, PressOutcome::Ignored);
    handler.release();

    assert!(matches!(second.await.unwrap(), PressOutcome::Succeeded(_)));
    assert_eq!(handler.max_running(), 1);
    assert_eq!(handler.finished(), 1);
    assert_eq!(bridge.calls().make_payment_with_backend_data, 2);
    assert!(!button.is_processing());
}

#[tokio::test]
async fn test_button_while_initializing() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    bridge.hold_init();
    let mounting = tokio::spawn({
        let button = button.clone();
        async move { button.mount().await }
    });
    bridge.wait_init_started().await;

    assert_eq!(button.state(), ButtonState::Initializing);
    assert!(button.is_processing());
    assert!(button.render().is_none());
    assert!(button.allowed_payment_methods().is_empty());
    assert_eq!(button.press().await, PressOutcome::Ignored);

    // A second mount reports the current state without calling the bridge
    assert_eq!(button.mount().await, ButtonState::Initializing);
    assert_eq!(bridge.calls().initialize_with_backend_data, 1);

    bridge.release_init();
    assert_eq!(mounting.await.unwrap(), ButtonState::Ready);
    assert!(!button.is_processing());
    assert!(button.render().is_some());
    assert!(handler.pressed().is_empty());
    assert_eq!(bridge.calls().total(), 1);
}

#[tokio::test]
async fn test_unmount_during_initialization_discards_result() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    bridge.hold_init();
    let mounting = tokio::spawn({
        let button = button.clone();
        async move { button.mount().await }
    });
    bridge.wait_init_started().await;

    button.unmount();
    bridge.release_init();
    assert_eq!(mounting.await.unwrap(), ButtonState::Initializing);

    assert!(button.init_result().is_none());
    assert!(button.render().is_none());
    assert!(!button.is_processing());
    assert_eq!(button.press().await, PressOutcome::Ignored);
    assert_eq!(bridge.calls().total(), 1);
}

#[tokio::test]
async fn test_unmount_during_failed_initialization_skips_error_callback() {
    let bridge = Arc::new(MockBridge::ready());
    let handler = Arc::new(RecordingHandler::new());
    let button = backend_button(&bridge, &handler);

    bridge.fail_next_init(GooglePayError::native(
        error_codes::E_INIT_ERROR,
        "Google Pay client unavailable",
    ));
    bridge.hold_init();
    let mounting = tokio::spawn({
        let button = button.clone();
        async move { button.mount().await }
    });
    bridge.wait_init_started().await;

    button.unmount();
    bridge.release_init();
    assert_eq!(mounting.await.unwrap(), ButtonState::Initializing);

    assert!(handler.errors().is_empty());
    assert!(!button.is_processing());
    assert_eq!(button.mount().await, ButtonState::Initializing);
    assert_eq!(bridge.calls().total(), 1);
}
