//! Wallet-backed [`NativeBridge`] implementation.
//!
//! [`EverypayGooglePayHelper`] plays the part of the native module: it owns
//! the Google Pay wallet, and in SDK mode it also talks to EveryPay
//! directly through [`EveryPayClient`].

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use everypay_gpay_types::{
    BackendData, EverypayConfig, GooglePayToken, InitResult, IsReadyToPayRequest, PaymentData,
    PaymentDataRequest, PaymentDetails, SdkPaymentData, SdkPaymentResult, TokenData,
    TokenRequestResult, TokenizationSpecification, defaults, error_codes,
    everypay::{MerchantInfoRequest, MerchantInfoResponse, OpenSessionRequest, PaymentProcessRequest},
    google_pay::{MerchantInfo, TOTAL_PRICE_STATUS_FINAL, TransactionInfo},
};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::{
    bridge::NativeBridge,
    error::{ErrorKind, GooglePayError, Result},
    requests::{EveryPayClient, RequestError},
    wallet::{WalletClient, WalletError},
};

const PAYMENT_IN_PROGRESS: &str = "Payment already in progress";
const OPERATION_IN_PROGRESS: &str = "Operation already in progress";
const SDK_CREDENTIALS_REQUIRED: &str = "Config must include API credentials for SDK mode";
const SUCCESS_STATUS: &str = "success";

/// State established by a successful SDK-mode initialization
#[derive(Debug)]
struct SdkSession {
    config: EverypayConfig,
    client: EveryPayClient,
    api_username: String,
    api_secret: String,
    gateway_id: String,
    gateway_merchant_id: String,
    merchant_id: String,
    merchant_name: String,
}

#[derive(Debug)]
enum Session {
    Backend { config: EverypayConfig },
    Sdk(SdkSession),
}

/// Clears the processing flag when dropped
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool, busy_message: &str) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| GooglePayError::payment(busy_message))?;
        Ok(Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Google Pay + EveryPay integration behind the [`NativeBridge`] contract
pub struct EverypayGooglePayHelper<W> {
    wallet: W,
    http: reqwest::Client,
    session: RwLock<Option<Arc<Session>>>,
    processing: AtomicBool,
}

impl<W: WalletClient> EverypayGooglePayHelper<W> {
    pub fn new(wallet: W) -> Self {
        Self::with_http_client(wallet, reqwest::Client::new())
    }

    pub fn with_http_client(wallet: W, http: reqwest::Client) -> Self {
        Self {
            wallet,
            http,
            session: RwLock::new(None),
            processing: AtomicBool::new(false),
        }
    }

    /// Gateway ids learned at initialization, if any
    pub fn gateway(&self) -> Option<(String, String)> {
        match self.session.read().as_deref()? {
            Session::Sdk(sdk) => Some((sdk.gateway_id.clone(), sdk.gateway_merchant_id.clone())),
            Session::Backend { .. } => None,
        }
    }

    fn current_session(&self) -> Option<Arc<Session>> {
        self.session.read().clone()
    }

    fn backend_config(&self) -> Result<EverypayConfig> {
        match self.current_session().as_deref() {
            Some(Session::Backend { config }) => Ok(config.clone()),
            Some(Session::Sdk(sdk)) => Ok(sdk.config.clone()),
            None => Err(GooglePayError::initialization(
                "Not initialized. Call initializeWithBackendData first",
            )),
        }
    }

    fn sdk_session(&self) -> Result<Arc<Session>> {
        match self.current_session() {
            Some(session) if matches!(*session, Session::Sdk(_)) => Ok(session),
            _ => Err(GooglePayError::initialization(
                "Not initialized. Call initializeSDKMode first",
            )),
        }
    }

    async fn check_readiness(&self, config: &EverypayConfig) -> Result<bool> {
        let request = IsReadyToPayRequest::from_config(config);
        self.wallet
            .is_ready_to_pay(&request)
            .await
            .map_err(WalletError::into_readiness_error)
    }

    async fn load_token(
        &self,
        request: &PaymentDataRequest,
        cancel_message: &str,
    ) -> Result<(PaymentData, GooglePayToken)> {
        let payment_data = self
            .wallet
            .load_payment_data(request)
            .await
            .map_err(|err| match err {
                WalletError::Canceled => GooglePayError::canceled(cancel_message),
                other => other.into(),
            })?;

        let token = payment_data.token().map_err(|err| {
            GooglePayError::new(
                ErrorKind::Payment,
                error_codes::PAYMENT_PARSE_ERROR,
                err.to_string(),
            )
        })?;
        Ok((payment_data, token))
    }

    async fn backend_token(
        &self,
        backend_data: &BackendData,
        token_consent_agreed: bool,
        cancel_message: &str,
    ) -> Result<TokenData> {
        let config = self.backend_config()?;
        let request = PaymentDataRequest::from_backend_data(&config, backend_data);
        let (_, token) = self.load_token(&request, cancel_message).await?;

        Ok(TokenData {
            payment_reference: backend_data.payment_reference.clone(),
            mobile_access_token: backend_data.mobile_access_token.clone(),
            signature: token.signature,
            intermediate_signing_key: token.intermediate_signing_key,
            protocol_version: token.protocol_version,
            signed_message: token.signed_message,
            token_consent_agreed,
        })
    }

    async fn create_payment(
        &self,
        sdk: &SdkSession,
        request: &MerchantInfoRequest,
    ) -> Result<MerchantInfoResponse> {
        let info = sdk
            .client
            .get_merchant_info(&sdk.api_username, &sdk.api_secret, request)
            .await?;
        debug!(
            payment_reference = %info.payment_reference,
            order_reference = %request.order_reference,
            "EveryPay payment created"
        );
        Ok(info)
    }

    fn sheet_request(
        sdk: &SdkSession,
        info: &MerchantInfoResponse,
        total_price: String,
        label: &str,
    ) -> PaymentDataRequest {
        let currency_code = non_empty_or(&info.currency, sdk.config.currency_code());
        let country_code = non_empty_or(&info.descriptor_country, &sdk.config.country_code);

        PaymentDataRequest::new(
            &sdk.config,
            TokenizationSpecification::payment_gateway(&sdk.gateway_id, &sdk.gateway_merchant_id),
            MerchantInfo {
                merchant_id: sdk.merchant_id.clone(),
                merchant_name: sdk.merchant_name.clone(),
            },
            TransactionInfo {
                total_price_status: TOTAL_PRICE_STATUS_FINAL.to_string(),
                total_price,
                currency_code,
                country_code,
                total_price_label: label.to_string(),
            },
        )
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

fn required(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|v| !v.is_empty()).map(str::to_string)
}

fn session_error(err: RequestError) -> GooglePayError {
    let details = err.details();
    let error = GooglePayError::initialization(format!("Failed to open EveryPay session: {err}"));
    match details {
        Some(details) => error.with_details(details),
        None => error,
    }
}

fn rejected_state(state: &str) -> GooglePayError {
    GooglePayError::payment(format!("Payment failed with state: {state}"))
        .with_details(serde_json::json!({ "state": state }))
}

#[async_trait]
impl<W: WalletClient> NativeBridge for EverypayGooglePayHelper<W> {
    async fn initialize_with_backend_data(
        &self,
        config: &EverypayConfig,
        backend_data: &BackendData,
    ) -> Result<InitResult> {
        info!(
            environment = %config.environment,
            gateway_id = %backend_data.gateway_id,
            "Initializing Google Pay in backend mode"
        );

        let is_ready = self.check_readiness(config).await?;
        *self.session.write() = Some(Arc::new(Session::Backend {
            config: config.clone(),
        }));

        Ok(InitResult {
            is_ready,
            gateway_id: backend_data.gateway_id.clone(),
            gateway_merchant_id: backend_data.gateway_merchant_id.clone(),
        })
    }

    async fn initialize_sdk_mode(&self, config: &EverypayConfig) -> Result<InitResult> {
        let (Some(api_username), Some(api_secret), Some(api_url)) = (
            required(&config.api_username),
            required(&config.api_secret),
            required(&config.api_url),
        ) else {
            return Err(GooglePayError::initialization(SDK_CREDENTIALS_REQUIRED));
        };

        info!(
            environment = %config.environment,
            api_url = %api_url,
            account_name = %config.account_name(),
            "Initializing Google Pay in SDK mode"
        );

        let client = EveryPayClient::with_http_client(api_url, self.http.clone());
        let session = client
            .open_session(
                &api_username,
                &api_secret,
                &OpenSessionRequest {
                    api_username: api_username.clone(),
                    account_name: config.account_name().to_string(),
                },
            )
            .await
            .map_err(session_error)?;

        let is_ready = self.check_readiness(config).await?;

        let sdk = SdkSession {
            config: config.clone(),
            client,
            api_username,
            api_secret,
            gateway_id: session.google_pay_gateway_id.to_lowercase(),
            gateway_merchant_id: session.googlepay_gateway_merchant_id.clone(),
            merchant_id: session.googlepay_merchant_identifier.clone(),
            merchant_name: non_empty_or(&session.merchant_name, defaults::MERCHANT_NAME),
        };
        let result = InitResult {
            is_ready,
            gateway_id: sdk.gateway_id.clone(),
            gateway_merchant_id: sdk.gateway_merchant_id.clone(),
        };
        *self.session.write() = Some(Arc::new(Session::Sdk(sdk)));

        debug!(is_ready, gateway_id = %result.gateway_id, "SDK mode initialized");
        Ok(result)
    }

    async fn make_payment_with_backend_data(
        &self,
        backend_data: &BackendData,
    ) -> Result<TokenData> {
        self.backend_config()?;
        let _guard = ProcessingGuard::acquire(&self.processing, PAYMENT_IN_PROGRESS)?;

        info!(payment_reference = %backend_data.payment_reference, "Backend-mode payment");
        self.backend_token(backend_data, false, "Payment canceled by user")
            .await
    }

    async fn make_payment_sdk_mode(
        &self,
        payment_data: &SdkPaymentData,
    ) -> Result<SdkPaymentResult> {
        let session = self.sdk_session()?;
        let Session::Sdk(sdk) = session.as_ref() else {
            return Err(GooglePayError::initialization(
                "Not initialized. Call initializeSDKMode first",
            ));
        };
        let _guard = ProcessingGuard::acquire(&self.processing, PAYMENT_IN_PROGRESS)?;

        let amount = payment_data
            .amount_value()
            .filter(|amount| amount.is_finite() && *amount >= 0.0)
            .ok_or_else(|| {
                GooglePayError::payment(format!("Invalid amount: {}", payment_data.amount))
            })?;

        info!(
            order_reference = %payment_data.order_reference,
            amount,
            "SDK-mode payment"
        );

        let mut request = MerchantInfoRequest::new(
            &sdk.api_username,
            sdk.config.account_name(),
            amount,
            &payment_data.label,
            sdk.config.currency_code(),
            &sdk.config.country_code,
            &payment_data.order_reference,
            &payment_data.customer_email,
        )
        .with_customer_url(sdk.config.customer_url());
        if let Some(customer_ip) = &payment_data.customer_ip {
            request = request.with_customer_ip(customer_ip);
        }

        let info = self.create_payment(sdk, &request).await?;
        let sheet = Self::sheet_request(
            sdk,
            &info,
            format!("{amount:.2}"),
            &payment_data.label,
        );
        let (raw, token) = self.load_token(&sheet, "Payment canceled by user").await?;

        let response = sdk
            .client
            .process_payment(
                &info.mobile_access_token,
                &PaymentProcessRequest::from_token(&info.payment_reference, token, false),
            )
            .await?;

        if response.is_failed() {
            warn!(
                payment_reference = %info.payment_reference,
                state = %response.state,
                "EveryPay rejected payment"
            );
            return Err(rejected_state(&response.state));
        }

        info!(
            payment_reference = %info.payment_reference,
            state = %response.state,
            "SDK-mode payment processed"
        );
        Ok(SdkPaymentResult {
            status: SUCCESS_STATUS.to_string(),
            payment_state: Some(response.state),
            payment_data: Some(raw.0),
        })
    }

    async fn request_token_with_backend_data(
        &self,
        backend_data: &BackendData,
    ) -> Result<TokenData> {
        self.backend_config()?;
        let _guard = ProcessingGuard::acquire(&self.processing, OPERATION_IN_PROGRESS)?;

        info!(payment_reference = %backend_data.payment_reference, "Backend-mode token request");
        self.backend_token(backend_data, true, "Token request canceled by user")
            .await
    }

    async fn request_token_sdk_mode(&self, label: &str) -> Result<TokenRequestResult> {
        let session = self.sdk_session()?;
        let Session::Sdk(sdk) = session.as_ref() else {
            return Err(GooglePayError::initialization(
                "Not initialized. Call initializeSDKMode first",
            ));
        };
        let _guard = ProcessingGuard::acquire(&self.processing, OPERATION_IN_PROGRESS)?;

        let order_reference = uuid::Uuid::new_v4().to_string();
        info!(order_reference = %order_reference, label, "SDK-mode token request");

        let request = MerchantInfoRequest::new(
            &sdk.api_username,
            sdk.config.account_name(),
            0.0,
            label,
            sdk.config.currency_code(),
            &sdk.config.country_code,
            &order_reference,
            "",
        )
        .with_customer_url(sdk.config.customer_url())
        .with_token_request(defaults::TOKEN_AGREEMENT);

        let info = self.create_payment(sdk, &request).await?;
        let sheet = Self::sheet_request(sdk, &info, "0.00".to_string(), label);
        let (_, token) = self
            .load_token(&sheet, "Token request canceled by user")
            .await?;

        let body = PaymentProcessRequest::from_token(&info.payment_reference, token, true);
        let response = sdk
            .client
            .process_payment(&info.mobile_access_token, &body)
            .await?;

        if response.is_failed() {
            warn!(
                payment_reference = %info.payment_reference,
                state = %response.state,
                "EveryPay rejected token request"
            );
            return Err(rejected_state(&response.state));
        }

        let payment_details = PaymentDetails {
            payment_reference: response
                .payment_reference
                .clone()
                .unwrap_or_else(|| info.payment_reference.clone()),
            payment_state: response.state.clone(),
            cc_details: response.cc_details.map(Into::into),
        };
        if payment_details
            .cc_details
            .as_ref()
            .and_then(|cc| cc.token.as_ref())
            .is_none()
        {
            warn!(payment_reference = %info.payment_reference, "No MIT token in response");
        }

        Ok(TokenRequestResult {
            token_data: TokenData {
                payment_reference: info.payment_reference,
                mobile_access_token: info.mobile_access_token,
                signature: body.signature,
                intermediate_signing_key: body.intermediate_signing_key,
                protocol_version: body.protocol_version,
                signed_message: body.signed_message,
                token_consent_agreed: true,
            },
            payment_details: Some(payment_details),
        })
    }

    fn is_processing_payment(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }
}
