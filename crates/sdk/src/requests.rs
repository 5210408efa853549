use everypay_gpay_types::everypay::{
    MerchantInfoRequest, MerchantInfoResponse, ONEOFF_PAYMENT_PATH, OPEN_SESSION_PATH,
    OpenSessionRequest, OpenSessionResponse, PAYMENT_DATA_PATH, PaymentProcessRequest,
    PaymentProcessResponse,
};
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{debug, warn};

use crate::util::{basic_auth_header, bearer_auth_header};

/// Errors from the EveryPay REST API
#[derive(Error, Debug)]
pub enum RequestError {
    /// Transport error from reqwest
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("EveryPay returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RequestError {
    /// Structured details for the bridge error, where the server gave any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            RequestError::Status { status, body } => {
                let body = serde_json::from_str::<serde_json::Value>(body)
                    .unwrap_or_else(|_| serde_json::Value::String(body.clone()));
                Some(serde_json::json!({ "status": status, "body": body }))
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RequestError>;

enum Auth<'a> {
    Basic { username: &'a str, secret: &'a str },
    Bearer(&'a str),
}

/// Client for the EveryPay Google Pay endpoints.
///
/// Every call issues exactly one POST; nothing is retried.
#[derive(Debug, Clone)]
pub struct EveryPayClient {
    base_url: String,
    http: reqwest::Client,
}

impl EveryPayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, R>(&self, path: &str, auth: Auth<'_>, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.build_url(path);
        debug!(url = %url, "EveryPay request");

        let authorization = match auth {
            Auth::Basic { username, secret } => basic_auth_header(username, secret),
            Auth::Bearer(token) => bearer_auth_header(token),
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", authorization)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(url = %url, status = %status, "EveryPay request failed");
            return Err(RequestError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// `POST /api/v4/google_pay/open_session` with Basic auth
    pub async fn open_session(
        &self,
        username: &str,
        secret: &str,
        body: &OpenSessionRequest,
    ) -> Result<OpenSessionResponse> {
        self.post(
            OPEN_SESSION_PATH,
            Auth::Basic { username, secret },
            body,
        )
        .await
    }

    /// `POST /api/v4/payments/oneoff` with Basic auth
    pub async fn get_merchant_info(
        &self,
        username: &str,
        secret: &str,
        body: &MerchantInfoRequest,
    ) -> Result<MerchantInfoResponse> {
        self.post(
            ONEOFF_PAYMENT_PATH,
            Auth::Basic { username, secret },
            body,
        )
        .await
    }

    /// `POST /api/v4/google_pay/payment_data` with the mobile access token
    pub async fn process_payment(
        &self,
        auth_token: &str,
        body: &PaymentProcessRequest,
    ) -> Result<PaymentProcessResponse> {
        self.post(PAYMENT_DATA_PATH, Auth::Bearer(auth_token), body)
            .await
    }
}

/// Open an EveryPay Google Pay session
pub async fn open_ep_session(
    url: &str,
    user: &str,
    secret: &str,
    body: &OpenSessionRequest,
) -> Result<OpenSessionResponse> {
    EveryPayClient::new(url).open_session(user, secret, body).await
}

/// Create a one-off payment and fetch its merchant info
pub async fn get_merchant_info(
    url: &str,
    user: &str,
    secret: &str,
    body: &MerchantInfoRequest,
) -> Result<MerchantInfoResponse> {
    EveryPayClient::new(url)
        .get_merchant_info(user, secret, body)
        .await
}

/// Submit a Google Pay token for processing
pub async fn process_payment(
    url: &str,
    auth_token: &str,
    body: &PaymentProcessRequest,
) -> Result<PaymentProcessResponse> {
    EveryPayClient::new(url)
        .process_payment(auth_token, body)
        .await
}
