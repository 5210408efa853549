use everypay_gpay_types::error_codes;
use serde::Serialize;
use thiserror::Error;

/// Category of a [`GooglePayError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller misuse: both or neither mode signals, missing fields
    Configuration,
    /// The host platform cannot run Google Pay
    PlatformUnsupported,
    /// Native initialization failed
    Initialization,
    /// The user dismissed the payment sheet
    PaymentCanceled,
    /// Processing, network or parse failure
    Payment,
    /// The caller's own press callback failed
    Callback,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Configuration => write!(f, "configuration"),
            ErrorKind::PlatformUnsupported => write!(f, "platform_unsupported"),
            ErrorKind::Initialization => write!(f, "initialization"),
            ErrorKind::PaymentCanceled => write!(f, "payment_canceled"),
            ErrorKind::Payment => write!(f, "payment"),
            ErrorKind::Callback => write!(f, "callback"),
        }
    }
}

/// Error carried through the bridge and delivered to button callbacks.
///
/// `code` is the exact string the native layer (or this crate) produced;
/// callers match on it, so it is never rewritten once set.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[error("[{code}] {message}")]
pub struct GooglePayError {
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl GooglePayError {
    pub fn new(kind: ErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Error as reported by the native layer; the kind follows from the code
    pub fn native(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let kind = match code.as_str() {
            error_codes::E_PAYMENT_CANCELED | error_codes::PAYMENT_CANCELLED => {
                ErrorKind::PaymentCanceled
            }
            error_codes::E_INIT_ERROR
            | error_codes::E_ACTIVITY_DOES_NOT_EXIST
            | error_codes::E_UNABLE_TO_DETERMINE_GOOGLE_PAY_READINESS
            | error_codes::INITIALIZATION_FAILED => ErrorKind::Initialization,
            _ => ErrorKind::Payment,
        };
        Self::new(kind, code, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::Configuration,
            error_codes::INVALID_CONFIG,
            message,
        )
    }

    pub fn platform_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::PlatformUnsupported,
            error_codes::UNSUPPORTED_PLATFORM,
            message,
        )
    }

    pub fn canceled(message: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::PaymentCanceled,
            error_codes::E_PAYMENT_CANCELED,
            message,
        )
    }

    pub fn payment(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Payment, error_codes::E_PAYMENT_ERROR, message)
    }

    pub fn initialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Initialization, error_codes::E_INIT_ERROR, message)
    }

    /// Error raised by the caller's press callback
    pub fn callback(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Callback, error_codes::CALLBACK_ERROR, message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Re-tag the error, keeping code, message and details intact
    pub fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Cancellation is recognised by code, never by message text
    pub fn is_canceled(&self) -> bool {
        self.kind == ErrorKind::PaymentCanceled || self.code == error_codes::E_PAYMENT_CANCELED
    }
}

impl From<crate::requests::RequestError> for GooglePayError {
    fn from(err: crate::requests::RequestError) -> Self {
        let details = err.details();
        let error = GooglePayError::payment(err.to_string());
        match details {
            Some(details) => error.with_details(details),
            None => error,
        }
    }
}

/// Result type alias for bridge and button operations
pub type Result<T> = std::result::Result<T, GooglePayError>;
