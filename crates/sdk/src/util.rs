use base64::{Engine, engine::general_purpose::STANDARD};

/// Standard padded Base64 (RFC 4648 alphabet, not URL-safe)
pub fn base64_encode(input: impl AsRef<[u8]>) -> String {
    STANDARD.encode(input)
}

/// `Authorization` header value for HTTP Basic auth
pub fn basic_auth_header(username: &str, password: &str) -> String {
    format!("Basic {}", base64_encode(format!("{}:{}", username, password)))
}

/// `Authorization` header value for a bearer token
pub fn bearer_auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
