use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use everypay_gpay_types::{GooglePayToken, everypay::PaymentProcessRequest};
use tracing::{info, warn};

use crate::{Context, output};

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct ProcessPaymentCommand {
    /// JSON file with the token (TokenData as returned by the app, or the raw gateway token)
    #[arg(long = "token-file")]
    pub token_file: PathBuf,

    /// Payment reference (defaults to paymentReference in the token file)
    #[arg(long = "payment-reference")]
    pub payment_reference: Option<String>,

    /// Mobile access token (defaults to mobileAccessToken in the token file)
    #[arg(
        long = "access-token",
        env = "EVERYPAY_MOBILE_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: Option<String>,

    /// The customer agreed to store the card for later charges
    #[arg(long = "consent", default_value = "false")]
    pub consent: bool,
}

impl ProcessPaymentCommand {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let content = fs::read_to_string(&self.token_file)
            .with_context(|| format!("Failed to read {}", self.token_file.display()))?;
        let (request, access_token) = self.build_request(&content)?;

        info!(
            payment_reference = %request.payment_reference,
            token_consent_agreed = request.token_consent_agreed,
            "Submitting Google Pay token"
        );
        let response = ctx
            .client()
            .process_payment(&access_token, &request)
            .await
            .context("Failed to process payment")?;

        output::print(&response, &ctx.format)?;
        if response.is_failed() {
            warn!(state = %response.state, "Payment not accepted");
            anyhow::bail!("Payment failed with state: {}", response.state);
        }
        Ok(())
    }

    fn build_request(&self, content: &str) -> anyhow::Result<(PaymentProcessRequest, String)> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Token file is not valid JSON")?;
        let token: GooglePayToken = serde_json::from_value(value.clone())
            .context("Token file is missing signature, intermediateSigningKey, protocolVersion or signedMessage")?;

        let from_file = |key: &str| value.get(key).and_then(|v| v.as_str()).map(str::to_string);
        let payment_reference = self
            .payment_reference
            .clone()
            .or_else(|| from_file("paymentReference"))
            .context("No payment reference. Pass --payment-reference")?;
        let access_token = self
            .access_token
            .clone()
            .or_else(|| from_file("mobileAccessToken"))
            .context("No mobile access token. Pass --access-token")?;

        Ok((
            PaymentProcessRequest::from_token(payment_reference, token, self.consent),
            access_token,
        ))
    }
}
