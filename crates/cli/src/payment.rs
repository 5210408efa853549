use anyhow::Context as _;
use clap::{Args, Parser};
use everypay_gpay_types::{
    BackendData, defaults,
    everypay::{MerchantInfoRequest, MerchantInfoResponse},
};
use tracing::info;

use crate::{Context, output, session};

/// Fields of a one-off payment
#[derive(Args, PartialEq, Clone, Debug)]
pub struct PaymentArgs {
    /// Amount in major units, e.g. 10.50
    #[arg(long = "amount")]
    pub amount: f64,

    /// Label shown on the payment sheet
    #[arg(long = "label")]
    pub label: String,

    /// Merchant order reference
    #[arg(long = "order-reference")]
    pub order_reference: String,

    #[arg(long = "customer-email")]
    pub customer_email: String,

    #[arg(long = "customer-ip")]
    pub customer_ip: Option<String>,
}

impl PaymentArgs {
    fn request(&self, ctx: &Context) -> anyhow::Result<MerchantInfoRequest> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            anyhow::bail!("Invalid amount: {}", self.amount);
        }

        let config = &ctx.manifest.everypay;
        let mut request = MerchantInfoRequest::new(
            &ctx.credentials.api_username,
            config.account_name(),
            self.amount,
            &self.label,
            config.currency_code(),
            &config.country_code,
            &self.order_reference,
            &self.customer_email,
        )
        .with_customer_url(config.customer_url());
        if let Some(customer_ip) = &self.customer_ip {
            request = request.with_customer_ip(customer_ip);
        }
        Ok(request)
    }
}

async fn create_payment(
    ctx: &Context,
    request: &MerchantInfoRequest,
) -> anyhow::Result<MerchantInfoResponse> {
    let response = ctx
        .client()
        .get_merchant_info(
            &ctx.credentials.api_username,
            &ctx.credentials.api_secret,
            request,
        )
        .await
        .context("Failed to create EveryPay payment")?;
    info!(
        payment_reference = %response.payment_reference,
        order_reference = %request.order_reference,
        "Payment created"
    );
    Ok(response)
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct CreatePaymentCommand {
    #[command(flatten)]
    pub payment: PaymentArgs,

    /// Request a merchant-initiated transaction token (unscheduled agreement)
    #[arg(long = "request-token", default_value = "false")]
    pub request_token: bool,
}

impl CreatePaymentCommand {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let mut request = self.payment.request(ctx)?;
        if self.request_token {
            request = request.with_token_request(defaults::TOKEN_AGREEMENT);
        }
        let response = create_payment(ctx, &request).await?;
        output::print(&response, &ctx.format)
    }
}

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct BackendDataCommand {
    #[command(flatten)]
    pub payment: PaymentArgs,
}

impl BackendDataCommand {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let request = self.payment.request(ctx)?;
        let session = session::open_session(ctx, None).await?;
        let merchant_info = create_payment(ctx, &request).await?;

        let backend_data = BackendData::from_responses(
            &session,
            &merchant_info,
            self.payment.amount,
            &self.payment.label,
        );
        output::print(&backend_data, &ctx.format)
    }
}
