use anyhow::Context as _;
use clap::Parser;
use everypay_gpay_types::everypay::{OpenSessionRequest, OpenSessionResponse};
use tracing::debug;

use crate::{Context, output};

#[derive(Parser, PartialEq, Clone, Debug)]
pub struct OpenSessionCommand {
    /// EveryPay processing account (defaults to the manifest's accountName, then EUR3D1)
    #[arg(long = "account-name")]
    pub account_name: Option<String>,
}

impl OpenSessionCommand {
    pub async fn execute(&self, ctx: &Context) -> anyhow::Result<()> {
        let response = open_session(ctx, self.account_name.as_deref()).await?;
        output::print(&response, &ctx.format)
    }
}

/// Open a Google Pay session with the context's credentials
pub async fn open_session(
    ctx: &Context,
    account_name: Option<&str>,
) -> anyhow::Result<OpenSessionResponse> {
    let account_name = account_name.unwrap_or_else(|| ctx.manifest.everypay.account_name());
    debug!(
        manifest = %ctx.manifest_path.display(),
        api_url = %ctx.credentials.api_url,
        account_name,
        "Opening Google Pay session"
    );

    ctx.client()
        .open_session(
            &ctx.credentials.api_username,
            &ctx.credentials.api_secret,
            &OpenSessionRequest {
                api_username: ctx.credentials.api_username.clone(),
                account_name: account_name.to_string(),
            },
        )
        .await
        .context("Failed to open EveryPay session")
}
