use std::time::Duration;

use anyhow::Context;
use clap::Args;
use serde_json::Value;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct PingArgs {
    #[arg(long, help = "Base URL of the API server", default_value = "http://localhost:4000")]
    pub url: String,

    #[arg(long, help = "Request timeout in seconds", default_value_t = 5)]
    pub timeout: u64,
}

pub async fn handle(args: PingArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = url::Url::parse(&args.url).with_context(|| format!("invalid server URL: {}", args.url))?;
    let health_url = base.join("/api/health")?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .build()?;

    let response = client
        .get(health_url.clone())
        .send()
        .await
        .with_context(|| format!("could not reach {}", health_url))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(&output_format, &format!("{} is healthy", base), Some(body))
    } else {
        output_error(&output_format, &format!("{} responded {} ({})", base, status, body))?;
        anyhow::bail!("health check failed with status {}", status)
    }
}
