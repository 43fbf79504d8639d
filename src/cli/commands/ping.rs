use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::{
    utils::{output_error, output_success},
    OutputFormat,
};

pub async fn handle(url: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let endpoint = format!("{}/health", url.trim_end_matches('/'));

    let response = reqwest::Client::new()
        .get(&endpoint)
        .send()
        .await
        .with_context(|| format!("could not reach {}", endpoint))?;

    let status = response.status();
    let body: Value = response.json().await.unwrap_or(Value::Null);

    if status.is_success() {
        output_success(
            output_format,
            &format!("{} is healthy", url),
            Some(json!({ "status": status.as_u16(), "health": body })),
        )
    } else {
        output_error(
            output_format,
            &format!("{} answered {}", endpoint, status),
            Some("UNHEALTHY"),
        )?;
        anyhow::bail!("server unhealthy ({})", status)
    }
}
