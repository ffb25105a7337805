use serde_json::{json, Value};
use std::time::Duration;

use crate::cli::utils::{output_fields, output_success};
use crate::cli::OutputFormat;
use crate::config;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base = url
        .or_else(|| std::env::var("NOVA_API_URL").ok())
        .unwrap_or_else(|| format!("http://localhost:{}", config::config().api.port));
    let base = base.trim_end_matches('/').to_string();

    let client = reqwest::Client::builder().timeout(PING_TIMEOUT).build()?;
    let health = probe(&client, &format!("{}/health", base)).await;
    let dbz = probe(&client, &format!("{}/dbz", base)).await;

    let healthy = health.0 == Some(200) && dbz.0 == Some(200);
    let report = json!({
        "url": base,
        "health": { "status": health.0, "body": health.1 },
        "dbz": { "status": dbz.0, "body": dbz.1 },
    });

    match output_format {
        OutputFormat::Json if healthy => output_success(output_format, "Server is up", Some(report))?,
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ "success": false, "report": report }))?)
        }
        OutputFormat::Text => output_fields(&[
            ("server", base.clone()),
            ("health", describe(&health)),
            ("dbz", describe(&dbz)),
        ]),
    }

    if !healthy {
        anyhow::bail!("{} is not healthy", base);
    }
    Ok(())
}

/// Status code (None when unreachable) and JSON body or error text
async fn probe(client: &reqwest::Client, url: &str) -> (Option<u16>, Value) {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.json::<Value>().await.unwrap_or(Value::Null);
            (Some(status), body)
        }
        Err(e) => (None, Value::String(e.to_string())),
    }
}

fn describe(result: &(Option<u16>, Value)) -> String {
    match result {
        (Some(status), body) => format!("{} {}", status, body),
        (None, error) => format!("unreachable ({})", error.as_str().unwrap_or("unknown error")),
    }
}
