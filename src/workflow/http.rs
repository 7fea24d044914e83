use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub async fn http_get<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    service_name: &str,
) -> Result<T> {
    tracing::debug!("{} GET: url={}", service_name, url);

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch from {}", service_name))?;

    let status = response.status();
    let response_text = response.text().await.unwrap_or_default();

    tracing::debug!(
        "{} response: status={}, body={}",
        service_name,
        status,
        response_text
    );

    if !status.is_success() {
        tracing::error!("{} API error: {} - {}", service_name, status, response_text);
        bail!("{} API error: {} - {}", service_name, status, response_text);
    }

    serde_json::from_str(&response_text)
        .with_context(|| format!("Failed to parse {} response", service_name))
}

/// POST a JSON body. An empty or non-JSON success body reads as `null`.
pub async fn http_post<B: Serialize>(
    client: &reqwest::Client,
    url: &str,
    body: &B,
    service_name: &str,
) -> Result<serde_json::Value> {
    tracing::debug!("{} POST: url={}", service_name, url);

    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .with_context(|| format!("Failed to post to {}", service_name))?;

    let status = response.status();
    let response_text = response.text().await.unwrap_or_default();

    tracing::debug!(
        "{} response: status={}, body={}",
        service_name,
        status,
        response_text
    );

    if !status.is_success() {
        let message = serde_json::from_str::<serde_json::Value>(&response_text)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(response_text);
        tracing::error!("{} API error: {} - {}", service_name, status, message);
        bail!("{} API error: {} - {}", service_name, status, message);
    }

    Ok(serde_json::from_str(&response_text).unwrap_or(serde_json::Value::Null))
}
