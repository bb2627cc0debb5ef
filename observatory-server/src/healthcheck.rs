use anyhow::Result;

use crate::config::Config;

/// Sends a request to `/health` of a server running with the given config.
///
/// An unspecified bind address (`0.0.0.0`) is contacted via loopback.
pub async fn healthcheck(config: Config) -> Result<()> {
    let mut addr = config.http_addr;
    if addr.ip().is_unspecified() {
        addr.set_ip([127, 0, 0, 1].into());
    }

    let client = reqwest::Client::new();
    let url = format!("http://{addr}/health");

    tracing::debug!("sending healthcheck request to {}", url);
    let response = client.get(&url).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("Bad Status: {}", response.status());
    }

    tracing::info!("OK");
    Ok(())
}
