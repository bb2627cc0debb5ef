//! Contains the HTTP client used to issue the load test requests.

use std::time::Duration;

use reqwest::Client;

/// Issues `GET` requests to a fixed URL.
#[derive(Debug)]
pub struct HttpRemote {
    client: Client,
    url: String,
}

impl HttpRemote {
    /// Creates a new `HttpRemote` for the given URL, with a timeout applied to every request.
    ///
    /// The URL is not validated here. A malformed URL fails every request instead.
    pub fn new(url: String, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    /// The URL that this remote requests.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sends one request and returns the response status code.
    ///
    /// The response body is read to completion, so a timeout covers the full exchange.
    pub async fn get(&self) -> reqwest::Result<u16> {
        let response = self.client.get(self.url.as_str()).send().await?;
        let status = response.status();
        response.bytes().await?;
        Ok(status.as_u16())
    }
}
