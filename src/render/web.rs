use super::{RenderError, Renderer};
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Renders routes of a running site in a WebDriver-controlled browser
///
/// The session is opened on the first render, not on construction, so a run
/// with nothing to render never needs a driver.
pub struct WebDriverRenderer {
    webdriver_url: String,
    base_url: Url,
    settle: Duration,
    client: Option<Client>,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: impl Into<String>, base_url: Url, settle: Duration) -> Self {
        Self {
            webdriver_url: webdriver_url.into(),
            base_url,
            settle,
            client: None,
        }
    }

    /// End the browser session, if one was opened
    pub async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver client: {}", e);
            }
        }
    }

    async fn client(&mut self) -> Result<&mut Client, RenderError> {
        if self.client.is_none() {
            ::log::debug!("Connecting to WebDriver");
            let client = connect_to_webdriver(&self.webdriver_url)
                .await
                .ok_or_else(|| RenderError::Connect(self.webdriver_url.clone()))?;
            self.client = Some(client);
        }
        self.client
            .as_mut()
            .ok_or_else(|| RenderError::Connect(self.webdriver_url.clone()))
    }
}

impl Renderer for WebDriverRenderer {
    async fn render(&mut self, route: &str) -> Result<String, RenderError> {
        let url = self
            .base_url
            .join(route)
            .map_err(|e| RenderError::Navigation {
                route: route.to_string(),
                reason: e.to_string(),
            })?;
        let settle = self.settle;
        let mut reconnected = false;

        loop {
            let client = self.client().await?;
            let loaded = load(client, url.as_str(), settle).await;
            match loaded {
                Ok(html) => {
                    ::log::debug!("Rendered {} ({} bytes)", url, html.len());
                    return Ok(html);
                }
                Err(e) if !reconnected && is_lost_session(&e) => {
                    ::log::warn!("Lost WebDriver session while loading {}; reconnecting", url);
                    self.client = None;
                    reconnected = true;
                }
                Err(e) => {
                    return Err(RenderError::Navigation {
                        route: route.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Navigate, let client-side rendering settle, then take the page source
async fn load(client: &Client, url: &str, settle: Duration) -> Result<String, CmdError> {
    client.goto(url).await?;
    tokio::time::sleep(settle).await;
    client.source().await
}

fn is_lost_session(error: &CmdError) -> bool {
    let message = error.to_string();
    message.contains("Unable to find session") || message.contains("invalid session id")
}

/// Connects to the WebDriver instance, trying common local ports as fallbacks
async fn connect_to_webdriver(webdriver_url: &str) -> Option<Client> {
    match ClientBuilder::native().connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Some(client);
        }
        Err(e) => {
            ::log::error!(
                "Failed to connect to WebDriver at {}: {}",
                webdriver_url,
                e
            );
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // geckodriver / Selenium default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = ClientBuilder::native().connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Some(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    None
}
