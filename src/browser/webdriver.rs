//! [`Browser`] over a W3C WebDriver session (chromedriver, geckodriver, ...).

use super::{Browser, Locator};
use crate::error::BrowserError;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument};

/// Delay between two checks of a bounded wait.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

pub struct WebDriverBrowser {
    client: Client,
}

impl WebDriverBrowser {
    /// Start a session on the WebDriver server at `webdriver_url`.
    ///
    /// With `headless`, both Chrome and Firefox are asked to run without a window.
    #[instrument(level = "info", skip_all, fields(%webdriver_url, headless))]
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self, BrowserError> {
        let mut builder = ClientBuilder::native();
        if headless {
            let mut capabilities = serde_json::Map::new();
            capabilities.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu"] }),
            );
            capabilities.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
            builder.capabilities(capabilities);
        }

        let client = builder.connect(webdriver_url).await?;
        info!("WebDriver session started");
        Ok(Self { client })
    }
}

/// The element is not in the DOM (yet, or any more).
fn is_absent(e: &CmdError) -> bool {
    e.is_no_such_element() || e.is_stale_element_reference()
}

fn lookup_error(e: CmdError, locator: Locator) -> BrowserError {
    if e.is_no_such_element() {
        BrowserError::NotFound(locator.to_string())
    } else {
        BrowserError::Command(e)
    }
}

impl Browser for WebDriverBrowser {
    type Element = Element;

    #[instrument(level = "info", skip(self))]
    async fn open(&self, url: &str) -> Result<(), BrowserError> {
        self.client.goto(url).await?;
        Ok(())
    }

    async fn find(&self, locator: Locator) -> Result<Element, BrowserError> {
        let css = locator.to_css();
        self.client
            .find(fantoccini::Locator::Css(&css))
            .await
            .map_err(|e| lookup_error(e, locator))
    }

    async fn find_within(
        &self,
        parent: &Element,
        locator: Locator,
    ) -> Result<Element, BrowserError> {
        let css = locator.to_css();
        parent
            .find(fantoccini::Locator::Css(&css))
            .await
            .map_err(|e| lookup_error(e, locator))
    }

    async fn find_all_within(
        &self,
        parent: &Element,
        locator: Locator,
    ) -> Result<Vec<Element>, BrowserError> {
        let css = locator.to_css();
        Ok(parent.find_all(fantoccini::Locator::Css(&css)).await?)
    }

    async fn text(&self, element: &Element) -> Result<String, BrowserError> {
        Ok(element.text().await?)
    }

    async fn attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, BrowserError> {
        Ok(element.attr(name).await?)
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_until_visible(
        &self,
        locator: Locator,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let css = locator.to_css();
        let deadline = Instant::now() + timeout;
        loop {
            let displayed = match self.client.find(fantoccini::Locator::Css(&css)).await {
                Ok(element) => element.is_displayed().await,
                Err(e) => Err(e),
            };
            match displayed {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(e) if is_absent(&e) => {}
                Err(e) => return Err(BrowserError::Command(e)),
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    what: locator.to_string(),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_until_page_contains(
        &self,
        text: &str,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.client.source().await?.contains(text) {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout {
                    what: format!("text {text:?}"),
                    timeout,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn click(&self, locator: Locator) -> Result<(), BrowserError> {
        debug!(%locator, "Clicking");
        self.find(locator).await?.click().await?;
        Ok(())
    }

    async fn input_text(&self, locator: Locator, text: &str) -> Result<(), BrowserError> {
        let element = self.find(locator).await?;
        element.clear().await?;
        element.send_keys(text).await?;
        Ok(())
    }

    async fn close(self) -> Result<(), BrowserError> {
        self.client.close().await?;
        Ok(())
    }
}
