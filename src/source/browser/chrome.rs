//! Chrome over CDP.

use super::crawler::{LargeImage, ResultsPage};
use super::BrowserSettings;
use crate::error::{Error, Result};
use crate::http::USER_AGENT_STRING;
use crate::source::Engine;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Thumbnails on the image results page.
const THUMBNAIL_SELECTOR: &str = "img[jsname='Q4LuWd']";

/// The large preview shown after a thumbnail click.
const LARGE_IMAGE_SELECTOR: &str = "img.n3VNCb";

/// Consent buttons, tried in order.
const CONSENT_SELECTORS: [&str; 3] = [
    "button[aria-label='Accept all']",
    "button[aria-label='I agree']",
    "#L2AGLb",
];

const SCROLL_SCRIPT: &str = "window.scrollBy(0, document.body.scrollHeight);";

fn browser_error(e: impl std::fmt::Display) -> Error {
    Error::discovery(Engine::Browser, e)
}

/// A launched browser and the task pumping its CDP connection.
///
/// Call [`ChromeSession::close`] when done; dropping the session without it
/// still stops the handler task.
pub(crate) struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch Chrome.
    pub(crate) async fn launch(settings: &BrowserSettings) -> Result<Self> {
        info!("Launching browser (headless={})", !settings.show_browser);

        let mut builder = BrowserConfig::builder()
            .window_size(1366, 768)
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-blink-features=AutomationControlled")
            .arg(format!("--user-agent={}", USER_AGENT_STRING));

        // `with_head` means NOT headless.
        if settings.show_browser {
            builder = builder.with_head();
        }

        let config = builder
            .build()
            .map_err(|e| browser_error(format!("invalid browser config: {}", e)))?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| browser_error(format!("failed to launch browser: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self { browser, handler })
    }

    /// Open `url` in a new tab.
    pub(crate) async fn open(&mut self, url: &str) -> Result<ChromePage> {
        debug!("[browser] goto: {}", url);
        let page = self.browser.new_page(url).await.map_err(browser_error)?;
        Ok(ChromePage { page })
    }

    /// Shut the browser down.
    pub(crate) async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            debug!("[browser] close failed: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler.abort();
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// A Google Images results tab.
pub(crate) struct ChromePage {
    page: Page,
}

impl ChromePage {
    /// Click the first consent button found, if any.
    pub(crate) async fn dismiss_consent(&mut self) {
        for selector in CONSENT_SELECTORS {
            let Ok(buttons) = self.page.find_elements(selector).await else {
                continue;
            };
            let Some(button) = buttons.first() else {
                continue;
            };
            if button.click().await.is_ok() {
                debug!("[browser] clicked consent: {}", selector);
                tokio::time::sleep(Duration::from_secs(1)).await;
                return;
            }
        }
    }
}

#[async_trait]
impl ResultsPage for ChromePage {
    async fn thumbnail_count(&mut self) -> usize {
        self.page
            .find_elements(THUMBNAIL_SELECTOR)
            .await
            .map(|thumbs| thumbs.len())
            .unwrap_or(0)
    }

    async fn click_thumbnail(&mut self, index: usize) -> Result<()> {
        let thumbs = self
            .page
            .find_elements(THUMBNAIL_SELECTOR)
            .await
            .map_err(browser_error)?;
        let thumb = thumbs
            .get(index)
            .ok_or_else(|| browser_error(format!("thumbnail #{} disappeared", index + 1)))?;
        thumb.click().await.map_err(browser_error)?;
        Ok(())
    }

    async fn large_images(&mut self, max: usize) -> Vec<LargeImage> {
        let script = format!(
            "Array.from(document.querySelectorAll(\"{}\")).slice(0, {}).map(img => ({{ \
                src: img.getAttribute('src') || '', \
                width: img.naturalWidth || 0, \
                height: img.naturalHeight || 0 \
            }}))",
            LARGE_IMAGE_SELECTOR, max
        );
        match self.page.evaluate(script).await {
            Ok(result) => result.into_value().unwrap_or_default(),
            Err(e) => {
                debug!("[browser] reading large images failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn scroll(&mut self) {
        if let Err(e) = self.page.evaluate(SCROLL_SCRIPT).await {
            debug!("[browser] scroll failed: {}", e);
        }
    }
}
