use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::error::CdpError;
use chromiumoxide::Page;
use futures::{Stream, StreamExt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::driver::{PageDriver, ScrapeError};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Clone, Debug)]
pub struct BrowserOptions {
    pub user_agent: String,
    pub headless: bool,
    pub executable: Option<PathBuf>,
}

pub struct ChromePage {
    browser: Browser,
    page: Page,
    handler: Option<JoinHandle<()>>,
}

impl ChromePage {
    pub async fn launch(options: &BrowserOptions) -> Result<Self, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .arg(format!("--user-agent={}", options.user_agent));
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &options.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(ScrapeError::Launch)?;

        let (browser, events) = Browser::launch(config)
            .await
            .map_err(|err| ScrapeError::Launch(err.to_string()))?;
        let handler = tokio::spawn(async move {
            let (events, errors) = drive_handler(events).await;
            debug!("Browser handler finished after {} events ({} errors)", events, errors);
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(err) => {
                handler.abort();
                return Err(ScrapeError::Launch(err.to_string()));
            }
        };
        info!("Browser session started");
        Ok(Self {
            browser,
            page,
            handler: Some(handler),
        })
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(err)) => Err(ScrapeError::Navigation(err.to_string())),
            Err(_) => Err(ScrapeError::NavigationTimeout(timeout)),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScrapeError> {
        let started = Instant::now();
        loop {
            if let Ok(found) = self.page.find_elements(selector).await {
                if !found.is_empty() {
                    return Ok(());
                }
            }
            if started.elapsed() >= timeout {
                return Err(ScrapeError::ContentTimeout {
                    selector: selector.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>, ScrapeError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(extraction_error)?;
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element.inner_text().await.map_err(extraction_error)?;
            out.push(text.unwrap_or_default());
        }
        Ok(out)
    }

    async fn query_attributes(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, ScrapeError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(extraction_error)?;
        let mut out = Vec::with_capacity(elements.len());
        for element in elements {
            out.push(element.attribute(attribute).await.map_err(extraction_error)?);
        }
        Ok(out)
    }

    async fn click(&mut self, selector: &str) -> Result<bool, ScrapeError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(extraction_error)?;
        match elements.into_iter().next() {
            Some(element) => {
                element.click().await.map_err(extraction_error)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        let handler = match self.handler.take() {
            Some(handler) => handler,
            None => return Ok(()),
        };
        let closed = self.browser.close().await;
        if let Err(err) = self.browser.wait().await {
            warn!("Browser process did not exit cleanly: {}", err);
        }
        handler.abort();
        let _ = handler.await;
        closed
            .map(|_| ())
            .map_err(|err| ScrapeError::Extraction(format!("browser close failed: {}", err)))
    }
}

fn extraction_error(err: CdpError) -> ScrapeError {
    ScrapeError::Extraction(err.to_string())
}

// Handler errors are per message (e.g. a CDP event this client cannot decode);
// the connection lives until the stream ends.
async fn drive_handler<S, E>(mut events: S) -> (usize, usize)
where
    S: Stream<Item = Result<(), E>> + Unpin,
    E: std::fmt::Display,
{
    let mut seen = 0;
    let mut errors = 0;
    while let Some(event) = events.next().await {
        seen += 1;
        if let Err(err) = event {
            errors += 1;
            debug!("Browser handler error: {}", err);
        }
    }
    (seen, errors)
}
