use std::time::Duration;

use async_trait::async_trait;

#[derive(Debug)]
pub enum ScrapeError {
    Launch(String),
    Navigation(String),
    NavigationTimeout(Duration),
    ContentTimeout { selector: String, waited: Duration },
    Selector(String),
    Extraction(String),
}

impl ScrapeError {
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            ScrapeError::Navigation(_)
                | ScrapeError::NavigationTimeout(_)
                | ScrapeError::ContentTimeout { .. }
        )
    }
}

impl std::fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScrapeError::Launch(err) => write!(f, "browser launch failed: {}", err),
            ScrapeError::Navigation(err) => write!(f, "navigation failed: {}", err),
            ScrapeError::NavigationTimeout(after) => {
                write!(f, "navigation timed out after {}s", after.as_secs())
            }
            ScrapeError::ContentTimeout { selector, waited } => write!(
                f,
                "content '{}' did not appear within {}s",
                selector,
                waited.as_secs()
            ),
            ScrapeError::Selector(err) => write!(f, "invalid selector: {}", err),
            ScrapeError::Extraction(err) => write!(f, "extraction failed: {}", err),
        }
    }
}

impl std::error::Error for ScrapeError {}

#[async_trait]
pub trait PageDriver: Send {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError>;

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScrapeError>;

    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>, ScrapeError>;

    // `None` where the attribute is missing.
    async fn query_attributes(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, ScrapeError>;

    async fn query_text(&mut self, selector: &str) -> Result<Option<String>, ScrapeError> {
        Ok(self.query_texts(selector).await?.into_iter().next())
    }

    // Drivers without script execution have nothing to click.
    async fn click(&mut self, _selector: &str) -> Result<bool, ScrapeError> {
        Ok(false)
    }

    async fn close(&mut self) -> Result<(), ScrapeError> {
        Ok(())
    }
}
