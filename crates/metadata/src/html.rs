use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;

use crate::driver::{PageDriver, ScrapeError};

// Re-parsed per query; the parsed tree is not Send.
#[derive(Clone, Debug)]
pub struct HtmlDocument {
    source: String,
}

impl HtmlDocument {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn contains(&self, selector: &str) -> Result<bool, ScrapeError> {
        let selector = parse_selector(selector)?;
        let html = Html::parse_document(&self.source);
        let found = html.select(&selector).next().is_some();
        Ok(found)
    }

    pub fn texts(&self, selector: &str) -> Result<Vec<String>, ScrapeError> {
        let selector = parse_selector(selector)?;
        let html = Html::parse_document(&self.source);
        let texts = html
            .select(&selector)
            .map(|element| element.text().collect::<String>())
            .collect();
        Ok(texts)
    }

    pub fn attributes(
        &self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, ScrapeError> {
        let selector = parse_selector(selector)?;
        let html = Html::parse_document(&self.source);
        let values = html
            .select(&selector)
            .map(|element| element.value().attr(attribute).map(|value| value.to_string()))
            .collect();
        Ok(values)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector).map_err(|err| ScrapeError::Selector(format!("{}: {}", selector, err)))
}

pub struct HttpPage {
    client: Client,
    document: Option<HtmlDocument>,
}

impl HttpPage {
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|err| ScrapeError::Launch(err.to_string()))?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            document: None,
        }
    }

    pub fn document(&self) -> Option<&HtmlDocument> {
        self.document.as_ref()
    }

    fn loaded(&self) -> Result<&HtmlDocument, ScrapeError> {
        self.document
            .as_ref()
            .ok_or_else(|| ScrapeError::Extraction("no page loaded".to_string()))
    }
}

#[async_trait]
impl PageDriver for HttpPage {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), ScrapeError> {
        self.document = None;
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| request_error(err, timeout))?;
        if !response.status().is_success() {
            return Err(ScrapeError::Navigation(format!("http {}", response.status())));
        }
        let body = response
            .text()
            .await
            .map_err(|err| request_error(err, timeout))?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        self.document = Some(HtmlDocument::new(body));
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScrapeError> {
        if self.loaded()?.contains(selector)? {
            Ok(())
        } else {
            Err(ScrapeError::ContentTimeout {
                selector: selector.to_string(),
                waited: timeout,
            })
        }
    }

    async fn query_texts(&mut self, selector: &str) -> Result<Vec<String>, ScrapeError> {
        self.loaded()?.texts(selector)
    }

    async fn query_attributes(
        &mut self,
        selector: &str,
        attribute: &str,
    ) -> Result<Vec<Option<String>>, ScrapeError> {
        self.loaded()?.attributes(selector, attribute)
    }
}

fn request_error(err: reqwest::Error, timeout: Duration) -> ScrapeError {
    if err.is_timeout() {
        ScrapeError::NavigationTimeout(timeout)
    } else {
        ScrapeError::Navigation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{HtmlDocument, HttpPage};
    use crate::driver::{PageDriver, ScrapeError};

    const PAGE: &str = r#"<html><head>
<meta property="og:image" content="https://cdn.example/a.jpg">
</head><body>
<ul><li class="tag"> pop </li><li class="tag">rock</li></ul>
<a href="https://instagram.com/a">ig</a><a>no href</a>
</body></html>"#;

    #[test]
    fn reads_texts_in_document_order() {
        let doc = HtmlDocument::new(PAGE);
        assert_eq!(doc.texts(".tag").unwrap(), vec![" pop ", "rock"]);
        assert!(doc.texts(".missing").unwrap().is_empty());
    }

    #[test]
    fn reads_attributes_per_element() {
        let doc = HtmlDocument::new(PAGE);
        assert_eq!(
            doc.attributes("a", "href").unwrap(),
            vec![Some("https://instagram.com/a".to_string()), None]
        );
        assert_eq!(
            doc.attributes(r#"meta[property="og:image"]"#, "content").unwrap(),
            vec![Some("https://cdn.example/a.jpg".to_string())]
        );
    }

    #[test]
    fn bad_selector_is_reported() {
        let doc = HtmlDocument::new(PAGE);
        let err = doc.contains("[[").unwrap_err();
        assert!(matches!(err, ScrapeError::Selector(_)));
    }

    #[tokio::test]
    async fn queries_before_navigation_fail() {
        let mut page = HttpPage::with_client(reqwest::Client::new());
        let err = page.query_texts(".tag").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Extraction(_)));
        let err = page
            .wait_for_selector(".tag", Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(!err.is_navigation());
        assert!(page.document().is_none());
    }
}
