use std::time::{Duration, Instant};

use common::{ProfileUpdate, SocialLinks};
use tracing::debug;

mod browser;
mod driver;
mod html;

pub use browser::{BrowserOptions, ChromePage};
pub use driver::{PageDriver, ScrapeError};
pub use html::{HtmlDocument, HttpPage};

pub const CONTENT_SELECTOR: &str = ".ArtistSingleBody__content";
pub const GENRE_TAG_SELECTOR: &str = ".ArtistSingleBody__content__tags__tag";
pub const DESCRIPTION_SELECTOR: &str = ".ArtistSingleBody__content__description";
pub const IMAGE_META_SELECTOR: &str = r#"meta[property="og:image"]"#;
pub const IMAGE_META_ATTRIBUTE: &str = "content";
pub const SOCIAL_LINK_SELECTOR: &str = ".ArtistSingleBody__content__socials a";
pub const SOCIAL_LINK_ATTRIBUTE: &str = "href";
pub const DESCRIPTION_MORE_SELECTOR: &str = ".ArtistSingleBody__content__description__more";

// Expander label the profile page leaves inside the description text.
pub const MORE_MARKER: &str = "More...";

pub const DESCRIPTION_EXPAND_WAIT: Duration = Duration::from_secs(3);
const EXPAND_POLL: Duration = Duration::from_millis(100);
const EXPAND_SETTLE: Duration = Duration::from_secs(1);

#[derive(Clone, Copy, Debug)]
pub struct Timeouts {
    pub navigation: Duration,
    pub content: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            navigation: Duration::from_secs(60),
            content: Duration::from_secs(15),
        }
    }
}

pub async fn open_profile<D>(page: &mut D, url: &str, timeouts: Timeouts) -> Result<(), ScrapeError>
where
    D: PageDriver + ?Sized,
{
    page.navigate(url, timeouts.navigation).await?;
    page.wait_for_selector(CONTENT_SELECTOR, timeouts.content)
        .await
}

pub async fn extract_genres<D>(page: &mut D) -> Result<Vec<String>, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let texts = page.query_texts(GENRE_TAG_SELECTOR).await?;
    Ok(texts.iter().filter_map(|text| clean_genre(text)).collect())
}

// Clicks the description expander when it offers more text, then waits until
// the label flips to "Less" or the text stops ending in "...". Returns whether
// a click happened.
pub async fn expand_description<D>(page: &mut D, wait: Duration) -> Result<bool, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let label = page.query_text(DESCRIPTION_MORE_SELECTOR).await?;
    if !label.map_or(false, |label| label.contains("More")) {
        return Ok(false);
    }
    if !page.click(DESCRIPTION_MORE_SELECTOR).await? {
        return Ok(false);
    }

    let started = Instant::now();
    loop {
        if description_expanded(page).await? {
            return Ok(true);
        }
        if started.elapsed() >= wait {
            debug!("Description did not settle within {:?}", wait);
            tokio::time::sleep(EXPAND_SETTLE).await;
            return Ok(true);
        }
        tokio::time::sleep(EXPAND_POLL).await;
    }
}

async fn description_expanded<D>(page: &mut D) -> Result<bool, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let label = page.query_text(DESCRIPTION_MORE_SELECTOR).await?;
    if label.map_or(false, |label| label.contains("Less")) {
        return Ok(true);
    }
    let text = page.query_text(DESCRIPTION_SELECTOR).await?;
    Ok(text.map_or(false, |text| !text.trim_end().ends_with("...")))
}

pub async fn extract_description<D>(page: &mut D) -> Result<Option<String>, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let text = page.query_text(DESCRIPTION_SELECTOR).await?;
    Ok(text.as_deref().and_then(clean_description))
}

pub async fn extract_image<D>(page: &mut D) -> Result<Option<String>, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let values = page
        .query_attributes(IMAGE_META_SELECTOR, IMAGE_META_ATTRIBUTE)
        .await?;
    let image = values
        .into_iter()
        .next()
        .flatten()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    Ok(image)
}

pub async fn extract_socials<D>(page: &mut D) -> Result<SocialLinks, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let hrefs = page
        .query_attributes(SOCIAL_LINK_SELECTOR, SOCIAL_LINK_ATTRIBUTE)
        .await?;
    Ok(SocialLinks::from_hrefs(hrefs.into_iter().flatten()))
}

pub async fn extract_profile<D>(
    page: &mut D,
    url: &str,
    timeouts: Timeouts,
) -> Result<ProfileUpdate, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    open_profile(page, url, timeouts).await?;
    let update = ProfileUpdate {
        genres: extract_genres(page).await?,
        description: extract_description(page).await?,
        image_url: extract_image(page).await?,
        socials: Some(extract_socials(page).await?),
    };
    debug!("Extracted profile from {}", url);
    Ok(update)
}

pub fn clean_genre(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

pub fn clean_description(text: &str) -> Option<String> {
    let cleaned = text.replace(MORE_MARKER, "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
