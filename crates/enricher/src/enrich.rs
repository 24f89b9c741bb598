use std::time::Duration;

use common::{ArtistRecord, MergeSummary, ProfileUpdate};
use lineup::{DataLoadError, DataWriteError, Lineup};
use metadata::{
    expand_description, extract_description, extract_genres, extract_image, extract_socials,
    open_profile, PageDriver, ScrapeError, Timeouts, DESCRIPTION_EXPAND_WAIT,
};
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

#[derive(Debug)]
pub enum RunError {
    Config(ConfigError),
    Load(DataLoadError),
    Driver(ScrapeError),
    Write(DataWriteError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Config(err) => write!(f, "config error: {}", err),
            RunError::Load(err) => write!(f, "failed to load lineup: {}", err),
            RunError::Driver(err) => write!(f, "page driver error: {}", err),
            RunError::Write(err) => write!(f, "failed to write lineup: {}", err),
        }
    }
}

impl std::error::Error for RunError {}

impl From<ConfigError> for RunError {
    fn from(err: ConfigError) -> Self {
        RunError::Config(err)
    }
}

impl From<DataLoadError> for RunError {
    fn from(err: DataLoadError) -> Self {
        RunError::Load(err)
    }
}

impl From<ScrapeError> for RunError {
    fn from(err: ScrapeError) -> Self {
        RunError::Driver(err)
    }
}

impl From<DataWriteError> for RunError {
    fn from(err: DataWriteError) -> Self {
        RunError::Write(err)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PassOptions {
    pub timeouts: Timeouts,
    pub delay: Duration,
    pub only_incomplete: bool,
    pub expand_description: bool,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            timeouts: Timeouts::default(),
            delay: Duration::from_secs(1),
            only_incomplete: false,
            expand_description: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RecordOutcome {
    Skipped,
    Updated(MergeSummary),
    Failed(String),
}

#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl RunReport {
    pub fn updated(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Updated(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Skipped))
    }

    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, RecordOutcome::Failed(_)))
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(outcome)).count()
    }
}

pub async fn run<D>(
    page: &mut D,
    lineup: &mut Lineup,
    options: PassOptions,
) -> Result<RunReport, RunError>
where
    D: PageDriver + ?Sized,
{
    let report = enrich_records(page, lineup.records_mut(), options).await;
    if let Err(err) = page.close().await {
        warn!("Failed to close page driver: {}", err);
    }
    info!(
        "Pass finished: {} updated, {} skipped, {} failed",
        report.updated(),
        report.skipped(),
        report.failed()
    );

    info!("Saving {:?}...", lineup.path());
    lineup.save()?;
    info!("Successfully updated {:?}", lineup.path());
    Ok(report)
}

pub async fn enrich_records<D>(
    page: &mut D,
    records: &mut [ArtistRecord],
    options: PassOptions,
) -> RunReport
where
    D: PageDriver + ?Sized,
{
    let mut report = RunReport::default();
    let total = records.len();

    for (index, record) in records.iter_mut().enumerate() {
        let name = record.name().unwrap_or("<unnamed>").to_string();
        let label = record.id().unwrap_or_else(|| (index + 1).to_string());
        info!("[{}] Processing {}...", label, name);

        let url = match record.profile_url() {
            Some(url) => url.to_string(),
            None => {
                info!("Skipping {} (no profile URL)", name);
                report.outcomes.push(RecordOutcome::Skipped);
                continue;
            }
        };
        if options.only_incomplete && record.is_enriched() {
            info!("Skipping {} (already enriched)", name);
            report.outcomes.push(RecordOutcome::Skipped);
            continue;
        }

        let outcome = match enrich_record(page, record, &url, &options).await {
            Ok(summary) => {
                info!("  Found {} social links", summary.social_links);
                RecordOutcome::Updated(summary)
            }
            Err(err) => {
                error!("  Error fetching {}: {}", name, err);
                RecordOutcome::Failed(err.to_string())
            }
        };
        report.outcomes.push(outcome);

        if index + 1 < total && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    report
}

// Each field is merged as soon as it is read; a later failure keeps it.
pub async fn enrich_record<D>(
    page: &mut D,
    record: &mut ArtistRecord,
    url: &str,
    options: &PassOptions,
) -> Result<MergeSummary, ScrapeError>
where
    D: PageDriver + ?Sized,
{
    let mut summary = MergeSummary::default();
    open_profile(page, url, options.timeouts).await?;

    let genres = extract_genres(page).await?;
    if !genres.is_empty() {
        info!("  Found genres: {}", genres.join(", "));
    }
    summary.absorb(record.apply(&ProfileUpdate::genres(genres)));

    if options.expand_description {
        match expand_description(page, DESCRIPTION_EXPAND_WAIT).await {
            Ok(true) => debug!("  Expanded description"),
            Ok(false) => {}
            Err(err) => warn!("  Could not expand description: {}", err),
        }
    }
    let description = extract_description(page).await?;
    if let Some(description) = &description {
        info!("  Found description ({} chars)", description.chars().count());
    }
    summary.absorb(record.apply(&ProfileUpdate::description(description)));

    let image_url = extract_image(page).await?;
    if let Some(image_url) = &image_url {
        info!("  Found image URL: {}", image_url);
    }
    summary.absorb(record.apply(&ProfileUpdate::image_url(image_url)));

    let socials = extract_socials(page).await?;
    summary.absorb(record.apply(&ProfileUpdate::socials(socials)));

    Ok(summary)
}
