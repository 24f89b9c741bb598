use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

mod socials;
mod vibes;

pub use socials::{
    classify_link, SocialLinks, SocialPlatform, CLASSIFICATION_RULES, FALLBACK_PLATFORM,
};
pub use vibes::{derive_vibes, manual_vibes, FALLBACK_VIBE, MANUAL_VIBES, VIBE_RULES};

pub const NAME_KEY: &str = "artist";
pub const ID_KEY: &str = "id";
pub const PROFILE_URL_KEY: &str = "szigetUrl";
pub const GENRES_KEY: &str = "genres";
pub const DESCRIPTION_KEY: &str = "description";
pub const IMAGE_URL_KEY: &str = "imageUrl";
pub const SOCIALS_KEY: &str = "socials";
pub const VIBES_KEY: &str = "vibes";

// Raw JSON object: unmanaged keys and key order survive a save.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtistRecord {
    fields: Map<String, Value>,
}

impl ArtistRecord {
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get(NAME_KEY).and_then(Value::as_str)
    }

    pub fn id(&self) -> Option<String> {
        match self.fields.get(ID_KEY)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn profile_url(&self) -> Option<&str> {
        self.fields
            .get(PROFILE_URL_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn genres(&self) -> Vec<&str> {
        match self.fields.get(GENRES_KEY) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.fields.get(DESCRIPTION_KEY).and_then(Value::as_str)
    }

    pub fn image_url(&self) -> Option<&str> {
        self.fields.get(IMAGE_URL_KEY).and_then(Value::as_str)
    }

    pub fn socials(&self) -> Option<&Map<String, Value>> {
        self.fields.get(SOCIALS_KEY).and_then(Value::as_object)
    }

    pub fn social(&self, platform: SocialPlatform) -> Option<&str> {
        self.socials()?.get(platform.key()).and_then(Value::as_str)
    }

    pub fn vibes(&self) -> Vec<&str> {
        match self.fields.get(VIBES_KEY) {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }

    // Recomputes `vibes` from the name and current genres. Returns whether the
    // stored value changed.
    pub fn assign_vibes(&mut self) -> bool {
        let vibes = derive_vibes(self.name(), &self.genres());
        let value = Value::Array(vibes.into_iter().map(Value::String).collect());
        if self.fields.get(VIBES_KEY) == Some(&value) {
            return false;
        }
        self.fields.insert(VIBES_KEY.to_string(), value);
        true
    }

    pub fn is_enriched(&self) -> bool {
        !self.genres().is_empty()
            && has_text(self.description())
            && has_text(self.image_url())
            && self.socials().map(|map| !map.is_empty()).unwrap_or(false)
    }

    pub fn apply(&mut self, update: &ProfileUpdate) -> MergeSummary {
        let mut summary = MergeSummary::default();

        if !update.genres.is_empty() {
            let genres = update
                .genres
                .iter()
                .map(|genre| Value::String(genre.clone()))
                .collect();
            self.fields
                .insert(GENRES_KEY.to_string(), Value::Array(genres));
            summary.genres = update.genres.len();
        }

        if let Some(description) = non_empty(update.description.as_deref()) {
            self.fields.insert(
                DESCRIPTION_KEY.to_string(),
                Value::String(description.to_string()),
            );
            summary.description = true;
        }

        if let Some(image_url) = non_empty(update.image_url.as_deref()) {
            self.fields
                .insert(IMAGE_URL_KEY.to_string(), Value::String(image_url.to_string()));
            summary.image = true;
        }

        if let Some(links) = &update.socials {
            self.merge_socials(links);
            summary.social_links = links.len();
        }

        summary
    }

    fn merge_socials(&mut self, links: &SocialLinks) {
        match self.fields.get_mut(SOCIALS_KEY) {
            Some(Value::Object(existing)) if !existing.is_empty() => {
                for (platform, url) in links.iter() {
                    existing.insert(platform.key().to_string(), Value::String(url.to_string()));
                }
            }
            _ => {
                self.fields
                    .insert(SOCIALS_KEY.to_string(), Value::Object(fresh_socials(links)));
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socials: Option<SocialLinks>,
}

impl ProfileUpdate {
    pub fn genres(genres: Vec<String>) -> Self {
        Self {
            genres,
            ..Self::default()
        }
    }

    pub fn description(description: Option<String>) -> Self {
        Self {
            description,
            ..Self::default()
        }
    }

    pub fn image_url(image_url: Option<String>) -> Self {
        Self {
            image_url,
            ..Self::default()
        }
    }

    pub fn socials(links: SocialLinks) -> Self {
        Self {
            socials: Some(links),
            ..Self::default()
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub genres: usize,
    pub description: bool,
    pub image: bool,
    pub social_links: usize,
}

impl MergeSummary {
    pub fn absorb(&mut self, other: MergeSummary) {
        if other.genres > 0 {
            self.genres = other.genres;
        }
        self.description |= other.description;
        self.image |= other.image;
        self.social_links += other.social_links;
    }
}

pub fn merge_record(existing: &ArtistRecord, update: &ProfileUpdate) -> ArtistRecord {
    let mut record = existing.clone();
    record.apply(update);
    record
}

fn fresh_socials(links: &SocialLinks) -> Map<String, Value> {
    let mut map = Map::new();
    for platform in SocialPlatform::BASE {
        map.insert(platform.key().to_string(), Value::Null);
    }
    for (platform, url) in links.iter() {
        map.insert(platform.key().to_string(), Value::String(url.to_string()));
    }
    map
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

fn has_text(value: Option<&str>) -> bool {
    non_empty(value).is_some()
}
