use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SocialPlatform {
    Website,
    Facebook,
    Instagram,
    Twitter,
    Tiktok,
    Youtube,
    Spotify,
    AppleMusic,
    Soundcloud,
}

impl SocialPlatform {
    // Soundcloud only appears once a link for it is found.
    pub const BASE: [SocialPlatform; 8] = [
        SocialPlatform::Website,
        SocialPlatform::Facebook,
        SocialPlatform::Instagram,
        SocialPlatform::Twitter,
        SocialPlatform::Tiktok,
        SocialPlatform::Youtube,
        SocialPlatform::Spotify,
        SocialPlatform::AppleMusic,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SocialPlatform::Website => "website",
            SocialPlatform::Facebook => "facebook",
            SocialPlatform::Instagram => "instagram",
            SocialPlatform::Twitter => "twitter",
            SocialPlatform::Tiktok => "tiktok",
            SocialPlatform::Youtube => "youtube",
            SocialPlatform::Spotify => "spotify",
            SocialPlatform::AppleMusic => "appleMusic",
            SocialPlatform::Soundcloud => "soundcloud",
        }
    }
}

// First marker contained in a link wins.
pub const CLASSIFICATION_RULES: &[(&str, SocialPlatform)] = &[
    ("facebook.com", SocialPlatform::Facebook),
    ("instagram.com", SocialPlatform::Instagram),
    ("twitter.com", SocialPlatform::Twitter),
    ("x.com", SocialPlatform::Twitter),
    ("tiktok.com", SocialPlatform::Tiktok),
    ("youtube.com", SocialPlatform::Youtube),
    ("spotify.com", SocialPlatform::Spotify),
    ("music.apple.com", SocialPlatform::AppleMusic),
    ("soundcloud.com", SocialPlatform::Soundcloud),
];

pub const FALLBACK_PLATFORM: SocialPlatform = SocialPlatform::Website;

pub fn classify_link(href: &str) -> SocialPlatform {
    CLASSIFICATION_RULES
        .iter()
        .find(|(marker, _)| href.contains(marker))
        .map(|(_, platform)| *platform)
        .unwrap_or(FALLBACK_PLATFORM)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SocialLinks {
    links: BTreeMap<SocialPlatform, String>,
}

impl SocialLinks {
    pub fn new() -> Self {
        Self::default()
    }

    // A later link for the same platform overwrites an earlier one.
    pub fn from_hrefs<I, S>(hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out = Self::new();
        for href in hrefs {
            let href = href.as_ref();
            if href.is_empty() {
                continue;
            }
            out.insert(classify_link(href), href.to_string());
        }
        out
    }

    pub fn insert(&mut self, platform: SocialPlatform, url: String) {
        self.links.insert(platform, url);
    }

    pub fn get(&self, platform: SocialPlatform) -> Option<&str> {
        self.links.get(&platform).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SocialPlatform, &str)> {
        self.links
            .iter()
            .map(|(platform, url)| (*platform, url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_link, SocialLinks, SocialPlatform};

    #[test]
    fn twitter_marker_wins_over_fallback() {
        assert_eq!(classify_link("https://twitter.com/x"), SocialPlatform::Twitter);
        assert_eq!(classify_link("https://x.com/someone"), SocialPlatform::Twitter);
    }

    #[test]
    fn unknown_domain_is_website() {
        assert_eq!(classify_link("https://bandcamp.com/x"), SocialPlatform::Website);
        assert_eq!(classify_link("https://artist.example"), SocialPlatform::Website);
    }

    #[test]
    fn earlier_rule_takes_precedence() {
        assert_eq!(
            classify_link("https://www.facebook.com/share?u=instagram.com"),
            SocialPlatform::Facebook
        );
        assert_eq!(
            classify_link("https://music.apple.com/artist/1"),
            SocialPlatform::AppleMusic
        );
        assert_eq!(
            classify_link("https://open.spotify.com/artist/abc"),
            SocialPlatform::Spotify
        );
    }

    #[test]
    fn last_link_for_a_platform_wins() {
        let links = SocialLinks::from_hrefs([
            "https://instagram.com/first",
            "",
            "https://soundcloud.com/dj",
            "https://instagram.com/second",
        ]);
        assert_eq!(links.len(), 2);
        assert_eq!(
            links.get(SocialPlatform::Instagram),
            Some("https://instagram.com/second")
        );
        assert_eq!(
            links.get(SocialPlatform::Soundcloud),
            Some("https://soundcloud.com/dj")
        );
    }

    #[test]
    fn serializes_with_record_keys() {
        let mut links = SocialLinks::new();
        links.insert(SocialPlatform::AppleMusic, "https://music.apple.com/a".to_string());
        let json = serde_json::to_string(&links).unwrap();
        assert_eq!(json, r#"{"appleMusic":"https://music.apple.com/a"}"#);
    }
}
