// Genre markers are matched as substrings of the uppercased genre, in table order.
pub const VIBE_RULES: &[(&str, &[&str])] = &[
    ("ROCK", &["High Energy", "Anthemic"]),
    ("PUNK", &["Moshpit", "Rebellious"]),
    ("METAL", &["Moshpit", "Aggressive"]),
    ("POP", &["Sing-along", "Feel-good"]),
    ("INDIE", &["Chill", "Atmospheric"]),
    ("ELECTRONIC", &["Dance", "Rave"]),
    ("TECHNO", &["Dance", "Hard"]),
    ("HOUSE", &["Dance", "Groovy"]),
    ("HIP-HOP", &["Flow", "Party"]),
    ("RAP", &["Flow", "Party"]),
    ("ALTERNATIVE", &["Unique", "Live Band"]),
    ("DNB", &["High Energy", "Hard"]),
];

// Exact artist names; these replace the genre-derived vibes entirely.
pub const MANUAL_VIBES: &[(&str, &[&str])] = &[
    ("Florence + The Machine", &["Ethereal", "Sing-along", "Emotional"]),
    ("Lewis Capaldi", &["Emotional", "Sing-along", "Heartfelt"]),
    ("Twenty One Pilots", &["High Energy", "Moshpit", "Genre-bending"]),
    ("Ashnikko", &["Wild", "Dance", "Bold"]),
    ("bbno$", &["Funny", "Party", "Vibe"]),
    ("Biffy Clyro", &["Anthemic", "Moshpit", "Live Power"]),
    ("Tash Sultana", &["Loop-master", "Trippy", "Chill"]),
    ("Underworld", &["Legendary", "Rave", "Iconic"]),
    ("Dom Dolla", &["Banger", "Dance", "Summer"]),
];

pub const FALLBACK_VIBE: &str = "Explore";

pub fn manual_vibes(name: &str) -> Option<&'static [&'static str]> {
    MANUAL_VIBES
        .iter()
        .find(|(artist, _)| *artist == name)
        .map(|(_, vibes)| *vibes)
}

pub fn derive_vibes<S: AsRef<str>>(name: Option<&str>, genres: &[S]) -> Vec<String> {
    if let Some(vibes) = name.and_then(manual_vibes) {
        if !vibes.is_empty() {
            return vibes.iter().map(|vibe| vibe.to_string()).collect();
        }
    }

    let mut vibes: Vec<String> = Vec::new();
    for genre in genres {
        let genre = genre.as_ref().to_uppercase();
        for (marker, mapped) in VIBE_RULES {
            if !genre.contains(marker) {
                continue;
            }
            for vibe in mapped.iter() {
                if !vibes.iter().any(|existing| existing == vibe) {
                    vibes.push(vibe.to_string());
                }
            }
        }
    }

    if vibes.is_empty() {
        vibes.push(FALLBACK_VIBE.to_string());
    }
    vibes
}

#[cfg(test)]
mod tests {
    use super::{derive_vibes, manual_vibes, FALLBACK_VIBE};

    #[test]
    fn manual_override_ignores_genres() {
        let vibes = derive_vibes(Some("Underworld"), &["TECHNO", "ELECTRONIC"]);
        assert_eq!(vibes, vec!["Legendary", "Rave", "Iconic"]);
    }

    #[test]
    fn override_needs_exact_name() {
        assert!(manual_vibes("underworld").is_none());
        let vibes = derive_vibes(Some("underworld"), &["TECHNO"]);
        assert_eq!(vibes, vec!["Dance", "Hard"]);
    }

    #[test]
    fn markers_match_inside_genres() {
        let vibes = derive_vibes(Some("Fontaines D.C."), &["post-punk"]);
        assert_eq!(vibes, vec!["Moshpit", "Rebellious"]);
        let vibes = derive_vibes(Some("Someone"), &["TECH HOUSE"]);
        assert_eq!(vibes, vec!["Dance", "Groovy"]);
    }

    #[test]
    fn one_genre_can_hit_several_markers() {
        // "POP PUNK" hits PUNK before POP in table order.
        let vibes = derive_vibes(None, &["POP PUNK"]);
        assert_eq!(
            vibes,
            vec!["Moshpit", "Rebellious", "Sing-along", "Feel-good"]
        );
    }

    #[test]
    fn repeated_vibes_are_kept_once() {
        let vibes = derive_vibes(None, &["ELECTRONIC", "TECHNO", "HOUSE"]);
        assert_eq!(vibes, vec!["Dance", "Rave", "Hard", "Groovy"]);
        let vibes = derive_vibes(None, &["HIP-HOP", "RAP"]);
        assert_eq!(vibes, vec!["Flow", "Party"]);
    }

    #[test]
    fn unmatched_or_missing_genres_fall_back() {
        let none: [&str; 0] = [];
        assert_eq!(derive_vibes(Some("Newcomer"), &none), vec![FALLBACK_VIBE]);
        assert_eq!(derive_vibes(Some("Newcomer"), &["JAZZ"]), vec![FALLBACK_VIBE]);
    }
}
