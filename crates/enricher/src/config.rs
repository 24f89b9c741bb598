use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use metadata::{BrowserOptions, Timeouts};
use serde::{Deserialize, Serialize};

const DEFAULT_NAVIGATION_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONTENT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    Browser,
    Http,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    pub lineup_path: String,
    pub driver: DriverKind,
    pub navigation_timeout_secs: u64,
    pub content_timeout_secs: u64,
    pub delay_ms: u64,
    pub user_agent: String,
    pub headless: bool,
    pub chrome_path: String,
    pub only_incomplete: bool,
    pub expand_description: bool,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            lineup_path: "src/data/lineup.json".to_string(),
            driver: DriverKind::Browser,
            navigation_timeout_secs: DEFAULT_NAVIGATION_TIMEOUT_SECS,
            content_timeout_secs: DEFAULT_CONTENT_TIMEOUT_SECS,
            delay_ms: 1000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headless: true,
            chrome_path: String::new(),
            only_incomplete: false,
            expand_description: false,
        }
    }
}

impl EnricherConfig {
    pub fn timeouts(&self) -> Timeouts {
        let navigation = if self.navigation_timeout_secs == 0 {
            DEFAULT_NAVIGATION_TIMEOUT_SECS
        } else {
            self.navigation_timeout_secs
        };
        let content = if self.content_timeout_secs == 0 {
            DEFAULT_CONTENT_TIMEOUT_SECS
        } else {
            self.content_timeout_secs
        };
        Timeouts {
            navigation: Duration::from_secs(navigation),
            content: Duration::from_secs(content),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn user_agent(&self) -> &str {
        let trimmed = self.user_agent.trim();
        if trimmed.is_empty() {
            DEFAULT_USER_AGENT
        } else {
            trimmed
        }
    }

    pub fn browser_options(&self, config_path: &Path) -> BrowserOptions {
        let chrome_path = self.chrome_path.trim();
        BrowserOptions {
            user_agent: self.user_agent().to_string(),
            headless: self.headless,
            executable: if chrome_path.is_empty() {
                None
            } else {
                Some(resolve_path(config_path, chrome_path))
            },
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "io error: {}", err),
            ConfigError::Yaml(err) => write!(f, "yaml error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err)
    }
}

pub fn config_path_from_env() -> PathBuf {
    match env::var("LINEUP_ENRICHER_CONFIG") {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from("enricher.yaml"),
    }
}

// Returns the config and whether it came from disk.
pub fn load_config(path: &Path) -> Result<(EnricherConfig, bool), ConfigError> {
    if !path.exists() {
        return Ok((EnricherConfig::default(), false));
    }
    let contents = fs::read_to_string(path)?;
    let config: EnricherConfig = if contents.trim().is_empty() {
        EnricherConfig::default()
    } else {
        serde_yaml::from_str(&contents)?
    };
    Ok((config, true))
}

// `LINEUP_PATH` wins over the config value.
pub fn lineup_path(config_path: &Path, config: &EnricherConfig) -> PathBuf {
    let value = match env::var("LINEUP_PATH") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => config.lineup_path.clone(),
    };
    resolve_path(config_path, value.trim())
}

pub fn resolve_path(config_path: &Path, value: &str) -> PathBuf {
    let raw = PathBuf::from(value);
    if raw.is_absolute() {
        return raw;
    }
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    base.join(raw)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    use super::{load_config, resolve_path, DriverKind, EnricherConfig, DEFAULT_USER_AGENT};

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, from_disk) = load_config(&dir.path().join("enricher.yaml")).unwrap();
        assert!(!from_disk);
        assert_eq!(config.driver, DriverKind::Browser);
        assert_eq!(config.lineup_path, "src/data/lineup.json");
        assert_eq!(config.delay(), Duration::from_secs(1));
        assert_eq!(config.timeouts().navigation, Duration::from_secs(60));
        assert_eq!(config.timeouts().content, Duration::from_secs(15));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enricher.yaml");
        fs::write(
            &path,
            "driver: http\ndelay_ms: 250\ncontent_timeout_secs: 0\nuser_agent: \"\"\n",
        )
        .unwrap();

        let (config, from_disk) = load_config(&path).unwrap();
        assert!(from_disk);
        assert_eq!(config.driver, DriverKind::Http);
        assert_eq!(config.delay(), Duration::from_millis(250));
        assert_eq!(config.timeouts().content, Duration::from_secs(15));
        assert_eq!(config.user_agent(), DEFAULT_USER_AGENT);
        assert!(config.headless);
        assert!(!config.expand_description);
    }

    #[test]
    fn invalid_yaml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("enricher.yaml");
        fs::write(&path, "driver: [unclosed").unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn relative_paths_follow_config_dir() {
        let config_path = Path::new("/etc/festival/enricher.yaml");
        assert_eq!(
            resolve_path(config_path, "data/lineup.json"),
            PathBuf::from("/etc/festival/data/lineup.json")
        );
        assert_eq!(
            resolve_path(config_path, "/srv/lineup.json"),
            PathBuf::from("/srv/lineup.json")
        );
        assert_eq!(
            resolve_path(Path::new("enricher.yaml"), "lineup.json"),
            PathBuf::from("./lineup.json")
        );
    }

    #[test]
    fn chrome_path_is_optional() {
        let mut config = EnricherConfig::default();
        let options = config.browser_options(Path::new("enricher.yaml"));
        assert!(options.executable.is_none());
        assert!(options.headless);

        config.chrome_path = "/usr/bin/chromium".to_string();
        let options = config.browser_options(Path::new("enricher.yaml"));
        assert_eq!(options.executable, Some(PathBuf::from("/usr/bin/chromium")));
    }
}
