use std::fs;
use std::path::{Path, PathBuf};

use common::{ArtistRecord, NAME_KEY};
use serde_json::Value;
use tracing::info;

#[derive(Debug)]
pub enum DataLoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NotAList,
    InvalidRecord { index: usize, reason: &'static str },
}

impl std::fmt::Display for DataLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataLoadError::Io(err) => write!(f, "io error: {}", err),
            DataLoadError::Json(err) => write!(f, "json error: {}", err),
            DataLoadError::NotAList => write!(f, "lineup must be a JSON array"),
            DataLoadError::InvalidRecord { index, reason } => {
                write!(f, "record {}: {}", index, reason)
            }
        }
    }
}

impl std::error::Error for DataLoadError {}

impl From<std::io::Error> for DataLoadError {
    fn from(err: std::io::Error) -> Self {
        DataLoadError::Io(err)
    }
}

impl From<serde_json::Error> for DataLoadError {
    fn from(err: serde_json::Error) -> Self {
        DataLoadError::Json(err)
    }
}

#[derive(Debug)]
pub enum DataWriteError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for DataWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataWriteError::Io(err) => write!(f, "io error: {}", err),
            DataWriteError::Json(err) => write!(f, "json error: {}", err),
        }
    }
}

impl std::error::Error for DataWriteError {}

impl From<std::io::Error> for DataWriteError {
    fn from(err: std::io::Error) -> Self {
        DataWriteError::Io(err)
    }
}

impl From<serde_json::Error> for DataWriteError {
    fn from(err: serde_json::Error) -> Self {
        DataWriteError::Json(err)
    }
}

#[derive(Clone, Debug)]
pub struct Lineup {
    path: PathBuf,
    records: Vec<ArtistRecord>,
}

impl Lineup {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, DataLoadError> {
        let path = path.into();
        let records = read_records(&path)?;
        info!("Loaded {} artists from {:?}", records.len(), path);
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records(&self) -> &[ArtistRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [ArtistRecord] {
        &mut self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn save(&self) -> Result<(), DataWriteError> {
        write_records(&self.path, &self.records)
    }
}

pub fn read_records(path: &Path) -> Result<Vec<ArtistRecord>, DataLoadError> {
    let contents = fs::read_to_string(path)?;
    parse_records(&contents)
}

pub fn parse_records(contents: &str) -> Result<Vec<ArtistRecord>, DataLoadError> {
    let items = match serde_json::from_str::<Value>(contents)? {
        Value::Array(items) => items,
        _ => return Err(DataLoadError::NotAList),
    };
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let fields = match item {
            Value::Object(fields) => fields,
            _ => {
                return Err(DataLoadError::InvalidRecord {
                    index,
                    reason: "not an object",
                })
            }
        };
        if !fields.get(NAME_KEY).map(Value::is_string).unwrap_or(false) {
            return Err(DataLoadError::InvalidRecord {
                index,
                reason: "missing artist name",
            });
        }
        records.push(ArtistRecord::from_fields(fields));
    }
    Ok(records)
}

pub fn render_records(records: &[ArtistRecord]) -> Result<String, DataWriteError> {
    Ok(serde_json::to_string_pretty(records)?)
}

// Sibling temp file, then rename over the target.
pub fn write_records(path: &Path, records: &[ArtistRecord]) -> Result<(), DataWriteError> {
    let contents = render_records(records)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = temp_path_for(path);
    if let Err(err) = fs::write(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    if let Err(err) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(err.into());
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "lineup.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{parse_records, read_records, write_records, DataLoadError, Lineup};

    const SAMPLE: &str = r#"[
  {
    "id": "1",
    "artist": "Sigur Rós",
    "stage": "Main Stage",
    "szigetUrl": "https://szigetfestival.com/en/artist/sigur-ros",
    "genres": [
      "POST-ROCK"
    ],
    "socials": {
      "x": "https://x.com/sigurros",
      "website": null
    }
  },
  {
    "id": "2",
    "artist": "Nikola Bánffy",
    "stage": "Freedome",
    "day": "Wed",
    "vibes": []
  }
]"#;

    #[test]
    fn round_trip_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineup.json");
        fs::write(&path, SAMPLE).unwrap();

        let lineup = Lineup::load(&path).unwrap();
        assert_eq!(lineup.len(), 2);
        lineup.save().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
        assert!(!dir.path().join("lineup.json.tmp").exists());
    }

    #[test]
    fn writes_non_ascii_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("lineup.json");
        let records = parse_records(r#"[{"artist": "Björk"}]"#).unwrap();

        write_records(&path, &records).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "[\n  {\n    \"artist\": \"Björk\"\n  }\n]");
    }

    #[test]
    fn missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, DataLoadError::Io(_)));
    }

    #[test]
    fn malformed_json_is_load_error() {
        let err = parse_records("[{\"artist\": ").unwrap_err();
        assert!(matches!(err, DataLoadError::Json(_)));
    }

    #[test]
    fn rejects_non_list_document() {
        let err = parse_records(r#"{"artist": "A"}"#).unwrap_err();
        assert!(matches!(err, DataLoadError::NotAList));
    }

    #[test]
    fn rejects_record_without_name() {
        let err = parse_records(r#"[{"artist": "A"}, {"id": "2"}]"#).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidRecord { index: 1, .. }
        ));
        let err = parse_records(r#"["A"]"#).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidRecord { index: 0, .. }
        ));
    }

    #[test]
    fn vibes_pass_rewrites_only_vibes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lineup.json");
        fs::write(&path, SAMPLE).unwrap();

        let mut lineup = Lineup::load(&path).unwrap();
        let changed = lineup
            .records_mut()
            .iter_mut()
            .map(|record| record.assign_vibes())
            .filter(|changed| *changed)
            .count();
        assert_eq!(changed, 2);
        lineup.save().unwrap();

        let written = Lineup::load(&path).unwrap();
        assert_eq!(written.records()[0].vibes(), vec!["High Energy", "Anthemic"]);
        assert_eq!(written.records()[0].fields()["stage"], "Main Stage");
        assert_eq!(written.records()[1].vibes(), vec!["Explore"]);
        assert_eq!(written.records()[1].fields()["day"], "Wed");
    }
}
