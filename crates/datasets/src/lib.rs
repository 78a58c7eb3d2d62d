pub mod records;

use std::path::Path;

pub use records::*;

/// File name of the country dataset inside a data directory.
pub const COUNTRIES_FILE_NAME: &str = "countries.json";
/// File name of the impact-story dataset inside a data directory.
pub const STORIES_FILE_NAME: &str = "impact-stories.json";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DatasetKind {
    Countries,
    Stories,
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetKind::Countries => write!(f, "countries"),
            DatasetKind::Stories => write!(f, "stories"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    Io(String),
    Parse { dataset: DatasetKind, message: String },
    InvalidCoordinates { dataset: DatasetKind, index: usize },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(msg) => write!(f, "dataset io error: {msg}"),
            DatasetError::Parse { dataset, message } => {
                write!(f, "{dataset} dataset is malformed: {message}")
            }
            DatasetError::InvalidCoordinates { dataset, index } => {
                write!(f, "{dataset} record {index} has out-of-range coordinates")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

/// Read-only, ordered access to the static records behind each marker set.
///
/// Order matters: marker catalogs are built in record order, and hit-testing
/// breaks ties by that order.
pub trait DatasetSource {
    fn countries(&self) -> &[CountryRecord];
    fn stories(&self) -> &[StoryRecord];
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct InMemoryDatasets {
    countries: Vec<CountryRecord>,
    stories: Vec<StoryRecord>,
}

impl InMemoryDatasets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-parsed records. Coordinates are validated.
    pub fn from_records(
        countries: Vec<CountryRecord>,
        stories: Vec<StoryRecord>,
    ) -> Result<Self, DatasetError> {
        validate_coordinates(DatasetKind::Countries, &countries)?;
        validate_coordinates(DatasetKind::Stories, &stories)?;
        Ok(Self { countries, stories })
    }

    pub fn from_json_str(countries_json: &str, stories_json: &str) -> Result<Self, DatasetError> {
        let countries = parse_json(DatasetKind::Countries, countries_json)?;
        let stories = parse_json(DatasetKind::Stories, stories_json)?;
        Self::from_records(countries, stories)
    }

    /// Load `countries.json` and `impact-stories.json` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let countries = read_file(&dir.join(COUNTRIES_FILE_NAME))?;
        let stories = read_file(&dir.join(STORIES_FILE_NAME))?;
        Self::from_json_str(&countries, &stories)
    }
}

impl DatasetSource for InMemoryDatasets {
    fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    fn stories(&self) -> &[StoryRecord] {
        &self.stories
    }
}

fn read_file(path: &Path) -> Result<String, DatasetError> {
    std::fs::read_to_string(path).map_err(|e| DatasetError::Io(format!("read {path:?}: {e}")))
}

fn parse_json<T: serde::de::DeserializeOwned>(
    dataset: DatasetKind,
    raw: &str,
) -> Result<Vec<T>, DatasetError> {
    serde_json::from_str(raw).map_err(|e| DatasetError::Parse {
        dataset,
        message: e.to_string(),
    })
}

fn validate_coordinates<T: Located>(dataset: DatasetKind, records: &[T]) -> Result<(), DatasetError> {
    match records.iter().position(|r| !r.geo_point().is_valid()) {
        Some(index) => Err(DatasetError::InvalidCoordinates { dataset, index }),
        None => Ok(()),
    }
}
