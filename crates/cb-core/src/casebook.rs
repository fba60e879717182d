use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::address::Address;
use crate::case::CaseFile;
use crate::error::{LoadError, LoadResult};
use crate::location::Location;

/// File name of the location document inside a case directory.
pub const LOCATIONS_FILE: &str = "locations.json";
/// File name of the case file inside a case directory.
pub const CASE_FILE: &str = "caseIntro.json";

/// A fully loaded case: every location plus the case file.
///
/// Loading happens once, before play starts. The data is read-only from
/// then on.
#[derive(Debug, Clone, Default)]
pub struct Casebook {
    locations: BTreeMap<Address, Location>,
    case: CaseFile,
}

impl Casebook {
    /// Build a casebook from already parsed parts.
    pub fn new(locations: BTreeMap<Address, Location>, case: CaseFile) -> Self {
        Self { locations, case }
    }

    /// Parse the location and case documents from JSON text.
    pub fn from_json(locations_json: &str, case_json: &str) -> LoadResult<Self> {
        let locations = serde_json::from_str(locations_json)
            .map_err(|e| LoadError::json("location data", e))?;
        let case =
            serde_json::from_str(case_json).map_err(|e| LoadError::json("case file", e))?;
        Ok(Self { locations, case })
    }

    /// Load `locations.json` and `caseIntro.json` from a case directory.
    pub fn load_dir(dir: &Path) -> LoadResult<Self> {
        let locations = read_json(&dir.join(LOCATIONS_FILE))?;
        let case = read_json(&dir.join(CASE_FILE))?;
        Ok(Self { locations, case })
    }

    /// Add or replace a location.
    pub fn with_location(mut self, address: impl Into<Address>, location: Location) -> Self {
        self.locations.insert(address.into(), location);
        self
    }

    /// Replace the case file.
    pub fn with_case(mut self, case: CaseFile) -> Self {
        self.case = case;
        self
    }

    /// Look up a location by address.
    pub fn location(&self, address: &str) -> Option<&Location> {
        self.locations.get(address)
    }

    /// Look up a location together with its stored address key.
    pub fn location_entry(&self, address: &str) -> Option<(&Address, &Location)> {
        self.locations.get_key_value(address)
    }

    /// Whether an address exists.
    pub fn contains(&self, address: &str) -> bool {
        self.locations.contains_key(address)
    }

    /// Every address, in sorted order.
    pub fn addresses(&self) -> impl Iterator<Item = &Address> {
        self.locations.keys()
    }

    /// Every location with its address.
    pub fn locations(&self) -> impl Iterator<Item = (&Address, &Location)> {
        self.locations.iter()
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// True if the casebook has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// The case file.
    pub fn case(&self) -> &CaseFile {
        &self.case
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| LoadError::json(path.display().to_string(), e))
}
