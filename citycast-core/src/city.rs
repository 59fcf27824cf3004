//! City name → provider city code lookup.

use std::{collections::HashMap, fs, path::PathBuf, sync::OnceLock};

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::DataLoadError;

/// Dataset compiled into the crate, in the provider's `citycode.json` format.
///
/// Covers every provincial-level capital plus the larger prefecture cities,
/// not the provider's full district list. Point `CitySource::File` at the
/// provider's own `citycode.json` for complete coverage.
pub const BUNDLED_CITY_INDEX: &str = include_str!("../data/citycode.json");

/// Localized "-city" suffix tried when the bare name is not indexed.
pub const CITY_SUFFIX: &str = "市";

/// Immutable map from city display name to provider city code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CityIndex {
    codes: HashMap<String, String>,
}

impl CityIndex {
    /// Build an index from a JSON array of `{city_name, city_code}` objects.
    ///
    /// Entries without a code (provinces in the provider dataset) are skipped.
    /// Later entries win over earlier ones with the same name.
    pub fn from_json(bytes: &[u8]) -> Result<Self, DataLoadError> {
        let doc: Value = serde_json::from_slice(bytes)?;
        let entries = doc.as_array().ok_or(DataLoadError::NotAnArray)?;

        let mut codes = HashMap::with_capacity(entries.len());
        for entry in entries {
            let name = entry.get("city_name").and_then(Value::as_str).unwrap_or_default();
            let code = entry.get("city_code").and_then(Value::as_str).unwrap_or_default();

            if !code.is_empty() {
                codes.insert(name.to_owned(), code.to_owned());
            }
        }

        Ok(Self { codes })
    }

    pub fn get(&self, city_name: &str) -> Option<&str> {
        self.codes.get(city_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Where the resolver loads its index from.
#[derive(Debug, Clone)]
pub enum CitySource {
    Bundled,
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl CitySource {
    fn load(&self) -> Result<CityIndex, DataLoadError> {
        match self {
            CitySource::Bundled => CityIndex::from_json(BUNDLED_CITY_INDEX.as_bytes()),
            CitySource::File(path) => {
                let bytes = fs::read(path)
                    .map_err(|source| DataLoadError::Io { path: path.clone(), source })?;
                CityIndex::from_json(&bytes)
            }
            CitySource::Bytes(bytes) => CityIndex::from_json(bytes),
        }
    }
}

/// Resolves free-text city names to provider codes.
///
/// The index is loaded on the first lookup and kept for the resolver's
/// lifetime. A failed load is remembered: every later lookup returns `None`.
#[derive(Debug)]
pub struct CityCodeResolver {
    source: CitySource,
    index: OnceLock<Result<CityIndex, DataLoadError>>,
}

impl CityCodeResolver {
    pub fn new(source: CitySource) -> Self {
        Self { source, index: OnceLock::new() }
    }

    pub fn bundled() -> Self {
        Self::new(CitySource::Bundled)
    }

    /// Build the resolver with an already loaded index.
    pub fn with_index(index: CityIndex) -> Self {
        let resolver = Self::new(CitySource::Bytes(Vec::new()));
        let _ = resolver.index.set(Ok(index));
        resolver
    }

    /// The loaded index, loading it on first use.
    pub fn index(&self) -> Result<&CityIndex, &DataLoadError> {
        self.index
            .get_or_init(|| {
                let loaded = self.source.load();
                match &loaded {
                    Ok(index) => debug!(cities = index.len(), "city index loaded"),
                    Err(err) => warn!(error = %err, "city index unavailable"),
                }
                loaded
            })
            .as_ref()
    }

    /// Look up `city_name`, falling back to `city_name + "市"`.
    pub fn resolve(&self, city_name: &str) -> Option<String> {
        let index = self.index().ok()?;
        let name = city_name.trim();

        index
            .get(name)
            .or_else(|| index.get(&format!("{name}{CITY_SUFFIX}")))
            .map(str::to_owned)
    }
}

impl Default for CityCodeResolver {
    fn default() -> Self {
        Self::bundled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"city_name": "广东", "city_code": ""},
        {"city_name": "北京", "city_code": "101010100"},
        {"city_name": "苏州市", "city_code": "101190401"},
        {"city_name": "广州", "city_code": "101280101"},
        {"city_name": "空城"}
    ]"#;

    fn resolver() -> CityCodeResolver {
        CityCodeResolver::new(CitySource::Bytes(SAMPLE.as_bytes().to_vec()))
    }

    #[test]
    fn resolves_bare_name() {
        let r = resolver();
        assert_eq!(r.resolve("北京").as_deref(), Some("101010100"));
        assert_eq!(r.resolve("广州").as_deref(), Some("101280101"));
    }

    #[test]
    fn falls_back_to_city_suffix() {
        let r = resolver();
        assert_eq!(r.resolve("苏州").as_deref(), Some("101190401"));
        assert_eq!(r.resolve("苏州市").as_deref(), Some("101190401"));
    }

    #[test]
    fn unknown_city_is_none() {
        assert_eq!(resolver().resolve("__not_a_city__"), None);
    }

    #[test]
    fn entries_without_code_are_skipped() {
        let r = resolver();
        assert_eq!(r.resolve("广东"), None);
        assert_eq!(r.resolve("空城"), None);
        assert_eq!(r.index().unwrap().len(), 3);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(resolver().resolve("  北京 ").as_deref(), Some("101010100"));
    }

    #[test]
    fn later_duplicate_wins() {
        let index = CityIndex::from_json(
            r#"[{"city_name":"a","city_code":"1"},{"city_name":"a","city_code":"2"}]"#.as_bytes(),
        )
        .unwrap();
        assert_eq!(index.get("a"), Some("2"));
    }

    #[test]
    fn non_array_dataset_fails_to_load() {
        let r = CityCodeResolver::new(CitySource::Bytes(br#"{"city_name":"x"}"#.to_vec()));
        assert!(matches!(r.index(), Err(DataLoadError::NotAnArray)));
        assert_eq!(r.resolve("x"), None);
    }

    #[test]
    fn malformed_dataset_fails_to_load() {
        let r = CityCodeResolver::new(CitySource::Bytes(b"[{".to_vec()));
        assert!(matches!(r.index(), Err(DataLoadError::Json(_))));
        assert_eq!(r.resolve("北京"), None);
    }

    #[test]
    fn missing_file_fails_to_load() {
        let r = CityCodeResolver::new(CitySource::File("/definitely/not/here/citycode.json".into()));
        assert!(matches!(r.index(), Err(DataLoadError::Io { .. })));
        assert_eq!(r.resolve("北京"), None);
    }

    #[test]
    fn bundled_index_knows_major_cities() {
        let r = CityCodeResolver::bundled();
        assert_eq!(r.resolve("北京").as_deref(), Some("101010100"));
        assert_eq!(r.resolve("上海").as_deref(), Some("101020100"));
        assert_eq!(r.resolve("苏州").as_deref(), Some("101190401"));
    }

    #[test]
    fn bundled_index_covers_provincial_capitals() {
        let r = CityCodeResolver::bundled();
        let capitals = [
            ("南宁", "101300101"),
            ("合肥", "101220101"),
            ("兰州", "101160101"),
            ("石家庄", "101090101"),
            ("乌鲁木齐", "101130101"),
            ("拉萨", "101140101"),
            ("海口", "101310101"),
            ("香港", "101320101"),
        ];
        for (city, code) in capitals {
            assert_eq!(r.resolve(city).as_deref(), Some(code), "{city}");
        }
        assert_eq!(r.resolve("吉林").as_deref(), Some("101060201"));
        assert_eq!(r.resolve("广西"), None);
    }

    #[test]
    fn preloaded_index_is_used_as_is() {
        let index = CityIndex::from_json(SAMPLE.as_bytes()).unwrap();
        let r = CityCodeResolver::with_index(index);
        assert_eq!(r.resolve("北京").as_deref(), Some("101010100"));
    }
}
