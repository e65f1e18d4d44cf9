use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::dataset::Dataset;
use crate::error::MapError;

/// Reserved name of the country-level map.
pub const COUNTRY_NAME: &str = "India";

/// Something that can produce one dataset on demand.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<Dataset, MapError>;
}

impl<F> DatasetSource for F
where
    F: Fn() -> Result<Dataset, MapError> + Send + Sync,
{
    fn load(&self) -> Result<Dataset, MapError> {
        self()
    }
}

/// JSON text compiled into the binary (usually via `include_str!`).
pub struct EmbeddedSource {
    label: String,
    json: &'static str,
}

impl EmbeddedSource {
    pub fn new(label: impl Into<String>, json: &'static str) -> Self {
        EmbeddedSource {
            label: label.into(),
            json,
        }
    }
}

impl DatasetSource for EmbeddedSource {
    fn load(&self) -> Result<Dataset, MapError> {
        Dataset::from_json(&self.label, self.json)
    }
}

/// Reads `<dir>/<Key>.json` where `Key` is the normalized map name.
pub struct DirectorySource {
    path: PathBuf,
    label: String,
}

impl DirectorySource {
    pub fn new(dir: &Path, name: &str) -> Self {
        Self::at(dir.join(format!("{}.json", normalize_map_name(name))), name)
    }

    /// Read exactly `path`.
    pub fn at(path: PathBuf, label: &str) -> Self {
        DirectorySource {
            path,
            label: label.to_string(),
        }
    }
}

impl DatasetSource for DirectorySource {
    fn load(&self) -> Result<Dataset, MapError> {
        let json = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                MapError::DatasetNotFound(self.label.clone())
            } else {
                MapError::Io {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                }
            }
        })?;
        Dataset::from_json(&self.label, &json)
    }
}

/// Canonical form of a subdivision name: underscores become spaces, each word is
/// title-cased, and the words are joined without separators.
///
/// `"uttar_pradesh"`, `"Uttar Pradesh"` and `"UTTAR PRADESH"` all give
/// `"UttarPradesh"`.
pub fn normalize_map_name(name: &str) -> String {
    name.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Registry key: the normalized name, lower-cased, so lookups ignore case
/// and word boundaries (`"TamilNadu"` and `"tamil nadu"` collide).
fn lookup_key(name: &str) -> String {
    normalize_map_name(name).to_lowercase()
}

/// True when `name` selects the country map (case-insensitive).
pub fn is_country(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(COUNTRY_NAME)
}

struct Entry {
    display_name: String,
    source: Box<dyn DatasetSource>,
}

/// All known datasets: one country singleton plus any number of
/// subdivisions keyed by normalized name.
#[derive(Default)]
pub struct DatasetRegistry {
    country: Option<Entry>,
    subdivisions: BTreeMap<String, Entry>,
}

impl std::fmt::Debug for DatasetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetRegistry")
            .field("country", &self.country.is_some())
            .field("subdivisions", &self.subdivisions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_country(mut self, source: impl DatasetSource + 'static) -> Self {
        self.country = Some(Entry {
            display_name: COUNTRY_NAME.to_string(),
            source: Box::new(source),
        });
        self
    }

    /// Register a subdivision map. A later registration under the same
    /// normalized name replaces the earlier one.
    pub fn with_subdivision(mut self, name: &str, source: impl DatasetSource + 'static) -> Self {
        self.subdivisions.insert(
            lookup_key(name),
            Entry {
                display_name: name.trim().to_string(),
                source: Box::new(source),
            },
        );
        self
    }

    /// Register every `*.json` file in `dir` as a subdivision, except
    /// `India.json`, which becomes the country map.
    pub fn with_directory(mut self, dir: &Path) -> Result<Self, MapError> {
        let io_err = |e: std::io::Error| MapError::Io {
            path: dir.display().to_string(),
            message: e.to_string(),
        };
        let mut files: Vec<(String, PathBuf)> = std::fs::read_dir(dir)
            .map_err(io_err)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .filter_map(|p| {
                let stem = p.file_stem()?.to_str()?.to_string();
                Some((stem, p))
            })
            .collect();
        files.sort();
        for (stem, path) in files {
            let source = DirectorySource::at(path, &stem);
            if is_country(&stem) {
                self = self.with_country(source);
            } else {
                self = self.with_subdivision(&stem, source);
            }
        }
        tracing::info!(
            dir = %dir.display(),
            maps = self.len(),
            "Registered dataset directory"
        );
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.subdivisions.len() + usize::from(self.country.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered display names, country first, then subdivisions by key.
    pub fn names(&self) -> Vec<String> {
        self.country
            .iter()
            .chain(self.subdivisions.values())
            .map(|e| e.display_name.clone())
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        if is_country(name) {
            self.country.as_ref()
        } else {
            self.subdivisions.get(&lookup_key(name))
        }
    }

    /// Load the dataset for `name`. Fails with
    /// [`MapError::DatasetNotFound`] when nothing is registered under it.
    pub fn resolve(&self, name: &str) -> Result<Dataset, MapError> {
        let Some(entry) = self.entry(name) else {
            tracing::warn!(map = name, "No dataset registered for map");
            return Err(MapError::DatasetNotFound(name.to_string()));
        };
        let dataset = entry.source.load()?;
        tracing::info!(
            map = %entry.display_name,
            regions = dataset.regions.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Region;

    fn named(name: &'static str) -> impl DatasetSource {
        move || -> Result<Dataset, MapError> {
            Ok(Dataset::new(
                name.to_lowercase(),
                name,
                vec![Region::new("a", "A", "M0 0")],
            ))
        }
    }

    fn registry() -> DatasetRegistry {
        DatasetRegistry::new()
            .with_country(named("India"))
            .with_subdivision("Kerala", named("Kerala"))
            .with_subdivision("Uttar Pradesh", named("Uttar Pradesh"))
    }

    #[test]
    fn test_normalize_map_name() {
        assert_eq!(normalize_map_name("uttar_pradesh"), "UttarPradesh");
        assert_eq!(normalize_map_name("Uttar Pradesh"), "UttarPradesh");
        assert_eq!(normalize_map_name("UTTAR  PRADESH"), "UttarPradesh");
        assert_eq!(normalize_map_name("  goa "), "Goa");
        assert_eq!(normalize_map_name(""), "");
    }

    #[test]
    fn test_country_is_case_insensitive() {
        let reg = registry();
        let a = reg.resolve("india").unwrap();
        let b = reg.resolve("INDIA").unwrap();
        let c = reg.resolve("India").unwrap();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.name, "India");
    }

    #[test]
    fn test_subdivision_lookup_variants() {
        let reg = registry();
        assert_eq!(reg.resolve("uttar_pradesh").unwrap().name, "Uttar Pradesh");
        assert_eq!(reg.resolve("KERALA").unwrap().name, "Kerala");
    }

    #[test]
    fn test_unknown_map_is_not_found() {
        let err = registry().resolve("Atlantis").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err, MapError::DatasetNotFound("Atlantis".into()));
    }

    #[test]
    fn test_missing_country_is_not_found() {
        let reg = DatasetRegistry::new().with_subdivision("Goa", named("Goa"));
        assert!(reg.resolve("India").unwrap_err().is_not_found());
    }

    #[test]
    fn test_source_errors_are_not_not_found() {
        let reg = DatasetRegistry::new().with_subdivision("Broken", EmbeddedSource::new("Broken", "{"));
        let err = reg.resolve("broken").unwrap_err();
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_names_and_len() {
        let reg = registry();
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.names(), vec!["India", "Kerala", "Uttar Pradesh"]);
        assert!(reg.contains("kerala"));
        assert!(!reg.contains("goa"));
        assert!(DatasetRegistry::new().is_empty());
    }

    #[test]
    fn test_embedded_source() {
        let reg = DatasetRegistry::new().with_subdivision(
            "Goa",
            EmbeddedSource::new(
                "Goa",
                r#"{"id": "goa", "name": "Goa", "viewBox": "0 0 10 10", "paths": []}"#,
            ),
        );
        assert_eq!(reg.resolve("goa").unwrap().id, "goa");
    }

    #[test]
    fn test_directory_registration() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("India.json"),
            r#"{"id": "india", "name": "India", "paths": []}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("TamilNadu.json"),
            r#"{"id": "tn", "name": "Tamil Nadu", "paths": [{"id": "CHN", "name": "Chennai", "d": "M0 0 L1 1"}]}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let reg = DatasetRegistry::new().with_directory(dir.path()).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.resolve("india").unwrap().id, "india");
        assert_eq!(reg.resolve("TamilNadu").unwrap().regions.len(), 1);
        assert_eq!(reg.resolve("tamil_nadu").unwrap().id, "tn");
    }

    #[test]
    fn test_directory_source_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let reg = DatasetRegistry::new().with_subdivision("Goa", DirectorySource::new(dir.path(), "Goa"));
        assert!(reg.resolve("Goa").unwrap_err().is_not_found());
    }

    #[test]
    fn test_directory_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let err = DatasetRegistry::new().with_directory(&missing).unwrap_err();
        assert!(matches!(err, MapError::Io { .. }));
    }
}
