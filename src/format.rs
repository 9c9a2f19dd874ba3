//! Document formats and the mapping loader shared by files, maps and specs.

use crate::error::{ConfigError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// A supported document format, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml`, `.yml`
    Yaml,
}

impl Format {
    /// Detect the format of `path` from its extension.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFormat` for any other extension, or none.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Decode `contents` into `T`.
    pub(crate) fn decode<T: DeserializeOwned>(self, path: &Path, contents: &str) -> Result<T> {
        match self {
            Self::Json => serde_json::from_str(contents).map_err(|e| ConfigError::parse(path, e)),
            Self::Yaml => serde_yaml::from_str(contents).map_err(|e| ConfigError::parse(path, e)),
        }
    }

    /// Encode `value` as a document of this format.
    pub(crate) fn encode<T: Serialize>(self, path: &Path, value: &T) -> Result<String> {
        match self {
            Self::Json => {
                serde_json::to_string_pretty(value).map_err(|e| ConfigError::parse(path, e))
            }
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| ConfigError::parse(path, e)),
        }
    }
}

/// Read `path` and decode it into `T`, checking existence and format first.
pub(crate) fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.is_file() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let format = Format::from_path(path)?;
    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(None);
    }
    format.decode(path, &contents).map(Some)
}

/// Load the top-level key/value mapping of a JSON or YAML file.
///
/// Empty files and files whose whole content is `null` yield an empty map.
///
/// # Errors
///
/// - `FileNotFound` if `path` is not a file
/// - `UnsupportedFormat` for extensions other than `.json`, `.yaml`, `.yml`
/// - `ParseError` if the content cannot be decoded
/// - `InvalidContent` if the top level is not a mapping
pub fn load_file(path: impl AsRef<Path>) -> Result<Map<String, Value>> {
    let path = path.as_ref();
    match read_document::<Value>(path)? {
        None | Some(Value::Null) => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(_) => Err(ConfigError::InvalidContent(path.to_path_buf())),
    }
}

/// Write `value` to `path` in the format matching its extension.
pub(crate) fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let format = Format::from_path(path)?;
    let contents = format.encode(path, value)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.yaml")).unwrap(), Format::Yaml);
        assert_eq!(Format::from_path(Path::new("a.YML")).unwrap(), Format::Yaml);
        assert!(matches!(
            Format::from_path(Path::new("a.toml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
        assert!(Format::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_load_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"title": "my_app", "port": 5001}"#).unwrap();

        let map = load_file(&path).unwrap();
        assert_eq!(map.get("title"), Some(&json!("my_app")));
        assert_eq!(map.get("port"), Some(&json!(5001)));
    }

    #[test]
    fn test_load_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "user_name: splinter\nsecret_id: '6'\n").unwrap();

        let map = load_file(&path).unwrap();
        assert_eq!(map.get("user_name"), Some(&json!("splinter")));
        assert_eq!(map.get("secret_id"), Some(&json!("6")));
    }

    #[test]
    fn test_empty_and_null_content_is_empty_map() {
        let temp_dir = TempDir::new().unwrap();
        for (name, contents) in [
            ("empty.yaml", ""),
            ("null.yaml", "~\n"),
            ("empty.json", "  \n"),
            ("null.json", "null"),
        ] {
            let path = temp_dir.path().join(name);
            fs::write(&path, contents).unwrap();
            assert!(load_file(&path).unwrap().is_empty(), "{name}");
        }
    }

    #[test]
    fn test_non_mapping_content_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("list.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(load_file(&path), Err(ConfigError::InvalidContent(_))));

        let path = temp_dir.path().join("scalar.yaml");
        fs::write(&path, "just a string\n").unwrap();
        assert!(matches!(load_file(&path), Err(ConfigError::InvalidContent(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/nonexistent/config.json").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
        assert!(err.to_string().contains("/nonexistent/config.json"));
    }

    #[test]
    fn test_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.txt");
        fs::write(&path, "title = x").unwrap();
        assert!(matches!(load_file(&path), Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{\"title\": ").unwrap();
        assert!(matches!(load_file(&path), Err(ConfigError::ParseError { .. })));
    }
}
