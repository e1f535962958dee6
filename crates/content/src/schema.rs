//! Extraction schema management.
//!
//! Schemas are JSON files named `{name}_{version}.json` in a schemas
//! directory. A schema must declare a `name` and a list of typed `fields`.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Schema loaded when no name is given.
pub const DEFAULT_SCHEMA: &str = "document_schema";

/// Version loaded when no version is given.
pub const DEFAULT_VERSION: &str = "v1";

/// File-backed store of extraction schemas.
pub struct SchemaStore {
    dir: PathBuf,
    cache: HashMap<String, serde_json::Value>,
}

impl SchemaStore {
    /// Create a store over the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// The directory this store reads from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a schema name/version pair maps to.
    #[must_use]
    pub fn path_for(&self, name: &str, version: &str) -> PathBuf {
        self.dir.join(format!("{}_{}.json", name, version))
    }

    /// Load a schema by name and version. Parsed schemas are cached for the
    /// lifetime of the store.
    pub fn load(&mut self, name: &str, version: &str) -> Result<serde_json::Value> {
        let key = format!("{}_{}", name, version);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let path = self.path_for(name, version);
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::SchemaNotFound {
                    name: name.to_string(),
                    version: version.to_string(),
                    path: path.clone(),
                }
            } else {
                Error::io(path.clone(), e)
            }
        })?;

        let schema: serde_json::Value = serde_json::from_str(&raw)?;
        self.cache.insert(key, schema.clone());
        Ok(schema)
    }

    /// Load the default document extraction schema.
    pub fn default_schema(&mut self) -> Result<serde_json::Value> {
        self.load(DEFAULT_SCHEMA, DEFAULT_VERSION)
    }

    /// List available schemas as (name, version) pairs, sorted.
    ///
    /// A missing directory lists as empty rather than an error.
    pub fn list(&self) -> Result<Vec<(String, String)>> {
        let mut schemas = Vec::new();

        if !self.dir.exists() {
            return Ok(schemas);
        }

        for entry in std::fs::read_dir(&self.dir).map_err(|e| Error::io(self.dir.clone(), e))? {
            let entry = entry.map_err(|e| Error::io(self.dir.clone(), e))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            // Stems follow {name}_{version}; the version is the last segment
            if let Some((name, version)) = stem.rsplit_once('_') {
                schemas.push((name.to_string(), version.to_string()));
            }
        }

        schemas.sort();
        Ok(schemas)
    }
}

/// Validate the structure of a schema definition.
///
/// A valid schema has a `name`, and a `fields` array whose members each
/// carry `name` and `type`.
pub fn validate(schema: &serde_json::Value) -> Result<()> {
    if schema.get("name").is_none() {
        return Err(Error::SchemaInvalid("missing required key: name".to_string()));
    }

    let fields = schema
        .get("fields")
        .ok_or_else(|| Error::SchemaInvalid("missing required key: fields".to_string()))?;
    let fields = fields
        .as_array()
        .ok_or_else(|| Error::SchemaInvalid("fields must be an array".to_string()))?;

    for (i, field) in fields.iter().enumerate() {
        let Some(obj) = field.as_object() else {
            return Err(Error::SchemaInvalid(format!("field {} must be an object", i)));
        };
        if !obj.contains_key("name") || !obj.contains_key("type") {
            return Err(Error::SchemaInvalid(format!(
                "field {} must have name and type",
                i
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> &'static str {
        r#"{
            "name": "document_schema",
            "version": "v1",
            "fields": [
                { "name": "title", "type": "string" },
                { "name": "pageCount", "type": "integer" }
            ]
        }"#
    }

    #[test]
    fn test_load_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("document_schema_v1.json"), sample_schema()).unwrap();

        let mut store = SchemaStore::new(dir.path());
        let schema = store.load("document_schema", "v1").unwrap();
        assert_eq!(schema["name"], "document_schema");
        assert_eq!(schema["fields"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_load_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("document_schema_v1.json");
        std::fs::write(&path, sample_schema()).unwrap();

        let mut store = SchemaStore::new(dir.path());
        store.load("document_schema", "v1").unwrap();

        // Rewriting the file does not affect the cached parse
        std::fs::write(&path, r#"{"name": "rewritten", "fields": []}"#).unwrap();
        let schema = store.load("document_schema", "v1").unwrap();
        assert_eq!(schema["name"], "document_schema");
    }

    #[test]
    fn test_load_missing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SchemaStore::new(dir.path());
        let err = store.load("document_schema", "v9").unwrap_err();
        assert!(matches!(err, Error::SchemaNotFound { .. }));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad_v1.json"), "{not json").unwrap();

        let mut store = SchemaStore::new(dir.path());
        let err = store.load("bad", "v1").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_default_schema() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("document_schema_v1.json"), sample_schema()).unwrap();

        let mut store = SchemaStore::new(dir.path());
        let schema = store.default_schema().unwrap();
        assert_eq!(schema["name"], "document_schema");
    }

    #[test]
    fn test_list_schemas() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("document_schema_v1.json"), sample_schema()).unwrap();
        std::fs::write(dir.path().join("invoice_schema_v2.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();
        std::fs::write(dir.path().join("noversion.json"), "{}").unwrap();

        let store = SchemaStore::new(dir.path());
        let schemas = store.list().unwrap();
        assert_eq!(
            schemas,
            vec![
                ("document_schema".to_string(), "v1".to_string()),
                ("invoice_schema".to_string(), "v2".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_missing_directory() {
        let store = SchemaStore::new("/nonexistent/schemas");
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_validate_ok() {
        let schema: serde_json::Value = serde_json::from_str(sample_schema()).unwrap();
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_validate_missing_name() {
        let schema = serde_json::json!({ "fields": [] });
        assert!(matches!(validate(&schema), Err(Error::SchemaInvalid(_))));
    }

    #[test]
    fn test_validate_fields_not_array() {
        let schema = serde_json::json!({ "name": "x", "fields": "nope" });
        assert!(matches!(validate(&schema), Err(Error::SchemaInvalid(_))));
    }

    #[test]
    fn test_validate_field_missing_type() {
        let schema = serde_json::json!({
            "name": "x",
            "fields": [ { "name": "title" } ]
        });
        assert!(matches!(validate(&schema), Err(Error::SchemaInvalid(_))));
    }
}
