//! Catalog file handling
//!
//! A catalog file is a JSON document describing the packs of one installer
//! along with the variables and satisfied conditions for this install:
//!
//! ```json
//! {
//!   "packs": [
//!     { "id": "core", "name": "$APP_NAME Core", "size": 104857600, "required": true },
//!     { "id": "docs", "size": 2097152, "depends": ["core"] }
//!   ],
//!   "variables": { "APP_NAME": "Frobnicator" },
//!   "conditions": ["os.linux"]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::catalog::PackCatalog;
use crate::substitute::VariableSubstitutor;
use crate::types::PackSpec;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogFile {
    pub packs: Vec<PackSpec>,
    /// Values for `${name}` tokens in pack names
    #[serde(default)]
    pub variables: HashMap<String, String>,
    /// Condition names that hold for this install
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl CatalogFile {
    /// Save catalog to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize catalog to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write catalog to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Load catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let catalog: Self =
            serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

        Ok(catalog)
    }

    /// Validate the catalog structure (ids, dependency targets)
    pub fn validate(&self) -> Result<()> {
        if self.packs.is_empty() {
            anyhow::bail!("Catalog must declare at least one pack");
        }
        PackCatalog::new(&self.packs).context("Invalid pack declarations")?;
        Ok(())
    }

    /// File conditions plus `extra`
    pub fn condition_set(&self, extra: &[String]) -> HashSet<String> {
        self.conditions.iter().chain(extra).cloned().collect()
    }

    /// Build the session catalog for the given extra conditions
    pub fn build_catalog(&self, extra_conditions: &[String]) -> Result<PackCatalog> {
        let catalog = PackCatalog::build(&self.packs, &self.condition_set(extra_conditions))
            .context("Failed to build pack catalog")?;
        Ok(catalog)
    }

    /// Substitutor over the file variables, with `overrides` taking precedence
    pub fn substitutor(&self, overrides: &[(String, String)]) -> VariableSubstitutor {
        let mut variables = self.variables.clone();
        variables.extend(overrides.iter().cloned());
        VariableSubstitutor::new(variables)
    }
}

/// Parse a `NAME=VALUE` command-line variable
pub fn parse_variable(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", arg)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::substitute::Substitute;
    use tempfile::TempDir;

    fn sample() -> CatalogFile {
        CatalogFile {
            packs: vec![
                PackSpec::new("core", 100).required(),
                PackSpec::new("docs", 20).depends_on("core"),
                PackSpec::new("gpu", 5).when("has.gpu"),
            ],
            variables: HashMap::from([("APP".to_string(), "Frob".to_string())]),
            conditions: Vec::new(),
        }
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        let catalog = sample();

        catalog.save_to_file(&path).unwrap();
        let loaded = CatalogFile::load_from_file(&path).unwrap();
        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_load_minimal_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"packs": [{"id": "core", "size": 1, "required": true}]}"#).unwrap();

        let loaded = CatalogFile::load_from_file(&path).unwrap();
        assert_eq!(loaded.packs.len(), 1);
        assert!(loaded.variables.is_empty());
        assert!(loaded.conditions.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let err = CatalogFile::load_from_file("/nonexistent/catalog.json").unwrap_err();
        assert!(err.to_string().contains("Failed to read catalog"));
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate().is_ok());
        assert!(CatalogFile::default().validate().is_err());

        let mut broken = sample();
        broken.packs.push(PackSpec::new("extra", 1).depends_on("missing"));
        assert!(broken.validate().is_err());
    }

    #[test]
    fn test_build_catalog_applies_conditions() {
        let file = sample();
        assert_eq!(file.build_catalog(&[]).unwrap().len(), 2);
        assert_eq!(file.build_catalog(&["has.gpu".to_string()]).unwrap().len(), 3);
    }

    #[test]
    fn test_substitutor_overrides() {
        let file = sample();
        let subst = file.substitutor(&[("APP".to_string(), "Other".to_string())]);
        assert_eq!(subst.substitute("$APP"), "Other");
        assert_eq!(file.substitutor(&[]).substitute("$APP"), "Frob");
    }

    #[test]
    fn test_parse_variable() {
        assert_eq!(
            parse_variable("APP=Frob Nicator").unwrap(),
            ("APP".to_string(), "Frob Nicator".to_string())
        );
        assert_eq!(parse_variable("EMPTY=").unwrap().1, "");
        assert!(parse_variable("novalue").is_err());
        assert!(parse_variable("=x").is_err());
    }
}
