//! Rules catalog loading.
//!
//! The engine ships a built-in catalog; `SHEETKEEP_CATALOG_PATH` points at a
//! replacement JSON file with the same shape.

use std::path::{Path, PathBuf};

use sheetkeep_domain::{DomainError, RulesCatalog};

/// Catalog compiled into the binary.
pub const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Catalog is inconsistent: {0}")]
    Invalid(#[from] DomainError),
}

/// Parse and validate a catalog document.
pub fn parse_catalog(json: &str) -> Result<RulesCatalog, CatalogError> {
    let catalog: RulesCatalog = serde_json::from_str(json)?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load the catalog from `path`, or the built-in one when `path` is `None`.
pub async fn load_catalog(path: Option<&Path>) -> Result<RulesCatalog, CatalogError> {
    let catalog = match path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            parse_catalog(&json)?
        }
        None => parse_catalog(BUILTIN_CATALOG)?,
    };

    tracing::info!(
        source = %path.map_or_else(|| "built-in".to_string(), |p| p.display().to_string()),
        classes = catalog.classes.len(),
        spells = catalog.spells.len(),
        boons = catalog.boons.len(),
        weapons = catalog.weapons.len(),
        armor = catalog.armor.len(),
        "Rules catalog loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = parse_catalog(BUILTIN_CATALOG).unwrap();
        assert!(catalog.class("arcanist").is_some());
        assert!(catalog.class("vanguard").is_some());
        assert!(!catalog.spells.is_empty());
    }

    #[test]
    fn inconsistent_catalog_is_rejected() {
        let json = r#"{"classes":[{"id":"x","name":"X","progression":[]}]}"#;
        assert!(matches!(parse_catalog(json), Err(CatalogError::Invalid(_))));
        assert!(matches!(parse_catalog("nope"), Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn loads_from_file_or_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"{"classes":[{"id":"monk","name":"Monk","progression":[{"level":1,"abilities":1}]}]}"#,
        )
        .unwrap();

        let custom = load_catalog(Some(&path)).await.unwrap();
        assert_eq!(custom.classes.len(), 1);

        let builtin = load_catalog(None).await.unwrap();
        assert!(builtin.classes.len() > 1);

        let missing = load_catalog(Some(&dir.path().join("missing.json"))).await;
        assert!(matches!(missing, Err(CatalogError::Read { .. })));
    }
}
