//! Engine configuration from environment variables.

use std::path::PathBuf;

use directories::ProjectDirs;
use sheetkeep_domain::GalleryLimits;

/// Room for JSON framing around the largest image in a request body.
const BODY_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub roster_path: PathBuf,
    /// Replacement rules catalog; the built-in one is used when unset
    pub catalog_path: Option<PathBuf>,
    pub gallery_limits: GalleryLimits,
    /// Comma-separated origins, or `*`
    pub cors_allowed_origins: Option<String>,
}

impl EngineConfig {
    pub const DEFAULT_HOST: &'static str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 3000;

    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        // First usable value wins, so a malformed SERVER_PORT still lets PORT apply
        let server_port = ["SERVER_PORT", "PORT"]
            .into_iter()
            .find_map(|key| var(key).and_then(|v| parse_var(key, &v)))
            .unwrap_or(Self::DEFAULT_PORT);

        let gallery_limits = GalleryLimits {
            max_images: var("SHEETKEEP_MAX_GALLERY_IMAGES")
                .map(|v| {
                    parse_or(
                        "SHEETKEEP_MAX_GALLERY_IMAGES",
                        &v,
                        GalleryLimits::DEFAULT_MAX_IMAGES,
                    )
                })
                .unwrap_or(GalleryLimits::DEFAULT_MAX_IMAGES),
            max_source_bytes: var("SHEETKEEP_MAX_IMAGE_BYTES")
                .map(|v| {
                    parse_or(
                        "SHEETKEEP_MAX_IMAGE_BYTES",
                        &v,
                        GalleryLimits::DEFAULT_MAX_SOURCE_BYTES,
                    )
                })
                .unwrap_or(GalleryLimits::DEFAULT_MAX_SOURCE_BYTES),
        };

        Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            server_port,
            roster_path: var("SHEETKEEP_ROSTER_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_roster_path),
            catalog_path: var("SHEETKEEP_CATALOG_PATH").map(PathBuf::from),
            gallery_limits,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS"),
        }
    }

    /// Largest request body the API accepts.
    ///
    /// Sized for a roster import carrying full galleries.
    pub fn request_body_limit(&self) -> usize {
        self.gallery_limits
            .max_source_bytes
            .saturating_mul(self.gallery_limits.max_images.max(1))
            .saturating_add(BODY_OVERHEAD_BYTES)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = raw, "Invalid number in environment, ignoring");
            None
        }
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, raw: &str, default: T) -> T {
    parse_var(key, raw).unwrap_or(default)
}

/// `roster.json` under the platform data directory, or the working
/// directory when there is none.
fn default_roster_path() -> PathBuf {
    ProjectDirs::from("io", "sheetkeep", "sheetkeep")
        .map(|dirs| dirs.data_dir().join("roster.json"))
        .unwrap_or_else(|| PathBuf::from("roster.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> EngineConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let c = config(&[]);
        assert_eq!(c.server_host, "0.0.0.0");
        assert_eq!(c.server_port, 3000);
        assert_eq!(c.catalog_path, None);
        assert_eq!(c.gallery_limits, GalleryLimits::default());
        assert!(c.roster_path.ends_with("roster.json"));
        assert_eq!(c.cors_allowed_origins, None);
    }

    #[test]
    fn reads_every_variable() {
        let c = config(&[
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "8080"),
            ("SHEETKEEP_ROSTER_PATH", "/tmp/r.json"),
            ("SHEETKEEP_CATALOG_PATH", "/tmp/c.json"),
            ("SHEETKEEP_MAX_GALLERY_IMAGES", "3"),
            ("SHEETKEEP_MAX_IMAGE_BYTES", "1000"),
            ("CORS_ALLOWED_ORIGINS", "http://localhost:5173"),
        ]);
        assert_eq!(c.bind_address(), "127.0.0.1:8080");
        assert_eq!(c.roster_path, PathBuf::from("/tmp/r.json"));
        assert_eq!(c.catalog_path, Some(PathBuf::from("/tmp/c.json")));
        assert_eq!(c.gallery_limits.max_images, 3);
        assert_eq!(c.gallery_limits.max_source_bytes, 1000);
        assert_eq!(c.request_body_limit(), 3000 + BODY_OVERHEAD_BYTES);
        assert_eq!(c.cors_allowed_origins.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn port_falls_back_to_port_var() {
        assert_eq!(config(&[("PORT", "4000")]).server_port, 4000);
        assert_eq!(
            config(&[("PORT", "4000"), ("SERVER_PORT", "5000")]).server_port,
            5000
        );
    }

    #[test]
    fn malformed_server_port_falls_back_to_port_var() {
        let c = config(&[("SERVER_PORT", "eighty"), ("PORT", "4000")]);
        assert_eq!(c.server_port, 4000);

        let c = config(&[("SERVER_PORT", "eighty"), ("PORT", "ninety")]);
        assert_eq!(c.server_port, 3000);
    }

    #[test]
    fn invalid_numbers_use_defaults() {
        let c = config(&[
            ("SERVER_PORT", "eighty"),
            ("SHEETKEEP_MAX_GALLERY_IMAGES", "-1"),
            ("SHEETKEEP_CATALOG_PATH", "   "),
        ]);
        assert_eq!(c.server_port, 3000);
        assert_eq!(c.gallery_limits.max_images, GalleryLimits::DEFAULT_MAX_IMAGES);
        assert_eq!(c.catalog_path, None);
    }
}
