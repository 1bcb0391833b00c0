//! Workspace configuration loaded from `stencil.toml`.

use crate::cache::{CacheConfig, DEFAULT_MAX_SIZE, DEFAULT_TTL};
use crate::error::ConfigError;
use crate::grammar::DirectiveConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// File names searched for in the workspace root, in order.
pub const CONFIG_FILES: &[&str] = &["stencil.toml", ".stencil.toml"];

/// Analysis settings for a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Root directory for the workspace.
    pub root: PathBuf,
    /// Config file path (if found).
    pub config_path: Option<PathBuf>,
    /// Document cache limits.
    pub cache: CacheConfig,
    /// Custom directives added to the built-in catalog.
    pub directives: Vec<DirectiveConfig>,
}

impl AnalysisConfig {
    /// Load configuration for a workspace root.
    ///
    /// A missing, unreadable, or malformed file yields the defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = find_config_file(root);
        let Some(path) = config_path.clone() else {
            return Self::base(root, None);
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            warn!("Failed to read stencil config at {}", path.display());
            return Self::base(root, config_path);
        };
        Self::from_contents(root, config_path, &contents)
    }

    /// Parses `contents`, falling back to the defaults with a warning.
    pub fn from_contents(root: &Path, config_path: Option<PathBuf>, contents: &str) -> Self {
        let config = Self::base(root, config_path);
        match toml::from_str::<ConfigFile>(contents) {
            Ok(parsed) => config.with_file(parsed),
            Err(err) => {
                if let Some(path) = &config.config_path {
                    warn!("Failed to parse stencil config at {}: {err}", path.display());
                } else {
                    warn!("Failed to parse stencil config: {err}");
                }
                config
            }
        }
    }

    /// Loads an explicitly named file. Unlike [`AnalysisConfig::load`], failures
    /// are returned to the caller.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let root = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self::base(&root, Some(path.to_path_buf())).with_file(parsed))
    }

    fn base(root: &Path, config_path: Option<PathBuf>) -> Self {
        Self {
            root: root.to_path_buf(),
            config_path,
            cache: CacheConfig::default(),
            directives: Vec::new(),
        }
    }

    fn with_file(mut self, parsed: ConfigFile) -> Self {
        self.cache = parsed.cache.into();
        self.directives = parsed.directives;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    cache: CacheSection,
    #[serde(default)]
    directives: Vec<DirectiveConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CacheSection {
    max_size: Option<usize>,
    ttl_ms: Option<u64>,
}

impl From<CacheSection> for CacheConfig {
    fn from(section: CacheSection) -> Self {
        CacheConfig {
            max_size: section.max_size.unwrap_or(DEFAULT_MAX_SIZE),
            ttl: section.ttl_ms.map_or(DEFAULT_TTL, Duration::from_millis),
        }
    }
}

/// The first of [`CONFIG_FILES`] present in `root`.
#[must_use]
pub fn find_config_file(root: &Path) -> Option<PathBuf> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::DirectiveShape;

    #[test]
    fn test_from_contents_reads_sections() {
        let config = AnalysisConfig::from_contents(
            Path::new("/ws"),
            None,
            r#"
[cache]
max_size = 8
ttl_ms = 1500

[[directives]]
name = "modal"
block = true
shape = "named"
"#,
        );
        assert_eq!(config.cache.max_size, 8);
        assert_eq!(config.cache.ttl, Duration::from_millis(1500));
        assert_eq!(config.directives.len(), 1);
        assert_eq!(config.directives[0].name, "modal");
        assert!(config.directives[0].block);
        assert_eq!(config.directives[0].shape, DirectiveShape::Named);
    }

    #[test]
    fn test_partial_cache_section_keeps_defaults() {
        let config = AnalysisConfig::from_contents(Path::new("/ws"), None, "[cache]\nmax_size = 2\n");
        assert_eq!(config.cache.max_size, 2);
        assert_eq!(config.cache.ttl, DEFAULT_TTL);
        assert!(config.directives.is_empty());
    }

    #[test]
    fn test_malformed_contents_fall_back_to_defaults() {
        let config = AnalysisConfig::from_contents(Path::new("/ws"), None, "[cache\n");
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.root, PathBuf::from("/ws"));
    }
}
