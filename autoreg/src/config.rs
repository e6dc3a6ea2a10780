//! Discovery configuration consumed by the pipeline.
//!
//! Hosts usually supply the configuration directly when embedding the extension, but it
//! can also be layered from an optional `autoreg.json` file overridden by environment
//! variables prefixed with `AUTOREG_`.

use crate::error::DiscoveryError;
use crate::locator::ScanRoot;
use config::{Config, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "AUTOREG";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "autoreg.json";

/// Source discovery configuration: which roots to scan and which fully-qualified name
/// prefixes to exclude.
#[non_exhaustive]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DiscoveryConfig {
    /// Ordered set of root directories to scan; may be empty. Duplicates are harmless but
    /// redundant.
    #[serde(default)]
    pub paths: Vec<ScanRoot>,

    /// Ordered set of name prefixes excluded from discovery; empty by default.
    #[serde(default)]
    pub excludes: Vec<String>,
}

impl DiscoveryConfig {
    /// Creates a configuration with the given scan roots and exclusion prefixes.
    pub fn new<R: Into<ScanRoot>, E: Into<String>>(
        paths: impl IntoIterator<Item = R>,
        excludes: impl IntoIterator<Item = E>,
    ) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            excludes: excludes.into_iter().map(Into::into).collect(),
        }
    }

    /// Rejects malformed entries. Runs before any scanning, so a bad configuration aborts
    /// the pass without touching the filesystem or the container.
    pub fn validate(&self) -> Result<(), DiscoveryError> {
        if self.paths.iter().any(|root| root.path.as_os_str().is_empty()) {
            return Err(DiscoveryError::InvalidConfig(
                "scan path entries must not be empty".to_string(),
            ));
        }

        if self
            .paths
            .iter()
            .any(|root| matches!(&root.namespace, Some(namespace) if namespace.is_empty()))
        {
            return Err(DiscoveryError::InvalidConfig(
                "scan root namespaces must not be empty".to_string(),
            ));
        }

        if self.excludes.iter().any(String::is_empty) {
            return Err(DiscoveryError::InvalidConfig(
                "exclusion prefix entries must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Layers [CONFIG_FILE] (if present) and `AUTOREG_`-prefixed environment variables
    /// into a configuration.
    pub fn init_from_environment() -> Result<Self, DiscoveryError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalDiscoveryConfig>())
            .map(Into::into)
            .map_err(|error| DiscoveryError::InvalidConfig(error.to_string()))
    }
}

#[derive(Deserialize)]
struct OptionalDiscoveryConfig {
    paths: Option<Vec<ScanRoot>>,
    excludes: Option<Vec<String>>,
}

impl From<OptionalDiscoveryConfig> for DiscoveryConfig {
    fn from(value: OptionalDiscoveryConfig) -> Self {
        Self {
            paths: value.paths.unwrap_or_default(),
            excludes: value.excludes.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::DiscoveryConfig;
    use crate::error::DiscoveryError;
    use crate::locator::ScanRoot;

    #[test]
    fn should_default_to_empty_sets() {
        let config = DiscoveryConfig::default();
        assert!(config.paths.is_empty());
        assert!(config.excludes.is_empty());
    }

    #[test]
    fn should_accept_valid_entries() {
        let config = DiscoveryConfig::new(
            [ScanRoot::new("src/services").with_namespace("app::services")],
            ["legacy::"],
        );

        config.validate().unwrap();
    }

    #[test]
    fn should_reject_empty_path_entry() {
        let config = DiscoveryConfig::new([""], Vec::<String>::new());

        assert!(matches!(
            config.validate().unwrap_err(),
            DiscoveryError::InvalidConfig(..)
        ));
    }

    #[test]
    fn should_reject_empty_exclusion_prefix() {
        let config = DiscoveryConfig::new(["src"], [""]);

        assert!(matches!(
            config.validate().unwrap_err(),
            DiscoveryError::InvalidConfig(..)
        ));
    }

    #[test]
    fn should_reject_empty_namespace() {
        let config = DiscoveryConfig::new(
            [ScanRoot::new("src").with_namespace("")],
            Vec::<String>::new(),
        );

        assert!(matches!(
            config.validate().unwrap_err(),
            DiscoveryError::InvalidConfig(..)
        ));
    }

    #[test]
    fn should_deserialize_plain_and_qualified_roots() {
        let config: DiscoveryConfig = serde_json::from_str(
            r#"{"paths": ["src", {"path": "legacy/src", "namespace": "legacy"}], "excludes": ["legacy::"]}"#,
        )
        .unwrap();

        assert_eq!(config.paths.len(), 2);
        assert_eq!(config.paths[0], ScanRoot::new("src"));
        assert_eq!(
            config.paths[1],
            ScanRoot::new("legacy/src").with_namespace("legacy")
        );
        assert_eq!(config.excludes, ["legacy::"]);
    }
}
