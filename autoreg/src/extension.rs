//! Wiring of the discovery pipeline into a host container's compilation lifecycle.

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, RegistrationError};
use crate::exclusion::ExclusionFilter;
#[cfg(feature = "registry")]
use crate::introspection::RegistryIntrospector;
use crate::introspection::{EligibleService, MarkerInspector, TypeIntrospector};
use crate::locator::TypeLocator;
use crate::registration::{BindingRegistry, RegistrationCoordinator};
use tracing::info;

#[cfg(not(feature = "threadsafe"))]
pub type TypeIntrospectorPtr = Box<dyn TypeIntrospector>;
#[cfg(feature = "threadsafe")]
pub type TypeIntrospectorPtr = Box<dyn TypeIntrospector + Send + Sync>;

/// Default namespace prefix for generated binding names.
pub const DEFAULT_PREFIX: &str = "autoreg";

/// Host-container extension running the full discovery pass: locate types under the
/// configured roots, filter them by excluded prefixes, inspect the survivors for service
/// markers and register the eligible ones into the host's binding set.
///
/// Hosts call [load_configuration](Self::load_configuration) while assembling the
/// container and [before_compile](Self::before_compile) in their finalize-bindings phase,
/// after all other configuration has been applied. The whole pass is a single linear,
/// synchronous run with no state carried between invocations - a fresh pass recomputes
/// everything, and only the host's binding set persists.
pub struct AutoRegistrationExtension {
    config: DiscoveryConfig,
    prefix: String,
    locator: TypeLocator,
    introspector: Option<TypeIntrospectorPtr>,
    discovered: Vec<EligibleService>,
}

impl AutoRegistrationExtension {
    /// Creates an extension with the default locator and name prefix and, with the
    /// `registry` feature enabled, the registry-backed introspector.
    pub fn new(config: DiscoveryConfig) -> Self {
        #[cfg(feature = "registry")]
        let introspector: Option<TypeIntrospectorPtr> =
            Some(Box::new(RegistryIntrospector::new()));
        #[cfg(not(feature = "registry"))]
        let introspector: Option<TypeIntrospectorPtr> = None;

        Self {
            config,
            prefix: DEFAULT_PREFIX.to_string(),
            locator: TypeLocator::new(),
            introspector,
            discovered: Vec::new(),
        }
    }

    /// Sets the namespace prefix for generated binding names.
    pub fn with_prefix<T: Into<String>>(mut self, prefix: T) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the introspector used to resolve type metadata.
    pub fn with_introspector(mut self, introspector: TypeIntrospectorPtr) -> Self {
        self.introspector = Some(introspector);
        self
    }

    /// Sets the locator used to index source roots.
    pub fn with_locator(mut self, locator: TypeLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Services discovered by the last [load_configuration](Self::load_configuration)
    /// call.
    pub fn discovered_services(&self) -> &[EligibleService] {
        &self.discovered
    }

    /// Runs locate, filter and inspect over the configured roots and caches the eligible
    /// services for registration. Configuration errors abort before any scanning, and a
    /// missing introspector aborts before any registration is attempted.
    pub fn load_configuration(&mut self) -> Result<(), DiscoveryError> {
        self.config.validate()?;

        let introspector = self
            .introspector
            .as_deref()
            .ok_or(DiscoveryError::MissingIntrospector)?;

        let index = self.locator.index_types(&self.config.paths)?;
        let index = ExclusionFilter::new(self.config.excludes.clone()).apply(index);
        self.discovered = MarkerInspector::new(introspector).eligible_services(&index);

        info!("Discovered {} eligible service(s)", self.discovered.len());
        Ok(())
    }

    /// Registers the discovered services into the host registry, skipping types the host
    /// has already bound.
    pub fn before_compile(
        &self,
        registry: &mut dyn BindingRegistry,
    ) -> Result<usize, RegistrationError> {
        RegistrationCoordinator::new(self.prefix.as_str())
            .register_services(&self.discovered, registry)
    }
}
