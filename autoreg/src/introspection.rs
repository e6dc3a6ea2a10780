//! Marker introspection over discovered types.
//!
//! Locating a type only yields its name; deciding whether it is an injectable service
//! requires a view into type metadata - whether the type is loadable and concrete, and
//! which declarative markers are attached directly to its declaration. That view is the
//! [TypeIntrospector] capability, which keeps the pipeline independent of any concrete
//! type system and easy to fake in tests. The default implementation is
//! [RegistryIntrospector], backed by a side-table of statically submitted
//! [ServiceTypeRegistration]s - `#[derive(Service)]` submits one for each marked type.

use crate::locator::TypeIndex;
use crate::service::{ServiceConstructor, TypeMarker, SERVICE};
use derivative::Derivative;
#[cfg(feature = "registry")]
use fxhash::FxHashMap;
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use tracing::debug;

/// Metadata describing a single resolvable type.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct TypeMetadata {
    /// Whether the type cannot be instantiated directly.
    pub is_abstract: bool,

    /// Declarative markers attached directly to the type declaration. Markers declared on
    /// ancestor types are never reported here.
    pub markers: Vec<TypeMarker>,

    /// Constructor producing a type-erased instance from the type's default state; absent
    /// for types which cannot be constructed.
    #[derivative(Debug = "ignore")]
    pub constructor: Option<ServiceConstructor>,
}

/// Capability for resolving type metadata by fully-qualified name. The pipeline depends on
/// this abstraction instead of a concrete type system, so hosts can plug in their own
/// resolution strategy.
#[cfg_attr(test, automock)]
pub trait TypeIntrospector {
    /// Resolves metadata for the given fully-qualified type name. `None` means the type is
    /// not loadable at inspection time.
    fn resolve(&self, type_name: &str) -> Option<TypeMetadata>;
}

/// A statically registered description of a type, submitted to the global registry either
/// by `#[derive(Service)]` or manually via [internal::submit].
#[cfg(feature = "registry")]
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct ServiceTypeRegistration {
    /// Fully-qualified name of the described type.
    pub type_name: &'static str,
    pub is_abstract: bool,
    pub markers: &'static [TypeMarker],
    #[derivative(Debug = "ignore")]
    pub constructor: Option<ServiceConstructor>,
}

/// [TypeIntrospector] backed by all [ServiceTypeRegistration]s submitted in the current
/// binary.
#[cfg(feature = "registry")]
#[derive(Clone, Debug)]
pub struct RegistryIntrospector {
    registrations: FxHashMap<&'static str, ServiceTypeRegistration>,
}

#[cfg(feature = "registry")]
impl Default for RegistryIntrospector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "registry")]
impl RegistryIntrospector {
    pub fn new() -> Self {
        let registrations = inventory::iter::<internal::ServiceRegisterer>
            .into_iter()
            .map(|registerer| (registerer.register)())
            .map(|registration| (registration.type_name, registration))
            .collect();

        Self { registrations }
    }
}

#[cfg(feature = "registry")]
impl TypeIntrospector for RegistryIntrospector {
    fn resolve(&self, type_name: &str) -> Option<TypeMetadata> {
        self.registrations
            .get(type_name)
            .map(|registration| TypeMetadata {
                is_abstract: registration.is_abstract,
                markers: registration.markers.to_vec(),
                constructor: registration.constructor,
            })
    }
}

/// A type confirmed to be loadable, concrete and service-marked - ready for registration.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct EligibleService {
    /// Fully-qualified name of the service type, which is also its binding type-identity.
    pub type_name: String,

    #[derivative(Debug = "ignore")]
    pub constructor: ServiceConstructor,
}

/// Applies the eligibility gates to a filtered [TypeIndex]. A pure query over type
/// metadata - no external state is touched.
pub struct MarkerInspector<'i> {
    introspector: &'i dyn TypeIntrospector,
}

impl<'i> MarkerInspector<'i> {
    pub fn new(introspector: &'i dyn TypeIntrospector) -> Self {
        Self { introspector }
    }

    /// Emits every indexed type which resolves, is not abstract and carries at least one
    /// marker of the [SERVICE] kind directly on its declaration. Types which fail to
    /// resolve are skipped without failing the pass. Emission order follows index
    /// iteration order.
    pub fn eligible_services(&self, index: &TypeIndex) -> Vec<EligibleService> {
        index
            .iter()
            .filter_map(|(type_name, _)| self.inspect(type_name))
            .collect_vec()
    }

    fn inspect(&self, type_name: &str) -> Option<EligibleService> {
        let Some(metadata) = self.introspector.resolve(type_name) else {
            debug!("Skipping unresolvable type {}", type_name);
            return None;
        };

        if metadata.is_abstract {
            debug!("Skipping abstract type {}", type_name);
            return None;
        }

        if !metadata.markers.iter().any(|marker| marker.kind == SERVICE) {
            return None;
        }

        let Some(constructor) = metadata.constructor else {
            debug!("Skipping type {} without a constructor", type_name);
            return None;
        };

        Some(EligibleService {
            type_name: type_name.to_string(),
            constructor,
        })
    }
}

#[doc(hidden)]
#[cfg(feature = "registry")]
pub mod internal {
    use super::ServiceTypeRegistration;
    use inventory::collect;
    pub use inventory::submit;

    pub struct ServiceRegisterer {
        pub register: fn() -> ServiceTypeRegistration,
    }

    collect!(ServiceRegisterer);
}
