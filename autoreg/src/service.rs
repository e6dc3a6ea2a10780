//! Basic building blocks of the service surface: the [Service] trait implemented by
//! container-managed types, pointer aliases for type-erased instances, and the declarative
//! [TypeMarker]s which discovery inspects to decide eligibility.
//!
//! A service is any type which can be constructed from its default state and handed to a
//! container behind a type-erased pointer. The trait can be automatically derived together
//! with all registration infrastructure if the `derive` feature is enabled:
//!
//! ```ignore
//! use autoreg::Service;
//!
//! #[derive(Service)]
//! struct Mailer {
//!     retries: u32,
//! }
//! ```
//!
//! Deriving `Service` attaches a marker of the [SERVICE] kind directly to the type, which
//! is what makes it visible to marker inspection.

use std::any::Any;
#[cfg(not(feature = "threadsafe"))]
use std::rc::Rc;
#[cfg(feature = "threadsafe")]
use std::sync::Arc;

#[cfg(not(feature = "threadsafe"))]
pub type ServiceInstancePtr<T> = Rc<T>;
#[cfg(feature = "threadsafe")]
pub type ServiceInstancePtr<T> = Arc<T>;

#[cfg(not(feature = "threadsafe"))]
pub type ServiceInstanceAnyPtr = ServiceInstancePtr<dyn Any + 'static>;
#[cfg(feature = "threadsafe")]
pub type ServiceInstanceAnyPtr = ServiceInstancePtr<dyn Any + Send + Sync + 'static>;

/// Constructor for type-erased service instances.
pub type ServiceConstructor = fn() -> ServiceInstanceAnyPtr;

/// Kind of the marker signaling "auto-register this type as a container-managed service".
pub const SERVICE: &str = "SERVICE";

/// A declarative marker attached directly to a type declaration, discriminated by kind.
/// Markers are inspectable without instantiating the type; kinds other than [SERVICE] are
/// ignored by discovery.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TypeMarker {
    pub kind: &'static str,
}

impl TypeMarker {
    /// Marker of the [SERVICE] kind.
    pub const fn service() -> Self {
        Self { kind: SERVICE }
    }
}

/// Base trait for types registrable as container-managed services.
pub trait Service: 'static {
    /// Creates an instance of this service from its default state.
    fn create() -> Self
    where
        Self: Sized;
}
