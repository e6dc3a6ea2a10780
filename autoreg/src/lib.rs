//! Automatic service discovery and registration for dependency-injection containers.
//!
//! Given a set of source roots, this crate indexes every type declared under them, filters
//! the index by configured name prefixes, inspects the survivors for a declarative service
//! marker and registers the eligible ones into a host container's binding set - exactly
//! once each, under collision-free generated names. The container itself stays behind the
//! [BindingRegistry](registration::BindingRegistry) boundary: this crate never resolves or
//! instantiates services and never manages their lifetimes.
//!
//! ```no_run
//! use autoreg::config::DiscoveryConfig;
//! use autoreg::extension::AutoRegistrationExtension;
//! use autoreg::registration::{BindingDefinition, BindingRegistry};
//! use autoreg::RegistrationError;
//!
//! #[derive(Default)]
//! struct Bindings(Vec<BindingDefinition>);
//!
//! impl BindingRegistry for Bindings {
//!     fn has_binding_for_type(&self, type_name: &str) -> bool {
//!         self.0.iter().any(|binding| binding.exposed_type == type_name)
//!     }
//!
//!     fn add_binding(&mut self, definition: BindingDefinition) -> Result<(), RegistrationError> {
//!         self.0.push(definition);
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut extension = AutoRegistrationExtension::new(DiscoveryConfig::new(
//!         ["src/services"],
//!         ["legacy::"],
//!     ));
//!
//!     // while the host assembles its container
//!     extension.load_configuration()?;
//!
//!     // in the host's finalize-bindings phase
//!     let mut bindings = Bindings::default();
//!     extension.before_compile(&mut bindings)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Features
//!
//! * `threadsafe` - use threadsafe pointers and `Send + Sync` trait bounds
//! * `registry` - the static registration registry and the introspector backed by it
//! * `derive` - automatic `Service` derivation

pub mod config;
mod error;
pub mod exclusion;
pub mod extension;
pub mod introspection;
pub mod locator;
pub mod registration;
pub mod service;

pub use error::{DiscoveryError, RegistrationError};

#[cfg(feature = "derive")]
pub use autoreg_derive::Service;
