//! Idempotent registration of eligible services against a host container.

use crate::error::RegistrationError;
use crate::introspection::EligibleService;
use crate::service::ServiceConstructor;
use derivative::Derivative;
#[cfg(test)]
use mockall::automock;
use tracing::{debug, info};

/// A complete binding to append to the host container: a generated name, the factory
/// constructing the service and the type the binding exposes.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct BindingDefinition {
    /// Name unique within the host container.
    pub name: String,

    /// Fully-qualified name of the type this binding exposes.
    pub exposed_type: String,

    /// Factory constructing the service from its default state.
    #[derivative(Debug = "ignore")]
    pub factory: ServiceConstructor,
}

/// Facade over the host container's binding set. The pipeline only queries binding
/// existence by exposed type and appends new definitions - it never removes or rebinds,
/// and never touches bindings unrelated to the types discovered in the current pass.
#[cfg_attr(test, automock)]
pub trait BindingRegistry {
    /// Checks whether any existing binding exposes exactly the given type.
    fn has_binding_for_type(&self, type_name: &str) -> bool;

    /// Appends a new binding definition.
    fn add_binding(&mut self, definition: BindingDefinition) -> Result<(), RegistrationError>;
}

/// Registers eligible services into a host container, skipping types which already have a
/// binding for their type-identity.
///
/// Expected to run during the host's finalize-bindings phase, after all other container
/// configuration had a chance to register the same types - this ordering is what makes the
/// existing-binding check meaningful. Generated names live in the coordinator's namespace
/// prefix, which hosts should leave to this extension.
#[derive(Clone, Debug)]
pub struct RegistrationCoordinator {
    prefix: String,
}

impl RegistrationCoordinator {
    /// Creates a coordinator generating binding names within the given namespace prefix.
    pub fn new<T: Into<String>>(prefix: T) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Registers every eligible service without an existing binding for its type under a
    /// fresh `<prefix>.service.N` name, with the counter seeded at 1 and local to this
    /// pass. Already-bound types are left untouched. Returns the number of bindings added.
    pub fn register_services(
        &self,
        services: &[EligibleService],
        registry: &mut dyn BindingRegistry,
    ) -> Result<usize, RegistrationError> {
        let mut counter = 1;
        for service in services {
            if registry.has_binding_for_type(&service.type_name) {
                debug!(
                    "Type {} already has a binding, skipping",
                    service.type_name
                );
                continue;
            }

            let name = format!("{}.service.{}", self.prefix, counter);
            counter += 1;

            registry.add_binding(BindingDefinition {
                name,
                exposed_type: service.type_name.clone(),
                factory: service.constructor,
            })?;
        }

        let registered = counter - 1;
        info!("Registered {} service binding(s)", registered);
        Ok(registered)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::RegistrationError;
    use crate::introspection::EligibleService;
    use crate::registration::{MockBindingRegistry, RegistrationCoordinator};
    use crate::service::{ServiceInstanceAnyPtr, ServiceInstancePtr};
    use mockall::predicate::*;
    use mockall::Sequence;

    fn test_constructor() -> ServiceInstanceAnyPtr {
        ServiceInstancePtr::new(0_i8) as ServiceInstanceAnyPtr
    }

    fn eligible(type_name: &str) -> EligibleService {
        EligibleService {
            type_name: type_name.to_string(),
            constructor: test_constructor,
        }
    }

    #[test]
    fn should_register_unbound_services_with_sequential_names() {
        let mut seq = Sequence::new();

        let mut registry = MockBindingRegistry::new();
        registry
            .expect_has_binding_for_type()
            .with(eq("services::Mailer"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(false);
        registry
            .expect_add_binding()
            .withf(|definition| {
                definition.name == "autoreg.service.1"
                    && definition.exposed_type == "services::Mailer"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        registry
            .expect_has_binding_for_type()
            .with(eq("services::Store"))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(false);
        registry
            .expect_add_binding()
            .withf(|definition| {
                definition.name == "autoreg.service.2"
                    && definition.exposed_type == "services::Store"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let registered = RegistrationCoordinator::new("autoreg")
            .register_services(
                &[eligible("services::Mailer"), eligible("services::Store")],
                &mut registry,
            )
            .unwrap();

        assert_eq!(registered, 2);
    }

    #[test]
    fn should_skip_already_bound_types() {
        let mut registry = MockBindingRegistry::new();
        registry
            .expect_has_binding_for_type()
            .with(eq("services::Mailer"))
            .times(1)
            .return_const(true);
        registry
            .expect_has_binding_for_type()
            .with(eq("services::Store"))
            .times(1)
            .return_const(false);
        registry
            .expect_add_binding()
            .withf(|definition| {
                definition.name == "autoreg.service.1"
                    && definition.exposed_type == "services::Store"
            })
            .times(1)
            .returning(|_| Ok(()));

        let registered = RegistrationCoordinator::new("autoreg")
            .register_services(
                &[eligible("services::Mailer"), eligible("services::Store")],
                &mut registry,
            )
            .unwrap();

        assert_eq!(registered, 1);
    }

    #[test]
    fn should_register_nothing_for_empty_input() {
        let mut registry = MockBindingRegistry::new();
        registry.expect_has_binding_for_type().never();
        registry.expect_add_binding().never();

        let registered = RegistrationCoordinator::new("autoreg")
            .register_services(&[], &mut registry)
            .unwrap();

        assert_eq!(registered, 0);
    }

    #[test]
    fn should_propagate_registry_errors() {
        let mut registry = MockBindingRegistry::new();
        registry
            .expect_has_binding_for_type()
            .times(1)
            .return_const(false);
        registry.expect_add_binding().times(1).returning(|definition| {
            Err(RegistrationError::DuplicateBindingName(definition.name))
        });

        let result = RegistrationCoordinator::new("autoreg")
            .register_services(&[eligible("services::Mailer")], &mut registry);

        assert!(matches!(
            result.unwrap_err(),
            RegistrationError::DuplicateBindingName(..)
        ));
    }
}
