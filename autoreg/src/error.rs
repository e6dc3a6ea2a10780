use std::path::PathBuf;
use thiserror::Error;

/// Errors related to discovering candidate service types.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Invalid discovery configuration: {0}")]
    InvalidConfig(String),
    #[error("Cannot walk source root {}: {source}", .path.display())]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Cannot read source file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot parse source file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
    #[error("No type introspector is available - enable the `registry` feature or supply one with `with_introspector()`")]
    MissingIntrospector,
}

/// Errors related to appending bindings to a host container.
#[derive(Error, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum RegistrationError {
    #[error("Attempted to register a duplicated binding name: {0}")]
    DuplicateBindingName(String),
    #[error("Attempted to register a duplicated binding for type: {0}")]
    DuplicateBindingType(String),
}
