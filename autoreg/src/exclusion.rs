//! Prefix-based exclusion of indexed types.

use crate::locator::TypeIndex;
use tracing::debug;

/// Removes indexed types whose fully-qualified name starts with any configured prefix.
///
/// Matching is case-sensitive literal prefix matching - no glob or regex semantics and no
/// namespace-boundary normalization, so a prefix of `foo::Ba` also excludes `foo::Barn`.
/// The result does not depend on prefix order, and an empty prefix set keeps the index
/// unchanged.
#[derive(Clone, Debug, Default)]
pub struct ExclusionFilter {
    prefixes: Vec<String>,
}

impl ExclusionFilter {
    pub fn new<T: Into<String>>(prefixes: impl IntoIterator<Item = T>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Applies the exclusions, returning the filtered index.
    pub fn apply(&self, mut index: TypeIndex) -> TypeIndex {
        if self.prefixes.is_empty() {
            return index;
        }

        index.retain(|type_name| {
            let excluded = self
                .prefixes
                .iter()
                .any(|prefix| type_name.starts_with(prefix));
            if excluded {
                debug!("Excluding type {} by configured prefix", type_name);
            }

            !excluded
        });

        index
    }
}
