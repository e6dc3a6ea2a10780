//! Structural discovery of candidate types under configured source roots.
//!
//! The [TypeLocator] walks a set of [ScanRoot]s and indexes every type declared anywhere
//! under them into a [TypeIndex] mapping fully-qualified names to defining source files.
//! Discovery is purely structural: declarations are parsed out of the sources without
//! consulting any marker metadata, so the caller never has to declare types in advance.

use crate::error::DiscoveryError;
use fxhash::FxHashMap;
use itertools::Itertools;
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::iter::once;
use std::path::{Path, PathBuf};
use syn::{Ident, Item};
use tracing::{debug, info};
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "rs";

/// A directory to scan, with an optional namespace prefix under which every type found in
/// it is qualified. Plain path strings deserialize to a root without a namespace.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(from = "ScanRootSource")]
pub struct ScanRoot {
    pub path: PathBuf,
    pub namespace: Option<String>,
}

impl ScanRoot {
    pub fn new<T: Into<PathBuf>>(path: T) -> Self {
        Self {
            path: path.into(),
            namespace: None,
        }
    }

    /// Qualifies every type found under this root with the given `::`-separated namespace.
    pub fn with_namespace<T: Into<String>>(mut self, namespace: T) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

impl From<PathBuf> for ScanRoot {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl From<&str> for ScanRoot {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScanRootSource {
    Plain(PathBuf),
    Qualified {
        path: PathBuf,
        namespace: Option<String>,
    },
}

impl From<ScanRootSource> for ScanRoot {
    fn from(source: ScanRootSource) -> Self {
        match source {
            ScanRootSource::Plain(path) => Self {
                path,
                namespace: None,
            },
            ScanRootSource::Qualified { path, namespace } => Self { path, namespace },
        }
    }
}

/// Mapping from fully-qualified type name to its defining source file. Built fresh on
/// every pass and never persisted; keys are unique, with later discoveries of the same
/// name overriding earlier ones.
#[derive(Clone, Debug, Default)]
pub struct TypeIndex {
    entries: FxHashMap<String, PathBuf>,
}

impl TypeIndex {
    /// Number of indexed types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source file defining the given type, if indexed.
    pub fn source_file(&self, type_name: &str) -> Option<&Path> {
        self.entries.get(type_name).map(PathBuf::as_path)
    }

    /// Iterates over `(type name, source file)` entries. Iteration order is
    /// implementation-defined, but deterministic for a fixed, unchanged source tree.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries
            .iter()
            .map(|(name, file)| (name.as_str(), file.as_path()))
    }

    pub(crate) fn insert(&mut self, type_name: String, source_file: PathBuf) {
        if let Some(previous) = self.entries.insert(type_name.clone(), source_file) {
            debug!(
                "Type {} indexed again, overriding entry from {}",
                type_name,
                previous.display()
            );
        }
    }

    pub(crate) fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        self.entries.retain(|name, _| keep(name.as_str()));
    }
}

/// Walks an ordered set of source roots and indexes every type declared under them.
#[derive(Clone, Debug)]
pub struct TypeLocator {
    follow_links: bool,
    max_depth: Option<usize>,
}

impl Default for TypeLocator {
    fn default() -> Self {
        Self {
            follow_links: false,
            max_depth: None,
        }
    }
}

impl TypeLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables following symbolic links while walking roots.
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Limits directory traversal depth (unlimited by default).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Builds a fresh [TypeIndex] covering every type defined under the given roots.
    /// Roots which do not exist or are empty contribute nothing, and an empty root set
    /// produces an empty index; neither is an error. No external state is mutated.
    pub fn index_types(&self, roots: &[ScanRoot]) -> Result<TypeIndex, DiscoveryError> {
        let mut index = TypeIndex::default();
        for root in roots {
            self.index_root(root, &mut index)?;
        }

        info!(
            "Indexed {} type(s) under {} root(s)",
            index.len(),
            roots.len()
        );
        Ok(index)
    }

    fn index_root(&self, root: &ScanRoot, index: &mut TypeIndex) -> Result<(), DiscoveryError> {
        if !root.path.exists() {
            debug!(
                "Source root {} does not exist, skipping",
                root.path.display()
            );
            return Ok(());
        }

        let mut walker = WalkDir::new(&root.path)
            .follow_links(self.follow_links)
            .sort_by_file_name();
        if let Some(max_depth) = self.max_depth {
            walker = walker.max_depth(max_depth);
        }

        for entry in walker {
            let entry = entry.map_err(|source| DiscoveryError::Scan {
                path: root.path.clone(),
                source,
            })?;

            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(OsStr::to_str) != Some(SOURCE_EXTENSION)
            {
                continue;
            }

            let source = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let file = syn::parse_file(&source).map_err(|source| DiscoveryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            let namespace = file_namespace(root, path);
            index_items(&file.items, &namespace, path, index);
        }

        Ok(())
    }
}

/// Module segments for types declared at the top level of the given file: the root
/// namespace, the directories between the root and the file, and the file stem. `lib.rs`,
/// `main.rs` and `mod.rs` do not contribute a segment of their own.
fn file_namespace(root: &ScanRoot, file: &Path) -> Vec<String> {
    let mut namespace: Vec<String> = root
        .namespace
        .iter()
        .flat_map(|namespace| namespace.split("::"))
        .map(str::to_string)
        .collect();

    let relative = file.strip_prefix(&root.path).unwrap_or(file);
    namespace.extend(
        relative
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .map(|component| component.as_os_str().to_string_lossy().into_owned()),
    );

    if let Some(stem) = relative.file_stem().and_then(OsStr::to_str) {
        if !matches!(stem, "lib" | "main" | "mod") {
            namespace.push(stem.to_string());
        }
    }

    namespace
}

fn index_items(items: &[Item], namespace: &[String], source_file: &Path, index: &mut TypeIndex) {
    for item in items {
        match item {
            Item::Struct(item) => index.insert(
                qualified_name(namespace, &item.ident),
                source_file.to_path_buf(),
            ),
            Item::Enum(item) => index.insert(
                qualified_name(namespace, &item.ident),
                source_file.to_path_buf(),
            ),
            Item::Trait(item) => index.insert(
                qualified_name(namespace, &item.ident),
                source_file.to_path_buf(),
            ),
            Item::Mod(item) => {
                if let Some((_, items)) = &item.content {
                    let mut nested = namespace.to_vec();
                    nested.push(item.ident.to_string());
                    index_items(items, &nested, source_file, index);
                }
            }
            _ => {}
        }
    }
}

fn qualified_name(namespace: &[String], ident: &Ident) -> String {
    namespace
        .iter()
        .cloned()
        .chain(once(ident.to_string()))
        .join("::")
}
