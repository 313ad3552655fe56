//! Flat, collision-free identifiers for messages and enums.
//!
//! A declaration's identifier is its chain of local names from the outermost
//! enclosing message down to itself, prefixed with a package scope segment
//! when it comes from a package other than the one being generated. The flat
//! form joins the chain with `_`.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::graph::{Graph, Parent, TypeId};

/// Separator joining the segments of a flat identifier.
pub const SEPARATOR: &str = "_";

/// Scope segment for declarations from files without a package.
pub const ROOT_SCOPE: &str = "root";

/// Resolved identifier of a message or enum within one compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedName {
    segments: Vec<String>,
}

impl ResolvedName {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Namespace segments, outermost first. The last one is the local name.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Underscore-joined identifier, unique within the unit.
    pub fn flat(&self) -> String {
        self.segments.join(SEPARATOR)
    }

    /// Dotted path to the emitted class, e.g. `Outer.Inner`.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

/// Resolves identifiers for a unit generating one target package.
///
/// Every other package of the graph gets its own scope segment, its prefix
/// with the dots removed. A prefix that is empty becomes [`ROOT_SCOPE`]. A
/// segment already taken by a top-level declaration of the target package
/// or by another package's scope gets `_` appended until it is free, so
/// no two packages share a scope and no scope merges with a local class.
#[derive(Debug)]
pub struct NameResolver<'g> {
    graph: &'g Graph,
    scopes: HashMap<&'g str, String>,
}

impl<'g> NameResolver<'g> {
    pub fn new(graph: &'g Graph, target_package: &str) -> Self {
        let mut taken: HashSet<String> = graph
            .files()
            .iter()
            .filter(|file| file.package == target_package)
            .flat_map(|file| {
                let messages = file.messages.iter().map(|m| TypeId::Message(*m));
                let enums = file.enums.iter().map(|e| TypeId::Enum(*e));
                messages.chain(enums)
            })
            .map(|id| graph.type_name(id).to_string())
            .collect();

        // Sorted, so the suffixes handed out don't depend on file order.
        let packages: BTreeSet<&str> = graph
            .files()
            .iter()
            .map(|file| file.package.as_str())
            .filter(|package| *package != target_package)
            .collect();

        let mut scopes = HashMap::new();
        for package in packages {
            let mut segment = package_prefix(package);
            if segment.is_empty() {
                segment = ROOT_SCOPE.to_string();
            }
            while taken.contains(&segment) {
                segment.push_str(SEPARATOR);
            }
            taken.insert(segment.clone());
            scopes.insert(package, segment);
        }
        Self { graph, scopes }
    }

    /// Resolve the identifier of `id`.
    pub fn resolve(&self, id: TypeId) -> ResolvedName {
        let graph = self.graph;
        let mut segments = vec![graph.type_name(id).to_string()];
        let mut parent = graph.type_parent(id);
        while let Parent::Message(m) = parent {
            let message = graph.message(m);
            segments.push(message.name.clone());
            parent = message.parent;
        }
        if let Some(scope) = self.scopes.get(graph.type_package(id)) {
            segments.push(scope.clone());
        }

        segments.reverse();
        ResolvedName::new(segments)
    }
}

/// Package path segments concatenated with separators removed.
pub fn package_prefix(package: &str) -> String {
    package.split('.').collect()
}
