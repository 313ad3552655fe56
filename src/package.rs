//! One compilation unit: every declaration reachable from the requested
//! files of a single package, rendered into one Python module.

use tracing::debug;

use crate::error::GenerateError;
use crate::graph::{FileId, Graph, TypeId};
use crate::namespace::NamespaceTree;
use crate::naming::NameResolver;
use crate::render::Renderer;
use crate::types::GenerateOptions;
use crate::walk::{walk_files, Decl};
use crate::wellknown::is_well_known;

/// Declarations of a unit in walk order. Map entries and well-known types
/// are left out.
pub fn collect_declarations(graph: &Graph, files: &[FileId]) -> Vec<TypeId> {
    let mut decls = Vec::new();
    walk_files(graph, files, |decl| {
        let id = match decl {
            Decl::File(_) => return true,
            // Don't descend into well-known types; their internals are never emitted.
            Decl::Field(f) => {
                return graph
                    .field(f)
                    .target
                    .map_or(true, |t| !is_well_known(graph.type_full_name(t)));
            }
            Decl::Message(m) => {
                if graph.message(m).map_entry {
                    return true;
                }
                TypeId::Message(m)
            }
            Decl::Enum(e) => TypeId::Enum(e),
        };
        let full_name = graph.type_full_name(id);
        if is_well_known(full_name) {
            debug!(declaration = full_name, "skipping well-known type");
        } else {
            decls.push(id);
        }
        true
    });
    decls
}

/// Compile the files of `package` into the source of one Python module.
///
/// # Errors
///
/// Returns a `GenerateError` if a field cannot be mapped, its rules
/// conflict, or two declarations resolve to the same class path.
pub fn compile_package(
    graph: &Graph,
    package: &str,
    files: &[FileId],
    options: &GenerateOptions,
) -> Result<String, GenerateError> {
    let decls = collect_declarations(graph, files);
    let names = NameResolver::new(graph, package);

    let mut tree = NamespaceTree::new();
    for id in &decls {
        tree.insert(graph, &names.resolve(*id), *id)?;
    }
    debug!(
        package,
        files = files.len(),
        declarations = decls.len(),
        nodes = tree.len(),
        "walked package"
    );

    let mut renderer = Renderer::new(graph, &names, options);
    tree.emit(&mut renderer)?;
    Ok(renderer.finish())
}
