//! Request to response: groups the requested files by package and lays out
//! the generated Python package for each.

use std::collections::BTreeMap;

use tracing::{info, warn};

use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

use crate::error::GenerateError;
use crate::graph::{FileId, Graph};
use crate::package::compile_package;
use crate::rules::RuleIndex;
use crate::types::GenerateOptions;

/// Marker telling type checkers the package ships inline types (PEP 561).
pub const PY_TYPED: &str = "py.typed";

/// Features advertised in every response: proto3 `optional` fields.
pub const SUPPORTED_FEATURES: u64 = Feature::Proto3Optional as u64;

/// Compile a request without field rules.
///
/// A typed `CodeGeneratorRequest` has already lost its extension options,
/// so `validate.rules` annotations are not applied. Use
/// [`generate_from_bytes`](crate::generate_from_bytes) for protoc's
/// encoded request.
///
/// # Errors
///
/// See [`generate_with_rules`].
pub fn generate(request: &CodeGeneratorRequest) -> Result<CodeGeneratorResponse, GenerateError> {
    generate_with_rules(request, &RuleIndex::default())
}

/// Compile a request, reading options from its parameter string and field
/// rules from `rules`.
///
/// # Errors
///
/// Returns `GenerateError` if the parameter string is invalid or any
/// requested package fails to compile. Nothing is returned for the other
/// packages in that case.
pub fn generate_with_rules(
    request: &CodeGeneratorRequest,
    rules: &RuleIndex,
) -> Result<CodeGeneratorResponse, GenerateError> {
    let options = GenerateOptions::from_parameter(request.parameter())?;
    let graph = Graph::build(&request.proto_file, rules)?;

    let mut packages: BTreeMap<&str, Vec<FileId>> = BTreeMap::new();
    for path in &request.file_to_generate {
        let id = graph
            .file_by_path(path)
            .ok_or_else(|| GenerateError::FileNotFound { path: path.clone() })?;
        packages
            .entry(graph.file(id).package.as_str())
            .or_default()
            .push(id);
    }

    let mut response = CodeGeneratorResponse {
        supported_features: Some(SUPPORTED_FEATURES),
        ..Default::default()
    };
    for (package, files) in &packages {
        if !options.includes_package(package) {
            warn!(
                package,
                include_path = options.include_path.as_deref().unwrap_or_default(),
                "package excluded by include_path"
            );
            continue;
        }

        let source = compile_package(&graph, package, files, &options)?;
        let dir = output_dir(package, &options.package_suffix);
        let module = output_path(&dir, &format!("{}.py", options.filename));
        info!(package, module = %module, "generated package");

        response.file.push(generated_file(module, source));
        response.file.push(generated_file(
            output_path(&dir, "__init__.py"),
            format!("from .{} import *\n", options.filename),
        ));
        response
            .file
            .push(generated_file(output_path(&dir, PY_TYPED), String::new()));
    }
    Ok(response)
}

fn generated_file(name: String, content: String) -> File {
    File {
        name: Some(name),
        content: Some(content),
        ..Default::default()
    }
}

/// Directory of a package's output: its dotted name plus suffix as a path.
pub fn output_dir(package: &str, suffix: &str) -> String {
    format!("{package}{suffix}")
        .split('.')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn output_path(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}
