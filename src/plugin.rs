//! protoc plugin transport: request on stdin, response on stdout.

use std::io::{Read, Write};

use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use tracing::{debug, error};

use crate::error::PluginError;
use crate::generate::{generate_with_rules, SUPPORTED_FEATURES};
use crate::rules::RuleIndex;

/// Decode an encoded request and compile it.
///
/// The bytes are decoded twice: once into the typed request, and once
/// through a descriptor pool that keeps the `validate.rules` options.
///
/// # Errors
///
/// Returns `PluginError::Generate` for compilation failures and the other
/// variants for malformed input.
pub fn generate_from_bytes(bytes: &[u8]) -> Result<CodeGeneratorResponse, PluginError> {
    let request =
        CodeGeneratorRequest::decode(bytes).map_err(|source| PluginError::Decode { source })?;
    debug!(
        files = request.file_to_generate.len(),
        proto_files = request.proto_file.len(),
        "decoded request"
    );
    let rules = RuleIndex::from_request_bytes(bytes, &request.proto_file)?;
    Ok(generate_with_rules(&request, &rules)?)
}

/// Run one plugin invocation.
///
/// Compilation failures are reported to protoc in the response's `error`
/// field and still return `Ok`.
///
/// # Errors
///
/// Returns `PluginError` if the request can't be read or decoded, or the
/// response can't be written.
pub fn run_plugin<R: Read, W: Write>(mut input: R, mut output: W) -> Result<(), PluginError> {
    let mut buf = Vec::new();
    input
        .read_to_end(&mut buf)
        .map_err(|source| PluginError::Read { source })?;

    let response = match generate_from_bytes(&buf) {
        Ok(response) => response,
        Err(PluginError::Generate(e)) => {
            error!(error = %e, "compilation failed");
            CodeGeneratorResponse {
                error: Some(e.to_string()),
                supported_features: Some(SUPPORTED_FEATURES),
                ..Default::default()
            }
        }
        Err(e) => return Err(e),
    };

    let mut encoded = Vec::with_capacity(response.encoded_len());
    response
        .encode(&mut encoded)
        .map_err(|source| PluginError::Encode { source })?;
    output
        .write_all(&encoded)
        .and_then(|()| output.flush())
        .map_err(|source| PluginError::Write { source })
}
