//! Error types for schema compilation and the plugin transport.

use thiserror::Error;

/// Errors while compiling a schema graph into model source.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("find file {path}: not present in the request's proto files")]
    FileNotFound { path: String },

    #[error("field {field} references unknown type {type_name}")]
    UnresolvedType { field: String, type_name: String },

    #[error("field {field} has unsupported kind {kind}")]
    UnsupportedKind { field: String, kind: i32 },

    #[error("conflicting rules on field {field}: {message}")]
    ConflictingRules { field: String, message: String },

    #[error("name collision: {name} resolves from both {first} and {second}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },
}

impl GenerateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            GenerateError::InvalidParameter { .. } => 2,
            _ => 1,
        }
    }
}

/// Errors while reading a request from protoc or writing the response back.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("cannot read request: {source}")]
    Read {
        #[source]
        source: std::io::Error,
    },

    #[error("invalid request: {source}")]
    Decode {
        #[source]
        source: prost::DecodeError,
    },

    #[error("invalid descriptors: {source}")]
    Descriptors {
        #[source]
        source: prost_reflect::DescriptorError,
    },

    #[error("cannot encode response: {source}")]
    Encode {
        #[source]
        source: prost::EncodeError,
    },

    #[error("cannot write response: {source}")]
    Write {
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl PluginError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            PluginError::Read { .. } | PluginError::Write { .. } => 3,
            PluginError::Decode { .. }
            | PluginError::Descriptors { .. }
            | PluginError::Encode { .. } => 2,
            PluginError::Generate(e) => e.exit_code(),
        }
    }
}
