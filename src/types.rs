//! Generator configuration parsed from the plugin parameter string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::GenerateError;

/// Base name of the generated module when `filename` is not given.
pub const DEFAULT_FILENAME: &str = "pb_models";

/// Serialization context under which map fields are dumped as JSON text.
pub const DEFAULT_SERIALIZE_CONTEXT: &str = "bigquery";

/// Options controlling output layout and the generated module's imports.
///
/// Deserialized from the `k=v,k2=v2` parameter protoc passes through
/// `--pydantic_opt`. Unknown keys are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Appended to each package name before it becomes an output directory.
    pub package_suffix: String,
    /// Base name of the generated module, without extension.
    pub filename: String,
    /// Import path providing `BaseModel` instead of `pydantic`.
    pub pydantic_base_path: Option<String>,
    /// Only packages starting with this prefix are emitted.
    pub include_path: Option<String>,
    /// Context name that switches map fields to JSON text on serialization.
    pub serialize_context: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            package_suffix: String::new(),
            filename: DEFAULT_FILENAME.to_string(),
            pydantic_base_path: None,
            include_path: None,
            serialize_context: DEFAULT_SERIALIZE_CONTEXT.to_string(),
        }
    }
}

impl GenerateOptions {
    /// Parse options from a protoc parameter string.
    ///
    /// Empty values for `filename` and `serialize_context` fall back to the
    /// defaults; empty `pydantic_base_path` and `include_path` mean unset.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::InvalidParameter` if the parameters don't
    /// deserialize into options.
    pub fn from_parameter(parameter: &str) -> Result<Self, GenerateError> {
        let params = parse_parameters(parameter);
        let options: GenerateOptions =
            serde_json::from_value(Value::Object(params)).map_err(|e| {
                GenerateError::InvalidParameter {
                    message: e.to_string(),
                }
            })?;
        Ok(options.normalized())
    }

    pub fn with_package_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.package_suffix = suffix.into();
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.pydantic_base_path = Some(path.into());
        self
    }

    pub fn with_include_path(mut self, prefix: impl Into<String>) -> Self {
        self.include_path = Some(prefix.into());
        self
    }

    pub fn with_serialize_context(mut self, context: impl Into<String>) -> Self {
        self.serialize_context = context.into();
        self
    }

    /// Whether a package passes the `include_path` filter.
    pub fn includes_package(&self, package: &str) -> bool {
        self.include_path
            .as_deref()
            .map_or(true, |prefix| package.starts_with(prefix))
    }

    fn normalized(mut self) -> Self {
        if self.filename.is_empty() {
            self.filename = DEFAULT_FILENAME.to_string();
        }
        if self.serialize_context.is_empty() {
            self.serialize_context = DEFAULT_SERIALIZE_CONTEXT.to_string();
        }
        self.pydantic_base_path = self.pydantic_base_path.filter(|p| !p.is_empty());
        self.include_path = self.include_path.filter(|p| !p.is_empty());
        self
    }
}

/// Split `k=v,k2=v2` into a string-valued map.
///
/// Entries without `=` map to an empty value; empty entries are skipped.
/// A repeated key keeps its last value.
fn parse_parameters(parameter: &str) -> Map<String, Value> {
    let mut params = Map::new();
    for entry in parameter.split(',').filter(|e| !e.is_empty()) {
        let (key, value) = entry.split_once('=').unwrap_or((entry, ""));
        params.insert(key.to_string(), Value::String(value.to_string()));
    }
    params
}
