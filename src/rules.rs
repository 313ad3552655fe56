//! Field rules read from the `validate.rules` extension.
//!
//! prost drops unknown fields, so extension values never survive decoding
//! into the typed `FieldOptions`. The request's files are decoded a second
//! time into a [`DescriptorPool`], which keeps extension options, and the
//! rules of each annotated field are transcoded into [`FieldRules`].

use std::collections::HashMap;

use prost::Message;
use prost_reflect::DescriptorPool;
use prost_types::FileDescriptorProto;
use tracing::debug;

use crate::error::PluginError;
use crate::validate::FieldRules;

/// Package and name of the extension on `google.protobuf.FieldOptions`.
const RULES_PACKAGE: &str = "validate";
const RULES_NAME: &str = "rules";

/// The `proto_file` entries of a `CodeGeneratorRequest`, kept as raw bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
struct RawRequest {
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

/// Wire-compatible with `google.protobuf.FileDescriptorSet`.
#[derive(Clone, PartialEq, ::prost::Message)]
struct RawFileSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// Field rules keyed by the field's full name, without a leading dot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleIndex {
    rules: HashMap<String, FieldRules>,
}

impl RuleIndex {
    /// Read the rules of every field in an encoded `CodeGeneratorRequest`.
    ///
    /// `files` are the request's already decoded descriptors. When none of
    /// them declares the rules extension the index is empty and no pool is
    /// built.
    ///
    /// # Errors
    ///
    /// Returns `PluginError::Decode` if the request or a rules value is
    /// malformed, and `PluginError::Descriptors` if the files don't form a
    /// valid descriptor pool.
    pub fn from_request_bytes(
        request: &[u8],
        files: &[FileDescriptorProto],
    ) -> Result<Self, PluginError> {
        if !files.iter().any(declares_rules) {
            return Ok(Self::default());
        }

        let raw = RawRequest::decode(request).map_err(|source| PluginError::Decode { source })?;
        let set = RawFileSet {
            file: raw.proto_file,
        }
        .encode_to_vec();
        let pool = DescriptorPool::decode(set.as_slice())
            .map_err(|source| PluginError::Descriptors { source })?;
        Self::from_pool(&pool)
    }

    fn from_pool(pool: &DescriptorPool) -> Result<Self, PluginError> {
        let name = format!("{RULES_PACKAGE}.{RULES_NAME}");
        let Some(extension) = pool.get_extension_by_name(&name) else {
            return Ok(Self::default());
        };

        let mut rules = HashMap::new();
        for message in pool.all_messages() {
            for field in message.fields() {
                let options = field.options();
                if !options.has_extension(&extension) {
                    continue;
                }
                let value = options.get_extension(&extension);
                let Some(annotation) = value.as_message() else {
                    continue;
                };
                let field_rules: FieldRules = annotation
                    .transcode_to()
                    .map_err(|source| PluginError::Decode { source })?;
                rules.insert(field.full_name().to_string(), field_rules);
            }
        }
        debug!(fields = rules.len(), "read field rules");
        Ok(Self { rules })
    }

    /// Rules of the field with the given full name.
    pub fn get(&self, field: &str) -> Option<&FieldRules> {
        self.rules.get(field)
    }
}

impl FromIterator<(String, FieldRules)> for RuleIndex {
    fn from_iter<I: IntoIterator<Item = (String, FieldRules)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

fn declares_rules(file: &FileDescriptorProto) -> bool {
    file.package() == RULES_PACKAGE && file.extension.iter().any(|e| e.name() == RULES_NAME)
}
