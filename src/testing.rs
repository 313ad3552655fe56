//! Descriptor builders for unit tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use prost::Message;
use prost_types::compiler::CodeGeneratorRequest;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};
use tempfile::TempDir;

pub use crate::rules::RuleIndex;
use crate::validate::{field_rules::Rules, FieldRules};

pub const TYPE_DOUBLE: i32 = 1;
pub const TYPE_FLOAT: i32 = 2;
pub const TYPE_INT64: i32 = 3;
pub const TYPE_UINT64: i32 = 4;
pub const TYPE_INT32: i32 = 5;
pub const TYPE_FIXED64: i32 = 6;
pub const TYPE_FIXED32: i32 = 7;
pub const TYPE_BOOL: i32 = 8;
pub const TYPE_STRING: i32 = 9;
pub const TYPE_GROUP: i32 = 10;
pub const TYPE_MESSAGE: i32 = 11;
pub const TYPE_BYTES: i32 = 12;
pub const TYPE_UINT32: i32 = 13;
pub const TYPE_ENUM: i32 = 14;
pub const TYPE_SFIXED32: i32 = 15;
pub const TYPE_SFIXED64: i32 = 16;
pub const TYPE_SINT32: i32 = 17;
pub const TYPE_SINT64: i32 = 18;

const LABEL_OPTIONAL: i32 = 1;
const LABEL_REPEATED: i32 = 3;

pub fn file_proto(
    name: &str,
    package: &str,
    messages: Vec<DescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.into()),
        package: Some(package.into()),
        message_type: messages,
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    let field = fields
        .into_iter()
        .enumerate()
        .map(|(i, mut f)| {
            f.number = Some(i as i32 + 1);
            f
        })
        .collect();
    DescriptorProto {
        name: Some(name.into()),
        field,
        ..Default::default()
    }
}

pub fn enum_proto(name: &str, values: &[&str]) -> EnumDescriptorProto {
    EnumDescriptorProto {
        name: Some(name.into()),
        value: values
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValueDescriptorProto {
                name: Some((*v).into()),
                number: Some(i as i32),
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    }
}

pub fn scalar(name: &str, kind: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        label: Some(LABEL_OPTIONAL),
        r#type: Some(kind),
        ..Default::default()
    }
}

pub fn reference(name: &str, kind: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.into()),
        ..scalar(name, kind)
    }
}

pub fn repeated(mut field: FieldDescriptorProto) -> FieldDescriptorProto {
    field.label = Some(LABEL_REPEATED);
    field
}

pub fn in_oneof(mut field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    field.oneof_index = Some(index);
    field
}

pub fn proto3_optional(field: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    let mut field = in_oneof(field, index);
    field.proto3_optional = Some(true);
    field
}

/// Rules for the fields named by full name.
pub fn rule_index(entries: Vec<(&str, Rules)>) -> RuleIndex {
    entries
        .into_iter()
        .map(|(field, rules)| (field.to_string(), FieldRules { rules: Some(rules) }))
        .collect()
}

/// A message holding a single map field, with the entry nested as protoc
/// lays it out.
pub fn map_message(
    package: &str,
    message_name: &str,
    field_name: &str,
    key_kind: i32,
    value_kind: i32,
    value_type_name: Option<&str>,
) -> DescriptorProto {
    let entry_name = format!("{}Entry", camel_case(field_name));
    let value = match value_type_name {
        Some(type_name) => reference("value", value_kind, type_name),
        None => scalar("value", value_kind),
    };
    let mut entry = message(&entry_name, vec![scalar("key", key_kind), value]);
    entry.options = Some(MessageOptions {
        map_entry: Some(true),
        ..Default::default()
    });
    let type_name = format!(".{package}.{message_name}.{entry_name}");
    message(
        message_name,
        vec![repeated(reference(field_name, TYPE_MESSAGE, &type_name))],
    )
    .with_nested(entry)
}

pub trait DescriptorExt {
    fn with_nested(self, nested: DescriptorProto) -> Self;
    fn with_enum(self, e: EnumDescriptorProto) -> Self;
    fn with_oneof(self, name: &str) -> Self;
}

impl DescriptorExt for DescriptorProto {
    fn with_nested(mut self, nested: DescriptorProto) -> Self {
        self.nested_type.push(nested);
        self
    }

    fn with_enum(mut self, e: EnumDescriptorProto) -> Self {
        self.enum_type.push(e);
        self
    }

    fn with_oneof(mut self, name: &str) -> Self {
        self.oneof_decl.push(OneofDescriptorProto {
            name: Some(name.into()),
            ..Default::default()
        });
        self
    }
}

fn camel_case(name: &str) -> String {
    name.split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// `CodeGeneratorRequest` with `proto_file` entries kept as raw bytes, so
/// extension options survive encoding.
#[derive(Clone, PartialEq, ::prost::Message)]
struct EncodedRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
struct EncodedFileSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// Compile `.proto` sources with protox and encode the request protoc
/// would send for them. `proto/` is on the include path for
/// `validate/validate.proto`.
pub fn compile_request(sources: &[(&str, &str)], parameter: Option<&str>) -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let mut paths = Vec::new();
    for (name, source) in sources {
        let path = dir.path().join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, source).unwrap();
        paths.push(path);
    }

    let includes = [
        dir.path().to_path_buf(),
        Path::new(env!("CARGO_MANIFEST_DIR")).join("proto"),
    ];
    let set = protox::Compiler::new(includes)
        .unwrap()
        .include_imports(true)
        .open_files(paths)
        .unwrap()
        .encode_file_descriptor_set();

    EncodedRequest {
        file_to_generate: sources.iter().map(|(name, _)| name.to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: EncodedFileSet::decode(set.as_slice()).unwrap().file,
    }
    .encode_to_vec()
}

pub fn decode_request(bytes: &[u8]) -> CodeGeneratorRequest {
    CodeGeneratorRequest::decode(bytes).unwrap()
}
