//! Descriptor builders shared by the integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, MessageOptions, OneofDescriptorProto,
};
use protoc_gen_pydantic::{FieldRules, RuleIndex, Rules};
use tempfile::TempDir;

pub const TYPE_DOUBLE: i32 = 1;
pub const TYPE_INT64: i32 = 3;
pub const TYPE_INT32: i32 = 5;
pub const TYPE_BOOL: i32 = 8;
pub const TYPE_STRING: i32 = 9;
pub const TYPE_MESSAGE: i32 = 11;
pub const TYPE_ENUM: i32 = 14;

pub fn file(name: &str, package: &str, messages: Vec<DescriptorProto>) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.into()),
        package: Some(package.into()),
        message_type: messages,
        syntax: Some("proto3".into()),
        ..Default::default()
    }
}

pub fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.into()),
        field: fields
            .into_iter()
            .enumerate()
            .map(|(i, mut f)| {
                f.number = Some(i as i32 + 1);
                f
            })
            .collect(),
        ..Default::default()
    }
}

pub fn nested(mut parent: DescriptorProto, child: DescriptorProto) -> DescriptorProto {
    parent.nested_type.push(child);
    parent
}

pub fn with_enum(mut parent: DescriptorProto, e: EnumDescriptorProto) -> DescriptorProto {
    parent.enum_type.push(e);
    parent
}

pub fn with_oneof(mut parent: DescriptorProto, name: &str) -> DescriptorProto {
    parent.oneof_decl.push(OneofDescriptorProto {
        name: Some(name.into()),
        ..Default::default()
    });
    parent
}

pub fn enumeration(name: &str, values: &[&str]) -> EnumDescriptorProto {
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

pub fn field(name: &str, kind: i32) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.into()),
        label: Some(1),
        r#type: Some(kind),
        ..Default::default()
    }
}

pub fn reference(name: &str, kind: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        type_name: Some(type_name.into()),
        ..field(name, kind)
    }
}

pub fn repeated(mut f: FieldDescriptorProto) -> FieldDescriptorProto {
    f.label = Some(3);
    f
}

pub fn in_oneof(mut f: FieldDescriptorProto, index: i32) -> FieldDescriptorProto {
    f.oneof_index = Some(index);
    f
}

pub fn optional(f: FieldDescriptorProto, synthetic_oneof: i32) -> FieldDescriptorProto {
    let mut f = in_oneof(f, synthetic_oneof);
    f.proto3_optional = Some(true);
    f
}

/// Rules keyed by field full name.
pub fn rules(entries: Vec<(&str, Rules)>) -> RuleIndex {
    entries
        .into_iter()
        .map(|(field, rules)| (field.to_string(), FieldRules { rules: Some(rules) }))
        .collect()
}

/// Map field `name` on a message declared at `owner` (fully qualified,
/// without the leading dot), plus the entry message to nest in it.
pub fn map_field(
    owner: &str,
    name: &str,
    entry_name: &str,
    value: FieldDescriptorProto,
) -> (FieldDescriptorProto, DescriptorProto) {
    let mut entry = message(entry_name, vec![field("key", TYPE_STRING), value]);
    entry.options = Some(MessageOptions {
        map_entry: Some(true),
        ..Default::default()
    });
    let f = repeated(reference(name, TYPE_MESSAGE, &format!(".{owner}.{entry_name}")));
    (f, entry)
}

pub fn timestamp_file() -> FileDescriptorProto {
    file(
        "google/protobuf/timestamp.proto",
        "google.protobuf",
        vec![message(
            "Timestamp",
            vec![field("seconds", TYPE_INT64), field("nanos", TYPE_INT32)],
        )],
    )
}

pub fn request(
    files_to_generate: &[&str],
    proto_files: Vec<FileDescriptorProto>,
    parameter: Option<&str>,
) -> CodeGeneratorRequest {
    CodeGeneratorRequest {
        file_to_generate: files_to_generate.iter().map(|f| f.to_string()).collect(),
        parameter: parameter.map(str::to_string),
        proto_file: proto_files,
        ..Default::default()
    }
}

/// Content of the generated file at `name`.
pub fn content<'a>(response: &'a CodeGeneratorResponse, name: &str) -> &'a str {
    response
        .file
        .iter()
        .find(|f| f.name() == name)
        .map(|f| f.content())
        .unwrap_or_else(|| panic!("no generated file {name}"))
}

/// Generated source after the import block.
pub fn classes(source: &str) -> &str {
    source
        .split_once("from uuid import UUID\n")
        .map(|(_, rest)| rest)
        .unwrap_or_else(|| panic!("missing import block"))
}

/// `CodeGeneratorRequest` with `proto_file` entries kept as raw bytes, so
/// extension options survive encoding.
#[derive(Clone, PartialEq, Message)]
struct EncodedRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes = "vec", repeated, tag = "15")]
    proto_file: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
struct EncodedFileSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    file: Vec<Vec<u8>>,
}

/// Compile `.proto` sources with protox and encode the request protoc
/// would send for them, with the crate's `proto/` directory on the
/// include path.
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
