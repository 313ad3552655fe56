//! Immutable schema graph built from the request's file descriptors.
//!
//! Declarations live in flat arenas addressed by typed ids. Parent links,
//! nesting lists and resolved field targets are filled in once by
//! [`Graph::build`] and never change afterwards.

use std::collections::HashMap;

use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    SourceCodeInfo,
};

use crate::error::GenerateError;
use crate::rules::RuleIndex;
use crate::validate::FieldRules;

/// Field numbers that make up `SourceCodeInfo` location paths.
mod path {
    pub const FILE_MESSAGE: i32 = 4;
    pub const FILE_ENUM: i32 = 5;
    pub const MESSAGE_FIELD: i32 = 2;
    pub const MESSAGE_NESTED: i32 = 3;
    pub const MESSAGE_ENUM: i32 = 4;
    pub const ENUM_VALUE: i32 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(usize);

/// A named type: the target of a field reference and the unit of emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeId {
    Message(MessageId),
    Enum(EnumId),
}

/// Immediate owner of a message or enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    File(FileId),
    Message(MessageId),
}

/// Declared kind of a field, `FieldDescriptorProto.Type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Double,
    Float,
    Int64,
    Uint64,
    Int32,
    Fixed64,
    Fixed32,
    Bool,
    String,
    Group,
    Message,
    Bytes,
    Uint32,
    Enum,
    Sfixed32,
    Sfixed64,
    Sint32,
    Sint64,
    Unknown(i32),
}

impl FieldKind {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            1 => FieldKind::Double,
            2 => FieldKind::Float,
            3 => FieldKind::Int64,
            4 => FieldKind::Uint64,
            5 => FieldKind::Int32,
            6 => FieldKind::Fixed64,
            7 => FieldKind::Fixed32,
            8 => FieldKind::Bool,
            9 => FieldKind::String,
            10 => FieldKind::Group,
            11 => FieldKind::Message,
            12 => FieldKind::Bytes,
            13 => FieldKind::Uint32,
            14 => FieldKind::Enum,
            15 => FieldKind::Sfixed32,
            16 => FieldKind::Sfixed64,
            17 => FieldKind::Sint32,
            18 => FieldKind::Sint64,
            other => FieldKind::Unknown(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            FieldKind::Double => 1,
            FieldKind::Float => 2,
            FieldKind::Int64 => 3,
            FieldKind::Uint64 => 4,
            FieldKind::Int32 => 5,
            FieldKind::Fixed64 => 6,
            FieldKind::Fixed32 => 7,
            FieldKind::Bool => 8,
            FieldKind::String => 9,
            FieldKind::Group => 10,
            FieldKind::Message => 11,
            FieldKind::Bytes => 12,
            FieldKind::Uint32 => 13,
            FieldKind::Enum => 14,
            FieldKind::Sfixed32 => 15,
            FieldKind::Sfixed64 => 16,
            FieldKind::Sint32 => 17,
            FieldKind::Sint64 => 18,
            FieldKind::Unknown(raw) => raw,
        }
    }

    /// Kinds whose `type_name` names another declaration.
    fn is_reference(self) -> bool {
        matches!(self, FieldKind::Message | FieldKind::Enum | FieldKind::Group)
    }
}

/// `FieldDescriptorProto.Label`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Optional,
    Required,
    Repeated,
}

impl Label {
    fn from_raw(raw: Option<i32>) -> Self {
        match raw {
            Some(2) => Label::Required,
            Some(3) => Label::Repeated,
            _ => Label::Optional,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Proto2,
    Proto3,
    Editions,
}

impl Syntax {
    fn parse(syntax: Option<&str>) -> Self {
        match syntax {
            Some("proto3") => Syntax::Proto3,
            Some("editions") => Syntax::Editions,
            _ => Syntax::Proto2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct File {
    pub path: String,
    pub package: String,
    pub syntax: Syntax,
    pub messages: Vec<MessageId>,
    pub enums: Vec<EnumId>,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: String,
    pub full_name: String,
    pub file: FileId,
    pub parent: Parent,
    pub messages: Vec<MessageId>,
    pub enums: Vec<EnumId>,
    pub fields: Vec<FieldId>,
    pub oneofs: Vec<String>,
    /// Synthetic `<Field>Entry` message protoc generates for a map field.
    pub map_entry: bool,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Enum {
    pub name: String,
    pub full_name: String,
    pub file: FileId,
    pub parent: Parent,
    pub values: Vec<EnumValue>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnumValue {
    pub name: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub full_name: String,
    pub message: MessageId,
    pub kind: FieldKind,
    pub label: Label,
    pub type_name: Option<String>,
    /// Resolved `type_name`, set for message and enum kinds.
    pub target: Option<TypeId>,
    /// Index into the owning message's `oneofs`.
    pub oneof: Option<usize>,
    /// Explicit `optional` keyword: proto3 `optional`, or a proto2
    /// `optional` field outside any oneof.
    pub optional_keyword: bool,
    pub rules: Option<FieldRules>,
    pub comment: Option<String>,
}

impl Field {
    pub fn is_repeated(&self) -> bool {
        self.label == Label::Repeated
    }

    /// Member of a real oneof group, as opposed to a proto3 `optional`
    /// field's synthetic single-member oneof.
    pub fn in_oneof_group(&self) -> bool {
        self.oneof.is_some() && !self.optional_keyword
    }
}

/// The full set of declarations of one compilation request.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    files: Vec<File>,
    messages: Vec<Message>,
    enums: Vec<Enum>,
    fields: Vec<Field>,
    files_by_path: HashMap<String, FileId>,
    types_by_name: HashMap<String, TypeId>,
}

impl Graph {
    /// Build the graph from every file descriptor in a request, attaching
    /// each field's entry from `rules`.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::UnresolvedType` if a message or enum field
    /// names a type that no file declares.
    pub fn build(protos: &[FileDescriptorProto], rules: &RuleIndex) -> Result<Self, GenerateError> {
        let mut graph = Graph::default();
        for proto in protos {
            graph.register_file(proto, rules);
        }
        graph.resolve_targets()?;
        Ok(graph)
    }

    pub fn files(&self) -> &[File] {
        &self.files
    }

    pub fn file_by_path(&self, path: &str) -> Option<FileId> {
        self.files_by_path.get(path).copied()
    }

    /// Look up a message or enum by fully-qualified name, with or without
    /// the leading dot protoc puts on `type_name`.
    pub fn lookup(&self, full_name: &str) -> Option<TypeId> {
        let name = full_name.strip_prefix('.').unwrap_or(full_name);
        self.types_by_name.get(name).copied()
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.0]
    }

    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.0]
    }

    pub fn enum_(&self, id: EnumId) -> &Enum {
        &self.enums[id.0]
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    pub fn type_name(&self, id: TypeId) -> &str {
        match id {
            TypeId::Message(m) => &self.message(m).name,
            TypeId::Enum(e) => &self.enum_(e).name,
        }
    }

    pub fn type_full_name(&self, id: TypeId) -> &str {
        match id {
            TypeId::Message(m) => &self.message(m).full_name,
            TypeId::Enum(e) => &self.enum_(e).full_name,
        }
    }

    pub fn type_parent(&self, id: TypeId) -> Parent {
        match id {
            TypeId::Message(m) => self.message(m).parent,
            TypeId::Enum(e) => self.enum_(e).parent,
        }
    }

    /// Package of the file declaring `id`.
    pub fn type_package(&self, id: TypeId) -> &str {
        let file = match id {
            TypeId::Message(m) => self.message(m).file,
            TypeId::Enum(e) => self.enum_(e).file,
        };
        &self.file(file).package
    }

    /// Whether a field is a protobuf map, i.e. repeated over a map entry.
    pub fn is_map(&self, id: FieldId) -> bool {
        self.map_entry(id).is_some()
    }

    /// Whether a field is a repeated list (repeated but not a map).
    pub fn is_list(&self, id: FieldId) -> bool {
        self.field(id).is_repeated() && !self.is_map(id)
    }

    /// Synthetic key and value fields of a map field.
    pub fn map_entry_fields(&self, id: FieldId) -> Option<(FieldId, FieldId)> {
        let entry = self.message(self.map_entry(id)?);
        let by_name = |name: &str| {
            entry
                .fields
                .iter()
                .copied()
                .find(|f| self.field(*f).name == name)
        };
        Some((by_name("key")?, by_name("value")?))
    }

    fn map_entry(&self, id: FieldId) -> Option<MessageId> {
        let field = self.field(id);
        if !field.is_repeated() {
            return None;
        }
        match field.target {
            Some(TypeId::Message(m)) if self.message(m).map_entry => Some(m),
            _ => None,
        }
    }

    // --- Construction ---

    fn register_file(&mut self, proto: &FileDescriptorProto, rules: &RuleIndex) {
        let path = proto.name().to_string();
        if self.files_by_path.contains_key(&path) {
            return;
        }

        let id = FileId(self.files.len());
        let package = proto.package().to_string();
        self.files.push(File {
            path: path.clone(),
            package: package.clone(),
            syntax: Syntax::parse(proto.syntax.as_deref()),
            messages: Vec::new(),
            enums: Vec::new(),
        });
        self.files_by_path.insert(path, id);

        let comments = leading_comments(proto.source_code_info.as_ref());
        let scope = Scope {
            file: id,
            parent: Parent::File(id),
            prefix: &package,
            comments: &comments,
            rules,
        };

        let enums = proto
            .enum_type
            .iter()
            .enumerate()
            .map(|(i, e)| self.register_enum(&scope, e, vec![path::FILE_ENUM, i as i32]))
            .collect();
        let messages = proto
            .message_type
            .iter()
            .enumerate()
            .map(|(i, m)| self.register_message(&scope, m, vec![path::FILE_MESSAGE, i as i32]))
            .collect();

        let file = &mut self.files[id.0];
        file.enums = enums;
        file.messages = messages;
    }

    fn register_enum(
        &mut self,
        scope: &Scope<'_>,
        proto: &EnumDescriptorProto,
        location: Vec<i32>,
    ) -> EnumId {
        let id = EnumId(self.enums.len());
        let name = proto.name().to_string();
        let full_name = qualify(scope.prefix, &name);

        let values = proto
            .value
            .iter()
            .enumerate()
            .map(|(i, v)| EnumValue {
                name: v.name().to_string(),
                comment: scope.comment(&location, &[path::ENUM_VALUE, i as i32]),
            })
            .collect();

        self.types_by_name.insert(full_name.clone(), TypeId::Enum(id));
        self.enums.push(Enum {
            name,
            full_name,
            file: scope.file,
            parent: scope.parent,
            values,
            comment: scope.comment(&location, &[]),
        });
        id
    }

    fn register_message(
        &mut self,
        scope: &Scope<'_>,
        proto: &DescriptorProto,
        location: Vec<i32>,
    ) -> MessageId {
        let id = MessageId(self.messages.len());
        let name = proto.name().to_string();
        let full_name = qualify(scope.prefix, &name);

        self.types_by_name.insert(full_name.clone(), TypeId::Message(id));
        self.messages.push(Message {
            name,
            full_name: full_name.clone(),
            file: scope.file,
            parent: scope.parent,
            messages: Vec::new(),
            enums: Vec::new(),
            fields: Vec::new(),
            oneofs: proto
                .oneof_decl
                .iter()
                .map(|o| o.name().to_string())
                .collect(),
            map_entry: proto
                .options
                .as_ref()
                .and_then(|o| o.map_entry)
                .unwrap_or(false),
            comment: scope.comment(&location, &[]),
        });

        let inner = Scope {
            file: scope.file,
            parent: Parent::Message(id),
            prefix: &full_name,
            comments: scope.comments,
            rules: scope.rules,
        };
        let child_location = |kind: i32, i: usize| {
            let mut loc = location.clone();
            loc.extend([kind, i as i32]);
            loc
        };

        let enums = proto
            .enum_type
            .iter()
            .enumerate()
            .map(|(i, e)| self.register_enum(&inner, e, child_location(path::MESSAGE_ENUM, i)))
            .collect();
        let messages = proto
            .nested_type
            .iter()
            .enumerate()
            .map(|(i, m)| {
                self.register_message(&inner, m, child_location(path::MESSAGE_NESTED, i))
            })
            .collect();
        let syntax = self.files[scope.file.0].syntax;
        let fields = proto
            .field
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let comment = scope.comment(&location, &[path::MESSAGE_FIELD, i as i32]);
                self.register_field(&inner, id, syntax, f, comment)
            })
            .collect();

        let message = &mut self.messages[id.0];
        message.enums = enums;
        message.messages = messages;
        message.fields = fields;
        id
    }

    fn register_field(
        &mut self,
        scope: &Scope<'_>,
        message: MessageId,
        syntax: Syntax,
        proto: &FieldDescriptorProto,
        comment: Option<String>,
    ) -> FieldId {
        let id = FieldId(self.fields.len());
        let name = proto.name().to_string();
        let full_name = qualify(scope.prefix, &name);
        let label = Label::from_raw(proto.label);
        let oneof = proto.oneof_index.and_then(|i| usize::try_from(i).ok());
        let optional_keyword = proto.proto3_optional()
            || (syntax == Syntax::Proto2 && label == Label::Optional && oneof.is_none());

        self.fields.push(Field {
            rules: scope.rules.get(&full_name).cloned(),
            full_name,
            name,
            message,
            kind: FieldKind::from_raw(proto.r#type.unwrap_or_default()),
            label,
            type_name: proto.type_name.clone(),
            target: None,
            oneof,
            optional_keyword,
            comment,
        });
        id
    }

    fn resolve_targets(&mut self) -> Result<(), GenerateError> {
        for i in 0..self.fields.len() {
            let field = &self.fields[i];
            if !field.kind.is_reference() {
                continue;
            }
            let type_name = field.type_name.clone().unwrap_or_default();
            let target = self
                .lookup(&type_name)
                .ok_or_else(|| GenerateError::UnresolvedType {
                    field: field.full_name.clone(),
                    type_name: type_name.clone(),
                })?;
            self.fields[i].target = Some(target);
        }
        Ok(())
    }
}

/// Registration context shared by the declarations of one scope.
struct Scope<'a> {
    file: FileId,
    parent: Parent,
    prefix: &'a str,
    comments: &'a HashMap<Vec<i32>, String>,
    rules: &'a RuleIndex,
}

impl Scope<'_> {
    fn comment(&self, location: &[i32], suffix: &[i32]) -> Option<String> {
        let mut key = location.to_vec();
        key.extend_from_slice(suffix);
        self.comments.get(&key).cloned()
    }
}

fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn leading_comments(info: Option<&SourceCodeInfo>) -> HashMap<Vec<i32>, String> {
    info.map(|info| {
        info.location
            .iter()
            .filter_map(|loc| {
                let comment = loc.leading_comments.as_ref()?;
                (!comment.trim().is_empty()).then(|| (loc.path.clone(), comment.clone()))
            })
            .collect()
    })
    .unwrap_or_default()
}
