//! Target type of each field.

use crate::error::GenerateError;
use crate::graph::{FieldId, FieldKind, Graph};
use crate::naming::{NameResolver, ResolvedName};
use crate::wellknown::{well_known_type, WellKnownType};

/// Python scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scalar {
    Str,
    Bool,
    Int,
    Float,
}

impl Scalar {
    pub fn python(self) -> &'static str {
        match self {
            Scalar::Str => "str",
            Scalar::Bool => "bool",
            Scalar::Int => "int",
            Scalar::Float => "float",
        }
    }
}

/// Reference to a named type.
#[derive(Debug, Clone, PartialEq)]
pub enum NamedType {
    /// A message or enum emitted by this compilation unit.
    Declared(ResolvedName),
    /// A well-known type replaced by a built-in.
    WellKnown(&'static WellKnownType),
}

/// Target type of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Scalar(Scalar),
    Named(NamedType),
    List(Box<FieldType>),
    /// Map with string keys; holds the value type.
    Map(Box<FieldType>),
}

impl FieldType {
    /// Python type expression. `uuid` replaces the innermost scalar or
    /// named type with `UUID`.
    pub fn reference(&self, uuid: bool) -> String {
        match self {
            FieldType::Map(value) => format!("dict[str, {}]", value.reference(uuid)),
            FieldType::List(element) => format!("list[{}]", element.reference(uuid)),
            _ if uuid => "UUID".to_string(),
            FieldType::Scalar(scalar) => scalar.python().to_string(),
            FieldType::Named(NamedType::Declared(name)) => name.dotted(),
            FieldType::Named(NamedType::WellKnown(wkt)) => wkt.python.to_string(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::List(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, FieldType::Map(_))
    }
}

/// Map a field to its target type, naming declarations through `names`.
///
/// # Errors
///
/// Returns `GenerateError::UnsupportedKind` for kinds with no target type
/// (groups and unknown kinds).
pub fn map_field(
    graph: &Graph,
    id: FieldId,
    names: &NameResolver<'_>,
) -> Result<FieldType, GenerateError> {
    // Keys are strings on the target side whatever their declared kind.
    if let Some((_, value)) = graph.map_entry_fields(id) {
        let value = map_singular(graph, value, names)?;
        return Ok(FieldType::Map(Box::new(value)));
    }

    let element = map_singular(graph, id, names)?;
    if graph.field(id).is_repeated() {
        Ok(FieldType::List(Box::new(element)))
    } else {
        Ok(element)
    }
}

fn map_singular(
    graph: &Graph,
    id: FieldId,
    names: &NameResolver<'_>,
) -> Result<FieldType, GenerateError> {
    let field = graph.field(id);
    let scalar = match field.kind {
        FieldKind::String | FieldKind::Bytes => Scalar::Str,
        FieldKind::Bool => Scalar::Bool,
        FieldKind::Int32
        | FieldKind::Int64
        | FieldKind::Uint32
        | FieldKind::Uint64
        | FieldKind::Fixed32
        | FieldKind::Fixed64
        | FieldKind::Sfixed32
        | FieldKind::Sfixed64
        | FieldKind::Sint32
        | FieldKind::Sint64 => Scalar::Int,
        FieldKind::Float | FieldKind::Double => Scalar::Float,
        FieldKind::Message | FieldKind::Enum => {
            let target = field.target.ok_or_else(|| GenerateError::UnresolvedType {
                field: field.full_name.clone(),
                type_name: field.type_name.clone().unwrap_or_default(),
            })?;
            let named = match well_known_type(graph.type_full_name(target)) {
                Some(wkt) => NamedType::WellKnown(wkt),
                None => NamedType::Declared(names.resolve(target)),
            };
            return Ok(FieldType::Named(named));
        }
        FieldKind::Group | FieldKind::Unknown(_) => {
            return Err(GenerateError::UnsupportedKind {
                field: field.full_name.clone(),
                kind: field.kind.raw(),
            });
        }
    };
    Ok(FieldType::Scalar(scalar))
}
