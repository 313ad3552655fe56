//! Translates field rules into pydantic `Field(...)` directives.
//!
//! For each field this produces the validation keywords, at most one
//! default, and the UUID override. Message-level concerns (oneof
//! invariants and the map serializer) are collected here too since they
//! are derived from the same field metadata.

use crate::error::GenerateError;
use crate::graph::{Field, FieldId, Graph, MessageId};
use crate::typemap::FieldType;
use crate::validate::field_rules::Rules;

/// A Python literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn to_python(&self) -> String {
        match self {
            Literal::Int(v) => v.to_string(),
            Literal::Uint(v) => v.to_string(),
            Literal::Float(v) => python_float(*v),
            Literal::Str(v) => python_string(v),
        }
    }
}

/// One `keyword=value` validation directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub keyword: &'static str,
    pub value: Literal,
}

impl Constraint {
    fn new(keyword: &'static str, value: Literal) -> Self {
        Self { keyword, value }
    }

    pub fn directive(&self) -> String {
        format!("{}={}", self.keyword, self.value.to_python())
    }
}

/// Default of a field; a field without one is required.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    Value(Literal),
    /// `None`; the field type becomes `Optional[...]`.
    Absent,
    EmptyList,
    EmptyDict,
    /// Named callable from the message rules.
    Factory(String),
    /// Empty instance of the given type reference.
    EmptyInstance(String),
}

impl FieldDefault {
    pub fn directive(&self) -> String {
        match self {
            FieldDefault::Value(literal) => format!("default={}", literal.to_python()),
            FieldDefault::Absent => "default=None".to_string(),
            FieldDefault::EmptyList => "default_factory=list".to_string(),
            FieldDefault::EmptyDict => "default_factory=dict".to_string(),
            FieldDefault::Factory(name) => format!("default_factory={name}"),
            FieldDefault::EmptyInstance(ty) => format!("default_factory=lambda: {ty}()"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSpec {
    pub constraints: Vec<Constraint>,
    pub default: Option<FieldDefault>,
    /// Render the innermost type as `UUID`.
    pub uuid: bool,
}

impl FieldSpec {
    pub fn nullable(&self) -> bool {
        matches!(self.default, Some(FieldDefault::Absent))
    }

    /// Arguments of the `Field(...)` call: the default first, then the
    /// constraints in rule order.
    pub fn directives(&self) -> Vec<String> {
        self.default
            .iter()
            .map(FieldDefault::directive)
            .chain(self.constraints.iter().map(Constraint::directive))
            .collect()
    }
}

/// Translate the rules of field `id`, whose mapped type is `ty`.
///
/// # Errors
///
/// Returns `GenerateError::ConflictingRules` when the rules ask for two
/// defaults, or for an exact length together with a length bound.
pub fn translate(graph: &Graph, id: FieldId, ty: &FieldType) -> Result<FieldSpec, GenerateError> {
    let field = graph.field(id);
    let mut spec = FieldSpec::default();
    let mut explicit = None;

    match field.rules.as_ref().and_then(|r| r.rules.as_ref()) {
        Some(Rules::Float(rules)) => {
            explicit = rules.default_value.map(|v| FieldDefault::Value(Literal::Float(v)));
            spec.constraints = bounds([rules.lt, rules.gt, rules.gte, rules.lte], Literal::Float);
        }
        Some(Rules::Int(rules)) => {
            explicit = rules.default_value.map(|v| FieldDefault::Value(Literal::Int(v)));
            spec.constraints = bounds([rules.lt, rules.gt, rules.gte, rules.lte], Literal::Int);
        }
        Some(Rules::String(rules)) => {
            explicit = rules
                .default_value
                .clone()
                .map(|v| FieldDefault::Value(Literal::Str(v)));
            spec.constraints = lengths(field, rules.len, rules.min_length, rules.max_length)?;
            spec.uuid = rules.uuid == Some(true);
        }
        Some(Rules::Message(rules)) => {
            let empty = rules.default_empty == Some(true);
            explicit = match (&rules.default_factory, empty) {
                (Some(name), true) => {
                    let message = format!("default_factory {name} conflicts with default_empty");
                    return Err(GenerateError::ConflictingRules {
                        field: field.full_name.clone(),
                        message,
                    });
                }
                (Some(name), false) => Some(FieldDefault::Factory(name.clone())),
                (None, true) => Some(FieldDefault::EmptyInstance(ty.reference(false))),
                (None, false) => None,
            };
        }
        Some(Rules::Repeated(rules)) => {
            spec.constraints = lengths(field, rules.len, rules.min_length, rules.max_length)?;
            spec.uuid = rules.items_are_uuid();
        }
        None => {}
    }

    spec.default = explicit.or_else(|| implied_default(field, ty));
    Ok(spec)
}

fn implied_default(field: &Field, ty: &FieldType) -> Option<FieldDefault> {
    if field.optional_keyword || field.in_oneof_group() {
        Some(FieldDefault::Absent)
    } else if ty.is_list() {
        Some(FieldDefault::EmptyList)
    } else if ty.is_map() {
        Some(FieldDefault::EmptyDict)
    } else {
        None
    }
}

/// Pydantic keywords for the `lt`, `gt`, `gte` and `lte` rules, in order.
const BOUND_KEYWORDS: [&str; 4] = ["lt", "gt", "ge", "le"];

fn bounds<T>(values: [Option<T>; 4], literal: fn(T) -> Literal) -> Vec<Constraint> {
    BOUND_KEYWORDS
        .into_iter()
        .zip(values)
        .filter_map(|(keyword, value)| Some(Constraint::new(keyword, literal(value?))))
        .collect()
}

fn lengths(
    field: &Field,
    exact: Option<u64>,
    min: Option<u64>,
    max: Option<u64>,
) -> Result<Vec<Constraint>, GenerateError> {
    match exact {
        Some(_) if min.is_some() || max.is_some() => Err(GenerateError::ConflictingRules {
            field: field.full_name.clone(),
            message: "len cannot be combined with min_length or max_length".to_string(),
        }),
        Some(len) => Ok(vec![
            Constraint::new("min_length", Literal::Uint(len)),
            Constraint::new("max_length", Literal::Uint(len)),
        ]),
        None => Ok(min
            .map(|v| Constraint::new("min_length", Literal::Uint(v)))
            .into_iter()
            .chain(max.map(|v| Constraint::new("max_length", Literal::Uint(v))))
            .collect()),
    }
}

/// A oneof whose members must have exactly one value set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneofGroup {
    pub name: String,
    pub members: Vec<String>,
}

/// Oneof groups of a message that need a construction-time check.
///
/// Members carrying their own `optional` keyword are plain optional fields,
/// so a proto3 `optional` field's synthetic oneof never qualifies.
pub fn oneof_groups(graph: &Graph, id: MessageId) -> Vec<OneofGroup> {
    let message = graph.message(id);
    message
        .oneofs
        .iter()
        .enumerate()
        .filter_map(|(index, name)| {
            let members: Vec<String> = message
                .fields
                .iter()
                .map(|f| graph.field(*f))
                .filter(|f| f.oneof == Some(index) && !f.optional_keyword)
                .map(|f| f.name.clone())
                .collect();
            (members.len() >= 2).then(|| OneofGroup {
                name: name.clone(),
                members,
            })
        })
        .collect()
}

/// Names of a message's map fields, in declaration order.
pub fn map_fields(graph: &Graph, id: MessageId) -> Vec<&str> {
    graph
        .message(id)
        .fields
        .iter()
        .filter(|f| graph.is_map(**f))
        .map(|f| graph.field(*f).name.as_str())
        .collect()
}

fn python_float(v: f64) -> String {
    if v.is_nan() {
        "float(\"nan\")".to_string()
    } else if v.is_infinite() {
        if v > 0.0 {
            "float(\"inf\")".to_string()
        } else {
            "float(\"-inf\")".to_string()
        }
    } else {
        // Debug keeps a decimal point or exponent, which Python reads as a float.
        format!("{v:?}")
    }
}

fn python_string(v: &str) -> String {
    let mut out = String::with_capacity(v.len() + 2);
    out.push('"');
    for c in v.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
