//! Wire types for the `validate.rules` field annotation.
//!
//! Mirrors `proto/validate/validate.proto`. Every attribute is declared
//! `optional` so presence can be told apart from a zero value: an absent
//! attribute emits no constraint.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FieldRules {
    #[prost(oneof = "field_rules::Rules", tags = "1, 3, 14, 17, 18")]
    pub rules: Option<field_rules::Rules>,
}

pub mod field_rules {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Rules {
        /// Applies to `float` and `double` fields.
        #[prost(message, tag = "1")]
        Float(super::FloatRules),
        /// Applies to every integer kind.
        #[prost(message, tag = "3")]
        Int(super::IntRules),
        #[prost(message, tag = "14")]
        String(super::StringRules),
        #[prost(message, tag = "17")]
        Message(super::MessageRules),
        #[prost(message, tag = "18")]
        Repeated(super::RepeatedRules),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FloatRules {
    #[prost(double, optional, tag = "1")]
    pub default_value: Option<f64>,
    #[prost(double, optional, tag = "2")]
    pub lt: Option<f64>,
    #[prost(double, optional, tag = "3")]
    pub lte: Option<f64>,
    #[prost(double, optional, tag = "4")]
    pub gt: Option<f64>,
    #[prost(double, optional, tag = "5")]
    pub gte: Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct IntRules {
    #[prost(int64, optional, tag = "1")]
    pub default_value: Option<i64>,
    #[prost(int64, optional, tag = "2")]
    pub lt: Option<i64>,
    #[prost(int64, optional, tag = "3")]
    pub lte: Option<i64>,
    #[prost(int64, optional, tag = "4")]
    pub gt: Option<i64>,
    #[prost(int64, optional, tag = "5")]
    pub gte: Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StringRules {
    #[prost(string, optional, tag = "1")]
    pub default_value: Option<String>,
    #[prost(uint64, optional, tag = "2")]
    pub len: Option<u64>,
    #[prost(uint64, optional, tag = "3")]
    pub min_length: Option<u64>,
    #[prost(uint64, optional, tag = "4")]
    pub max_length: Option<u64>,
    #[prost(bool, optional, tag = "5")]
    pub uuid: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MessageRules {
    /// Name of a callable producing the default instance.
    #[prost(string, optional, tag = "1")]
    pub default_factory: Option<String>,
    /// Default to an empty instance of the field's own type.
    #[prost(bool, optional, tag = "2")]
    pub default_empty: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RepeatedRules {
    #[prost(uint64, optional, tag = "1")]
    pub len: Option<u64>,
    #[prost(uint64, optional, tag = "2")]
    pub min_length: Option<u64>,
    #[prost(uint64, optional, tag = "3")]
    pub max_length: Option<u64>,
    /// Rules for each element.
    #[prost(message, optional, boxed, tag = "4")]
    pub items: Option<Box<FieldRules>>,
}

impl RepeatedRules {
    /// Whether the element rules mark items as UUID-formatted strings.
    pub fn items_are_uuid(&self) -> bool {
        match self.items.as_deref().and_then(|items| items.rules.as_ref()) {
            Some(field_rules::Rules::String(rules)) => rules.uuid == Some(true),
            _ => false,
        }
    }
}
