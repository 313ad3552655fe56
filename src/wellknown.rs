//! Standard protobuf types that map straight onto Python built-ins.
//!
//! Table entries are never emitted as classes; fields referencing them use
//! the built-in name instead.

use std::collections::HashMap;
use std::sync::OnceLock;

/// A `google.protobuf` type substituted by a Python type expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WellKnownType {
    pub full_name: &'static str,
    pub python: &'static str,
}

const TABLE: &[WellKnownType] = &[
    WellKnownType {
        full_name: "google.protobuf.Timestamp",
        python: "datetime.datetime",
    },
    WellKnownType {
        full_name: "google.protobuf.Duration",
        python: "datetime.timedelta",
    },
    WellKnownType {
        full_name: "google.protobuf.Struct",
        python: "dict[str, Any]",
    },
    WellKnownType {
        full_name: "google.protobuf.Value",
        python: "Any",
    },
    WellKnownType {
        full_name: "google.protobuf.ListValue",
        python: "list[Any]",
    },
    WellKnownType {
        full_name: "google.protobuf.NullValue",
        python: "None",
    },
    // Wrapper types.
    WellKnownType {
        full_name: "google.protobuf.DoubleValue",
        python: "float",
    },
    WellKnownType {
        full_name: "google.protobuf.FloatValue",
        python: "float",
    },
    WellKnownType {
        full_name: "google.protobuf.Int64Value",
        python: "int",
    },
    WellKnownType {
        full_name: "google.protobuf.UInt64Value",
        python: "int",
    },
    WellKnownType {
        full_name: "google.protobuf.Int32Value",
        python: "int",
    },
    WellKnownType {
        full_name: "google.protobuf.UInt32Value",
        python: "int",
    },
    WellKnownType {
        full_name: "google.protobuf.BoolValue",
        python: "bool",
    },
    WellKnownType {
        full_name: "google.protobuf.StringValue",
        python: "str",
    },
    WellKnownType {
        full_name: "google.protobuf.BytesValue",
        python: "str",
    },
];

fn table() -> &'static HashMap<&'static str, &'static WellKnownType> {
    static INDEX: OnceLock<HashMap<&'static str, &'static WellKnownType>> = OnceLock::new();
    INDEX.get_or_init(|| TABLE.iter().map(|wkt| (wkt.full_name, wkt)).collect())
}

/// Look up a fully-qualified type name (leading dot optional).
pub fn well_known_type(full_name: &str) -> Option<&'static WellKnownType> {
    let name = full_name.strip_prefix('.').unwrap_or(full_name);
    table().get(name).copied()
}

pub fn is_well_known(full_name: &str) -> bool {
    well_known_type(full_name).is_some()
}
