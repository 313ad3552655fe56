//! protoc plugin compiling protobuf schemas into pydantic models.
//!
//! Every message becomes a `BaseModel` subclass and every enum a `StrEnum`,
//! nested the way they are nested in the schema. `validate.rules` field
//! annotations become `Field(...)` constraints and defaults, oneof groups
//! get an exactly-one-set model validator, and well-known types such as
//! `google.protobuf.Timestamp` are replaced by Python built-ins.
//!
//! # Example
//!
//! ```
//! use prost_types::compiler::CodeGeneratorRequest;
//! use prost_types::{DescriptorProto, FieldDescriptorProto, FileDescriptorProto};
//! use protoc_gen_pydantic::generate;
//!
//! let order = DescriptorProto {
//!     name: Some("Order".into()),
//!     field: vec![FieldDescriptorProto {
//!         name: Some("id".into()),
//!         number: Some(1),
//!         label: Some(1),
//!         r#type: Some(9),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! let request = CodeGeneratorRequest {
//!     file_to_generate: vec!["shop/orders.proto".into()],
//!     proto_file: vec![FileDescriptorProto {
//!         name: Some("shop/orders.proto".into()),
//!         package: Some("shop".into()),
//!         message_type: vec![order],
//!         syntax: Some("proto3".into()),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let response = generate(&request).unwrap();
//! let module = &response.file[0];
//! assert_eq!(module.name(), "shop/pb_models.py");
//! assert!(module
//!     .content()
//!     .contains("class Order(BaseModel):\n    id: str = Field()\n"));
//! ```
//!
//! protoc's encoded request goes through [`generate_from_bytes`] instead,
//! which also reads the `validate.rules` field options.
//!
//! # Field defaults
//!
//! | Field | Default directive |
//! |-------|-------------------|
//! | rule `default` | `default=<value>` |
//! | `optional`, or member of a oneof | `default=None` (type wrapped in `Optional`) |
//! | repeated | `default_factory=list` |
//! | map | `default_factory=dict` |
//! | anything else | none; the field is required |

mod constraints;
mod error;
mod generate;
mod graph;
mod namespace;
mod naming;
mod package;
mod plugin;
mod render;
mod rules;
#[cfg(test)]
mod testing;
mod typemap;
mod types;
mod validate;
mod walk;
mod wellknown;
mod writer;

pub use error::{GenerateError, PluginError};
pub use generate::{generate, generate_with_rules, PY_TYPED, SUPPORTED_FEATURES};
pub use plugin::{generate_from_bytes, run_plugin};
pub use rules::RuleIndex;
pub use types::{GenerateOptions, DEFAULT_FILENAME, DEFAULT_SERIALIZE_CONTEXT};
pub use validate::field_rules::Rules;
pub use validate::{FieldRules, FloatRules, IntRules, MessageRules, RepeatedRules, StringRules};
