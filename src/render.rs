//! Python source emission for one compilation unit.

use crate::constraints::{map_fields, oneof_groups, translate};
use crate::error::GenerateError;
use crate::graph::{EnumId, Graph, MessageId, TypeId};
use crate::namespace::{Node, NodeEmitter};
use crate::naming::NameResolver;
use crate::typemap::map_field;
use crate::types::GenerateOptions;
use crate::writer::CodeWriter;

const BANNER: &str = "####################################################################";

/// Imported from `pydantic` whether or not `BaseModel` is.
const PYDANTIC_HELPERS: &str = "Field, field_serializer, model_validator, SerializationInfo";

/// Write the banner and imports every generated module starts with.
pub fn write_module_header(w: &mut CodeWriter, options: &GenerateOptions) {
    w.line(BANNER);
    w.line("### This is an automatically generated file.        DO NOT EDIT  ###");
    w.line(BANNER);
    w.blank();
    w.line("from __future__ import annotations");
    w.blank();
    w.line("import datetime");
    w.line("import json");
    w.blank();
    w.line("from enum import StrEnum");
    match options.pydantic_base_path.as_deref() {
        Some(base) => {
            w.line(format!("from {base} import BaseModel"));
            w.line(format!("from pydantic import {PYDANTIC_HELPERS}"));
        }
        None => w.line(format!("from pydantic import BaseModel, {PYDANTIC_HELPERS}")),
    }
    w.line("from typing import Any, Optional, Self");
    w.line("from uuid import UUID");
}

/// Emits classes for the nodes of a namespace tree.
pub struct Renderer<'a> {
    graph: &'a Graph,
    names: &'a NameResolver<'a>,
    options: &'a GenerateOptions,
    w: CodeWriter,
    /// Nothing has been written since the innermost class header.
    fresh_scope: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(
        graph: &'a Graph,
        names: &'a NameResolver<'a>,
        options: &'a GenerateOptions,
    ) -> Self {
        let mut w = CodeWriter::new();
        write_module_header(&mut w, options);
        Self {
            graph,
            names,
            options,
            w,
            fresh_scope: false,
        }
    }

    pub fn finish(self) -> String {
        self.w.into_string()
    }

    fn separate(&mut self, depth: usize) {
        if depth == 0 {
            self.w.blank();
            self.w.blank();
        } else if !self.fresh_scope {
            self.w.blank();
        }
    }

    fn enum_header(&mut self, id: EnumId, name: &str) {
        if let Some(comment) = &self.graph.enum_(id).comment {
            self.w.comment(comment);
        }
        self.w.line(format!("class {name}(StrEnum):"));
    }

    fn enum_body(&mut self, id: EnumId) {
        let values = &self.graph.enum_(id).values;
        if values.is_empty() {
            self.w.line("pass");
        }
        for value in values {
            if let Some(comment) = &value.comment {
                self.w.comment(comment);
            }
            self.w.line(format!("{0} = \"{0}\"", value.name));
        }
    }

    fn message_header(&mut self, id: MessageId, name: &str) {
        if let Some(comment) = &self.graph.message(id).comment {
            self.w.comment(comment);
        }
        self.w.line(format!("class {name}(BaseModel):"));
    }

    fn message_body(&mut self, id: MessageId, has_children: bool) -> Result<(), GenerateError> {
        let graph = self.graph;
        let message = graph.message(id);
        if message.fields.is_empty() {
            if !has_children {
                self.w.line("pass");
            }
            return Ok(());
        }
        if has_children {
            self.w.blank();
        }

        for field_id in &message.fields {
            let field = graph.field(*field_id);
            let ty = map_field(graph, *field_id, self.names)?;
            let spec = translate(graph, *field_id, &ty)?;

            let mut annotation = ty.reference(spec.uuid);
            if spec.nullable() {
                annotation = format!("Optional[{annotation}]");
            }
            if let Some(comment) = &field.comment {
                self.w.comment(comment);
            }
            self.w.line(format!(
                "{}: {} = Field({})",
                field.name,
                annotation,
                spec.directives().join(", ")
            ));
        }

        let maps = map_fields(graph, id);
        if !maps.is_empty() {
            let names: Vec<String> = maps.iter().map(|n| format!("\"{n}\"")).collect();
            self.w.blank();
            self.w.line(format!("@field_serializer({})", names.join(", ")));
            self.w.line("def json_dump(self, v: dict, info: SerializationInfo):");
            self.w.indent();
            self.w.line(format!(
                "if info.context == '{}':",
                self.options.serialize_context
            ));
            self.w.indent();
            self.w.line("return json.dumps(v)");
            self.w.dedent();
            self.w.line("return v");
            self.w.dedent();
        }

        let groups = oneof_groups(graph, id);
        if !groups.is_empty() {
            self.w.blank();
            self.w.line("@model_validator(mode=\"after\")");
            self.w.line("def validate_one_ofs(self) -> Self:");
            self.w.indent();
            for group in &groups {
                let members: Vec<String> =
                    group.members.iter().map(|m| format!("self.{m}")).collect();
                self.w.line(format!(
                    "if sum(v is not None for v in ({},)) != 1:",
                    members.join(", ")
                ));
                self.w.indent();
                self.w.line(format!(
                    "raise ValueError(\"oneof {}: exactly one of {} must be set\")",
                    group.name,
                    group.members.join(", ")
                ));
                self.w.dedent();
            }
            self.w.line("return self");
            self.w.dedent();
        }
        Ok(())
    }
}

impl NodeEmitter for Renderer<'_> {
    type Error = GenerateError;

    fn header(&mut self, node: &Node) -> Result<(), Self::Error> {
        self.w.set_level(node.depth);
        self.separate(node.depth);
        match node.decl {
            Some(TypeId::Message(id)) => self.message_header(id, &node.name),
            Some(TypeId::Enum(id)) => self.enum_header(id, &node.name),
            None => self.w.line(format!("class {}:", node.name)),
        }
        self.fresh_scope = true;
        Ok(())
    }

    fn body(&mut self, node: &Node) -> Result<(), Self::Error> {
        self.w.set_level(node.depth + 1);
        let has_children = !node.children.is_empty();
        match node.decl {
            Some(TypeId::Message(id)) => self.message_body(id, has_children)?,
            Some(TypeId::Enum(id)) => self.enum_body(id),
            None if !has_children => self.w.line("pass"),
            None => {}
        }
        self.fresh_scope = false;
        Ok(())
    }
}
