//! Graph walker: visits every declaration reachable from a set of files
//! exactly once.
//!
//! Per file the order is enums, then messages. A message's own enums, nested
//! messages and fields are visited before the message itself. A field is
//! visited before its map key/value fields and before the declaration it
//! references, which may live in another file.

use std::collections::HashSet;

use crate::graph::{EnumId, FieldId, FileId, Graph, MessageId, TypeId};

/// One visitation event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decl {
    File(FileId),
    Enum(EnumId),
    Message(MessageId),
    Field(FieldId),
}

/// Walk `files` in order, calling `visit` once per unique declaration.
///
/// Returning `false` from `visit` stops descent below a file or a field.
/// For messages the signal is ignored: their children have already been
/// walked by the time the message itself is visited.
pub fn walk_files<F>(graph: &Graph, files: &[FileId], visit: F)
where
    F: FnMut(Decl) -> bool,
{
    let mut walker = Walker {
        graph,
        seen: HashSet::new(),
        visit,
    };
    for file in files {
        walker.walk_file(*file);
    }
}

struct Walker<'g, F> {
    graph: &'g Graph,
    /// Fully-qualified names (file paths for files) already entered.
    seen: HashSet<&'g str>,
    visit: F,
}

impl<'g, F> Walker<'g, F>
where
    F: FnMut(Decl) -> bool,
{
    fn enter(&mut self, name: &'g str) -> bool {
        self.seen.insert(name)
    }

    fn walk_file(&mut self, id: FileId) {
        let graph = self.graph;
        let file = graph.file(id);
        if !self.enter(&file.path) {
            return;
        }
        if !(self.visit)(Decl::File(id)) {
            return;
        }
        for e in &file.enums {
            self.walk_enum(*e);
        }
        for m in &file.messages {
            self.walk_message(*m);
        }
    }

    fn walk_enum(&mut self, id: EnumId) {
        let graph = self.graph;
        if self.enter(&graph.enum_(id).full_name) {
            (self.visit)(Decl::Enum(id));
        }
    }

    fn walk_message(&mut self, id: MessageId) {
        let graph = self.graph;
        let message = graph.message(id);
        if !self.enter(&message.full_name) {
            return;
        }
        for e in &message.enums {
            self.walk_enum(*e);
        }
        for m in &message.messages {
            self.walk_message(*m);
        }
        for f in &message.fields {
            self.walk_field(*f);
        }
        (self.visit)(Decl::Message(id));
    }

    fn walk_field(&mut self, id: FieldId) {
        let graph = self.graph;
        let field = graph.field(id);
        if !self.enter(&field.full_name) {
            return;
        }
        if !(self.visit)(Decl::Field(id)) {
            return;
        }
        if let Some((key, value)) = graph.map_entry_fields(id) {
            self.walk_field(key);
            self.walk_field(value);
        }
        match field.target {
            Some(TypeId::Message(m)) => self.walk_message(m),
            Some(TypeId::Enum(e)) => self.walk_enum(e),
            None => {}
        }
    }
}
