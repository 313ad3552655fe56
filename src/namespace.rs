//! Rebuilds the nesting of emitted classes from resolved identifiers.
//!
//! Every identifier is inserted as a path of segments below a synthetic
//! root. The terminal node of a path carries the declaration; intermediate
//! nodes are namespace scopes that may be created before the declaration
//! that owns them is seen, and are upgraded in place when it is.

use crate::error::GenerateError;
use crate::graph::{Graph, TypeId};
use crate::naming::ResolvedName;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    /// Segment name; the emitted class name.
    pub name: String,
    /// Declaration rendered at this node. `None` for a synthetic scope.
    pub decl: Option<TypeId>,
    pub children: Vec<NodeId>,
    /// Nesting depth, 0 for top-level classes.
    pub depth: usize,
}

/// Callbacks driven by [`NamespaceTree::emit`].
pub trait NodeEmitter {
    type Error;

    /// Called when a node is entered, before any of its children.
    fn header(&mut self, node: &Node) -> Result<(), Self::Error>;

    /// Called after every child has been fully emitted.
    fn body(&mut self, node: &Node) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone)]
pub struct NamespaceTree {
    nodes: Vec<Node>,
    /// Top-level nodes in the order their declarations arrived.
    completed: Vec<NodeId>,
}

impl Default for NamespaceTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NamespaceTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                name: String::new(),
                decl: None,
                children: Vec::new(),
                depth: 0,
            }],
            completed: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Number of nodes, excluding the root.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Insert `decl` at the path given by `name`'s segments.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::NameCollision` if another declaration already
    /// occupies the same path.
    pub fn insert(
        &mut self,
        graph: &Graph,
        name: &ResolvedName,
        decl: TypeId,
    ) -> Result<NodeId, GenerateError> {
        let mut current = self.root();
        for (depth, segment) in name.segments().iter().enumerate() {
            current = match self.child(current, segment) {
                Some(child) => child,
                None => self.push_child(current, segment, depth),
            };
        }

        let node = &mut self.nodes[current.0];
        match node.decl {
            Some(existing) if existing != decl => {
                return Err(GenerateError::NameCollision {
                    name: name.flat(),
                    first: graph.type_full_name(existing).to_string(),
                    second: graph.type_full_name(decl).to_string(),
                });
            }
            Some(_) => {}
            None => {
                node.decl = Some(decl);
                if node.depth == 0 {
                    self.completed.push(current);
                }
            }
        }
        Ok(current)
    }

    /// Find the node at a segment path.
    pub fn find(&self, segments: &[&str]) -> Option<NodeId> {
        segments
            .iter()
            .try_fold(self.root(), |current, segment| self.child(current, segment))
    }

    /// Top-level nodes in emission order: declarations in arrival order,
    /// then synthetic scopes in creation order.
    pub fn top_level(&self) -> Vec<NodeId> {
        let synthetic = self
            .node(self.root())
            .children
            .iter()
            .copied()
            .filter(|id| self.node(*id).decl.is_none());
        self.completed.iter().copied().chain(synthetic).collect()
    }

    /// Emit every top-level node depth-first: a node's header, then each
    /// child in full, then the node's body.
    pub fn emit<E: NodeEmitter>(&self, emitter: &mut E) -> Result<(), E::Error> {
        for id in self.top_level() {
            self.emit_node(id, emitter)?;
        }
        Ok(())
    }

    fn emit_node<E: NodeEmitter>(&self, id: NodeId, emitter: &mut E) -> Result<(), E::Error> {
        let node = self.node(id);
        emitter.header(node)?;
        for child in &node.children {
            self.emit_node(*child, emitter)?;
        }
        emitter.body(node)
    }

    fn child(&self, parent: NodeId, segment: &str) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|c| self.node(*c).name == segment)
    }

    fn push_child(&mut self, parent: NodeId, segment: &str, depth: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: segment.to_string(),
            decl: None,
            children: Vec::new(),
            depth,
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}
