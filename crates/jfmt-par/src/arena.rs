//! Node arena - append-only, index-overlay storage for CST nodes.
//!
//! The arena owns every node record and every attribute payload for its
//! lifetime; children are referenced by index and implied by span
//! containment, never by pointer. Nodes are allocated in post-order of the
//! final tree — a child always before its parent — so a forward scan of the
//! arena visits every node after all of its descendants. Dropping the arena
//! releases everything at once.

use jfmt_util::{IndexVec, Span, Symbol};

use crate::node::{
    AttrId, Attribute, Node, NodeId, NodeKind, ParameterAttribute, TypeDeclarationAttribute,
};

/// Append-only store of CST nodes and their attribute payloads.
///
/// # Examples
///
/// ```
/// use jfmt_par::{NodeArena, NodeKind};
/// use jfmt_util::Span;
///
/// let mut arena = NodeArena::new();
/// let child = arena.alloc(NodeKind::Identifier, Span::new(6, 7));
/// let parent = arena.alloc(NodeKind::ExpressionStatement, Span::new(6, 8));
/// assert!(child < parent); // post-order: child allocated first
/// assert!(arena.get(parent).span.contains_span(arena.get(child).span));
/// ```
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: IndexVec<NodeId, Node>,
    attrs: IndexVec<AttrId, Attribute>,
}

impl NodeArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena pre-sized for roughly `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: IndexVec::with_capacity(capacity),
            attrs: IndexVec::new(),
        }
    }

    /// Appends a node with no attribute payload.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        debug_assert!(span.start <= span.end, "inverted span {span}");
        self.nodes.push(Node {
            kind,
            span,
            attr: None,
        })
    }

    /// Appends a type-declaration node carrying its declared name.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `kind` is one of the five type-declaration kinds.
    pub fn alloc_type_declaration(
        &mut self,
        kind: NodeKind,
        span: Span,
        name: Symbol,
    ) -> NodeId {
        debug_assert!(kind.is_type_declaration(), "{kind:?} carries no name");
        let attr = self
            .attrs
            .push(Attribute::TypeDeclaration(TypeDeclarationAttribute { name }));
        self.nodes.push(Node {
            kind,
            span,
            attr: Some(attr),
        })
    }

    /// Appends a parameter-declaration node with its shape payload.
    pub fn alloc_parameter(&mut self, span: Span, attr: ParameterAttribute) -> NodeId {
        let attr = self.attrs.push(Attribute::Parameter(attr));
        self.nodes.push(Node {
            kind: NodeKind::ParameterDeclaration,
            span,
            attr: Some(attr),
        })
    }

    /// Immutable view of a node.
    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// The attribute payload of a node, if it has one.
    pub fn attribute(&self, id: NodeId) -> Option<&Attribute> {
        self.nodes[id].attr.map(|attr| &self.attrs[attr])
    }

    /// The declared name of a node, if it carries one.
    pub fn name_of(&self, id: NodeId) -> Option<Symbol> {
        self.attribute(id).map(Attribute::name)
    }

    /// Number of nodes allocated.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no node has been allocated.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates the node records in allocation (post-) order.
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterates `(id, node)` pairs in allocation order.
    pub fn iter_enumerated(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter_enumerated()
    }
}

/// Structural equality: same length, and corresponding records equal by
/// `(kind, span, attribute payload)`. Attribute *handles* are not compared
/// — two arenas that interned payloads in different orders still compare
/// equal when the resolved payloads match.
impl PartialEq for NodeArena {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.iter_enumerated().all(|(id, node)| {
                let theirs = other.get(id);
                node.kind == theirs.kind
                    && node.span == theirs.span
                    && self.attribute(id) == other.attribute(id)
            })
    }
}

impl Eq for NodeArena {}

#[cfg(test)]
mod tests {
    use super::*;
    use jfmt_util::index_vec::Idx;

    #[test]
    fn test_alloc_returns_sequential_ids() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(NodeKind::Identifier, Span::new(0, 1));
        let b = arena.alloc(NodeKind::Identifier, Span::new(2, 3));
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_plain_nodes_have_no_attribute() {
        let mut arena = NodeArena::new();
        let id = arena.alloc(NodeKind::Block, Span::new(0, 4));
        assert!(arena.attribute(id).is_none());
        assert!(arena.name_of(id).is_none());
    }

    #[test]
    fn test_type_declaration_attribute() {
        let mut arena = NodeArena::new();
        let name = Symbol::intern("Widget");
        let id = arena.alloc_type_declaration(NodeKind::ClassDeclaration, Span::new(0, 20), name);
        assert_eq!(arena.name_of(id), Some(name));
    }

    #[test]
    fn test_parameter_attribute() {
        let mut arena = NodeArena::new();
        let attr = ParameterAttribute {
            name: Symbol::intern("args"),
            is_final: false,
            is_var_args: true,
            is_receiver: false,
        };
        let id = arena.alloc_parameter(Span::new(10, 25), attr);
        match arena.attribute(id) {
            Some(Attribute::Parameter(p)) => {
                assert!(p.is_var_args);
                assert!(!p.is_receiver);
            },
            other => panic!("unexpected attribute {other:?}"),
        }
    }

    #[test]
    fn test_structural_equality() {
        let build = || {
            let mut arena = NodeArena::new();
            arena.alloc(NodeKind::Identifier, Span::new(0, 1));
            arena.alloc_type_declaration(
                NodeKind::ClassDeclaration,
                Span::new(0, 10),
                Symbol::intern("A"),
            );
            arena
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_structural_inequality_on_span() {
        let mut a = NodeArena::new();
        a.alloc(NodeKind::Identifier, Span::new(0, 1));
        let mut b = NodeArena::new();
        b.alloc(NodeKind::Identifier, Span::new(0, 2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_structural_inequality_on_name() {
        let mut a = NodeArena::new();
        a.alloc_type_declaration(NodeKind::ClassDeclaration, Span::new(0, 9), Symbol::intern("A"));
        let mut b = NodeArena::new();
        b.alloc_type_declaration(NodeKind::ClassDeclaration, Span::new(0, 9), Symbol::intern("B"));
        assert_ne!(a, b);
    }
}
