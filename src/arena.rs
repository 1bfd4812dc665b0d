use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{instrument, warn};

use crate::errors::{TreeError, TreeResult};
use crate::value::{AttrMap, NodeAttrs, Value};

/// One element of a tree.
///
/// Fields are private on purpose: every mutation path goes through the
/// validating setters on [`TreeArena`], whether it originates in the
/// constructor or in a later call.
#[derive(Debug)]
pub struct TreeNode {
    /// Integer identifier, absent when unset
    identifier: Option<i64>,
    /// Arbitrary payload, `Null` when unset; never a node handle
    payload: Value,
    /// Indices of child nodes, insertion order significant
    children: Vec<Index>,
    /// Index of the parent node, None for root nodes
    parent: Option<Index>,
}

impl TreeNode {
    pub fn identifier(&self) -> Option<i64> {
        self.identifier
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn children(&self) -> &[Index] {
        &self.children
    }

    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// Arena-based tree structure.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
/// Child edges are owned by their node's child list; the parent edge is a
/// non-owning back-reference, so no reference cycle can form. One arena may
/// hold any number of independent trees.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<TreeNode>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, idx: Index) -> bool {
        self.arena.contains(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// Construct a node from its four optional attributes.
    ///
    /// Applies exactly the validation of the corresponding setters to each
    /// attribute. Nested attribute maps in `children` and `parent` are
    /// expanded into new nodes through this same constructor. Construction is
    /// atomic: on failure no node is inserted and every node created while
    /// expanding nested maps is removed again.
    #[instrument(level = "trace", skip(self))]
    pub fn new_node(&mut self, attrs: NodeAttrs) -> TreeResult<Index> {
        let mut created = Vec::new();
        match self.build_node(attrs, &mut created) {
            Ok(idx) => Ok(idx),
            Err(err) => {
                self.discard(created);
                Err(err)
            }
        }
    }

    /// Construct a node from a raw attribute-mapping.
    ///
    /// Recognized keys are `identifier`, `payload`, `children` and `parent`;
    /// an unknown key fails the whole call.
    #[instrument(level = "trace", skip(self))]
    pub fn node_from_map(&mut self, map: AttrMap) -> TreeResult<Index> {
        let attrs = NodeAttrs::from_map(map)?;
        self.new_node(attrs)
    }

    /// Assign a new identifier.
    ///
    /// Integers are stored as-is. Floats are truncated toward zero and a
    /// warning is emitted; the assignment still succeeds. `Null` unsets the
    /// identifier. Anything else fails with the offending shape named.
    #[instrument(level = "trace", skip(self))]
    pub fn set_identifier(&mut self, idx: Index, value: Value) -> TreeResult<()> {
        self.ensure_live(idx)?;
        let identifier = coerce_identifier(value)?;
        self.node_mut(idx)?.identifier = identifier;
        Ok(())
    }

    /// Assign a new payload. Anything goes except a node handle.
    #[instrument(level = "trace", skip(self))]
    pub fn set_payload(&mut self, idx: Index, value: Value) -> TreeResult<()> {
        self.ensure_live(idx)?;
        let payload = check_payload(value)?;
        self.node_mut(idx)?.payload = payload;
        Ok(())
    }

    /// Replace the node's child sequence.
    ///
    /// Accepts a list whose elements are node handles or attribute maps
    /// (expanded into new nodes, order preserved), or `Null` for an empty
    /// sequence. A single map outside a list is not accepted. On failure the
    /// field is untouched and any expansion work is rolled back.
    #[instrument(level = "trace", skip(self))]
    pub fn set_children(&mut self, idx: Index, value: Value) -> TreeResult<()> {
        self.ensure_live(idx)?;
        let mut created = Vec::new();
        match self.resolve_children(value, &mut created) {
            Ok(children) => {
                self.node_mut(idx)?.children = children;
                Ok(())
            }
            Err(err) => {
                self.discard(created);
                Err(err)
            }
        }
    }

    /// Assign a new parent: a node handle, an attribute map expanded into a
    /// new node, or `Null` to make this node a root.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, idx: Index, value: Value) -> TreeResult<()> {
        self.ensure_live(idx)?;
        let mut created = Vec::new();
        match self.resolve_parent(value, &mut created) {
            Ok(parent) => {
                self.node_mut(idx)?.parent = parent;
                Ok(())
            }
            Err(err) => {
                self.discard(created);
                Err(err)
            }
        }
    }

    /// Append a child to the end of the node's child sequence.
    ///
    /// The candidate must be a node handle; any other shape fails with the
    /// actual shape named and leaves the sequence unchanged. The candidate's
    /// parent link is left untouched; callers wiring back-references set it
    /// explicitly via [`TreeArena::set_parent`].
    #[instrument(level = "trace", skip(self))]
    pub fn add_child(&mut self, idx: Index, candidate: Value) -> TreeResult<()> {
        self.ensure_live(idx)?;
        let child = match candidate {
            Value::Node(child) => child,
            other => return Err(TreeError::ChildType(other.kind())),
        };
        self.ensure_live(child)?;
        self.node_mut(idx)?.children.push(child);
        Ok(())
    }

    /// Walk the parent chain upward and return the root of the node's tree.
    ///
    /// A node without a parent is its own root. Terminates for any finite
    /// acyclic chain; a cyclic parent chain is not detected and will not
    /// terminate.
    #[instrument(level = "trace", skip(self))]
    pub fn root_of(&self, idx: Index) -> TreeResult<Index> {
        let mut current = idx;
        while let Some(parent) = self.node(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Structural equality between two nodes.
    ///
    /// Nodes are equal iff their identifiers and payloads are equal, their
    /// child sequences are equal element-wise in order, and their parents are
    /// equal under this same rule (two absent parents count as equal). This
    /// compares data, not identity: independently constructed nodes with the
    /// same shape are equal. A pair already under comparison is taken as
    /// equal, so trees with consistent parent back-links terminate.
    #[instrument(level = "trace", skip(self))]
    pub fn nodes_equal(&self, a: Index, b: Index) -> bool {
        let mut in_progress = HashSet::new();
        self.structural_eq(a, b, &mut in_progress)
    }

    /// One-line diagnostic representation of a node, for humans only.
    pub fn display(&self, idx: Index) -> NodeDisplay<'_> {
        NodeDisplay { arena: self, idx }
    }

    fn build_node(&mut self, attrs: NodeAttrs, created: &mut Vec<Index>) -> TreeResult<Index> {
        let identifier = coerce_identifier(attrs.identifier)?;
        let payload = check_payload(attrs.payload)?;
        let children = self.resolve_children(attrs.children, created)?;
        let parent = self.resolve_parent(attrs.parent, created)?;

        let idx = self.arena.insert(TreeNode {
            identifier,
            payload,
            children,
            parent,
        });
        created.push(idx);
        Ok(idx)
    }

    fn resolve_children(&mut self, value: Value, created: &mut Vec<Index>) -> TreeResult<Vec<Index>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::List(items) => {
                let mut children = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::Node(child) => {
                            self.ensure_live(child)?;
                            children.push(child);
                        }
                        Value::Map(map) => {
                            let attrs = NodeAttrs::from_map(map)?;
                            children.push(self.build_node(attrs, created)?);
                        }
                        other => return Err(TreeError::ChildrenShape(other.kind())),
                    }
                }
                Ok(children)
            }
            other => Err(TreeError::ChildrenShape(other.kind())),
        }
    }

    fn resolve_parent(&mut self, value: Value, created: &mut Vec<Index>) -> TreeResult<Option<Index>> {
        match value {
            Value::Null => Ok(None),
            Value::Node(parent) => {
                self.ensure_live(parent)?;
                Ok(Some(parent))
            }
            Value::Map(map) => {
                let attrs = NodeAttrs::from_map(map)?;
                Ok(Some(self.build_node(attrs, created)?))
            }
            other => Err(TreeError::ParentType(other.kind())),
        }
    }

    fn structural_eq(&self, a: Index, b: Index, in_progress: &mut HashSet<(Index, Index)>) -> bool {
        if a == b {
            return true;
        }
        // A pair we are already inside of: assume equal, the enclosing
        // comparison settles the verdict.
        if !in_progress.insert((a, b)) {
            return true;
        }

        let (left, right) = match (self.arena.get(a), self.arena.get(b)) {
            (Some(left), Some(right)) => (left, right),
            _ => return false,
        };

        left.identifier == right.identifier
            && left.payload == right.payload
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(right.children.iter())
                .all(|(&ca, &cb)| self.structural_eq(ca, cb, in_progress))
            && match (left.parent, right.parent) {
                (None, None) => true,
                (Some(pa), Some(pb)) => self.structural_eq(pa, pb, in_progress),
                _ => false,
            }
    }

    fn node(&self, idx: Index) -> TreeResult<&TreeNode> {
        self.arena.get(idx).ok_or(TreeError::StaleNode(idx))
    }

    fn node_mut(&mut self, idx: Index) -> TreeResult<&mut TreeNode> {
        self.arena.get_mut(idx).ok_or(TreeError::StaleNode(idx))
    }

    fn ensure_live(&self, idx: Index) -> TreeResult<()> {
        if self.arena.contains(idx) {
            Ok(())
        } else {
            Err(TreeError::StaleNode(idx))
        }
    }

    fn discard(&mut self, created: Vec<Index>) {
        for idx in created.into_iter().rev() {
            self.arena.remove(idx);
        }
    }

    fn fmt_node(&self, idx: Index, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = match self.arena.get(idx) {
            Some(node) => node,
            None => return write!(f, "<TreeNode stale {idx:?}>"),
        };

        write!(f, "<TreeNode id: ")?;
        fmt_identifier(node.identifier, f)?;
        write!(f, ", payload: {}", node.payload)?;

        // The parent renders shallowly; a recursive render could not
        // terminate once back-links are wired.
        match node.parent {
            Some(parent) => {
                write!(f, ", parent: ")?;
                match self.arena.get(parent) {
                    Some(parent) => fmt_identifier(parent.identifier, f)?,
                    None => write!(f, "<stale>")?,
                }
            }
            None => write!(f, ", parent: none")?,
        }

        write!(f, ", children: [")?;
        for (i, &child) in node.children.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.fmt_node(child, f)?;
        }
        write!(f, "]>")
    }
}

/// Renders a node through [`TreeArena::display`]; not a stable format.
pub struct NodeDisplay<'a> {
    arena: &'a TreeArena,
    idx: Index,
}

impl fmt::Display for NodeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.arena.fmt_node(self.idx, f)
    }
}

fn fmt_identifier(identifier: Option<i64>, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match identifier {
        Some(id) => write!(f, "{id}"),
        None => write!(f, "unset"),
    }
}

/// Integers pass through, floats are truncated toward zero with a warning,
/// anything else is rejected. Shared by the constructor and the setter.
fn coerce_identifier(value: Value) -> TreeResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Int(id) => Ok(Some(id)),
        Value::Float(id) => {
            warn!("converting float identifier {} to integer", id);
            Ok(Some(id.trunc() as i64))
        }
        other => Err(TreeError::IdentifierType(other.kind())),
    }
}

fn check_payload(value: Value) -> TreeResult<Value> {
    match value {
        Value::Node(_) => Err(TreeError::PayloadIsNode),
        other => Ok(other),
    }
}
