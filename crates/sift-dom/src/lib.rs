//! Arena element tree for the Sift selector engine.
//!
//! The selector engine never owns a document; it reaches elements through a
//! narrow capability trait. This crate is the reference host for that trait:
//! a small arena tree that records what a UI tree exposes to style resolution
//! (tag, attributes, dynamic pseudo state, and the owner back-reference of
//! pseudo-element nodes).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.

use std::collections::HashMap;

pub use sift_common::PseudoState;

/// Map of attribute names to values for an element.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// A tree node with index links to its parent, children, and siblings.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is.
    pub node_type: NodeType,
    /// Parent node, `None` for the document and for detached nodes.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
    /// Next sibling in the parent's child list.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling in the parent's child list.
    pub prev_sibling: Option<NodeId>,
}

/// Node kinds.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// The document node; never matched by selectors.
    Document,
    /// An element.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment node.
    Comment(String),
}

/// Element-specific data.
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// The element's tag name as written by the producer of the tree.
    pub tag_name: String,
    /// Attribute list (`id` and `class` live here too).
    pub attrs: AttributesMap,
    /// Dynamic pseudo state.
    pub pseudo_state: PseudoState,
    /// For pseudo-element stand-ins: the element that owns them. This is a
    /// non-owning back-reference, not a tree relationship.
    pub pseudo_element_owner: Option<NodeId>,
}

impl ElementData {
    /// Create element data with the given tag and no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Iterate the whitespace-separated class names of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Returns true if `name` is one of the element's classes.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|class| class == name)
    }
}

/// Arena-based tree with O(1) node access and traversal.
///
/// All nodes are stored in a contiguous vector, using indices for all
/// relationships. The Document node is always at index 0.
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
        }
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of nodes in the arena, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// Allocate a detached element with the given tag.
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Appends `child` as the last child of `parent`, updating all relationships.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let prev_last_child = self.nodes[parent.0].children.last().copied();

        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn preceding_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Borrow an element as an [`ElementRef`] handle, if `id` is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.as_element(id)
            .map(|data| ElementRef { tree: self, id, data })
    }

    /// Set an attribute on an element. No-op for non-elements.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(element) = self.as_element_mut(id) {
            let _ = element.attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Set the `id` attribute.
    pub fn set_id(&mut self, id: NodeId, value: &str) {
        self.set_attribute(id, "id", value);
    }

    /// Append a class to the `class` attribute.
    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(element) = self.as_element_mut(id) {
            let entry = element.attrs.entry("class".to_string()).or_default();
            if !entry.is_empty() {
                entry.push(' ');
            }
            entry.push_str(class);
        }
    }

    /// Add dynamic pseudo state bits to an element.
    pub fn add_pseudo_state(&mut self, id: NodeId, state: PseudoState) {
        if let Some(element) = self.as_element_mut(id) {
            element.pseudo_state |= state;
        }
    }

    /// Remove dynamic pseudo state bits from an element.
    pub fn remove_pseudo_state(&mut self, id: NodeId, state: PseudoState) {
        if let Some(element) = self.as_element_mut(id) {
            element.pseudo_state.remove(state);
        }
    }

    /// Mark `id` as a pseudo-element stand-in owned by `owner`.
    pub fn set_pseudo_element_owner(&mut self, id: NodeId, owner: NodeId) {
        if let Some(element) = self.as_element_mut(id) {
            element.pseudo_element_owner = Some(owner);
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// A borrowed handle to one element of a [`DomTree`].
///
/// Element navigation skips text, comment, and document nodes: the parent of
/// a top-level element is `None`, and sibling steps only land on elements.
#[derive(Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    data: &'a ElementData,
}

impl<'a> ElementRef<'a> {
    /// The node this handle points at.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The tree this handle borrows.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The element's data.
    #[must_use]
    pub const fn data(&self) -> &'a ElementData {
        self.data
    }

    /// Parent element, skipping the document node.
    #[must_use]
    pub fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent(self.id)
            .and_then(|parent| self.tree.element(parent))
    }

    /// Closest preceding sibling that is an element.
    #[must_use]
    pub fn prev_sibling_element(&self) -> Option<Self> {
        self.tree
            .preceding_siblings(self.id)
            .find_map(|sibling| self.tree.element(sibling))
    }

    /// Closest following sibling that is an element.
    #[must_use]
    pub fn next_sibling_element(&self) -> Option<Self> {
        let mut current = self.tree.next_sibling(self.id);
        while let Some(id) = current {
            if let Some(element) = self.tree.element(id) {
                return Some(element);
            }
            current = self.tree.next_sibling(id);
        }
        None
    }

    /// True if the element has no element children and no non-blank text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree
            .children(self.id)
            .iter()
            .all(|&child| match self.tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => text.trim().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            })
    }

    /// The owner of this pseudo-element stand-in, if any.
    #[must_use]
    pub fn pseudo_element_owner(&self) -> Option<Self> {
        self.data()
            .pseudo_element_owner
            .and_then(|owner| self.tree.element(owner))
    }
}

impl std::fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementRef")
            .field("id", &self.id)
            .field("tag_name", &self.data().tag_name)
            .finish()
    }
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}
