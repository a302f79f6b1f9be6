//! Arena-based XML tree.
//!
//! Nodes live in a flat `Vec` and are addressed by index, with explicit
//! parent back-links. Ownership of the tree is singular: there are no
//! shared element objects and no reference cycles to manage.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Index of a node within its document's arena.
///
/// Only meaningful for the document that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single element node: name, ordered attributes, optional text content.
#[derive(Debug, Clone)]
pub struct XmlNode {
    /// Element name.
    pub name: String,
    /// Attributes in document order. FCPXML elements rarely carry more
    /// than a handful.
    pub attributes: SmallVec<[(String, String); 8]>,
    /// Concatenated text content, if any.
    pub text: Option<String>,
    /// Parent node, `None` for the root.
    pub parent: Option<NodeId>,
    /// Child elements in document order.
    pub children: Vec<NodeId>,
}

impl XmlNode {
    fn new(name: String) -> Self {
        Self {
            name,
            attributes: SmallVec::new(),
            text: None,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An FCPXML document tree.
#[derive(Debug, Clone, Default)]
pub struct XmlDocument {
    nodes: Vec<XmlNode>,
    root: Option<NodeId>,
}

impl XmlDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Root element, if the document has one.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Set the root element.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new element node, initially detached.
    pub fn create_element(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(XmlNode::new(name.into()));
        id
    }

    /// Borrow a node.
    #[inline]
    pub fn node(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id.0]
    }

    /// Borrow a node mutably.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut XmlNode {
        &mut self.nodes[id.0]
    }

    /// Append `child` to `parent`'s child list, fixing the back-link.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detach a node from its parent. The node stays in the arena but is
    /// no longer reachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Attribute lookup on a node.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).attribute(name)
    }

    /// Set an attribute, replacing an existing value in place to preserve
    /// attribute order.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let node = self.node_mut(id);
        if let Some(entry) = node.attributes.iter_mut().find(|(key, _)| key == name) {
            entry.1 = value.into();
        } else {
            node.attributes.push((name.to_string(), value.into()));
        }
    }

    /// Children of a node, in document order.
    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child with the given element name.
    pub fn find_child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.node(child).name == name)
    }

    /// Depth-first traversal of a subtree, including `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            doc: self,
            stack: vec![id],
        }
    }

    /// First element with the given name anywhere under `id`, depth-first.
    pub fn find_descendant(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.descendants(id).find(|&n| self.node(n).name == name)
    }

    /// Copy the subtree rooted at `id` into `target`, returning the new
    /// root of the copy. The copy is detached; callers attach it where
    /// needed.
    pub fn clone_subtree(&self, id: NodeId, target: &mut XmlDocument) -> NodeId {
        let source = self.node(id);
        let copy = target.create_element(source.name.clone());
        target.node_mut(copy).attributes = source.attributes.clone();
        target.node_mut(copy).text = source.text.clone();
        for &child in &source.children {
            let child_copy = self.clone_subtree(child, target);
            target.append_child(copy, child_copy);
        }
        copy
    }
}

/// Depth-first pre-order iterator over a subtree.
pub struct Descendants<'a> {
    doc: &'a XmlDocument,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push in reverse so children come out in document order.
        for &child in self.doc.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}
