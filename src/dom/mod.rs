//! Arena-based DOM.
//!
//! All nodes live in one contiguous vector and link to each other by index.
//! Detached nodes stay in the arena; they are simply unreachable from the
//! document root, which is what "garbage" looks like in a browser before
//! collection.

mod serialize;
mod tree_sink;

use std::cmp::Ordering;
use std::collections::HashMap;

use html5ever::{LocalName, Namespace, QualName, ns};

pub use tree_sink::{DomSink, parse_html};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    fn get(self) -> Option<NodeId> {
        self.is_some().then_some(self)
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Off-tree container; inserting it moves its children instead.
    Fragment,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Pre-extracted id for fast matching.
        id: Option<String>,
        /// Pre-extracted classes for fast matching.
        classes: Vec<String>,
    },
    /// Text content.
    Text(String),
    Comment(String),
    /// Document type declaration.
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Position argument of [`Dom::insert_adjacent_html`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
}

/// Arena-based DOM tree.
#[derive(Debug)]
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
    /// id attribute value to every element that ever carried it.
    /// Entries can go stale; lookups re-check them.
    id_map: HashMap<String, Vec<NodeId>>,
    focused: NodeId,
}

/// Build an HTML-namespace element name.
pub fn html_name(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

/// Build a no-namespace attribute name.
pub fn attr_name(local: &str) -> QualName {
    QualName::new(None, ns!(), LocalName::from(local))
}

impl Dom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
            id_map: HashMap::new(),
            focused: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes ever allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the DOM only has its document root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let mut id = None;
        let mut classes = Vec::new();

        for attr in &attrs {
            if attr.name.local.as_ref() == "id" {
                id = Some(attr.value.clone());
            } else if attr.name.local.as_ref() == "class" {
                classes = split_classes(&attr.value);
            }
        }

        let node_id = self.alloc(Node::new(NodeData::Element {
            name,
            attrs,
            id: id.clone(),
            classes,
        }));

        if let Some(id_str) = id {
            self.id_map.entry(id_str).or_default().push(node_id);
        }

        node_id
    }

    /// Create an HTML element with no attributes.
    pub fn create_html_element(&mut self, local: &str) -> NodeId {
        self.create_element(html_name(&local.to_ascii_lowercase()), Vec::new())
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Text(text.into())))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(Node::new(NodeData::Comment(text.into())))
    }

    /// Create a doctype node.
    pub fn create_doctype(&mut self, name: String, public_id: String, system_id: String) -> NodeId {
        self.alloc(Node::new(NodeData::Doctype {
            name,
            public_id,
            system_id,
        }))
    }

    /// Create an empty detached fragment.
    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(Node::new(NodeData::Fragment))
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    /// Append `child` as the last child of `parent`.
    ///
    /// An attached child is moved. A fragment child contributes its
    /// children instead of itself.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if self.is_fragment(child) {
            for grandchild in self.children(child).collect::<Vec<_>>() {
                self.append(parent, grandchild);
            }
            return;
        }
        if !self.can_insert(parent, child) {
            return;
        }
        self.detach(child);

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `child` as the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        match self.get(parent).and_then(|n| n.first_child.get()) {
            Some(first) => self.insert_before(first, child),
            None => self.append(parent, child),
        }
    }

    /// Insert a node before a sibling. No-op when the sibling is detached.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        if sibling == new_node {
            return;
        }
        if self.is_fragment(new_node) {
            for child in self.children(new_node).collect::<Vec<_>>() {
                self.insert_before(sibling, child);
            }
            return;
        }
        if !self.can_insert(parent, new_node) {
            return;
        }
        self.detach(new_node);

        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Insert a node right after a sibling. No-op when the sibling is detached.
    pub fn insert_after(&mut self, sibling: NodeId, new_node: NodeId) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        match self.get(sibling).and_then(|n| n.next_sibling.get()) {
            Some(next) => self.insert_before(next, new_node),
            None => self.append(parent, new_node),
        }
    }

    /// Replace `old` with `new_node` in place. `old` ends up detached.
    pub fn replace(&mut self, old: NodeId, new_node: NodeId) {
        if old == new_node || self.parent(old).is_none() {
            return;
        }
        self.insert_before(old, new_node);
        self.detach(old);
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };
        if parent.is_none() {
            return;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(target_node) = self.get_mut(target) {
            target_node.parent = NodeId::NONE;
            target_node.prev_sibling = NodeId::NONE;
            target_node.next_sibling = NodeId::NONE;
        }

        if self.focused.is_some() && self.contains(target, self.focused) {
            self.focused = NodeId::NONE;
        }
    }

    /// Detach every child of a node.
    pub fn remove_children(&mut self, parent: NodeId) {
        for child in self.children(parent).collect::<Vec<_>>() {
            self.detach(child);
        }
    }

    /// Append text to the last text child, or create a new text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text);
        self.append(parent, text_node);
    }

    /// Reject inserts that would make a node its own ancestor.
    fn can_insert(&self, parent: NodeId, child: NodeId) -> bool {
        if self.get(parent).is_none() || self.get(child).is_none() {
            return false;
        }
        if self.is_document(child) || self.contains(child, parent) {
            tracing::debug!(?parent, ?child, "refusing hierarchy-violating insert");
            return false;
        }
        true
    }

    // ------------------------------------------------------------------
    // Cloning and import
    // ------------------------------------------------------------------

    /// Deep-clone a subtree. The clone is detached.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let Some(data) = self.get(id).map(|n| n.data.clone()) else {
            return NodeId::NONE;
        };
        let copy = self.alloc_data(data);
        for child in self.children(id).collect::<Vec<_>>() {
            let child_copy = self.deep_clone(child);
            self.append(copy, child_copy);
        }
        copy
    }

    /// Copy a subtree from another DOM into this one. The copy is detached.
    pub fn import(&mut self, source: &Dom, id: NodeId) -> NodeId {
        let Some(node) = source.get(id) else {
            return NodeId::NONE;
        };
        let data = match &node.data {
            // A foreign document root becomes a fragment here.
            NodeData::Document => NodeData::Fragment,
            other => other.clone(),
        };
        let copy = self.alloc_data(data);
        for child in source.children(id) {
            let child_copy = self.import(source, child);
            self.append(copy, child_copy);
        }
        copy
    }

    fn alloc_data(&mut self, data: NodeData) -> NodeId {
        match data {
            NodeData::Element { name, attrs, .. } => self.create_element(name, attrs),
            NodeData::Document => self.create_fragment(),
            other => self.alloc(Node::new(other)),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate over element children of a node.
    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent).filter(|&c| self.is_element(c))
    }

    /// Iterate over all descendants of `root` in document order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        Descendants {
            dom: self,
            root,
            next: self.get(root).map(|n| n.first_child).unwrap_or(NodeId::NONE),
        }
    }

    /// Parent node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.get())
    }

    /// Parent node if it is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Closest following sibling that is an element.
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.next_sibling;
        while current.is_some() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.get(current)?.next_sibling;
        }
        None
    }

    /// Closest preceding sibling that is an element.
    pub fn prev_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.get(id)?.prev_sibling;
        while current.is_some() {
            if self.is_element(current) {
                return Some(current);
            }
            current = self.get(current)?.prev_sibling;
        }
        None
    }

    /// First child that is an element.
    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    /// Whether `ancestor` is `node` or one of its ancestors.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = node;
        while current.is_some() {
            if current == ancestor {
                return true;
            }
            current = match self.get(current) {
                Some(n) => n.parent,
                None => return false,
            };
        }
        false
    }

    /// Whether the node is reachable from the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.contains(self.document, id)
    }

    /// Compare two nodes by document (tree) order.
    ///
    /// Nodes in different trees compare by arena index, which is stable.
    pub fn compare_order(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let path_a = self.path_from_root(a);
        let path_b = self.path_from_root(b);
        if path_a.first() != path_b.first() {
            return a.cmp(&b);
        }

        let common = path_a
            .iter()
            .zip(&path_b)
            .take_while(|(x, y)| x == y)
            .count();

        // One is an ancestor of the other
        if common == path_a.len() {
            return Ordering::Less;
        }
        if common == path_b.len() {
            return Ordering::Greater;
        }

        let (branch_a, branch_b) = (path_a[common], path_b[common]);
        let mut current = self.get(branch_a).map(|n| n.next_sibling);
        while let Some(sib) = current.and_then(NodeId::get) {
            if sib == branch_b {
                return Ordering::Less;
            }
            current = self.get(sib).map(|n| n.next_sibling);
        }
        Ordering::Greater
    }

    fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(node) = self.get(current) {
            path.push(current);
            current = node.parent;
        }
        path.reverse();
        path
    }

    /// Get the first connected element carrying this id, in document order.
    pub fn get_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map
            .get(id)?
            .iter()
            .copied()
            .filter(|&n| self.element_id(n) == Some(id) && self.is_connected(n))
            .min_by(|&a, &b| self.compare_order(a, b))
    }

    /// Find the first node matching a predicate (DFS from the document).
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.descendants(self.document)
            .find(|&id| self.get(id).is_some_and(&predicate))
    }

    /// Find element by tag name (first match).
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.find(|node| match &node.data {
            NodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
    }

    /// Currently focused element.
    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    /// Move focus. `None` clears it.
    pub fn set_focused(&mut self, id: Option<NodeId>) {
        self.focused = id.unwrap_or(NodeId::NONE);
    }

    // ------------------------------------------------------------------
    // HTML parsing into this DOM
    // ------------------------------------------------------------------

    /// Parse markup in `<body>` context into a new detached fragment.
    pub fn parse_fragment(&mut self, html: &str) -> NodeId {
        let (source, body) = tree_sink::parse_body_fragment(html);
        let fragment = self.create_fragment();
        for child in source.children(body) {
            let copy = self.import(&source, child);
            self.append(fragment, copy);
        }
        fragment
    }

    /// Replace the children of a node with parsed markup.
    pub fn set_inner_html(&mut self, id: NodeId, html: &str) {
        if self.get(id).is_none() {
            return;
        }
        self.remove_children(id);
        let fragment = self.parse_fragment(html);
        self.append(id, fragment);
    }

    /// Parse markup and insert it relative to an element.
    pub fn insert_adjacent_html(&mut self, id: NodeId, position: Position, html: &str) {
        let fragment = self.parse_fragment(html);
        match position {
            Position::BeforeBegin => self.insert_before(id, fragment),
            Position::AfterBegin => self.prepend(id, fragment),
            Position::BeforeEnd => self.append(id, fragment),
            Position::AfterEnd => self.insert_after(id, fragment),
        }
    }

    /// Replace the children of a node with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        match self.get_mut(id).map(|n| &mut n.data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => {
                *t = text.to_string();
                return;
            }
            Some(_) => {}
            None => return,
        }
        self.remove_children(id);
        if !text.is_empty() {
            let text_node = self.create_text(text);
            self.append(id, text_node);
        }
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(t)) | Some(NodeData::Comment(t)) => return t.clone(),
            None => return String::new(),
            Some(_) => {}
        }
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(t) = self.text(node) {
                out.push_str(t);
            }
        }
        out
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

fn split_classes(value: &str) -> Vec<String> {
    let mut classes: Vec<String> = Vec::new();
    for class in value.split_ascii_whitespace() {
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }
    classes
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Pre-order iterator over a subtree, excluding its root.
pub struct Descendants<'a> {
    dom: &'a Dom,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.get()?;
        let node = self.dom.get(current)?;

        self.next = if node.first_child.is_some() {
            node.first_child
        } else {
            let mut climb = current;
            loop {
                if climb == self.root {
                    break NodeId::NONE;
                }
                let Some(n) = self.dom.get(climb) else {
                    break NodeId::NONE;
                };
                if n.next_sibling.is_some() {
                    break n.next_sibling;
                }
                climb = n.parent;
                if climb.is_none() || climb == self.root {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

/// Convenience methods for element nodes.
impl Dom {
    /// Get element's local name (tag).
    pub fn element_name(&self, id: NodeId) -> Option<&LocalName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.local),
            _ => None,
        })
    }

    /// Get element's local name as a string slice.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element_name(id).map(|n| n.as_ref())
    }

    /// Get element's namespace.
    pub fn element_namespace(&self, id: NodeId) -> Option<&Namespace> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(&name.ns),
            _ => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    /// Whether the element carries the attribute.
    pub fn has_attr(&self, id: NodeId, attr_name: &str) -> bool {
        self.get_attr(id, attr_name).is_some()
    }

    /// All attributes of an element, empty for other nodes.
    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Set an attribute, keeping the id and class caches in sync.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        {
            let Some(NodeData::Element {
                attrs,
                id: cached_id,
                classes,
                ..
            }) = self.get_mut(id).map(|n| &mut n.data)
            else {
                return;
            };

            match attrs.iter_mut().find(|a| a.name.local.as_ref() == name) {
                Some(attr) => attr.value = value.to_string(),
                None => attrs.push(Attribute {
                    name: attr_name(&name),
                    value: value.to_string(),
                }),
            }

            match name.as_str() {
                "id" => *cached_id = Some(value.to_string()),
                "class" => *classes = split_classes(value),
                _ => return,
            }
        }

        if name == "id" {
            let entry = self.id_map.entry(value.to_string()).or_default();
            if !entry.contains(&id) {
                entry.push(id);
            }
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let Some(NodeData::Element {
            attrs,
            id: cached_id,
            classes,
            ..
        }) = self.get_mut(id).map(|n| &mut n.data)
        else {
            return;
        };

        attrs.retain(|a| !a.name.local.as_ref().eq_ignore_ascii_case(name));
        if name.eq_ignore_ascii_case("id") {
            *cached_id = None;
        } else if name.eq_ignore_ascii_case("class") {
            classes.clear();
        }
    }

    /// Get element's id attribute.
    pub fn element_id(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { id, .. } => id.as_deref(),
            _ => None,
        })
    }

    /// Get element's classes.
    pub fn element_classes(&self, id: NodeId) -> &[String] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { classes, .. } => Some(classes.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Whether the element's class list contains `class`.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element_classes(id).iter().any(|c| c == class)
    }

    /// Rewrite the class attribute from a class list.
    pub fn set_classes(&mut self, id: NodeId, classes: &[String]) {
        self.set_attr(id, "class", &classes.join(" "));
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    /// Check if node is the document root.
    pub fn is_document(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Document))
    }

    /// Check if node is a fragment.
    pub fn is_fragment(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Fragment))
    }

    /// Get text of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_attr(local: &str, value: &str) -> Attribute {
        Attribute {
            name: attr_name(local),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_create_elements() {
        let mut dom = Dom::new();

        let div = dom.create_element(html_name("div"), vec![make_attr("id", "main")]);
        dom.append(dom.document(), div);

        assert_eq!(dom.local_name(div), Some("div"));
        assert_eq!(dom.element_id(div), Some("main"));
        assert_eq!(dom.get_by_id("main"), Some(div));
    }

    #[test]
    fn test_get_by_id_ignores_detached_and_stale() {
        let mut dom = Dom::new();
        let detached = dom.create_element(html_name("p"), vec![make_attr("id", "x")]);
        assert_eq!(dom.get_by_id("x"), None);

        let attached = dom.create_html_element("p");
        dom.append(dom.document(), attached);
        dom.set_attr(attached, "id", "x");
        assert_eq!(dom.get_by_id("x"), Some(attached));

        dom.set_attr(attached, "id", "y");
        assert_eq!(dom.get_by_id("x"), None);
        assert_eq!(dom.get_by_id("y"), Some(attached));
        assert!(!dom.is_connected(detached));
    }

    #[test]
    fn test_append_children() {
        let mut dom = Dom::new();

        let parent = dom.create_html_element("div");
        let child1 = dom.create_html_element("p");
        let child2 = dom.create_html_element("p");

        dom.append(dom.document(), parent);
        dom.append(parent, child1);
        dom.append(parent, child2);

        let children: Vec<_> = dom.children(parent).collect();
        assert_eq!(children, vec![child1, child2]);
    }

    #[test]
    fn test_append_moves_attached_node() {
        let mut dom = Dom::new();
        let a = dom.create_html_element("div");
        let b = dom.create_html_element("div");
        let child = dom.create_html_element("span");
        dom.append(dom.document(), a);
        dom.append(dom.document(), b);
        dom.append(a, child);
        dom.append(b, child);

        assert_eq!(dom.children(a).count(), 0);
        assert_eq!(dom.children(b).collect::<Vec<_>>(), vec![child]);
        assert_eq!(dom.parent(child), Some(b));
    }

    #[test]
    fn test_refuses_cycles() {
        let mut dom = Dom::new();
        let outer = dom.create_html_element("div");
        let inner = dom.create_html_element("div");
        dom.append(outer, inner);
        dom.append(inner, outer);
        assert_eq!(dom.parent(outer), None);
        assert_eq!(dom.parent(inner), Some(outer));
    }

    #[test]
    fn test_fragment_insert_moves_children() {
        let mut dom = Dom::new();
        let body = dom.create_html_element("body");
        dom.append(dom.document(), body);

        let fragment = dom.parse_fragment("<b>1</b><i>2</i>");
        dom.append(body, fragment);

        let names: Vec<_> = dom
            .children(body)
            .filter_map(|c| dom.local_name(c))
            .collect();
        assert_eq!(names, vec!["b", "i"]);
        assert_eq!(dom.children(fragment).count(), 0);
    }

    #[test]
    fn test_text_merging() {
        let mut dom = Dom::new();

        let p = dom.create_html_element("p");
        dom.append(dom.document(), p);

        dom.append_text(p, "Hello, ");
        dom.append_text(p, "World!");

        let children: Vec<_> = dom.children(p).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(dom.text(children[0]), Some("Hello, World!"));
    }

    #[test]
    fn test_descendants_document_order() {
        let dom = parse_html("<div><p><b>x</b></p><span></span></div><em></em>");
        let names: Vec<_> = dom
            .descendants(dom.document())
            .filter_map(|id| dom.local_name(id))
            .collect();
        assert_eq!(names, vec!["html", "head", "body", "div", "p", "b", "span", "em"]);
    }

    #[test]
    fn test_compare_order() {
        let dom = parse_html("<div><p></p></div><span></span>");
        let div = dom.find_by_tag("div").unwrap();
        let p = dom.find_by_tag("p").unwrap();
        let span = dom.find_by_tag("span").unwrap();

        assert_eq!(dom.compare_order(div, p), Ordering::Less);
        assert_eq!(dom.compare_order(p, span), Ordering::Less);
        assert_eq!(dom.compare_order(span, div), Ordering::Greater);
        assert_eq!(dom.compare_order(p, p), Ordering::Equal);
    }

    #[test]
    fn test_deep_clone_is_detached_copy() {
        let mut dom = parse_html(r#"<ul id="list"><li class="a">one</li></ul>"#);
        let ul = dom.get_by_id("list").unwrap();
        let copy = dom.deep_clone(ul);

        assert_ne!(copy, ul);
        assert!(!dom.is_connected(copy));
        assert_eq!(dom.outer_html(copy), dom.outer_html(ul));
        // The original still wins the id lookup
        assert_eq!(dom.get_by_id("list"), Some(ul));
    }

    #[test]
    fn test_set_attr_updates_class_cache() {
        let mut dom = Dom::new();
        let div = dom.create_html_element("div");
        dom.set_attr(div, "class", "a  b a");
        assert_eq!(dom.element_classes(div), ["a", "b"]);
        dom.remove_attr(div, "class");
        assert!(dom.element_classes(div).is_empty());
    }

    #[test]
    fn test_insert_adjacent_html() {
        let mut dom = parse_html(r#"<div id="t"><p>mid</p></div>"#);
        let t = dom.get_by_id("t").unwrap();
        dom.insert_adjacent_html(t, Position::AfterBegin, "<i>first</i>");
        dom.insert_adjacent_html(t, Position::BeforeEnd, "<i>last</i>");
        dom.insert_adjacent_html(t, Position::BeforeBegin, "<hr>");
        dom.insert_adjacent_html(t, Position::AfterEnd, "<br>");

        assert_eq!(dom.inner_html(t), "<i>first</i><p>mid</p><i>last</i>");
        let body = dom.parent(t).unwrap();
        assert_eq!(
            dom.inner_html(body),
            r#"<hr><div id="t"><i>first</i><p>mid</p><i>last</i></div><br>"#
        );
    }

    #[test]
    fn test_text_content() {
        let mut dom = parse_html("<p>Hello <b>bold</b> world</p>");
        let p = dom.find_by_tag("p").unwrap();
        assert_eq!(dom.text_content(p), "Hello bold world");

        dom.set_text_content(p, "<plain>");
        assert_eq!(dom.inner_html(p), "&lt;plain&gt;");
    }
}
