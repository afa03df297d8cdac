//! The [`Selection`] collection and its construction.
//!
//! A selection is an ordered list of host node references, built once and
//! never changed. Traversal returns new selections; mutation changes the
//! referenced nodes but not the membership.

mod animation;
mod class_style;
mod events;
mod mutation;
mod traversal;

use std::collections::HashSet;
use std::fmt;

pub use animation::{AnimationOptions, DEFAULT_DURATION, SlideDirection};
pub use mutation::Content;
pub use traversal::Matcher;

use crate::dom::NodeId;
use crate::selector::{Selector, Shortcut, elements_by_tag, elements_with_class};
use crate::window::{HostNode, Window};

const ORIGIN_NODE: &str = "[node]";
const ORIGIN_NODES: &str = "[nodes]";
const ORIGIN_SELECTION: &str = "[selection]";

/// What a selection can be built from.
#[derive(Debug, Clone, Default)]
pub enum SelectorInput {
    /// Nothing; yields an empty selection.
    #[default]
    None,
    /// A selector, or markup to parse when it looks like a tag.
    Selector(String),
    /// One existing node (or the window).
    Node(HostNode),
    /// Several existing nodes, taken in order.
    Nodes(Vec<HostNode>),
    /// The members of another selection.
    Selection(Selection),
}

impl From<&str> for SelectorInput {
    fn from(s: &str) -> Self {
        SelectorInput::Selector(s.to_string())
    }
}

impl From<String> for SelectorInput {
    fn from(s: String) -> Self {
        SelectorInput::Selector(s)
    }
}

impl From<&String> for SelectorInput {
    fn from(s: &String) -> Self {
        SelectorInput::Selector(s.clone())
    }
}

impl<T: Into<SelectorInput>> From<Option<T>> for SelectorInput {
    fn from(input: Option<T>) -> Self {
        input.map_or(SelectorInput::None, Into::into)
    }
}

impl From<NodeId> for SelectorInput {
    fn from(id: NodeId) -> Self {
        SelectorInput::Node(HostNode::Node(id))
    }
}

impl From<HostNode> for SelectorInput {
    fn from(node: HostNode) -> Self {
        SelectorInput::Node(node)
    }
}

impl From<Vec<HostNode>> for SelectorInput {
    fn from(nodes: Vec<HostNode>) -> Self {
        SelectorInput::Nodes(nodes)
    }
}

impl From<Vec<NodeId>> for SelectorInput {
    fn from(ids: Vec<NodeId>) -> Self {
        SelectorInput::Nodes(ids.into_iter().map(HostNode::Node).collect())
    }
}

impl From<&[NodeId]> for SelectorInput {
    fn from(ids: &[NodeId]) -> Self {
        SelectorInput::Nodes(ids.iter().copied().map(HostNode::Node).collect())
    }
}

impl From<Selection> for SelectorInput {
    fn from(selection: Selection) -> Self {
        SelectorInput::Selection(selection)
    }
}

impl From<&Selection> for SelectorInput {
    fn from(selection: &Selection) -> Self {
        SelectorInput::Selection(selection.clone())
    }
}

/// An ordered, immutable set of node references.
#[derive(Clone)]
pub struct Selection {
    nodes: Vec<HostNode>,
    origin: String,
    window: Option<Window>,
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selection")
            .field("origin", &self.origin)
            .field("nodes", &self.nodes)
            .field("bound", &self.window.is_some())
            .finish()
    }
}

impl Selection {
    /// An empty selection with no window.
    pub fn none() -> Self {
        Self {
            nodes: Vec::new(),
            origin: String::new(),
            window: None,
        }
    }

    /// Build a selection. Without a window the result is always empty.
    pub fn from_input(input: impl Into<SelectorInput>, window: Option<&Window>) -> Self {
        let Some(window) = window else {
            return Self::none();
        };

        let (nodes, origin) = match input.into() {
            SelectorInput::None => (Vec::new(), String::new()),
            SelectorInput::Selector(selector) => {
                let nodes = resolve_selector(window, &selector);
                (nodes, selector)
            }
            SelectorInput::Node(node) => (vec![node], ORIGIN_NODE.to_string()),
            SelectorInput::Nodes(nodes) => (nodes, ORIGIN_NODES.to_string()),
            SelectorInput::Selection(selection) => {
                let nodes = adopt(window, selection);
                (nodes, ORIGIN_SELECTION.to_string())
            }
        };

        Self {
            nodes,
            origin,
            window: Some(window.clone()),
        }
    }

    /// A selection over the same window.
    pub(crate) fn derive(&self, nodes: Vec<HostNode>) -> Self {
        Self {
            nodes,
            origin: ORIGIN_NODES.to_string(),
            window: self.window.clone(),
        }
    }

    pub(crate) fn derive_ids(&self, ids: Vec<NodeId>) -> Self {
        self.derive(ids.into_iter().map(HostNode::Node).collect())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Member at a zero-based index.
    pub fn get(&self, index: usize) -> Option<HostNode> {
        self.nodes.get(index).copied()
    }

    pub fn nodes(&self) -> &[HostNode] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HostNode> {
        self.nodes.iter()
    }

    /// The DOM node ids of the members, skipping the window.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.iter().filter_map(|n| n.node_id()).collect()
    }

    /// The selector text this was built from, or a placeholder.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The window whose document this selection lives in.
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Members that are elements, in order.
    pub(crate) fn elements(&self) -> Vec<NodeId> {
        let Some(window) = &self.window else {
            return Vec::new();
        };
        let dom = window.dom();
        self.nodes
            .iter()
            .filter_map(|n| n.node_id())
            .filter(|&id| dom.is_element(id))
            .collect()
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::none()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a HostNode;
    type IntoIter = std::slice::Iter<'a, HostNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

fn resolve_selector(window: &Window, selector: &str) -> Vec<HostNode> {
    let ids = match Shortcut::classify(selector) {
        Shortcut::Html => {
            let mut dom = window.dom_mut();
            let fragment = dom.parse_fragment(selector.trim());
            dom.element_children(fragment).collect()
        }
        Shortcut::Id(id) => window.dom().get_by_id(id).into_iter().collect(),
        Shortcut::Class(class) => elements_with_class(&window.dom(), class),
        Shortcut::Tag(tag) => elements_by_tag(&window.dom(), tag),
        Shortcut::General => match Selector::parse_or_warn(selector) {
            Some(parsed) => {
                let dom = window.dom();
                parsed.query_all(&dom, dom.document())
            }
            None => Vec::new(),
        },
    };
    ids.into_iter().map(HostNode::Node).collect()
}

/// Members of a selection, imported if it belongs to another window.
fn adopt(window: &Window, selection: Selection) -> Vec<HostNode> {
    match &selection.window {
        Some(source) if !source.ptr_eq(window) => {
            import_nodes(source, window, &selection.nodes)
        }
        _ => selection.nodes,
    }
}

/// Copy nodes from one window into another. The originals stay put.
pub(crate) fn import_nodes(source: &Window, target: &Window, nodes: &[HostNode]) -> Vec<HostNode> {
    let source_dom = source.dom();
    let mut target_dom = target.dom_mut();
    nodes
        .iter()
        .map(|node| match node {
            HostNode::Node(id) => HostNode::Node(target_dom.import(&source_dom, *id)),
            HostNode::Window => HostNode::Window,
        })
        .collect()
}

/// Order-preserving identity dedup.
pub(crate) fn dedupe(nodes: impl IntoIterator<Item = NodeId>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    nodes.into_iter().filter(|id| seen.insert(*id)).collect()
}
