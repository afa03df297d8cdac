//! Tree traversal and filtering. Every operation returns a new selection.

use std::fmt;
use std::rc::Rc;

use super::{Selection, dedupe};
use crate::dom::{Dom, NodeId};
use crate::selector::Selector;
use crate::window::HostNode;

/// What `filter_by` and `not` test members against.
#[derive(Clone)]
pub enum Matcher {
    /// A selector; only element members can match.
    Selector(String),
    /// A predicate over the member index and node.
    Predicate(Rc<dyn Fn(usize, &HostNode) -> bool>),
}

impl Matcher {
    pub fn predicate(f: impl Fn(usize, &HostNode) -> bool + 'static) -> Self {
        Matcher::Predicate(Rc::new(f))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Selector(s) => f.debug_tuple("Selector").field(s).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Matcher::Selector(s.to_string())
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Matcher::Selector(s)
    }
}

/// An optional selector filter. A filter that fails to parse matches nothing.
enum Filter {
    Any,
    Selector(Selector),
    Nothing,
}

impl Filter {
    fn new(filter: Option<&str>) -> Self {
        match filter {
            None => Filter::Any,
            Some(source) => Self::required(source),
        }
    }

    fn required(source: &str) -> Self {
        match Selector::parse_or_warn(source) {
            Some(selector) => Filter::Selector(selector),
            None => Filter::Nothing,
        }
    }

    fn accepts(&self, dom: &Dom, id: NodeId) -> bool {
        match self {
            Filter::Any => true,
            Filter::Selector(selector) => selector.matches(dom, id),
            Filter::Nothing => false,
        }
    }
}

impl Selection {
    /// Run `f` for each element member and collect what it yields.
    fn gather<I>(&self, unique: bool, mut f: impl FnMut(&Dom, NodeId) -> I) -> Selection
    where
        I: IntoIterator<Item = NodeId>,
    {
        let Some(window) = self.window() else {
            return self.derive(Vec::new());
        };
        let elements = self.elements();
        let found: Vec<NodeId> = {
            let dom = window.dom();
            elements.into_iter().flat_map(|id| f(&dom, id)).collect()
        };
        if unique {
            self.derive_ids(dedupe(found))
        } else {
            self.derive_ids(found)
        }
    }

    /// Parent element of each member.
    pub fn parent(&self) -> Selection {
        self.gather(true, |dom, id| dom.parent_element(id))
    }

    /// Element children of each member, optionally filtered.
    pub fn children(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(false, |dom, id| {
            dom.element_children(id)
                .filter(|&c| filter.accepts(dom, c))
                .collect::<Vec<_>>()
        })
    }

    /// Matching descendants of each element member or the document.
    pub fn find(&self, selector: &str) -> Selection {
        let Some(window) = self.window() else {
            return self.derive(Vec::new());
        };
        let Some(selector) = Selector::parse_or_warn(selector) else {
            return self.derive(Vec::new());
        };
        let found: Vec<NodeId> = {
            let dom = window.dom();
            self.node_ids()
                .into_iter()
                .filter(|&id| dom.is_element(id) || dom.is_document(id))
                .flat_map(|id| selector.query_all(&dom, id))
                .collect()
        };
        self.derive_ids(dedupe(found))
    }

    /// Every descendant element.
    pub fn find_all(&self) -> Selection {
        self.find("*")
    }

    /// Every ancestor element, optionally filtered.
    pub fn parents(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            ancestors(dom, id)
                .filter(|&a| filter.accepts(dom, a))
                .collect::<Vec<_>>()
        })
    }

    /// Ancestors up to, not including, the first one matching `stop`.
    pub fn parents_until(&self, stop: &str, filter: Option<&str>) -> Selection {
        let stop = Filter::required(stop);
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            ancestors(dom, id)
                .take_while(|&a| !stop.accepts(dom, a))
                .filter(|&a| filter.accepts(dom, a))
                .collect::<Vec<_>>()
        })
    }

    /// Descendant elements, not entering subtrees rooted at a `stop` match.
    pub fn find_until(&self, stop: &str, filter: Option<&str>) -> Selection {
        let stop = Filter::required(stop);
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            let mut out = Vec::new();
            descend_until(dom, id, &stop, &filter, &mut out);
            out
        })
    }

    /// The next element sibling of each member, if it passes the filter.
    pub fn next(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            dom.next_element_sibling(id)
                .filter(|&s| filter.accepts(dom, s))
        })
    }

    /// Alias of [`Selection::next`].
    pub fn sibling(&self, filter: Option<&str>) -> Selection {
        self.next(filter)
    }

    /// Alias of [`Selection::next`].
    pub fn next_sibling(&self, filter: Option<&str>) -> Selection {
        self.next(filter)
    }

    /// The previous element sibling of each member, if it passes the filter.
    pub fn prev(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            dom.prev_element_sibling(id)
                .filter(|&s| filter.accepts(dom, s))
        })
    }

    /// Alias of [`Selection::prev`].
    pub fn prev_sibling(&self, filter: Option<&str>) -> Selection {
        self.prev(filter)
    }

    pub fn next_all(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            following(dom, id)
                .filter(|&s| filter.accepts(dom, s))
                .collect::<Vec<_>>()
        })
    }

    pub fn prev_all(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            preceding(dom, id)
                .filter(|&s| filter.accepts(dom, s))
                .collect::<Vec<_>>()
        })
    }

    /// Other element children of each member's parent.
    pub fn siblings(&self, filter: Option<&str>) -> Selection {
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            let Some(parent) = dom.parent(id) else {
                return Vec::new();
            };
            dom.element_children(parent)
                .filter(|&s| s != id && filter.accepts(dom, s))
                .collect()
        })
    }

    pub fn next_until(&self, stop: &str, filter: Option<&str>) -> Selection {
        let stop = Filter::required(stop);
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            following(dom, id)
                .take_while(|&s| !stop.accepts(dom, s))
                .filter(|&s| filter.accepts(dom, s))
                .collect::<Vec<_>>()
        })
    }

    pub fn prev_until(&self, stop: &str, filter: Option<&str>) -> Selection {
        let stop = Filter::required(stop);
        let filter = Filter::new(filter);
        self.gather(true, |dom, id| {
            preceding(dom, id)
                .take_while(|&s| !stop.accepts(dom, s))
                .filter(|&s| filter.accepts(dom, s))
                .collect::<Vec<_>>()
        })
    }

    /// Nearest inclusive ancestor of each member matching `selector`.
    pub fn closest(&self, selector: &str) -> Selection {
        let Some(selector) = Selector::parse_or_warn(selector) else {
            return self.derive(Vec::new());
        };
        self.gather(true, |dom, id| selector.closest(dom, id))
    }

    /// The member at `index`; negative indices count from the end.
    pub fn eq(&self, index: isize) -> Selection {
        let len = self.len() as isize;
        let index = if index < 0 { len + index } else { index };
        let picked = usize::try_from(index)
            .ok()
            .and_then(|i| self.get(i))
            .into_iter()
            .collect();
        self.derive(picked)
    }

    pub fn first(&self) -> Selection {
        self.eq(0)
    }

    pub fn last(&self) -> Selection {
        self.eq(-1)
    }

    /// Keep the members that match.
    pub fn filter_by(&self, matcher: impl Into<Matcher>) -> Selection {
        self.partition(matcher.into(), true)
    }

    /// Drop the members that match.
    pub fn not(&self, matcher: impl Into<Matcher>) -> Selection {
        self.partition(matcher.into(), false)
    }

    fn partition(&self, matcher: Matcher, keep: bool) -> Selection {
        let kept = match matcher {
            Matcher::Predicate(predicate) => self
                .iter()
                .enumerate()
                .filter(|(i, node)| predicate(*i, *node) == keep)
                .map(|(_, node)| *node)
                .collect(),
            Matcher::Selector(source) => {
                let filter = Filter::required(&source);
                match self.window() {
                    Some(window) => {
                        let dom = window.dom();
                        self.iter()
                            .copied()
                            .filter(|node| {
                                let hit = node.node_id().is_some_and(|id| filter.accepts(&dom, id));
                                hit == keep
                            })
                            .collect()
                    }
                    None => Vec::new(),
                }
            }
        };
        self.derive(kept)
    }
}

fn ancestors(dom: &Dom, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(dom.parent_element(id), move |&p| dom.parent_element(p))
}

fn following(dom: &Dom, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(dom.next_element_sibling(id), move |&s| {
        dom.next_element_sibling(s)
    })
}

fn preceding(dom: &Dom, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    std::iter::successors(dom.prev_element_sibling(id), move |&s| {
        dom.prev_element_sibling(s)
    })
}

fn descend_until(dom: &Dom, id: NodeId, stop: &Filter, filter: &Filter, out: &mut Vec<NodeId>) {
    for child in dom.element_children(id) {
        if stop.accepts(dom, child) {
            continue;
        }
        if filter.accepts(dom, child) {
            out.push(child);
        }
        descend_until(dom, child, stop, filter, out);
    }
}
