//! Inserting, moving, cloning and removing nodes.
//!
//! Node content is batched into one detached fragment. With several targets
//! every target but the last gets a deep clone of the batch; the last one
//! gets the original nodes.

use super::{Selection, SelectorInput, dedupe, import_nodes};
use crate::dom::{Dom, NodeId, Position};
use crate::window::Window;

/// Content accepted by the insertion methods.
#[derive(Debug, Clone)]
pub enum Content {
    /// Markup, parsed separately for every target.
    Html(String),
    /// An existing node of the receiver's document.
    Node(NodeId),
    /// The members of a selection, possibly from another window.
    Nodes(Selection),
}

impl From<&str> for Content {
    fn from(html: &str) -> Self {
        Content::Html(html.to_string())
    }
}

impl From<String> for Content {
    fn from(html: String) -> Self {
        Content::Html(html)
    }
}

impl From<NodeId> for Content {
    fn from(id: NodeId) -> Self {
        Content::Node(id)
    }
}

impl From<Selection> for Content {
    fn from(selection: Selection) -> Self {
        Content::Nodes(selection)
    }
}

impl From<&Selection> for Content {
    fn from(selection: &Selection) -> Self {
        Content::Nodes(selection.clone())
    }
}

/// Where content goes relative to a target.
#[derive(Debug, Clone, Copy)]
enum Placement {
    Append,
    Prepend,
    Before,
    After,
}

impl Placement {
    fn position(self) -> Position {
        match self {
            Placement::Append => Position::BeforeEnd,
            Placement::Prepend => Position::AfterBegin,
            Placement::Before => Position::BeforeBegin,
            Placement::After => Position::AfterEnd,
        }
    }

    fn place(self, dom: &mut Dom, target: NodeId, node: NodeId) {
        match self {
            Placement::Append => dom.append(target, node),
            Placement::Prepend => dom.prepend(target, node),
            Placement::Before => dom.insert_before(target, node),
            Placement::After => dom.insert_after(target, node),
        }
    }
}

impl Selection {
    /// Insert content as the last child of every element.
    pub fn append(&self, content: impl Into<Content>) -> &Self {
        self.insert(content.into(), Placement::Append)
    }

    /// Insert content as the first child of every element.
    pub fn prepend(&self, content: impl Into<Content>) -> &Self {
        self.insert(content.into(), Placement::Prepend)
    }

    /// Insert content before every element.
    pub fn before(&self, content: impl Into<Content>) -> &Self {
        self.insert(content.into(), Placement::Before)
    }

    /// Insert content after every element.
    pub fn after(&self, content: impl Into<Content>) -> &Self {
        self.insert(content.into(), Placement::After)
    }

    fn insert(&self, content: Content, placement: Placement) -> &Self {
        let Some(window) = self.window() else {
            return self;
        };
        let targets = self.elements();
        if targets.is_empty() {
            return self;
        }

        let fragment = match content {
            Content::Html(html) => {
                let mut dom = window.dom_mut();
                for target in targets {
                    dom.insert_adjacent_html(target, placement.position(), &html);
                }
                return self;
            }
            Content::Node(id) => {
                let mut dom = window.dom_mut();
                let fragment = dom.create_fragment();
                if !encloses_target(&dom, id, &targets) {
                    dom.append(fragment, id);
                }
                fragment
            }
            Content::Nodes(selection) => batch(window, &selection, &targets),
        };

        distribute(&mut window.dom_mut(), &targets, fragment, placement);
        self
    }

    /// Insert content before every element, then remove the element.
    pub fn replace_with(&self, content: impl Into<Content>) -> &Self {
        self.before(content).remove()
    }

    /// Detach every element from its parent.
    pub fn remove(&self) -> &Self {
        self.each_mut(|dom, id| dom.detach(id))
    }

    /// Remove the children of every element.
    pub fn empty(&self) -> &Self {
        self.each_mut(|dom, id| dom.remove_children(id))
    }

    /// Swap every element for a deep copy and select the copies.
    ///
    /// Listeners stay with the originals.
    pub fn replace_with_clone(&self) -> Selection {
        let mut clones = Vec::new();
        self.each_mut(|dom, id| {
            let copy = dom.deep_clone(id);
            dom.replace(id, copy);
            clones.push(copy);
        });
        self.derive_ids(clones)
    }

    /// Detached deep copies of every element.
    pub fn clone_nodes(&self) -> Selection {
        let mut clones = Vec::new();
        self.each_mut(|dom, id| clones.push(dom.deep_clone(id)));
        self.derive_ids(clones)
    }

    /// Move the elements to the end of each target.
    pub fn append_to(&self, target: impl Into<SelectorInput>) -> &Self {
        self.relocate(target.into(), Placement::Append)
    }

    /// Move the elements to the start of each target.
    pub fn prepend_to(&self, target: impl Into<SelectorInput>) -> &Self {
        self.relocate(target.into(), Placement::Prepend)
    }

    /// Move the elements in front of each target.
    pub fn insert_before(&self, target: impl Into<SelectorInput>) -> &Self {
        self.relocate(target.into(), Placement::Before)
    }

    /// Move the elements after each target.
    pub fn insert_after(&self, target: impl Into<SelectorInput>) -> &Self {
        self.relocate(target.into(), Placement::After)
    }

    fn relocate(&self, target: SelectorInput, placement: Placement) -> &Self {
        let Some(window) = self.window() else {
            return self;
        };
        let moving = self.node_ids();
        let targets: Vec<_> = Selection::from_input(target, Some(window))
            .elements()
            .into_iter()
            .filter(|id| !moving.contains(id))
            .collect();
        if targets.is_empty() {
            return self;
        }
        let fragment = batch(window, self, &targets);
        distribute(&mut window.dom_mut(), &targets, fragment, placement);
        self
    }

    /// Wrap every element in its own copy of `html`'s first element.
    ///
    /// The element ends up inside the wrapper's innermost first element.
    pub fn wrap(&self, html: &str) -> &Self {
        self.each_mut(|dom, id| {
            let fragment = dom.parse_fragment(html);
            let Some(wrapper) = dom.first_element_child(fragment) else {
                return;
            };
            dom.insert_before(id, wrapper);
            let mut innermost = wrapper;
            while let Some(child) = dom.first_element_child(innermost) {
                innermost = child;
            }
            dom.append(innermost, id);
        })
    }

    /// Replace each distinct parent with its own children.
    ///
    /// `body`, `html` and the document are never removed.
    pub fn unwrap(&self) -> &Self {
        let Some(window) = self.window() else {
            return self;
        };
        let elements = self.elements();
        let mut dom = window.dom_mut();
        let parents = dedupe(elements.iter().filter_map(|&id| dom.parent_element(id)));
        for parent in parents {
            if matches!(dom.local_name(parent), Some("body" | "html")) {
                continue;
            }
            let fragment = dom.create_fragment();
            for child in dom.children(parent).collect::<Vec<_>>() {
                dom.append(fragment, child);
            }
            dom.replace(parent, fragment);
        }
        drop(dom);
        self
    }
}

/// Move a selection's nodes into one fragment of `window`'s document.
///
/// Nodes from another window are imported and detached from their source.
/// Nodes that contain one of the targets are left where they are.
fn batch(window: &Window, selection: &Selection, targets: &[NodeId]) -> NodeId {
    let nodes = match selection.window() {
        Some(source) if !source.ptr_eq(window) => {
            let copies = import_nodes(source, window, selection.nodes());
            let mut source_dom = source.dom_mut();
            for id in selection.node_ids() {
                source_dom.detach(id);
            }
            copies
        }
        _ => selection.nodes().to_vec(),
    };
    let mut dom = window.dom_mut();
    let fragment = dom.create_fragment();
    for id in nodes.into_iter().filter_map(|n| n.node_id()) {
        if (dom.is_element(id) || dom.is_text(id)) && !encloses_target(&dom, id, targets) {
            dom.append(fragment, id);
        }
    }
    fragment
}

/// Whether `node` is one of `targets` or an ancestor of one.
fn encloses_target(dom: &Dom, node: NodeId, targets: &[NodeId]) -> bool {
    let encloses = targets.iter().any(|&target| dom.contains(node, target));
    if encloses {
        tracing::debug!(?node, "skipping content that encloses an insertion target");
    }
    encloses
}

/// Place a fragment at every target, cloning it for all but the last.
fn distribute(dom: &mut Dom, targets: &[NodeId], fragment: NodeId, placement: Placement) {
    let last = targets.len().saturating_sub(1);
    for (index, &target) in targets.iter().enumerate() {
        let piece = if index == last {
            fragment
        } else {
            dom.deep_clone(fragment)
        };
        placement.place(dom, target, piece);
    }
}

#[cfg(test)]
mod tests {
    use crate::selection::Selection;
    use crate::window::Window;

    fn select(window: &Window, selector: &str) -> Selection {
        Selection::from_input(selector, Some(window))
    }

    fn body_html(window: &Window) -> String {
        let body = window.body().unwrap();
        window.dom().inner_html(body)
    }

    #[test]
    fn test_append_html_to_each_target() {
        let window = Window::from_html(r#"<div class="c"></div><div class="c"></div>"#);
        let boxes = select(&window, ".c");
        boxes.append("<span>x</span>");

        let spans = select(&window, "span");
        assert_eq!(spans.len(), 2);
        assert_ne!(spans.get(0), spans.get(1));
        assert_eq!(boxes.children(None).len(), 2);
        assert_eq!(spans.text(), "xx");
    }

    #[test]
    fn test_positions() {
        let window = Window::from_html(r#"<p id="p">mid</p>"#);
        let p = select(&window, "#p");
        p.prepend("<i>a</i>")
            .append("<b>z</b>")
            .before("<hr>")
            .after("<br>");
        assert_eq!(body_html(&window), r#"<hr><p id="p"><i>a</i>mid<b>z</b></p><br>"#);
    }

    #[test]
    fn test_node_content_clones_for_all_but_last() {
        let window = Window::from_html(
            r#"<div id="a"></div><div id="b"></div><em id="e">e</em>"#,
        );
        let em = window.dom().get_by_id("e").unwrap();
        select(&window, "div").append(em);

        let dom = window.dom();
        let a = dom.get_by_id("a").unwrap();
        let b = dom.get_by_id("b").unwrap();
        assert_eq!(dom.parent(em), Some(b), "the last target gets the original");
        let copy = dom.first_element_child(a).unwrap();
        assert_ne!(copy, em);
        assert_eq!(dom.text_content(copy), "e");
    }

    #[test]
    fn test_selection_content_from_other_window_is_imported() {
        let source = Window::from_html(r#"<p class="m">1</p><p class="m">2</p>"#);
        let target = Window::from_html(r#"<div id="d"></div>"#);
        let moving = select(&source, ".m");

        select(&target, "#d").append(&moving);
        assert_eq!(select(&target, "#d").text(), "12");
        assert!(select(&source, ".m").is_empty());
    }

    #[test]
    fn test_remove_and_empty() {
        let window = Window::from_html(r#"<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>"#);
        select(&window, "ol").empty();
        assert_eq!(select(&window, "ol").html().as_deref(), Some(""));
        select(&window, "li").remove();
        assert!(select(&window, "li").is_empty());
    }

    #[test]
    fn test_clones() {
        let window = Window::from_html(r#"<p class="x">a</p>"#);
        let p = select(&window, "p");

        let copies = p.clone_nodes();
        assert_eq!(copies.len(), 1);
        assert!(!window.dom().is_connected(copies.node_ids()[0]));

        let swapped = p.replace_with_clone();
        assert_ne!(swapped.get(0), p.get(0));
        assert!(!window.dom().is_connected(p.node_ids()[0]));
        assert_eq!(select(&window, "p").nodes(), swapped.nodes());
    }

    #[test]
    fn test_relocation() {
        let window = Window::from_html(
            r#"<div id="t1"></div><div id="t2"></div><span id="s">s</span>"#,
        );
        select(&window, "#s").append_to(".nope").append_to("div");
        assert_eq!(select(&window, "#t1").text(), "s");
        assert_eq!(select(&window, "#t2").html().as_deref(), Some(r#"<span id="s">s</span>"#));

        select(&window, "#t2").insert_before("#t1");
        assert_eq!(
            select(&window, "div").node_ids(),
            vec![
                window.dom().get_by_id("t2").unwrap(),
                window.dom().get_by_id("t1").unwrap()
            ]
        );
    }

    #[test]
    fn test_prepend_to_and_insert_after() {
        let window = Window::from_html(
            r#"<ul id="l"><li>b</li></ul><p id="a">a</p><p id="z">z</p>"#,
        );
        select(&window, "#a").prepend_to("#l");
        assert_eq!(select(&window, "#l").text(), "ab");

        select(&window, "#z").insert_after("#l");
        assert_eq!(
            body_html(&window),
            r#"<ul id="l"><p id="a">a</p><li>b</li></ul><p id="z">z</p>"#
        );

        select(&window, "li").insert_after("p");
        assert_eq!(select(&window, "li").len(), 2, "one copy per extra target");
        assert_eq!(select(&window, "#z + li").text(), "b");
    }

    #[test]
    fn test_content_enclosing_the_target_stays_put() {
        let html = r#"<div id="outer"><p id="inner">x</p></div><span id="keep"></span>"#;
        let window = Window::from_html(html);
        let outer = window.dom().get_by_id("outer").unwrap();

        select(&window, "#inner").append(outer);
        assert_eq!(body_html(&window), html);

        select(&window, "#inner").prepend(&select(&window, "div"));
        select(&window, "#outer").append_to("#inner");
        select(&window, "#outer").insert_before("#inner");
        assert_eq!(body_html(&window), html);
    }

    #[test]
    fn test_relocating_onto_itself_keeps_identity() {
        let window = Window::from_html(r#"<div id="t1"></div><div id="t2">two</div>"#);
        let t2 = select(&window, "#t2");
        let original = t2.node_ids()[0];

        t2.insert_before("div");
        assert_eq!(body_html(&window), r#"<div id="t2">two</div><div id="t1"></div>"#);
        assert_eq!(window.dom().get_by_id("t2"), Some(original));
        assert!(window.dom().is_connected(original));
    }

    #[test]
    fn test_wrap_and_unwrap() {
        let window = Window::from_html(r#"<p>a</p><p>b</p>"#);
        select(&window, "p").wrap(r#"<div class="w"><section></section></div>"#);
        assert_eq!(
            body_html(&window),
            r#"<div class="w"><section><p>a</p></section></div><div class="w"><section><p>b</p></section></div>"#
        );

        select(&window, "p").unwrap();
        assert_eq!(
            body_html(&window),
            r#"<div class="w"><p>a</p></div><div class="w"><p>b</p></div>"#
        );

        select(&window, "div").unwrap();
        assert_eq!(select(&window, "div").len(), 2, "body is never unwrapped");
    }

    #[test]
    fn test_replace_with() {
        let window = Window::from_html(r#"<p>a</p>"#);
        select(&window, "p").replace_with("<h1>t</h1>");
        assert_eq!(body_html(&window), "<h1>t</h1>");
    }
}
