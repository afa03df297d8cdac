//! CSS selector parsing and matching against the arena DOM.
//!
//! Matching is delegated to the `selectors` crate through the [`ElementRef`]
//! binding. On top of that sit the id, class and tag shortcuts that
//! construction uses before falling back to general matching.

mod element_ref;

use std::fmt;

use cssparser::{Parser as CssParser, ParserInput};
use html5ever::ns;
use selectors::context::{MatchingContext, QuirksMode, SelectorCaches};
use selectors::matching::{
    MatchingForInvalidation, MatchingMode, NeedsSelectorFlags, matches_selector,
};
use selectors::parser::{ParseRelative, SelectorList};

pub use element_ref::{DomSelectors, ElementRef};

use crate::dom::{Dom, NodeId};
use crate::error::{Error, Result};

/// A parsed selector list.
#[derive(Clone)]
pub struct Selector {
    source: String,
    list: SelectorList<DomSelectors>,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl Selector {
    /// Parse a selector list such as `"div.note > p, #main"`.
    pub fn parse(source: &str) -> Result<Self> {
        let mut input = ParserInput::new(source);
        let mut parser = CssParser::new(&mut input);
        let list = SelectorList::parse(&DomSelectors, &mut parser, ParseRelative::No)
            .map_err(|e| Error::InvalidSelector(format!("{source}: {:?}", e.kind)))?;
        parser
            .expect_exhausted()
            .map_err(|e| Error::InvalidSelector(format!("{source}: {:?}", e.kind)))?;

        Ok(Self {
            source: source.to_string(),
            list,
        })
    }

    /// Parse, logging and discarding an invalid selector.
    pub fn parse_or_warn(source: &str) -> Option<Self> {
        match Self::parse(source) {
            Ok(selector) => Some(selector),
            Err(e) => {
                tracing::warn!(selector = source, "invalid selector: {e}");
                None
            }
        }
    }

    /// The text this selector was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Whether an element matches. Non-element nodes never match.
    pub fn matches(&self, dom: &Dom, id: NodeId) -> bool {
        if !dom.is_element(id) {
            return false;
        }
        let mut caches = SelectorCaches::default();
        let mut context = new_context(&mut caches);
        self.matches_in(&ElementRef::new(dom, id), &mut context)
    }

    fn matches_in(
        &self,
        elem: &ElementRef<'_>,
        context: &mut MatchingContext<'_, DomSelectors>,
    ) -> bool {
        self.list
            .slice()
            .iter()
            .any(|selector| matches_selector(selector, 0, None, elem, context))
    }

    /// All matching descendants of `root` in document order.
    pub fn query_all(&self, dom: &Dom, root: NodeId) -> Vec<NodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = new_context(&mut caches);
        dom.descendants(root)
            .filter(|&id| {
                dom.is_element(id) && self.matches_in(&ElementRef::new(dom, id), &mut context)
            })
            .collect()
    }

    /// First matching descendant of `root`.
    pub fn query_first(&self, dom: &Dom, root: NodeId) -> Option<NodeId> {
        let mut caches = SelectorCaches::default();
        let mut context = new_context(&mut caches);
        dom.descendants(root).find(|&id| {
            dom.is_element(id) && self.matches_in(&ElementRef::new(dom, id), &mut context)
        })
    }

    /// Nearest inclusive ancestor element that matches.
    pub fn closest(&self, dom: &Dom, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id).filter(|&n| dom.is_element(n));
        while let Some(node) = current {
            if self.matches(dom, node) {
                return Some(node);
            }
            current = dom.parent_element(node);
        }
        None
    }
}

fn new_context(caches: &mut SelectorCaches) -> MatchingContext<'_, DomSelectors> {
    MatchingContext::new(
        MatchingMode::Normal,
        None,
        caches,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        MatchingForInvalidation::No,
    )
}

/// How a selector string is resolved during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut<'a> {
    /// Markup to parse into new nodes.
    Html,
    /// `#name`
    Id(&'a str),
    /// `.name`
    Class(&'a str),
    /// A bare tag name.
    Tag(&'a str),
    /// Anything else goes through [`Selector`].
    General,
}

impl<'a> Shortcut<'a> {
    /// Classify a selector string.
    ///
    /// The id and class shortcuts only accept plain identifiers, so every
    /// shortcut resolves to exactly what the general matcher would.
    pub fn classify(input: &'a str) -> Self {
        let trimmed = input.trim();
        if trimmed.starts_with('<') && trimmed.ends_with('>') {
            return Shortcut::Html;
        }
        if let Some(rest) = input.strip_prefix('#')
            && is_plain_ident(rest)
        {
            return Shortcut::Id(rest);
        }
        if let Some(rest) = input.strip_prefix('.')
            && is_plain_ident(rest)
        {
            return Shortcut::Class(rest);
        }
        if is_tag_name(input) {
            return Shortcut::Tag(input);
        }
        Shortcut::General
    }
}

/// A CSS identifier without escapes.
fn is_plain_ident(s: &str) -> bool {
    let mut chars = s.chars();
    let first_ok = match chars.next() {
        Some('-') => matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_' || c == '-'),
        Some(c) => c.is_alphabetic() || c == '_' || !c.is_ascii(),
        None => false,
    };
    first_ok
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii())
}

fn is_tag_name(s: &str) -> bool {
    s.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Connected elements whose class list contains `class`, in document order.
pub fn elements_with_class(dom: &Dom, class: &str) -> Vec<NodeId> {
    dom.descendants(dom.document())
        .filter(|&id| dom.has_class(id, class))
        .collect()
}

/// Connected elements with the given local name, in document order.
///
/// HTML elements compare case-insensitively, foreign (SVG, MathML)
/// elements exactly.
pub fn elements_by_tag(dom: &Dom, tag: &str) -> Vec<NodeId> {
    let lower = tag.to_ascii_lowercase();
    dom.descendants(dom.document())
        .filter(|&id| match dom.local_name(id) {
            Some(name) if dom.element_namespace(id) == Some(&ns!(html)) => name == lower,
            Some(name) => name == tag,
            None => false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    const PAGE: &str = r#"
        <div id="main" class="box">
            <p class="note">one</p>
            <p>two <a href="/x">link</a></p>
            <ul><li class="note item">a</li><li>b</li></ul>
            <input type="checkbox" checked>
            <button disabled>go</button>
        </div>
    "#;

    fn names(dom: &Dom, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .filter_map(|&id| dom.local_name(id).map(str::to_string))
            .collect()
    }

    #[test]
    fn test_query_all_document_order() {
        let dom = parse_html(PAGE);
        let sel = Selector::parse(".note").unwrap();
        let found = sel.query_all(&dom, dom.document());
        assert_eq!(names(&dom, &found), vec!["p", "li"]);
    }

    #[test]
    fn test_combinators() {
        let dom = parse_html(PAGE);
        let sel = Selector::parse("#main > p a[href]").unwrap();
        let found = sel.query_all(&dom, dom.document());
        assert_eq!(names(&dom, &found), vec!["a"]);

        let sel = Selector::parse("li + li").unwrap();
        let found = sel.query_all(&dom, dom.document());
        assert_eq!(dom.text_content(found[0]), "b");
    }

    #[test]
    fn test_pseudo_classes() {
        let mut dom = parse_html(PAGE);
        let checked = Selector::parse("input:checked").unwrap();
        assert_eq!(checked.query_all(&dom, dom.document()).len(), 1);

        let disabled = Selector::parse(":disabled").unwrap();
        assert_eq!(names(&dom, &disabled.query_all(&dom, dom.document())), vec!["button"]);

        let link = Selector::parse("a:link").unwrap();
        assert_eq!(link.query_all(&dom, dom.document()).len(), 1);

        let focus = Selector::parse(":focus").unwrap();
        assert!(focus.query_first(&dom, dom.document()).is_none());
        let input = dom.find_by_tag("input").unwrap();
        dom.set_focused(Some(input));
        assert_eq!(focus.query_first(&dom, dom.document()), Some(input));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let dom = parse_html(PAGE);
        let sel = Selector::parse("li:first-child, ul > :nth-child(2)").unwrap();
        let found = sel.query_all(&dom, dom.document());
        assert_eq!(found.len(), 2);
        assert!(Selector::parse(":root").unwrap().matches(&dom, dom.find_by_tag("html").unwrap()));
    }

    #[test]
    fn test_invalid_selectors() {
        for bad in ["", "div[", "p >", "::nope", ":unknown-thing", "a )"] {
            assert!(
                matches!(Selector::parse(bad), Err(Error::InvalidSelector(_))),
                "{bad:?} should not parse"
            );
        }
        assert!(Selector::parse_or_warn("[[").is_none());
    }

    #[test]
    fn test_closest_includes_self() {
        let dom = parse_html(PAGE);
        let a = dom.find_by_tag("a").unwrap();
        let p_sel = Selector::parse("p").unwrap();
        let p = p_sel.closest(&dom, a).unwrap();
        assert_eq!(dom.local_name(p), Some("p"));

        let a_sel = Selector::parse("a").unwrap();
        assert_eq!(a_sel.closest(&dom, a), Some(a));
        assert_eq!(Selector::parse("table").unwrap().closest(&dom, a), None);
    }

    #[test]
    fn test_non_elements_never_match() {
        let dom = parse_html(PAGE);
        let sel = Selector::parse("*").unwrap();
        assert!(!sel.matches(&dom, dom.document()));
    }

    #[test]
    fn test_classify() {
        assert_eq!(Shortcut::classify("#main"), Shortcut::Id("main"));
        assert_eq!(Shortcut::classify(".note"), Shortcut::Class("note"));
        assert_eq!(Shortcut::classify("DIV"), Shortcut::Tag("DIV"));
        assert_eq!(Shortcut::classify("  <p>hi</p> "), Shortcut::Html);
        for general in ["#a .b", "#a.b", ".a.b", ".a:hover", ".a>b", "#1x", "*", "h1, h2", "a[b]"] {
            assert_eq!(Shortcut::classify(general), Shortcut::General, "{general}");
        }
    }

    #[test]
    fn test_shortcuts_agree_with_general_matching() {
        let dom = parse_html(PAGE);
        assert_eq!(
            elements_with_class(&dom, "note"),
            Selector::parse(".note").unwrap().query_all(&dom, dom.document())
        );
        assert_eq!(
            elements_by_tag(&dom, "LI"),
            Selector::parse("li").unwrap().query_all(&dom, dom.document())
        );
    }
}
