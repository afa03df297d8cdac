//! CSS cascade implementation.
//!
//! Resolves which declaration applies to an element based on origin,
//! importance, specificity and source order. Only one property is resolved
//! per call; the host has no layout, so nothing needs a full style struct.

use selectors::context::{MatchingContext, QuirksMode, SelectorCaches};
use selectors::matching::{
    MatchingForInvalidation, MatchingMode, NeedsSelectorFlags, matches_selector,
};
use selectors::parser::Selector;

use super::stylesheet::{Declaration, Origin, Specificity, Stylesheet};
use super::user_agent_stylesheet;
use crate::dom::{Dom, NodeId};
use crate::selector::{DomSelectors, ElementRef, elements_by_tag};

/// Properties whose unset value comes from the parent.
const INHERITED: &[&str] = &[
    "color",
    "cursor",
    "direction",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-type",
    "text-align",
    "text-indent",
    "text-transform",
    "visibility",
    "white-space",
    "word-spacing",
];

/// A matched declaration with ordering information for the cascade.
#[derive(Debug)]
struct MatchedDeclaration<'a> {
    declaration: &'a Declaration,
    origin: Origin,
    specificity: Specificity,
    order: usize,
}

/// Initial value of a property, as `getComputedStyle` would report it.
pub fn initial_value(property: &str) -> &'static str {
    match property {
        "display" => "inline",
        "opacity" => "1",
        "visibility" => "visible",
        "overflow" | "overflow-x" | "overflow-y" => "visible",
        "height" | "width" => "auto",
        "transform" => "none",
        "transition" => "all 0s ease 0s",
        "position" => "static",
        "color" => "rgb(0, 0, 0)",
        _ => "",
    }
}

/// Author stylesheets from the document's `<style>` elements.
pub fn document_stylesheets(dom: &Dom) -> Vec<Stylesheet> {
    elements_by_tag(dom, "style")
        .into_iter()
        .map(|style| Stylesheet::parse(&dom.text_content(style)))
        .collect()
}

/// Resolve the computed value of one property.
///
/// Returns `None` for nodes that are not elements.
pub fn computed_value(dom: &Dom, id: NodeId, property: &str) -> Option<String> {
    let author = document_stylesheets(dom);
    user_agent_stylesheet(|ua| computed_with(dom, id, property, ua, &author))
}

fn computed_with(
    dom: &Dom,
    id: NodeId,
    property: &str,
    ua: &Stylesheet,
    author: &[Stylesheet],
) -> Option<String> {
    if !dom.is_element(id) {
        return None;
    }

    let inherited = INHERITED.contains(&property);
    let from_parent = || match dom.parent_element(id) {
        Some(parent) => computed_with(dom, parent, property, ua, author),
        None => Some(initial_value(property).to_string()),
    };

    match cascaded_value(dom, id, property, ua, author) {
        Some(value) if value.eq_ignore_ascii_case("inherit") => from_parent(),
        Some(value) if value.eq_ignore_ascii_case("unset") && inherited => from_parent(),
        Some(value)
            if value.eq_ignore_ascii_case("initial") || value.eq_ignore_ascii_case("unset") =>
        {
            Some(initial_value(property).to_string())
        }
        Some(value) => Some(value),
        None if inherited => from_parent(),
        None => Some(initial_value(property).to_string()),
    }
}

/// The winning declared value for a property, if any declaration applies.
fn cascaded_value(
    dom: &Dom,
    id: NodeId,
    property: &str,
    ua: &Stylesheet,
    author: &[Stylesheet],
) -> Option<String> {
    let elem = ElementRef::new(dom, id);
    let inline = dom.inline_style(id);

    let mut matched: Vec<MatchedDeclaration> = Vec::new();
    let mut order = 0;
    let mut caches = SelectorCaches::default();

    let sheets = std::iter::once((ua, Origin::UserAgent))
        .chain(author.iter().map(|sheet| (sheet, Origin::Author)));
    for (stylesheet, origin) in sheets {
        for rule in &stylesheet.rules {
            let relevant = rule.declarations.iter().any(|d| d.property == property);
            if !relevant || !rule_matches(elem, &rule.selectors, &mut caches) {
                continue;
            }
            for decl in rule.declarations.iter().filter(|d| d.property == property) {
                matched.push(MatchedDeclaration {
                    declaration: decl,
                    origin,
                    specificity: rule.specificity,
                    order,
                });
                order += 1;
            }
        }
    }

    for decl in inline.iter().filter(|d| d.property == property) {
        matched.push(MatchedDeclaration {
            declaration: decl,
            origin: Origin::Inline,
            specificity: Specificity::default(),
            order,
        });
        order += 1;
    }

    // Highest precedence sorts last
    matched
        .into_iter()
        .max_by(|a, b| {
            a.declaration
                .important
                .cmp(&b.declaration.important)
                .then(a.origin.cmp(&b.origin))
                .then(a.specificity.cmp(&b.specificity))
                .then(a.order.cmp(&b.order))
        })
        .map(|m| m.declaration.value.clone())
}

/// Check if any of a rule's selectors matches an element.
fn rule_matches(
    elem: ElementRef<'_>,
    rule_selectors: &[Selector<DomSelectors>],
    caches: &mut SelectorCaches,
) -> bool {
    let mut context = MatchingContext::new(
        MatchingMode::Normal,
        None,
        caches,
        QuirksMode::NoQuirks,
        NeedsSelectorFlags::No,
        MatchingForInvalidation::No,
    );

    rule_selectors
        .iter()
        .any(|selector| matches_selector(selector, 0, None, &elem, &mut context))
}
