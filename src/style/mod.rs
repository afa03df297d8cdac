//! Style system: inline `style` attributes, stylesheets and the cascade.
//!
//! This module contains:
//! - Stylesheet and declaration-block parsing (cssparser)
//! - Per-property access to an element's `style` attribute
//! - A cascade resolving computed values against the user-agent sheet,
//!   the document's `<style>` elements and inline styles

mod cascade;
mod inline;
mod stylesheet;

pub use cascade::{computed_value, document_stylesheets, initial_value};
pub use inline::{property_name, serialize_declarations};
pub use stylesheet::{CssRule, Declaration, Origin, Specificity, Stylesheet, parse_declarations};

/// Elements rendered as blocks by default.
const BLOCK_ELEMENTS: &[&str] = &[
    "html", "body", "div", "section", "article", "aside", "nav", "header", "footer", "main",
    "address", "blockquote", "figure", "figcaption", "details", "summary", "h1", "h2", "h3", "h4",
    "h5", "h6", "p", "ul", "ol", "dl", "dt", "dd", "pre", "hr", "form", "fieldset", "legend",
];

/// Elements that are never rendered.
const HIDDEN_ELEMENTS: &[&str] = &[
    "head", "script", "style", "title", "meta", "link", "base", "template", "noscript",
];

const USER_AGENT_CSS: &str = r#"
    /* Block elements */
    html, body, div, section, article, aside, nav, header, footer, main,
    address, blockquote, figure, figcaption, details, summary,
    h1, h2, h3, h4, h5, h6, p, ul, ol, dl, dt, dd, pre, hr,
    form, fieldset, legend {
        display: block;
    }

    li { display: list-item; }

    /* Tables */
    table { display: table; }
    caption { display: table-caption; }
    thead { display: table-header-group; }
    tbody { display: table-row-group; }
    tfoot { display: table-footer-group; }
    tr { display: table-row; }
    td, th { display: table-cell; }
    col { display: table-column; }
    colgroup { display: table-column-group; }

    /* Form controls */
    input, select, textarea, button, img, video, canvas { display: inline-block; }

    /* Never rendered */
    head, script, style, title, meta, link, base, template, noscript {
        display: none;
    }
    [hidden] { display: none; }
"#;

thread_local! {
    static USER_AGENT: Stylesheet = Stylesheet::parse(USER_AGENT_CSS);
}

/// Run `f` with the user-agent stylesheet.
pub fn user_agent_stylesheet<R>(f: impl FnOnce(&Stylesheet) -> R) -> R {
    USER_AGENT.with(f)
}

/// The display value an element of this tag gets from the user-agent sheet.
///
/// `show()` falls back to this when it has no remembered value.
pub fn default_display(tag: &str) -> &'static str {
    let tag = tag.to_ascii_lowercase();
    let tag = tag.as_str();
    if BLOCK_ELEMENTS.contains(&tag) {
        return "block";
    }
    if HIDDEN_ELEMENTS.contains(&tag) {
        // Showing one of these still makes it visible
        return "block";
    }
    match tag {
        "li" => "list-item",
        "table" => "table",
        "caption" => "table-caption",
        "thead" => "table-header-group",
        "tbody" => "table-row-group",
        "tfoot" => "table-footer-group",
        "tr" => "table-row",
        "td" | "th" => "table-cell",
        "col" => "table-column",
        "colgroup" => "table-column-group",
        "input" | "select" | "textarea" | "button" | "img" | "video" | "canvas" => "inline-block",
        _ => "inline",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_sheet_parses() {
        user_agent_stylesheet(|ua| {
            assert!(!ua.is_empty());
            assert!(ua.rules.iter().all(|r| !r.declarations.is_empty()));
        });
    }

    #[test]
    fn test_default_display() {
        assert_eq!(default_display("DIV"), "block");
        assert_eq!(default_display("li"), "list-item");
        assert_eq!(default_display("td"), "table-cell");
        assert_eq!(default_display("span"), "inline");
        assert_eq!(default_display("my-widget"), "inline");
    }
}
