//! Classes, inline styles, attributes, content and instant visibility.
//!
//! Setters act on every element member and return the receiver; getters
//! read the first element member.

use super::Selection;
use crate::dom::{Dom, NodeId};
use crate::style::{computed_value, default_display, property_name};
use crate::window::Window;

impl Selection {
    /// Run `f` with the document mutably borrowed for every element member.
    pub(crate) fn each_mut(&self, mut f: impl FnMut(&mut Dom, NodeId)) -> &Self {
        if let Some(window) = self.window() {
            let elements = self.elements();
            let mut dom = window.dom_mut();
            for id in elements {
                f(&mut dom, id);
            }
        }
        self
    }

    /// Read from the first element member.
    fn read_first<R>(&self, f: impl FnOnce(&Dom, NodeId) -> Option<R>) -> Option<R> {
        let window = self.window()?;
        let first = self.elements().into_iter().next()?;
        let dom = window.dom();
        f(&dom, first)
    }

    // ------------------------------------------------------------------
    // Classes
    // ------------------------------------------------------------------

    /// Add one or more space-separated classes.
    pub fn add_class(&self, names: &str) -> &Self {
        self.edit_classes(|classes| {
            for name in names.split_whitespace() {
                if !classes.iter().any(|c| c == name) {
                    classes.push(name.to_string());
                }
            }
        })
    }

    pub fn remove_class(&self, names: &str) -> &Self {
        self.edit_classes(|classes| {
            let names: Vec<&str> = names.split_whitespace().collect();
            classes.retain(|c| !names.contains(&c.as_str()));
        })
    }

    /// Flip each named class per element.
    pub fn toggle_class(&self, names: &str) -> &Self {
        self.edit_classes(|classes| {
            for name in names.split_whitespace() {
                match classes.iter().position(|c| c == name) {
                    Some(pos) => {
                        classes.remove(pos);
                    }
                    None => classes.push(name.to_string()),
                }
            }
        })
    }

    /// Swap `old` for `new` on elements that carry `old`.
    pub fn replace_class(&self, old: &str, new: &str) -> &Self {
        self.edit_classes(|classes| {
            let Some(pos) = classes.iter().position(|c| c == old) else {
                return;
            };
            if classes.iter().any(|c| c == new) {
                classes.remove(pos);
            } else {
                classes[pos] = new.to_string();
            }
        })
    }

    /// Whether any element member carries the class.
    pub fn has_class(&self, name: &str) -> bool {
        let Some(window) = self.window() else {
            return false;
        };
        let elements = self.elements();
        let dom = window.dom();
        elements.into_iter().any(|id| dom.has_class(id, name))
    }

    fn edit_classes(&self, mut edit: impl FnMut(&mut Vec<String>)) -> &Self {
        self.each_mut(|dom, id| {
            let mut classes = dom.element_classes(id).to_vec();
            let before = classes.clone();
            edit(&mut classes);
            if classes != before {
                dom.set_classes(id, &classes);
            }
        })
    }

    // ------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------

    /// Computed value of a property on the first element.
    pub fn css(&self, property: &str) -> Option<String> {
        let property = property_name(property);
        self.read_first(|dom, id| computed_value(dom, id, &property))
    }

    /// Set an inline property. An empty value removes it.
    pub fn set_css(&self, property: &str, value: &str) -> &Self {
        self.each_mut(|dom, id| dom.set_style_property(id, property, value))
    }

    pub fn remove_css(&self, property: &str) -> &Self {
        self.each_mut(|dom, id| dom.remove_style_property(id, property))
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    pub fn attr(&self, name: &str) -> Option<String> {
        self.read_first(|dom, id| dom.get_attr(id, name).map(str::to_string))
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        self.each_mut(|dom, id| dom.set_attr(id, name, value))
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        self.each_mut(|dom, id| dom.remove_attr(id, name))
    }

    /// `dataset` read: `data("userId")` reads `data-user-id`.
    pub fn data(&self, key: &str) -> Option<String> {
        self.attr(&data_attr(key))
    }

    pub fn set_data(&self, key: &str, value: &str) -> &Self {
        self.set_attr(&data_attr(key), value)
    }

    // ------------------------------------------------------------------
    // Content
    // ------------------------------------------------------------------

    /// Text content of every member, concatenated.
    pub fn text(&self) -> String {
        let Some(window) = self.window() else {
            return String::new();
        };
        let dom = window.dom();
        self.node_ids()
            .into_iter()
            .map(|id| dom.text_content(id))
            .collect()
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.each_mut(|dom, id| dom.set_text_content(id, text))
    }

    /// Inner HTML of the first element.
    pub fn html(&self) -> Option<String> {
        self.read_first(|dom, id| Some(dom.inner_html(id)))
    }

    pub fn set_html(&self, html: &str) -> &Self {
        self.each_mut(|dom, id| dom.set_inner_html(id, html))
    }

    pub fn outer_html(&self) -> Option<String> {
        self.read_first(|dom, id| Some(dom.outer_html(id)))
    }

    /// Form control value of the first element.
    pub fn val(&self) -> Option<String> {
        self.read_first(control_value)
    }

    pub fn set_val(&self, value: &str) -> &Self {
        self.each_mut(|dom, id| set_control_value(dom, id, value))
    }

    /// Whether the first element is a checked input.
    pub fn is_checked(&self) -> bool {
        self.read_first(|dom, id| Some(dom.has_attr(id, "checked")))
            .unwrap_or(false)
    }

    /// Check or uncheck inputs without firing events.
    pub fn set_checked(&self, checked: bool) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                window.set_checked(id, checked);
            }
        }
        self
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    pub fn show(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                reveal(window, id);
            }
        }
        self
    }

    pub fn hide(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                conceal(window, id);
            }
        }
        self
    }

    /// Show hidden elements and hide visible ones.
    pub fn toggle(&self) -> &Self {
        if let Some(window) = self.window() {
            for id in self.elements() {
                if is_hidden(window, id) {
                    reveal(window, id);
                } else {
                    conceal(window, id);
                }
            }
        }
        self
    }
}

fn data_attr(key: &str) -> String {
    format!("data-{}", property_name(key))
}

/// Computed `display: none`.
pub(crate) fn is_hidden(window: &Window, id: NodeId) -> bool {
    computed_value(&window.dom(), id, "display").is_some_and(|d| d == "none")
}

/// Make an element displayed again, preferring the value it had before it
/// was hidden.
pub(crate) fn reveal(window: &Window, id: NodeId) {
    let inline_none = window
        .dom()
        .style_property(id, "display")
        .is_some_and(|d| d == "none");
    if inline_none {
        window.dom_mut().remove_style_property(id, "display");
    }
    if !is_hidden(window, id) {
        return;
    }
    let display = window.remembered_display(id).unwrap_or_else(|| {
        let dom = window.dom();
        default_display(dom.local_name(id).unwrap_or("")).to_string()
    });
    window.dom_mut().set_style_property(id, "display", &display);
}

/// Set `display: none`, remembering the current value for [`reveal`].
pub(crate) fn conceal(window: &Window, id: NodeId) {
    let current = computed_value(&window.dom(), id, "display");
    if let Some(display) = current.filter(|d| d != "none") {
        window.remember_display(id, &display);
    }
    window.dom_mut().set_style_property(id, "display", "none");
}

fn control_value(dom: &Dom, id: NodeId) -> Option<String> {
    match dom.local_name(id)? {
        "textarea" => Some(dom.text_content(id)),
        "select" => {
            let options: Vec<NodeId> = dom
                .descendants(id)
                .filter(|&n| dom.local_name(n) == Some("option"))
                .collect();
            let chosen = options
                .iter()
                .copied()
                .find(|&o| dom.has_attr(o, "selected"))
                .or_else(|| options.first().copied())?;
            Some(option_value(dom, chosen))
        }
        "option" => Some(option_value(dom, id)),
        _ => Some(dom.get_attr(id, "value").unwrap_or("").to_string()),
    }
}

fn option_value(dom: &Dom, option: NodeId) -> String {
    match dom.get_attr(option, "value") {
        Some(value) => value.to_string(),
        None => dom.text_content(option).trim().to_string(),
    }
}

fn set_control_value(dom: &mut Dom, id: NodeId, value: &str) {
    match dom.local_name(id) {
        Some("textarea") => dom.set_text_content(id, value),
        Some("select") => {
            let options: Vec<NodeId> = dom
                .descendants(id)
                .filter(|&n| dom.local_name(n) == Some("option"))
                .collect();
            for option in options {
                if option_value(dom, option) == value {
                    dom.set_attr(option, "selected", "");
                } else {
                    dom.remove_attr(option, "selected");
                }
            }
        }
        Some(_) => dom.set_attr(id, "value", value),
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::selection::Selection;
    use crate::window::Window;

    fn select(window: &Window, selector: &str) -> Selection {
        Selection::from_input(selector, Some(window))
    }

    #[test]
    fn test_class_operations() {
        let window = Window::from_html(r#"<p id="a" class="x"></p><p id="b"></p>"#);
        let ps = select(&window, "p");

        ps.add_class("y  z").add_class("y");
        assert_eq!(select(&window, "#a").attr("class").as_deref(), Some("x y z"));
        assert_eq!(select(&window, "#b").attr("class").as_deref(), Some("y z"));

        ps.toggle_class("x").remove_class("z");
        assert_eq!(select(&window, "#a").attr("class").as_deref(), Some("y"));
        assert_eq!(select(&window, "#b").attr("class").as_deref(), Some("y x"));

        ps.replace_class("x", "w");
        assert!(ps.has_class("w"));
        assert!(!ps.has_class("x"));
        assert_eq!(select(&window, ".y").len(), 2);
    }

    #[test]
    fn test_css_reads_cascade_and_writes_inline() {
        let window = Window::from_html(
            r#"<style>.note { color: red; }</style><p class="note">hi</p>"#,
        );
        let p = select(&window, "p");
        assert_eq!(p.css("color").as_deref(), Some("red"));
        assert_eq!(p.css("display").as_deref(), Some("block"));

        p.set_css("backgroundColor", "blue").set_css("color", "green");
        assert_eq!(p.css("background-color").as_deref(), Some("blue"));
        assert_eq!(p.css("color").as_deref(), Some("green"));
        assert_eq!(
            p.attr("style").as_deref(),
            Some("background-color: blue; color: green;")
        );

        p.remove_css("color");
        assert_eq!(p.css("color").as_deref(), Some("red"));
    }

    #[test]
    fn test_attributes_and_data() {
        let window = Window::from_html(r#"<div data-user-id="7"></div>"#);
        let div = select(&window, "div");
        assert_eq!(div.data("userId").as_deref(), Some("7"));
        div.set_data("state", "open").set_attr("title", "t");
        assert_eq!(div.attr("data-state").as_deref(), Some("open"));
        div.remove_attr("title");
        assert_eq!(div.attr("title"), None);
    }

    #[test]
    fn test_text_and_html() {
        let window = Window::from_html(r#"<p>a</p><p>b</p>"#);
        let ps = select(&window, "p");
        assert_eq!(ps.text(), "ab");
        ps.set_html("<b>x</b>");
        assert_eq!(ps.html().as_deref(), Some("<b>x</b>"));
        assert_eq!(ps.outer_html().as_deref(), Some("<p><b>x</b></p>"));
        ps.set_text("<i>");
        assert_eq!(ps.html().as_deref(), Some("&lt;i&gt;"));
    }

    #[test]
    fn test_raw_text_html_survives_round_trip() {
        let window = Window::from_html(r#"<style>ul > li { color: red; }</style><p>x</p>"#);
        let style = select(&window, "style");
        let css = style.html().unwrap();
        assert_eq!(css, "ul > li { color: red; }");

        style.set_html(&css);
        assert_eq!(style.html().as_deref(), Some("ul > li { color: red; }"));
        assert_eq!(select(&window, "li").len(), 0);
    }

    #[test]
    fn test_form_values() {
        let window = Window::from_html(
            r#"<input id="i" value="1">
               <textarea id="t">old</textarea>
               <select id="s"><option>a</option><option value="bee">b</option></select>
               <input id="c" type="checkbox">"#,
        );
        assert_eq!(select(&window, "#i").val().as_deref(), Some("1"));
        assert_eq!(select(&window, "#t").set_val("new").val().as_deref(), Some("new"));

        let s = select(&window, "#s");
        assert_eq!(s.val().as_deref(), Some("a"));
        assert_eq!(s.set_val("bee").val().as_deref(), Some("bee"));

        let c = select(&window, "#c");
        assert!(!c.is_checked());
        assert!(c.set_checked(true).is_checked());
    }

    #[test]
    fn test_hide_show_remembers_display() {
        let window = Window::from_html(
            r#"<style>.flex { display: flex; }</style><div class="flex"></div><span></span>"#,
        );
        let div = select(&window, "div");
        div.hide();
        assert_eq!(div.css("display").as_deref(), Some("none"));
        div.show();
        assert_eq!(div.css("display").as_deref(), Some("flex"));
        assert_eq!(div.attr("style").as_deref(), Some(""));

        let span = select(&window, "span");
        span.toggle();
        assert_eq!(span.css("display").as_deref(), Some("none"));
        span.toggle();
        assert_eq!(span.css("display").as_deref(), Some("inline"));
    }

    #[test]
    fn test_show_overrides_stylesheet_none() {
        let window = Window::from_html(
            r#"<style>li.off { display: none; }</style><ul><li class="off">x</li></ul>"#,
        );
        let li = select(&window, "li");
        li.show();
        assert_eq!(li.css("display").as_deref(), Some("list-item"));
    }

    #[test]
    fn test_unbound_selection_is_inert() {
        let sel = Selection::none();
        assert_eq!(sel.add_class("a").css("display"), None);
        assert!(!sel.has_class("a"));
        assert_eq!(sel.text(), "");
    }
}
