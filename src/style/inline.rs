//! Reading and writing the `style` attribute one property at a time.

use super::stylesheet::{Declaration, parse_declarations};
use crate::dom::{Dom, NodeId};

/// Normalize a property name: `backgroundColor` becomes `background-color`.
/// Custom properties (`--x`) are left alone.
pub fn property_name(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Serialize declarations the way `CSSStyleDeclaration.cssText` does.
pub fn serialize_declarations(declarations: &[Declaration]) -> String {
    let mut out = String::new();
    for decl in declarations {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&decl.property);
        out.push_str(": ");
        out.push_str(&decl.value);
        if decl.important {
            out.push_str(" !important");
        }
        out.push(';');
    }
    out
}

impl Dom {
    /// Declarations of the element's `style` attribute, in source order.
    pub fn inline_style(&self, id: NodeId) -> Vec<Declaration> {
        self.get_attr(id, "style")
            .map(parse_declarations)
            .unwrap_or_default()
    }

    /// Value of one inline property, `None` when unset.
    pub fn style_property(&self, id: NodeId, property: &str) -> Option<String> {
        let property = property_name(property);
        self.inline_style(id)
            .into_iter()
            .rev()
            .find(|d| d.property == property)
            .map(|d| d.value)
    }

    /// Set one inline property. An empty value removes it.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) {
        if !self.is_element(id) {
            return;
        }
        let property = property_name(property);
        let value = value.trim();
        let mut declarations = self.inline_style(id);

        if value.is_empty() {
            declarations.retain(|d| d.property != property);
        } else {
            let (value, important) = match value.strip_suffix("!important") {
                Some(v) => (v.trim_end(), true),
                None => (value, false),
            };
            let mut found = false;
            declarations.retain_mut(|d| {
                if d.property != property {
                    return true;
                }
                if found {
                    return false;
                }
                found = true;
                d.value = value.to_string();
                d.important = important;
                true
            });
            if !found {
                declarations.push(Declaration {
                    property,
                    value: value.to_string(),
                    important,
                });
            }
        }

        self.set_attr(id, "style", &serialize_declarations(&declarations));
    }

    /// Remove one inline property.
    pub fn remove_style_property(&mut self, id: NodeId, property: &str) {
        if self.has_attr(id, "style") {
            self.set_style_property(id, property, "");
        }
    }
}
