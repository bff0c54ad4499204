//! Static HTML serialization of element descriptor trees.
//!
//! A minimal host renderer: enough to turn a render into markup for
//! snapshots, server output and tests. It does not reconcile or hydrate.

use lazy_static::lazy_static;
use std::collections::HashMap;
use tracing::trace;

use crate::style::kebab_case_property;
use crate::tags::{ATTRIBUTE_NAMES, VOID_ELEMENTS};
use crate::value::{number_to_string, Children, ElementDescriptor, Tag, Value};

lazy_static! {
    /// Property name -> markup attribute name.
    static ref PROPERTY_ATTRIBUTES: HashMap<&'static str, &'static str> =
        ATTRIBUTE_NAMES.iter().map(|(&attr, &prop)| (prop, attr)).collect();
}

pub fn to_static_markup(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::String(s) => escape_into(out, s),
        Value::Number(n) => out.push_str(&number_to_string(*n)),
        Value::Array(items) => items.iter().for_each(|item| write_value(out, item)),
        Value::Element(element) => write_element(out, element),
        Value::Undefined
        | Value::Null
        | Value::Bool(_)
        | Value::Object(_)
        | Value::Function(_)
        | Value::Component(_) => {}
    }
}

fn write_children(out: &mut String, children: &Children) {
    match children {
        Children::None => {}
        Children::One(child) => write_value(out, child),
        Children::Many(items) => items.iter().for_each(|item| write_value(out, item)),
    }
}

fn write_element(out: &mut String, element: &ElementDescriptor) {
    match &element.tag {
        Tag::Fragment => write_children(out, &element.children),
        Tag::Component(component) => match component.render(&element.props_with_children()) {
            Some(Ok(rendered)) => write_value(out, &rendered),
            Some(Err(err)) => trace!(component = component.name(), error = %err, "component render failed"),
            None => write_children(out, &element.children),
        },
        Tag::Name(name) => {
            out.push('<');
            out.push_str(name);
            for (prop, value) in &element.props {
                write_attribute(out, prop, value);
            }
            if VOID_ELEMENTS.contains(name.as_str()) {
                out.push_str("/>");
                return;
            }
            out.push('>');
            write_children(out, &element.children);
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn write_attribute(out: &mut String, prop: &str, value: &Value) {
    if prop == "children" || prop == "key" {
        return;
    }
    let text = match value {
        Value::Bool(true) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(number_to_string(*n)),
        Value::Object(style) if prop == "style" => Some(
            style
                .iter()
                .filter(|(_, v)| !v.is_nullish() && !matches!(v, Value::Bool(_)))
                .map(|(k, v)| format!("{}:{}", kebab_case_property(k), v.to_js_string()))
                .collect::<Vec<_>>()
                .join(";"),
        ),
        Value::Array(_) => Some(value.to_js_string()),
        _ => return,
    };
    let name = PROPERTY_ATTRIBUTES.get(prop).copied().unwrap_or(prop);
    out.push(' ');
    out.push_str(name);
    if let Some(text) = text {
        out.push_str("=\"");
        escape_into(out, &text);
        out.push('"');
    }
}

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentRef;
    use crate::value::Object;

    fn element(tag: &str, props: Object, children: Children) -> Value {
        Value::from(ElementDescriptor::new(Tag::Name(tag.to_string()), props, children, None))
    }

    #[test]
    fn test_attributes_and_escaping() {
        let mut props = Object::new();
        props.insert("className".to_string(), Value::from("a b"));
        props.insert("htmlFor".to_string(), Value::from("x"));
        props.insert("readOnly".to_string(), Value::Bool(true));
        props.insert("hidden".to_string(), Value::Bool(false));
        props.insert("title".to_string(), Value::from("\"q\" & <b>"));
        let html = to_static_markup(&element("label", props, Children::One(Value::from("1 < 2"))));
        assert_eq!(
            html,
            r#"<label class="a b" for="x" readonly title="&quot;q&quot; &amp; &lt;b&gt;">1 &lt; 2</label>"#
        );
    }

    #[test]
    fn test_void_and_style() {
        let mut style = Object::new();
        style.insert("marginTop".to_string(), Value::from("4px"));
        style.insert("WebkitTransition".to_string(), Value::from("none"));
        let mut props = Object::new();
        props.insert("style".to_string(), Value::from(style));
        let html = to_static_markup(&element("img", props, Children::None));
        assert_eq!(html, r#"<img style="margin-top:4px;-webkit-transition:none"/>"#);
    }

    #[test]
    fn test_fragments_flatten_and_falsy_children_vanish() {
        let fragment = Value::from(ElementDescriptor::fragment(
            Children::Many(vec![
                Value::from("a"),
                Value::Bool(false),
                Value::Null,
                Value::from(0),
                Value::from("b"),
            ]),
            None,
        ));
        assert_eq!(to_static_markup(&fragment), "a0b");
    }

    #[test]
    fn test_components_render_through_hook() {
        let shout = ComponentRef::with_render("Shout", |props: &Object| {
            let text = props.get("children").map(Value::to_js_string).unwrap_or_default();
            Ok(Value::from(text.to_uppercase()))
        });
        let tree = Value::from(ElementDescriptor::new(
            Tag::Component(shout),
            Object::new(),
            Children::One(Value::from("hi")),
            None,
        ));
        assert_eq!(to_static_markup(&tree), "HI");

        let plain = Value::from(ElementDescriptor::new(
            Tag::Component(ComponentRef::new("Plain")),
            Object::new(),
            Children::One(Value::from("kept")),
            None,
        ));
        assert_eq!(to_static_markup(&plain), "kept");
    }
}
