//! Markup elements to element descriptors.
//!
//! Applies, in order: document-root promotion, the tag blacklist, the
//! unknown-element policy, child evaluation, attribute evaluation and
//! filtering, key assignment and the `option` unwrap.

use std::rc::Rc;
use tracing::trace;

use crate::ast::{ExprKind, MarkupAttribute, MarkupElement};
use crate::error::Fault;
use crate::evaluate::Evaluator;
use crate::methods::own_entries;
use crate::scope::Scope;
use crate::style::parse_style;
use crate::tags::{
    can_have_children, can_have_whitespace, is_document_root, is_unrecognized_element,
    normalize_attribute_name,
};
use crate::value::{Children, ElementDescriptor, Object, Tag, Value};

pub struct ElementBuilder<'e> {
    evaluator: &'e Evaluator,
}

impl<'e> ElementBuilder<'e> {
    pub fn new(evaluator: &'e Evaluator) -> Self {
        Self { evaluator }
    }

    /// Builds one element. Yields an element, an array (document roots),
    /// `Null` (blacklisted) or whatever the unrecognized-tag hook returns.
    pub fn build(&self, element: &MarkupElement, scope: Option<&Rc<Scope>>) -> Value {
        let ctx = self.evaluator.context();
        let name = element.name.as_deref().unwrap_or("");

        if !name.is_empty() && is_document_root(name) {
            trace!(tag = name, "promoting document root children");
            let children = element
                .children
                .iter()
                .filter(|child| !is_blank_text(&child.kind))
                .map(|child| self.evaluator.evaluate(child, scope))
                .collect::<Vec<_>>();
            return Value::from(children);
        }

        if !name.is_empty() && ctx.sanitizer.is_tag_blacklisted(name) {
            ctx.report(Fault::BlacklistedTag { tag: name.to_string() });
            return Value::Null;
        }

        let component = match element.name.as_deref() {
            Some(name) => ctx.components.resolve(name),
            None => None,
        };
        if !name.is_empty() && component.is_none() {
            if ctx.components_only {
                ctx.report(Fault::UnrecognizedComponent { name: name.to_string() });
                return ctx.render_unrecognized(name);
            }
            if !ctx.allow_unknown_elements && is_unrecognized_element(name) {
                ctx.report(Fault::UnrecognizedElement { name: name.to_string() });
                return ctx.render_unrecognized(name);
            }
        }

        let mut children = if component.is_some() || element.is_fragment() || can_have_children(name) {
            let bare_tag = component.is_none() && !element.is_fragment();
            self.build_children(element, scope, bare_tag && !can_have_whitespace(name))
        } else {
            Children::None
        };

        let mut props = self.build_props(element, scope);
        if let Some(Value::String(style)) = props.get("style") {
            let style = parse_style(style);
            props.insert("style".to_string(), Value::from(style));
        }

        let key = match props.shift_remove("key") {
            Some(Value::Undefined) => None,
            Some(explicit) => Some(explicit.to_js_string()),
            None => ctx.next_key(),
        };

        let lower_name = name.to_lowercase();
        if lower_name == "option" {
            if let Children::One(Value::Element(only)) = &children {
                children = only.children.clone();
            }
        }

        let tag = match (component, element.is_fragment()) {
            (Some(component), _) => Tag::Component(component),
            (None, true) => Tag::Fragment,
            (None, false) => Tag::Name(lower_name),
        };
        Value::from(ElementDescriptor::new(tag, props, children, key))
    }

    fn build_children(
        &self,
        element: &MarkupElement,
        scope: Option<&Rc<Scope>>,
        drop_whitespace: bool,
    ) -> Children {
        let mut values = Vec::with_capacity(element.children.len());
        for child in &element.children {
            if drop_whitespace && is_blank_text(&child.kind) {
                continue;
            }
            let value = self.evaluator.evaluate(child, scope);
            if drop_whitespace && value.as_str().is_some_and(|s| s.trim().is_empty()) {
                continue;
            }
            values.push(value);
        }

        match Children::from_values(values) {
            Children::Many(values) if !self.evaluator.context().disable_key_generation => {
                let keyed = values
                    .into_iter()
                    .enumerate()
                    .map(|(index, child)| with_index_key(child, index))
                    .collect();
                Children::Many(keyed)
            }
            children => children,
        }
    }

    fn build_props(&self, element: &MarkupElement, scope: Option<&Rc<Scope>>) -> Object {
        let ctx = self.evaluator.context();
        let mut props = Object::new();
        let mut apply = |raw_name: &str, value: Value| {
            let name = normalize_attribute_name(raw_name);
            if ctx.sanitizer.is_attribute_blacklisted(&name) {
                trace!(attribute = %name, "dropping blacklisted attribute");
                return;
            }
            props.insert(name, value);
        };

        for attribute in &element.attributes {
            match attribute {
                MarkupAttribute::Attribute { name, value } => {
                    let value = match value {
                        Some(value) => self.evaluator.evaluate(value, scope),
                        None => Value::Bool(true),
                    };
                    apply(name, value);
                }
                MarkupAttribute::Spread(argument) => {
                    let source = self.evaluator.evaluate(argument, scope);
                    if matches!(source, Value::Object(_) | Value::Array(_)) {
                        for (name, value) in own_entries(&source) {
                            apply(&name, value);
                        }
                    }
                }
            }
        }
        props
    }
}

fn is_blank_text(kind: &ExprKind) -> bool {
    matches!(kind, ExprKind::Text(text) if text.trim().is_empty())
}

/// Positional fallback key for keyless element children.
fn with_index_key(child: Value, index: usize) -> Value {
    if let Value::Element(element) = &child {
        if element.key.as_deref().map_or(true, str::is_empty) {
            return Value::Element(Rc::new(element.with_key(index.to_string())));
        }
    }
    child
}
