//! Top-level rendering.
//!
//! Each render reparses the markup and re-evaluates every expression;
//! nothing is cached between calls.

use indexmap::IndexSet;
use std::rc::Rc;
use tracing::{debug, debug_span};

use crate::context::RenderContext;
use crate::evaluate::Evaluator;
use crate::options::ParserOptions;
use crate::parse::{parse_markup, prepare_markup};
use crate::value::{Children, ElementDescriptor, Object, Tag, Value};

/// Marker class carried by the wrapper element.
pub const WRAPPER_CLASS: &str = "jsx-parser";

pub struct JsxParser {
    options: ParserOptions,
}

impl JsxParser {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// The top-level children of the markup: an array of the truthy results,
    /// the `render_error` substitute on a syntax failure, or `Null`.
    pub fn parse_children(&self) -> Value {
        let markup = prepare_markup(&self.options.markup);
        let ctx = RenderContext::from_options(&self.options);
        let span = debug_span!("render", markup_len = markup.len());
        let _enter = span.enter();

        let nodes = match parse_markup(&markup, self.options.auto_close_void_elements) {
            Ok(nodes) => nodes,
            Err(fault) => {
                let message = fault.to_string();
                ctx.report(fault);
                return match &self.options.render_error {
                    Some(render_error) => render_error(&message),
                    None => Value::Null,
                };
            }
        };

        let evaluator = Evaluator::new(Rc::clone(&ctx));
        let values: Vec<Value> = nodes
            .iter()
            .map(|node| evaluator.evaluate(node, None))
            .filter(Value::is_truthy)
            .collect();
        debug!(nodes = nodes.len(), rendered = values.len(), "evaluated markup");
        Value::from(values)
    }

    /// The parsed children inside a wrapper `div` (or a fragment when
    /// `render_in_wrapper` is off).
    pub fn render(&self) -> Value {
        let parsed = self.parse_children();
        let children = match parsed {
            Value::Null => Children::None,
            value => Children::One(value),
        };

        if !self.options.render_in_wrapper {
            return Value::from(ElementDescriptor::fragment(children, None));
        }
        let mut props = Object::new();
        props.insert(
            "className".to_string(),
            Value::from(wrapper_class_name(&self.options.class_name)),
        );
        Value::from(ElementDescriptor::new(
            Tag::Name("div".to_string()),
            props,
            children,
            None,
        ))
    }
}

/// Renders `options.markup` once.
pub fn render(options: ParserOptions) -> Value {
    JsxParser::new(options).render()
}

/// `jsx-parser` plus the caller's classes, deduplicated in first-seen order.
fn wrapper_class_name(class_name: &str) -> String {
    let classes: IndexSet<&str> = std::iter::once(WRAPPER_CLASS)
        .chain(class_name.split(' '))
        .filter(|class| !class.is_empty())
        .collect();
    classes.into_iter().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapper_class_name() {
        assert_eq!(wrapper_class_name(""), "jsx-parser");
        assert_eq!(wrapper_class_name("foo  bar foo"), "jsx-parser foo bar");
        assert_eq!(wrapper_class_name("jsx-parser baz"), "jsx-parser baz");
    }
}
