//! Per-render state shared by the evaluator, the builder and every closure
//! created while rendering.

use std::rc::Rc;
use tracing::warn;

use crate::component::ComponentRegistry;
use crate::error::Fault;
use crate::key::KeySource;
use crate::options::{ErrorHook, ParserOptions, RenderUnrecognizedHook};
use crate::sanitize::Sanitizer;
use crate::value::{Object, Value};

pub struct RenderContext {
    pub bindings: Rc<Object>,
    pub components: ComponentRegistry,
    pub sanitizer: Sanitizer,
    pub allow_unknown_elements: bool,
    pub components_only: bool,
    pub disable_fragments: bool,
    pub disable_key_generation: bool,
    pub show_warnings: bool,
    pub allow_globals: bool,
    key_source: Rc<dyn KeySource>,
    on_error: Option<ErrorHook>,
    render_unrecognized: Option<RenderUnrecognizedHook>,
}

impl RenderContext {
    pub fn from_options(options: &ParserOptions) -> Rc<Self> {
        Rc::new(Self {
            bindings: Rc::new(options.bindings.clone()),
            components: options.components.clone(),
            sanitizer: Sanitizer::new(&options.blacklisted_tags, &options.blacklisted_attrs),
            allow_unknown_elements: options.allow_unknown_elements,
            components_only: options.components_only,
            disable_fragments: options.disable_fragments,
            disable_key_generation: options.disable_key_generation,
            show_warnings: options.show_warnings,
            allow_globals: options.allow_globals,
            key_source: Rc::clone(&options.key_source),
            on_error: options.on_error.clone(),
            render_unrecognized: options.render_unrecognized.clone(),
        })
    }

    /// Routes a fault to the warning log and the `on_error` hook.
    pub fn report(&self, fault: Fault) {
        if self.show_warnings {
            warn!(code = fault.code(), "{}", fault);
        }
        if let Some(on_error) = &self.on_error {
            on_error(&fault);
        }
    }

    /// A fresh identity key, or `None` when key generation is disabled.
    pub fn next_key(&self) -> Option<String> {
        if self.disable_key_generation {
            None
        } else {
            Some(self.key_source.next_key())
        }
    }

    /// The bindings object itself, which `this` refers to at the top level.
    pub fn bindings_value(&self) -> Value {
        Value::Object(Rc::clone(&self.bindings))
    }

    pub fn render_unrecognized(&self, tag: &str) -> Value {
        match &self.render_unrecognized {
            Some(hook) => hook(tag),
            None => Value::Null,
        }
    }
}
