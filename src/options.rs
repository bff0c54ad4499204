//! Parser configuration.
//!
//! [`ParserOptions`] is the full option set, host callbacks included.
//! [`ParserConfig`] is its data-only subset, deserialized from JSON and
//! merged over the defaults.

use serde::Deserialize;
use std::fmt;
use std::rc::Rc;

use crate::component::{ComponentRef, ComponentRegistry};
use crate::error::Fault;
use crate::key::{KeySource, RandomKeys};
use crate::sanitize::{default_attribute_blacklist, default_tag_blacklist, AttrPattern};
use crate::value::{Object, Value};

pub type ErrorHook = Rc<dyn Fn(&Fault)>;
/// Receives the error text; returns the substitute output (or `Null`).
pub type RenderErrorHook = Rc<dyn Fn(&str) -> Value>;
/// Receives the unrecognized tag name; returns the fallback output (or `Null`).
pub type RenderUnrecognizedHook = Rc<dyn Fn(&str) -> Value>;

#[derive(Clone)]
pub struct ParserOptions {
    pub allow_unknown_elements: bool,
    pub auto_close_void_elements: bool,
    pub bindings: Object,
    pub blacklisted_attrs: Vec<AttrPattern>,
    pub blacklisted_tags: Vec<String>,
    pub class_name: String,
    pub components: ComponentRegistry,
    pub components_only: bool,
    pub disable_fragments: bool,
    pub disable_key_generation: bool,
    pub markup: String,
    pub on_error: Option<ErrorHook>,
    pub show_warnings: bool,
    pub render_error: Option<RenderErrorHook>,
    pub render_in_wrapper: bool,
    pub render_unrecognized: Option<RenderUnrecognizedHook>,
    /// Whether identifiers fall back to the ambient globals (`Math`, `Date`, …).
    pub allow_globals: bool,
    pub key_source: Rc<dyn KeySource>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_unknown_elements: true,
            auto_close_void_elements: false,
            bindings: Object::new(),
            blacklisted_attrs: default_attribute_blacklist(),
            blacklisted_tags: default_tag_blacklist(),
            class_name: String::new(),
            components: ComponentRegistry::new(),
            components_only: false,
            disable_fragments: false,
            disable_key_generation: false,
            markup: String::new(),
            on_error: None,
            show_warnings: false,
            render_error: None,
            render_in_wrapper: true,
            render_unrecognized: None,
            allow_globals: true,
            key_source: Rc::new(RandomKeys),
        }
    }
}

impl ParserOptions {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            ..Self::default()
        }
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.bindings.insert(name.into(), value.into());
        self
    }

    pub fn with_component(mut self, name: impl Into<String>, component: ComponentRef) -> Self {
        self.components.insert(name, component);
        self
    }

    pub fn with_on_error<F: Fn(&Fault) + 'static>(mut self, hook: F) -> Self {
        self.on_error = Some(Rc::new(hook));
        self
    }

    pub fn with_render_error<F: Fn(&str) -> Value + 'static>(mut self, hook: F) -> Self {
        self.render_error = Some(Rc::new(hook));
        self
    }

    pub fn with_render_unrecognized<F: Fn(&str) -> Value + 'static>(mut self, hook: F) -> Self {
        self.render_unrecognized = Some(Rc::new(hook));
        self
    }

    pub fn with_key_source<K: KeySource + 'static>(mut self, keys: K) -> Self {
        self.key_source = Rc::new(keys);
        self
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("allow_unknown_elements", &self.allow_unknown_elements)
            .field("auto_close_void_elements", &self.auto_close_void_elements)
            .field("bindings", &self.bindings)
            .field("blacklisted_attrs", &self.blacklisted_attrs)
            .field("blacklisted_tags", &self.blacklisted_tags)
            .field("class_name", &self.class_name)
            .field("components", &self.components)
            .field("components_only", &self.components_only)
            .field("disable_fragments", &self.disable_fragments)
            .field("disable_key_generation", &self.disable_key_generation)
            .field("markup", &self.markup)
            .field("show_warnings", &self.show_warnings)
            .field("render_in_wrapper", &self.render_in_wrapper)
            .field("allow_globals", &self.allow_globals)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON CONFIG
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParserConfig {
    #[serde(default)]
    pub allow_unknown_elements: Option<bool>,
    #[serde(default)]
    pub auto_close_void_elements: Option<bool>,
    #[serde(default)]
    pub bindings: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub blacklisted_attrs: Option<Vec<String>>,
    #[serde(default)]
    pub blacklisted_tags: Option<Vec<String>>,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Dotted component names (`Lib.Sub.Name`), registered as plain references.
    #[serde(default)]
    pub components: Vec<String>,
    #[serde(default)]
    pub components_only: Option<bool>,
    #[serde(default)]
    pub disable_fragments: Option<bool>,
    #[serde(default)]
    pub disable_key_generation: Option<bool>,
    #[serde(default)]
    pub markup: Option<String>,
    #[serde(default)]
    pub render_in_wrapper: Option<bool>,
    #[serde(default)]
    pub show_warnings: Option<bool>,
}

impl ParserConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Overlays every field that is present onto `options`.
    pub fn merge_into(self, options: &mut ParserOptions) {
        if let Some(value) = self.allow_unknown_elements {
            options.allow_unknown_elements = value;
        }
        if let Some(value) = self.auto_close_void_elements {
            options.auto_close_void_elements = value;
        }
        if let Some(bindings) = self.bindings {
            for (name, value) in bindings.iter() {
                options.bindings.insert(name.clone(), Value::from_json(value));
            }
        }
        if let Some(attrs) = self.blacklisted_attrs {
            options.blacklisted_attrs = attrs.into_iter().map(AttrPattern::Literal).collect();
        }
        if let Some(tags) = self.blacklisted_tags {
            options.blacklisted_tags = tags;
        }
        if let Some(class_name) = self.class_name {
            options.class_name = class_name;
        }
        for name in &self.components {
            let short = name.rsplit('.').next().unwrap_or(name);
            options
                .components
                .insert_path(name, ComponentRef::new(short));
        }
        if let Some(value) = self.components_only {
            options.components_only = value;
        }
        if let Some(value) = self.disable_fragments {
            options.disable_fragments = value;
        }
        if let Some(value) = self.disable_key_generation {
            options.disable_key_generation = value;
        }
        if let Some(markup) = self.markup {
            options.markup = markup;
        }
        if let Some(value) = self.render_in_wrapper {
            options.render_in_wrapper = value;
        }
        if let Some(value) = self.show_warnings {
            options.show_warnings = value;
        }
    }

    pub fn into_options(self) -> ParserOptions {
        let mut options = ParserOptions::default();
        self.merge_into(&mut options);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert!(options.allow_unknown_elements);
        assert!(options.render_in_wrapper);
        assert!(options.allow_globals);
        assert_eq!(options.blacklisted_tags, vec!["script".to_string()]);
        assert_eq!(options.blacklisted_attrs.len(), 1);
    }

    #[test]
    fn test_config_from_json_overrides_present_fields() {
        let config = ParserConfig::from_json(
            r#"{
                "markup": "<Lib.Card />",
                "blacklistedAttrs": [],
                "disableKeyGeneration": true,
                "bindings": { "count": 3, "name": "Ada" },
                "components": ["Lib.Card"]
            }"#,
        )
        .unwrap();
        let options = config.into_options();

        assert_eq!(options.markup, "<Lib.Card />");
        assert!(options.blacklisted_attrs.is_empty());
        assert!(options.disable_key_generation);
        assert!(options.render_in_wrapper);
        assert_eq!(options.bindings.get("count"), Some(&Value::from(3)));
        assert_eq!(options.components.resolve("Lib.Card").unwrap().name(), "Card");
    }

    #[test]
    fn test_unknown_config_fields_are_ignored() {
        let config = ParserConfig::from_json(r#"{ "jsx": "<div />", "futureFlag": 1 }"#).unwrap();
        assert!(config.markup.is_none());
    }
}
