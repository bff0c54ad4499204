//! Component references and the dotted-name component registry.
//!
//! A component is opaque to the evaluator: it is a name plus, optionally, a
//! host render function. The registry maps names like `Lib.Sub.Custom` to
//! components through nested namespaces.

use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::error::HostError;
use crate::value::{Object, Value};

/// Host render hook. Receives the element's props (children included).
pub type RenderFn = Rc<dyn Fn(&Object) -> Result<Value, HostError>>;

struct ComponentInner {
    name: String,
    render: Option<RenderFn>,
}

#[derive(Clone)]
pub struct ComponentRef(Rc<ComponentInner>);

impl ComponentRef {
    pub fn new(name: impl Into<String>) -> Self {
        ComponentRef(Rc::new(ComponentInner {
            name: name.into(),
            render: None,
        }))
    }

    pub fn with_render<F>(name: impl Into<String>, render: F) -> Self
    where
        F: Fn(&Object) -> Result<Value, HostError> + 'static,
    {
        ComponentRef(Rc::new(ComponentInner {
            name: name.into(),
            render: Some(Rc::new(render)),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Runs the host render hook, if the component has one.
    pub fn render(&self, props: &Object) -> Option<Result<Value, HostError>> {
        self.0.render.as_ref().map(|render| render(props))
    }

    pub fn ptr_eq(&self, other: &ComponentRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ComponentRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentRef({})", self.0.name)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REGISTRY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub enum RegistryEntry {
    Component(ComponentRef),
    Namespace(ComponentRegistry),
}

#[derive(Clone, Debug, Default)]
pub struct ComponentRegistry {
    entries: IndexMap<String, RegistryEntry>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `component` under its own name.
    pub fn register(&mut self, component: ComponentRef) {
        self.entries.insert(
            component.name().to_string(),
            RegistryEntry::Component(component),
        );
    }

    pub fn insert(&mut self, name: impl Into<String>, component: ComponentRef) {
        self.entries
            .insert(name.into(), RegistryEntry::Component(component));
    }

    pub fn insert_namespace(&mut self, name: impl Into<String>, namespace: ComponentRegistry) {
        self.entries
            .insert(name.into(), RegistryEntry::Namespace(namespace));
    }

    pub fn with(mut self, name: impl Into<String>, component: ComponentRef) -> Self {
        self.insert(name, component);
        self
    }

    pub fn with_namespace(mut self, name: impl Into<String>, namespace: ComponentRegistry) -> Self {
        self.insert_namespace(name, namespace);
        self
    }

    /// Inserts under a dotted path, creating intermediate namespaces.
    pub fn insert_path(&mut self, path: &str, component: ComponentRef) {
        match path.split_once('.') {
            None => self.insert(path, component),
            Some((head, rest)) => {
                let entry = self
                    .entries
                    .entry(head.to_string())
                    .or_insert_with(|| RegistryEntry::Namespace(ComponentRegistry::new()));
                if let RegistryEntry::Component(_) = entry {
                    *entry = RegistryEntry::Namespace(ComponentRegistry::new());
                }
                if let RegistryEntry::Namespace(namespace) = entry {
                    namespace.insert_path(rest, component);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Walks a dotted path (`Lib.Sub.Name`) segment by segment.
    /// Namespaces themselves never resolve to a component.
    pub fn resolve(&self, path: &str) -> Option<ComponentRef> {
        if path.is_empty() {
            return None;
        }
        let mut segments = path.split('.').peekable();
        let mut current = self;
        while let Some(segment) = segments.next() {
            match current.entries.get(segment)? {
                RegistryEntry::Component(component) if segments.peek().is_none() => {
                    return Some(component.clone());
                }
                RegistryEntry::Namespace(namespace) => current = namespace,
                RegistryEntry::Component(_) => return None,
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_dotted_path() {
        let custom = ComponentRef::new("Custom");
        let registry = ComponentRegistry::new().with_namespace(
            "Lib",
            ComponentRegistry::new()
                .with_namespace("SubLib", ComponentRegistry::new().with("Custom", custom.clone())),
        );

        let resolved = registry.resolve("Lib.SubLib.Custom").unwrap();
        assert!(resolved.ptr_eq(&custom));
        assert!(registry.resolve("Lib.SubLib").is_none());
        assert!(registry.resolve("Lib.Missing.Custom").is_none());
        assert!(registry.resolve("Custom").is_none());
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let mut registry = ComponentRegistry::new();
        registry.register(ComponentRef::new("CustomContent"));
        registry.register(ComponentRef::new("CuStomContent"));

        assert_eq!(registry.resolve("CustomContent").unwrap().name(), "CustomContent");
        assert_eq!(registry.resolve("CuStomContent").unwrap().name(), "CuStomContent");
        assert!(registry.resolve("customcontent").is_none());
    }

    #[test]
    fn test_component_renders_through_host_hook() {
        let greeting = ComponentRef::with_render("Greeting", |props: &Object| {
            let name = props.get("name").cloned().unwrap_or_default();
            Ok(Value::from(format!("Hello, {}", name)))
        });
        let mut props = Object::new();
        props.insert("name".to_string(), Value::from("Ada"));

        let rendered = greeting.render(&props).unwrap().unwrap();
        assert_eq!(rendered, Value::from("Hello, Ada"));
        assert!(ComponentRef::new("Plain").render(&props).is_none());
    }
}
