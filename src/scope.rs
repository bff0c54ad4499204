//! Layered binding scopes and identifier resolution.
//!
//! Lookup order, innermost first: function-invocation layers, then the
//! caller-supplied bindings, then (when permitted) the ambient globals.
//! A miss is `undefined`, never an error.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::trace;

use crate::builtins;
use crate::value::{Object, Value};

lazy_static::lazy_static! {
    /// Names answered by the ambient global layer.
    pub static ref GLOBAL_NAMES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        s.insert("Math");
        s.insert("Date");
        s.insert("JSON");
        s.insert("Number");
        s.insert("String");
        s.insert("Boolean");
        s.insert("Array");
        s.insert("Object");
        s.insert("parseInt");
        s.insert("parseFloat");
        s.insert("isNaN");
        s.insert("undefined");
        s.insert("NaN");
        s.insert("Infinity");
        s
    };
}

/// One function-invocation layer.
#[derive(Debug, Default)]
pub struct Scope {
    vars: RefCell<Object>,
    this: Option<Value>,
    parent: Option<Rc<Scope>>,
}

impl Scope {
    pub fn new(parent: Option<Rc<Scope>>, this: Option<Value>) -> Rc<Self> {
        Rc::new(Self {
            vars: RefCell::new(Object::new()),
            this,
            parent,
        })
    }

    /// A nested block inside the same invocation; shares the receiver.
    pub fn child(self: &Rc<Self>) -> Rc<Self> {
        Scope::new(Some(Rc::clone(self)), None)
    }

    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.vars.borrow_mut().insert(name.into(), value);
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.vars.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }

    /// Receiver of the nearest layer that set one.
    pub fn this_value(&self) -> Option<Value> {
        match &self.this {
            Some(this) => Some(this.clone()),
            None => self.parent.as_ref().and_then(|parent| parent.this_value()),
        }
    }

    /// All visible locals, inner layers shadowing outer ones.
    pub fn flatten(&self) -> Object {
        let mut merged = match &self.parent {
            Some(parent) => parent.flatten(),
            None => Object::new(),
        };
        for (key, value) in self.vars.borrow().iter() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}

/// Resolves `name` through the local layers, the bindings and the globals.
pub fn resolve_identifier(
    name: &str,
    scope: Option<&Rc<Scope>>,
    bindings: &Object,
    allow_globals: bool,
) -> Value {
    if let Some(value) = scope.and_then(|scope| scope.lookup(name)) {
        return value;
    }
    if let Some(value) = bindings.get(name) {
        return value.clone();
    }
    if allow_globals && GLOBAL_NAMES.contains(name) {
        if let Some(value) = builtins::global(name) {
            return value;
        }
    }
    trace!(identifier = name, "unresolved identifier");
    Value::Undefined
}

/// `merge(bindings, locals)`, locals winning: the receiver handed to calls.
pub fn call_context(scope: Option<&Rc<Scope>>, bindings: &Object) -> Value {
    let Some(scope) = scope else {
        return Value::Object(Rc::new(bindings.clone()));
    };
    let mut context = bindings.clone();
    for (key, value) in scope.flatten() {
        context.insert(key, value);
    }
    Value::Object(Rc::new(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings() -> Object {
        let mut bindings = Object::new();
        bindings.insert("a".to_string(), Value::from("outer"));
        bindings.insert("b".to_string(), Value::from(2));
        bindings
    }

    #[test]
    fn test_local_layer_shadows_bindings() {
        let scope = Scope::new(None, None);
        scope.define("a", Value::from("inner"));
        assert_eq!(
            resolve_identifier("a", Some(&scope), &bindings(), true),
            Value::from("inner")
        );
        assert_eq!(resolve_identifier("b", Some(&scope), &bindings(), true), Value::from(2));
    }

    #[test]
    fn test_missing_identifier_is_undefined() {
        assert_eq!(resolve_identifier("nope", None, &bindings(), true), Value::Undefined);
    }

    #[test]
    fn test_globals_can_be_disabled() {
        assert!(resolve_identifier("Math", None, &Object::new(), true).as_object().is_some());
        assert_eq!(resolve_identifier("Math", None, &Object::new(), false), Value::Undefined);
    }

    #[test]
    fn test_nested_layers_flatten_inner_last() {
        let outer = Scope::new(None, Some(Value::from("this")));
        outer.define("x", Value::from(1));
        outer.define("y", Value::from(1));
        let inner = outer.child();
        inner.define("y", Value::from(2));

        let flat = inner.flatten();
        assert_eq!(flat.get("x"), Some(&Value::from(1)));
        assert_eq!(flat.get("y"), Some(&Value::from(2)));
        assert_eq!(inner.this_value(), Some(Value::from("this")));
    }

    #[test]
    fn test_call_context_overlays_locals_on_bindings() {
        let scope = Scope::new(None, None);
        scope.define("a", Value::from("local"));
        let context = call_context(Some(&scope), &bindings());
        assert_eq!(context.get("a"), Some(&Value::from("local")));
        assert_eq!(context.get("b"), Some(&Value::from(2)));
    }
}
