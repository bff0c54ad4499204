//! Rebindable closures.
//!
//! A [`ClosureProxy`] pairs a callable with a captured scope. Whatever
//! calling convention reaches it, the receiver the target sees is the
//! captured scope overlaid with the explicit context, explicit keys winning.
//! The captured scope can be swapped later; only later calls observe it.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::HostError;
use crate::function::{spread_arguments, Function};
use crate::value::{Object, Value};

pub struct ClosureProxy {
    target: Function,
    captured_scope: RefCell<Object>,
}

impl ClosureProxy {
    pub fn new(target: Function, captured_scope: Object) -> Self {
        Self {
            target,
            captured_scope: RefCell::new(captured_scope),
        }
    }

    pub fn target(&self) -> &Function {
        &self.target
    }

    pub fn captured_scope(&self) -> Object {
        self.captured_scope.borrow().clone()
    }

    pub fn set_captured_scope(&self, scope: Object) {
        *self.captured_scope.borrow_mut() = scope;
    }

    /// shallow-merge(captured, explicit); non-object contexts add nothing.
    pub fn effective_context(&self, explicit: &Value) -> Value {
        let mut context = self.captured_scope.borrow().clone();
        if let Value::Object(overrides) = explicit {
            for (key, value) in overrides.iter() {
                context.insert(key.clone(), value.clone());
            }
        }
        Value::Object(Rc::new(context))
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, HostError> {
        self.call_with_context(&Value::Undefined, args)
    }

    pub fn call_with_context(&self, context: &Value, args: &[Value]) -> Result<Value, HostError> {
        let this = self.effective_context(context);
        self.target.call(&this, args)
    }

    pub fn call_with_spread_args(&self, context: &Value, args: &Value) -> Result<Value, HostError> {
        let args = spread_arguments(args)?;
        self.call_with_context(context, &args)
    }
}
