//! Callable values: host natives, interpreted arrow closures, closure
//! proxies and bound functions.

use std::fmt;
use std::rc::Rc;

use crate::ast::ArrowFunction;
use crate::context::RenderContext;
use crate::error::HostError;
use crate::proxy::ClosureProxy;
use crate::scope::Scope;
use crate::value::Value;

/// Host callable: `(this, args) -> result`.
pub type NativeFn = Rc<dyn Fn(&Value, &[Value]) -> Result<Value, HostError>>;

/// An arrow function literal closed over the scope it was evaluated in.
pub struct Closure {
    pub(crate) arrow: Rc<ArrowFunction>,
    pub(crate) scope: Option<Rc<Scope>>,
    pub(crate) ctx: Rc<RenderContext>,
}

pub enum FunctionKind {
    Native { name: String, call: NativeFn },
    Closure(Closure),
    Proxy(ClosureProxy),
    Bound { target: Function, this: Value },
}

#[derive(Clone)]
pub struct Function(Rc<FunctionKind>);

impl Function {
    pub fn native<F>(name: impl Into<String>, call: F) -> Self
    where
        F: Fn(&Value, &[Value]) -> Result<Value, HostError> + 'static,
    {
        Function(Rc::new(FunctionKind::Native {
            name: name.into(),
            call: Rc::new(call),
        }))
    }

    pub(crate) fn closure(closure: Closure) -> Self {
        Function(Rc::new(FunctionKind::Closure(closure)))
    }

    pub fn proxy(proxy: ClosureProxy) -> Self {
        Function(Rc::new(FunctionKind::Proxy(proxy)))
    }

    pub fn kind(&self) -> &FunctionKind {
        &self.0
    }

    pub fn as_proxy(&self) -> Option<&ClosureProxy> {
        match self.kind() {
            FunctionKind::Proxy(proxy) => Some(proxy),
            _ => None,
        }
    }

    pub fn name(&self) -> String {
        match self.kind() {
            FunctionKind::Native { name, .. } => name.clone(),
            FunctionKind::Closure(_) => "anonymous".to_string(),
            FunctionKind::Proxy(proxy) => proxy.target().name(),
            FunctionKind::Bound { target, .. } => format!("bound {}", target.name()),
        }
    }

    /// Invokes with an explicit receiver.
    pub fn call(&self, this: &Value, args: &[Value]) -> Result<Value, HostError> {
        match self.kind() {
            FunctionKind::Native { call, .. } => call(this, args),
            FunctionKind::Closure(closure) => closure.invoke(this, args),
            FunctionKind::Proxy(proxy) => proxy.call_with_context(this, args),
            FunctionKind::Bound { target, this } => target.call(this, args),
        }
    }

    /// `fn.apply(this, [args])`
    pub fn apply(&self, this: &Value, args: &Value) -> Result<Value, HostError> {
        match self.kind() {
            FunctionKind::Proxy(proxy) => proxy.call_with_spread_args(this, args),
            _ => self.call(this, &spread_arguments(args)?),
        }
    }

    /// `new fn(...args)`
    pub fn construct(&self, args: &[Value]) -> Result<Value, HostError> {
        match self.kind() {
            FunctionKind::Native { call, .. } => call(&Value::Undefined, args),
            FunctionKind::Closure(_) => Err(HostError::Type(
                "arrow functions are not constructors".to_string(),
            )),
            FunctionKind::Proxy(proxy) => proxy.target().construct(args),
            FunctionKind::Bound { target, .. } => target.construct(args),
        }
    }

    /// Fixes the receiver. Rebinding a bound function keeps the first receiver.
    pub fn bind(&self, this: Value) -> Function {
        Function(Rc::new(FunctionKind::Bound {
            target: self.clone(),
            this,
        }))
    }

    /// Identity comparison. Bound wrappers compare by their target and receiver.
    pub fn ptr_eq(&self, other: &Function) -> bool {
        if Rc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (
                FunctionKind::Bound { target: a, this: this_a },
                FunctionKind::Bound { target: b, this: this_b },
            ) => a.ptr_eq(b) && this_a.strict_equals(this_b),
            _ => false,
        }
    }
}

pub(crate) fn spread_arguments(args: &Value) -> Result<Vec<Value>, HostError> {
    match args {
        Value::Undefined | Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.as_ref().clone()),
        other => Err(HostError::Type(format!(
            "CreateListFromArrayLike called on non-object {}",
            other.type_of()
        ))),
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function {}]", self.name())
    }
}
