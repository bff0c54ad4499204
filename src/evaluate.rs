//! Expression evaluation.
//!
//! Walks the lowered AST against the render's bindings and an optional
//! chain of function-invocation scopes. Nothing here fails: faults are
//! reported through the render context and the offending expression
//! evaluates to `undefined`.

use oxc_syntax::operator::{BinaryOperator, LogicalOperator, UnaryOperator};
use std::rc::Rc;
use tracing::trace;

use crate::ast::{ArrowBody, ArrowFunction, Expr, ExprKind, Literal, ObjectProperty, Pattern, PropertyKey, Stmt};
use crate::builder::ElementBuilder;
use crate::context::RenderContext;
use crate::error::{Fault, HostError};
use crate::function::{Closure, Function};
use crate::methods::{get_property, iterate, own_entries};
use crate::proxy::ClosureProxy;
use crate::scope::{call_context, resolve_identifier, Scope};
use crate::value::{number_to_string, Children, ElementDescriptor, Object, Value};

const UNSUPPORTED_ARROW: &str = "Async and generator arrow functions are not supported.";

/// Control flow out of a statement.
enum Flow {
    Normal,
    Return(Value),
}

pub struct Evaluator {
    ctx: Rc<RenderContext>,
}

impl Evaluator {
    pub fn new(ctx: Rc<RenderContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Rc<RenderContext> {
        &self.ctx
    }

    pub fn evaluate(&self, expr: &Expr, scope: Option<&Rc<Scope>>) -> Value {
        match &expr.kind {
            ExprKind::Literal(literal) => match literal {
                Literal::Null => Value::Null,
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Number(n) => Value::Number(*n),
                Literal::String(s) => Value::String(s.clone()),
            },
            ExprKind::Identifier(name) => {
                resolve_identifier(name, scope, &self.ctx.bindings, self.ctx.allow_globals)
            }
            ExprKind::This => self.this_value(scope),
            ExprKind::Member { .. } | ExprKind::Call { .. } => {
                self.evaluate_chain(expr, scope).unwrap_or_default()
            }
            ExprKind::Binary { operator, left, right } => {
                let left = self.evaluate(left, scope);
                let right = self.evaluate(right, scope);
                binary(*operator, &left, &right)
            }
            ExprKind::Logical { operator, left, right } => {
                let left = self.evaluate(left, scope);
                let short_circuit = match operator {
                    LogicalOperator::Or => left.is_truthy(),
                    LogicalOperator::And => !left.is_truthy(),
                    LogicalOperator::Coalesce => !left.is_nullish(),
                };
                if short_circuit {
                    left
                } else {
                    self.evaluate(right, scope)
                }
            }
            ExprKind::Unary { operator, argument } => {
                let value = self.evaluate(argument, scope);
                unary(*operator, &value)
            }
            ExprKind::Conditional { test, consequent, alternate } => {
                if self.evaluate(test, scope).is_truthy() {
                    self.evaluate(consequent, scope)
                } else {
                    self.evaluate(alternate, scope)
                }
            }
            ExprKind::New { callee, arguments } => self.evaluate_new(callee, arguments, scope),
            ExprKind::Array(elements) => Value::from(self.evaluate_list(elements, scope)),
            ExprKind::Object(properties) => self.evaluate_object(properties, scope),
            // A spread child (`{...items}`) contributes its members as an array.
            ExprKind::Spread(_) => Value::from(self.evaluate_list(std::slice::from_ref(expr), scope)),
            ExprKind::Template { quasis, expressions } => {
                let mut out = String::new();
                for (index, quasi) in quasis.iter().enumerate() {
                    out.push_str(quasi);
                    if let Some(expr) = expressions.get(index) {
                        out.push_str(&self.evaluate(expr, scope).to_js_string());
                    }
                }
                Value::String(out)
            }
            ExprKind::Arrow(arrow) => self.evaluate_arrow(arrow, scope),
            ExprKind::Element(element) => ElementBuilder::new(self).build(element, scope),
            ExprKind::Text(text) => self.evaluate_text(text),
            ExprKind::ExpressionContainer(inner) => match inner {
                Some(inner) => self.evaluate(inner, scope),
                None => Value::Undefined,
            },
            ExprKind::Unsupported(kind) => {
                self.ctx.report(Fault::UnsupportedSyntax { kind: kind.clone() });
                Value::Undefined
            }
        }
    }

    /// `this`: the nearest block-bodied invocation's receiver, else the bindings.
    fn this_value(&self, scope: Option<&Rc<Scope>>) -> Value {
        scope
            .and_then(|scope| scope.this_value())
            .unwrap_or_else(|| self.ctx.bindings_value())
    }

    fn evaluate_text(&self, text: &str) -> Value {
        if self.ctx.disable_fragments {
            return Value::from(text);
        }
        Value::from(ElementDescriptor::fragment(
            Children::One(Value::from(text)),
            self.ctx.next_key(),
        ))
    }

    /// Evaluates a list that may contain spread elements, splicing their members in place.
    pub(crate) fn evaluate_list(&self, exprs: &[Expr], scope: Option<&Rc<Scope>>) -> Vec<Value> {
        let mut values = Vec::with_capacity(exprs.len());
        for expr in exprs {
            let ExprKind::Spread(argument) = &expr.kind else {
                values.push(self.evaluate(expr, scope));
                continue;
            };
            let spread = self.evaluate(argument, scope);
            match iterate(&spread) {
                Some(members) => values.extend(members),
                None => self.ctx.report(Fault::NotIterable {
                    expression: describe(argument),
                }),
            }
        }
        values
    }

    fn evaluate_object(&self, properties: &[ObjectProperty], scope: Option<&Rc<Scope>>) -> Value {
        let mut object = Object::new();
        for property in properties {
            match property {
                ObjectProperty::Property { key, value } => {
                    let key = self.property_key(key, scope);
                    let value = self.evaluate(value, scope);
                    object.insert(key, value);
                }
                ObjectProperty::Spread(argument) => {
                    let source = self.evaluate(argument, scope);
                    for (key, value) in own_entries(&source) {
                        object.insert(key, value);
                    }
                }
            }
        }
        Value::from(object)
    }

    fn property_key(&self, key: &PropertyKey, scope: Option<&Rc<Scope>>) -> String {
        match key {
            PropertyKey::Static(name) => name.clone(),
            PropertyKey::Computed(expr) => property_name(&self.evaluate(expr, scope)),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // MEMBER CHAINS & CALLS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Evaluates a member or call expression. `None` means an optional link
    /// short-circuited somewhere in the chain.
    fn evaluate_chain(&self, expr: &Expr, scope: Option<&Rc<Scope>>) -> Option<Value> {
        match &expr.kind {
            ExprKind::Member { .. } => self.resolve_member(expr, scope),
            ExprKind::Call { .. } => self.evaluate_call(expr, scope),
            _ => Some(self.evaluate(expr, scope)),
        }
    }

    /// Collapses `root.a[b].c` into `root` plus an ordered key path, evaluates
    /// the computed keys, then resolves the root and walks the path.
    fn resolve_member(&self, expr: &Expr, scope: Option<&Rc<Scope>>) -> Option<Value> {
        let mut links: Vec<(&PropertyKey, bool)> = Vec::new();
        let mut root = expr;
        while let ExprKind::Member { object, property, optional } = &root.kind {
            links.push((property, *optional));
            root = object;
        }
        links.reverse();

        let path: Vec<(String, bool)> = links
            .iter()
            .map(|(property, optional)| (self.property_key(property, scope), *optional))
            .collect();

        let mut current = self.evaluate_chain(root, scope)?;
        let mut parent = Value::Undefined;
        for (key, optional) in &path {
            if current.is_nullish() {
                if *optional {
                    return None;
                }
                self.ctx.report(Fault::MemberResolution {
                    root: root_name(root),
                    path: path.iter().map(|(key, _)| key.clone()).collect(),
                });
                return Some(Value::Undefined);
            }
            let next = get_property(&current, key);
            parent = std::mem::replace(&mut current, next);
        }

        // Functions read out of objects and arrays keep their owner as receiver.
        if let (Value::Function(function), Value::Object(_) | Value::Array(_)) = (&current, &parent) {
            return Some(Value::Function(function.bind(parent.clone())));
        }
        Some(current)
    }

    fn evaluate_call(&self, expr: &Expr, scope: Option<&Rc<Scope>>) -> Option<Value> {
        let ExprKind::Call { callee, arguments, optional, callee_source } = &expr.kind else {
            return Some(self.evaluate(expr, scope));
        };
        let target = self.evaluate_chain(callee, scope)?;
        if target.is_nullish() {
            if *optional {
                return None;
            }
            if target.is_undefined() {
                self.ctx.report(Fault::UnresolvedCallee {
                    callee: callee_source.clone(),
                });
            } else {
                self.ctx.report(Fault::Invocation {
                    callee: callee_source.clone(),
                    source: HostError::Type(format!("{} is not a function", callee_source)),
                });
            }
            return Some(Value::Undefined);
        }

        let args = self.evaluate_list(arguments, scope);
        let this = call_context(scope, &self.ctx.bindings);
        let result = match &target {
            Value::Function(function) => function.call(&this, &args),
            Value::Component(component) => {
                let props = args.first().and_then(Value::as_object).cloned().unwrap_or_default();
                component.render(&props).unwrap_or_else(|| {
                    Err(HostError::Type(format!("{} has no render function", component.name())))
                })
            }
            _ => Err(HostError::Type(format!("{} is not a function", callee_source))),
        };
        match result {
            Ok(value) => Some(value),
            Err(source) => {
                self.ctx.report(Fault::Invocation {
                    callee: callee_source.clone(),
                    source,
                });
                Some(Value::Undefined)
            }
        }
    }

    fn evaluate_new(&self, callee: &Expr, arguments: &[Expr], scope: Option<&Rc<Scope>>) -> Value {
        let constructor = self.evaluate(callee, scope);
        let name = describe(callee);
        let result = match &constructor {
            Value::Undefined => {
                self.ctx.report(Fault::UnresolvedCallee { callee: name });
                return Value::Undefined;
            }
            Value::Function(function) => function.construct(&self.evaluate_list(arguments, scope)),
            _ => Err(HostError::Type(format!("{} is not a constructor", name))),
        };
        result.unwrap_or_else(|source| {
            self.ctx.report(Fault::Invocation { callee: name, source });
            Value::Undefined
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ARROW FUNCTIONS
    // ═══════════════════════════════════════════════════════════════════════════

    fn evaluate_arrow(&self, arrow: &Rc<ArrowFunction>, scope: Option<&Rc<Scope>>) -> Value {
        if arrow.is_async {
            self.ctx.report(Fault::UnsupportedFunction {
                message: UNSUPPORTED_ARROW.to_string(),
            });
            return Value::Undefined;
        }
        let closure = Function::closure(Closure {
            arrow: Rc::clone(arrow),
            scope: scope.cloned(),
            ctx: Rc::clone(&self.ctx),
        });
        match arrow.body {
            ArrowBody::Expression(_) => Value::Function(closure),
            // Block bodies read their receiver from `this`, so they are
            // wrapped to keep the bindings underneath any rebinding.
            ArrowBody::Block(_) => Value::Function(Function::proxy(ClosureProxy::new(
                closure,
                self.ctx.bindings.as_ref().clone(),
            ))),
        }
    }

    /// Binds `value` against `pattern` into `target`. Defaults are evaluated
    /// in `defaults_scope`.
    fn bind_pattern(
        &self,
        pattern: &Pattern,
        value: Value,
        target: &Rc<Scope>,
        defaults_scope: Option<&Rc<Scope>>,
    ) {
        match pattern {
            Pattern::Identifier(name) => target.define(name.clone(), value),
            Pattern::Default { target: inner, default } => {
                let value = if value.is_undefined() {
                    self.evaluate(default, defaults_scope)
                } else {
                    value
                };
                self.bind_pattern(inner, value, target, defaults_scope);
            }
            Pattern::Array { elements, rest } => {
                let items = iterate(&value).unwrap_or_default();
                for (index, element) in elements.iter().enumerate() {
                    if let Some(element) = element {
                        let item = items.get(index).cloned().unwrap_or_default();
                        self.bind_pattern(element, item, target, defaults_scope);
                    }
                }
                if let Some(rest) = rest {
                    let remaining = items.get(elements.len()..).unwrap_or(&[]).to_vec();
                    self.bind_pattern(rest, Value::from(remaining), target, defaults_scope);
                }
            }
            Pattern::Object { properties, rest } => {
                let mut used = Vec::with_capacity(properties.len());
                for (key, inner) in properties {
                    let key = self.property_key(key, defaults_scope);
                    let member = if value.is_nullish() {
                        Value::Undefined
                    } else {
                        get_property(&value, &key)
                    };
                    self.bind_pattern(inner, member, target, defaults_scope);
                    used.push(key);
                }
                if let Some(rest) = rest {
                    let remaining: Object = own_entries(&value)
                        .into_iter()
                        .filter(|(key, _)| !used.contains(key))
                        .collect();
                    self.bind_pattern(rest, Value::from(remaining), target, defaults_scope);
                }
            }
        }
    }

    fn bind_parameters(&self, closure: &Closure, layer: &Rc<Scope>, args: &[Value]) {
        let outer = closure.scope.as_ref();
        for (index, param) in closure.arrow.params.iter().enumerate() {
            let arg = args.get(index).cloned().unwrap_or_default();
            self.bind_pattern(param, arg, layer, outer);
        }
        if let Some(rest) = &closure.arrow.rest {
            let remaining = args.get(closure.arrow.params.len()..).unwrap_or(&[]).to_vec();
            self.bind_pattern(rest, Value::from(remaining), layer, outer);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATEMENTS (block bodies)
    // ═══════════════════════════════════════════════════════════════════════════

    fn execute_block(&self, statements: &[Stmt], scope: &Rc<Scope>) -> Flow {
        for statement in statements {
            if let Flow::Return(value) = self.execute(statement, scope) {
                return Flow::Return(value);
            }
        }
        Flow::Normal
    }

    fn execute(&self, statement: &Stmt, scope: &Rc<Scope>) -> Flow {
        match statement {
            Stmt::Declaration(declarators) => {
                for (pattern, init) in declarators {
                    let value = match init {
                        Some(init) => self.evaluate(init, Some(scope)),
                        None => Value::Undefined,
                    };
                    self.bind_pattern(pattern, value, scope, Some(scope));
                }
                Flow::Normal
            }
            Stmt::Return(argument) => Flow::Return(match argument {
                Some(argument) => self.evaluate(argument, Some(scope)),
                None => Value::Undefined,
            }),
            Stmt::Expression(expr) => {
                self.evaluate(expr, Some(scope));
                Flow::Normal
            }
            Stmt::If { test, consequent, alternate } => {
                if self.evaluate(test, Some(scope)).is_truthy() {
                    self.execute(consequent, scope)
                } else if let Some(alternate) = alternate {
                    self.execute(alternate, scope)
                } else {
                    Flow::Normal
                }
            }
            Stmt::Block(statements) => self.execute_block(statements, &scope.child()),
            Stmt::Empty => Flow::Normal,
            Stmt::Unsupported(kind) => {
                self.ctx.report(Fault::UnsupportedFunction {
                    message: format!(
                        "The {} statement is not supported inside block-bodied arrow functions.",
                        kind
                    ),
                });
                Flow::Return(Value::Undefined)
            }
        }
    }
}

impl Closure {
    /// Runs the arrow in a fresh layer over its captured scope. Block bodies
    /// see `this` as their receiver; expression bodies inherit it lexically.
    pub(crate) fn invoke(&self, this: &Value, args: &[Value]) -> Result<Value, HostError> {
        let evaluator = Evaluator::new(Rc::clone(&self.ctx));
        let receiver = match self.arrow.body {
            ArrowBody::Block(_) => Some(this.clone()),
            ArrowBody::Expression(_) => None,
        };
        let layer = Scope::new(self.scope.clone(), receiver);
        evaluator.bind_parameters(self, &layer, args);
        trace!(params = self.arrow.params.len(), args = args.len(), "invoking arrow");

        Ok(match &self.arrow.body {
            ArrowBody::Expression(body) => evaluator.evaluate(body, Some(&layer)),
            ArrowBody::Block(statements) => match evaluator.execute_block(statements, &layer) {
                Flow::Return(value) => value,
                Flow::Normal => Value::Undefined,
            },
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// OPERATORS
// ═══════════════════════════════════════════════════════════════════════════════

fn binary(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    use BinaryOperator::*;
    match operator {
        Addition => {
            let stringy = |v: &Value| {
                matches!(
                    v,
                    Value::String(_) | Value::Array(_) | Value::Object(_) | Value::Element(_) | Value::Function(_)
                )
            };
            if stringy(left) || stringy(right) {
                Value::String(left.to_js_string() + &right.to_js_string())
            } else {
                Value::Number(left.to_number() + right.to_number())
            }
        }
        Subtraction => Value::Number(left.to_number() - right.to_number()),
        Multiplication => Value::Number(left.to_number() * right.to_number()),
        Division => Value::Number(left.to_number() / right.to_number()),
        Remainder => Value::Number(left.to_number() % right.to_number()),
        Exponential => Value::Number(power(left.to_number(), right.to_number())),
        Equality => Value::Bool(left.loose_equals(right)),
        Inequality => Value::Bool(!left.loose_equals(right)),
        StrictEquality => Value::Bool(left.strict_equals(right)),
        StrictInequality => Value::Bool(!left.strict_equals(right)),
        LessThan => Value::Bool(left.compare(right).is_some_and(|o| o.is_lt())),
        LessEqualThan => Value::Bool(left.compare(right).is_some_and(|o| o.is_le())),
        GreaterThan => Value::Bool(left.compare(right).is_some_and(|o| o.is_gt())),
        GreaterEqualThan => Value::Bool(left.compare(right).is_some_and(|o| o.is_ge())),
        _ => Value::Undefined,
    }
}

/// `**`: unlike `powf`, `1 ** NaN` and `(±1) ** ±Infinity` are NaN.
fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

fn unary(operator: UnaryOperator, value: &Value) -> Value {
    match operator {
        UnaryOperator::UnaryPlus => Value::Number(value.to_number()),
        UnaryOperator::UnaryNegation => Value::Number(-value.to_number()),
        UnaryOperator::LogicalNot => Value::Bool(!value.is_truthy()),
        UnaryOperator::Typeof => Value::from(value.type_of()),
        _ => Value::Undefined,
    }
}

fn property_name(key: &Value) -> String {
    match key {
        Value::Number(n) => number_to_string(*n),
        other => other.to_js_string(),
    }
}

/// Name reported for the root of a failed member chain.
fn root_name(root: &Expr) -> String {
    match &root.kind {
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::This => "this".to_string(),
        _ => "unknown".to_string(),
    }
}

/// Short source-like rendering of an expression for diagnostics.
fn describe(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::This => "this".to_string(),
        ExprKind::Member { object, property, optional } => {
            let link = if *optional { "?." } else { "." };
            match property {
                PropertyKey::Static(name) => format!("{}{}{}", describe(object), link, name),
                PropertyKey::Computed(_) => format!("{}[…]", describe(object)),
            }
        }
        ExprKind::Call { callee_source, .. } => format!("{}()", callee_source),
        ExprKind::Literal(Literal::String(s)) => format!("{:?}", s),
        ExprKind::Literal(Literal::Number(n)) => number_to_string(*n),
        _ => "expression".to_string(),
    }
}
