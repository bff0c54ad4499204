//! Runtime values produced by evaluating markup expressions.
//!
//! Arrays and objects are immutable once built and shared by reference
//! counting. Coercions follow the usual JavaScript rules so operators and
//! builtins behave the way markup authors expect.

use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::component::ComponentRef;
use crate::function::Function;

/// Insertion-ordered property map used for objects and element props.
pub type Object = IndexMap<String, Value>;

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Rc<Vec<Value>>),
    Object(Rc<Object>),
    Function(Function),
    Element(Rc<ElementDescriptor>),
    Component(ComponentRef),
}

// ═══════════════════════════════════════════════════════════════════════════════
// ELEMENT DESCRIPTORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Name(String),
    Component(ComponentRef),
    Fragment,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Children {
    #[default]
    None,
    One(Value),
    Many(Vec<Value>),
}

impl Children {
    pub fn from_values(mut values: Vec<Value>) -> Self {
        match values.len() {
            0 => Children::None,
            1 => Children::One(values.remove(0)),
            _ => Children::Many(values),
        }
    }

    /// The children as a single value, the shape a host component sees.
    pub fn to_value(&self) -> Value {
        match self {
            Children::None => Value::Undefined,
            Children::One(value) => value.clone(),
            Children::Many(values) => Value::Array(Rc::new(values.clone())),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Children::None => 0,
            Children::One(_) => 1,
            Children::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Children::None => None,
            Children::One(value) => (index == 0).then_some(value),
            Children::Many(values) => values.get(index),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementDescriptor {
    pub tag: Tag,
    pub props: Object,
    pub children: Children,
    pub key: Option<String>,
}

impl ElementDescriptor {
    pub fn new(tag: Tag, props: Object, children: Children, key: Option<String>) -> Self {
        Self {
            tag,
            props,
            children,
            key,
        }
    }

    pub fn fragment(children: Children, key: Option<String>) -> Self {
        Self::new(Tag::Fragment, Object::new(), children, key)
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.tag {
            Tag::Name(name) => Some(name),
            _ => None,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..self.clone()
        }
    }

    /// Props plus `children`, the object a host component receives.
    pub fn props_with_children(&self) -> Object {
        let mut props = self.props.clone();
        if !self.children.is_empty() {
            props.insert("children".to_string(), self.children.to_value());
        }
        props
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONSTRUCTORS
// ═══════════════════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Array(Rc::new(values))
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(Rc::new(object))
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(function)
    }
}

impl From<ElementDescriptor> for Value {
    fn from(element: ElementDescriptor) -> Self {
        Value::Element(Rc::new(element))
    }
}

impl From<ComponentRef> for Value {
    fn from(component: ComponentRef) -> Self {
        Value::Component(component)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let object: Object = iter
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Value::from(object)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COERCIONS
// ═══════════════════════════════════════════════════════════════════════════════

impl Value {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementDescriptor> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Own property lookup on objects; `None` for everything else.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|object| object.get(key))
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) | Value::Component(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) | Value::Element(_) => "object",
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            _ => f64::NAN,
        }
    }

    /// ToString, as used by concatenation and template literals.
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_js_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) | Value::Element(_) => "[object Object]".to_string(),
            Value::Function(function) => format!("function {}() {{ [native code] }}", function.name()),
            Value::Component(component) => format!("function {}() {{ [native code] }}", component.name()),
        }
    }

    fn is_primitive(&self) -> bool {
        matches!(
            self,
            Value::Undefined | Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    fn to_primitive(&self) -> Value {
        if self.is_primitive() {
            self.clone()
        } else {
            Value::String(self.to_js_string())
        }
    }

    /// `===`
    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Element(a), Value::Element(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Component(a), Value::Component(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// `==`
    pub fn loose_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
                self.to_number() == other.to_number()
            }
            (Value::Bool(_), _) => Value::Number(self.to_number()).loose_equals(other),
            (_, Value::Bool(_)) => self.loose_equals(&Value::Number(other.to_number())),
            (a, b) if a.is_primitive() && !b.is_primitive() => a.loose_equals(&b.to_primitive()),
            (a, b) if !a.is_primitive() && b.is_primitive() => a.to_primitive().loose_equals(b),
            _ => self.strict_equals(other),
        }
    }

    /// Abstract relational comparison. `None` when either side is NaN.
    pub fn compare(&self, other: &Value) -> Option<std::cmp::Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        match (&left, &right) {
            (Value::String(a), Value::String(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
            _ => left.to_number().partial_cmp(&right.to_number()),
        }
    }

    /// Converts to JSON, dropping functions and `undefined` object members.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            // Integral values serialize without a fraction, as `1` rather than `1.0`.
            Value::Number(n) if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 => {
                serde_json::Value::from(*n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(|item| item.to_json()).collect())
            }
            Value::Object(object) => serde_json::Value::Object(
                object
                    .iter()
                    .filter(|(_, value)| !matches!(value, Value::Undefined | Value::Function(_)))
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Value::Element(element) => element_to_json(element),
            Value::Function(_) | Value::Component(_) => serde_json::Value::Null,
        }
    }

    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => items.iter().map(Value::from_json).collect::<Vec<_>>().into(),
            serde_json::Value::Object(map) => map
                .iter()
                .map(|(key, value)| (key.clone(), Value::from_json(value)))
                .collect(),
        }
    }
}

fn element_to_json(element: &ElementDescriptor) -> serde_json::Value {
    let tag = match &element.tag {
        Tag::Name(name) => serde_json::Value::String(name.clone()),
        Tag::Component(component) => serde_json::Value::String(component.name().to_string()),
        Tag::Fragment => serde_json::Value::String("#fragment".to_string()),
    };
    let props = Value::Object(Rc::new(element.props.clone())).to_json();
    let children = match &element.children {
        Children::None => serde_json::Value::Null,
        Children::One(child) => child.to_json(),
        Children::Many(children) => {
            serde_json::Value::Array(children.iter().map(|child| child.to_json()).collect())
        }
    };
    serde_json::json!({
        "tag": tag,
        "props": props,
        "children": children,
        "key": element.key,
    })
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let lower = trimmed.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if lower.contains("inf") || lower.contains("nan") => f64::NAN,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Number::toString with the shortest round-tripping digits.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }
    if n.fract() == 0.0 {
        return format!("{:.0}", n);
    }
    format!("{}", n)
}

// ═══════════════════════════════════════════════════════════════════════════════
// EQUALITY & DEBUG
// ═══════════════════════════════════════════════════════════════════════════════

/// Structural equality, used by tests and prop comparison. Functions and
/// components compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Element(a), Value::Element(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Component(a), Value::Component(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", number_to_string(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(object) => f.debug_map().entries(object.iter()).finish(),
            Value::Function(function) => write!(f, "[Function {}]", function.name()),
            Value::Element(element) => fmt::Debug::fmt(element.as_ref(), f),
            Value::Component(component) => write!(f, "[Component {}]", component.name()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        assert_eq!(number_to_string(1.0), "1");
        assert_eq!(number_to_string(-75.0), "-75");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(f64::NAN), "NaN");
    }

    #[test]
    fn test_loose_and_strict_equality() {
        let one = Value::from(1);
        let one_str = Value::from("1");
        assert!(one.loose_equals(&one_str));
        assert!(!one.strict_equals(&one_str));
        assert!(Value::Null.loose_equals(&Value::Undefined));
        assert!(!Value::Null.strict_equals(&Value::Undefined));
        assert!(Value::from(true).loose_equals(&one));
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::from(Vec::new()).is_truthy());
        assert!(Value::from("0").is_truthy());
    }

    #[test]
    fn test_array_to_string_skips_nullish() {
        let value = Value::from(vec![Value::from(1), Value::Null, Value::from("x")]);
        assert_eq!(value.to_js_string(), "1,,x");
    }

    #[test]
    fn test_json_drops_functions_and_undefined() {
        let value: Value = vec![
            ("a", Value::from(1)),
            ("b", Value::Undefined),
            ("c", Value::from("x")),
        ]
        .into_iter()
        .collect();
        assert_eq!(value.to_json(), serde_json::json!({ "a": 1, "c": "x" }));
    }
}
