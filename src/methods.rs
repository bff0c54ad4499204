//! Property access on runtime values.
//!
//! Own properties of objects come first; everything else (string, number,
//! array and function methods, element fields) is synthesized here as a
//! native function closed over its receiver.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::HostError;
use crate::function::Function;
use crate::value::{number_to_string, Tag, Value};

pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn callback(args: &[Value], method: &str) -> Result<Function, HostError> {
    match args.first() {
        Some(Value::Function(function)) => Ok(function.clone()),
        Some(other) => Err(HostError::Type(format!(
            "{} is not a function (in {})",
            other.to_js_string(),
            method
        ))),
        None => Err(HostError::Type(format!("undefined is not a function (in {})", method))),
    }
}

fn method<F>(name: &str, receiver: &Value, body: F) -> Value
where
    F: Fn(&Value, &[Value]) -> Result<Value, HostError> + 'static,
{
    let receiver = receiver.clone();
    Value::Function(Function::native(name, move |_this, args| body(&receiver, args)))
}

/// ToIntegerOrInfinity
fn to_integer(value: &Value) -> f64 {
    let n = value.to_number();
    if n.is_nan() {
        0.0
    } else {
        n.trunc()
    }
}

/// Longest string the engine will build, in UTF-16 code units.
const MAX_STRING_LENGTH: usize = (1 << 29) - 24;

fn invalid_length() -> HostError {
    HostError::Range("Invalid string length".into())
}

/// Rejects a result length of `unit * count` code units past [`MAX_STRING_LENGTH`].
fn checked_length(unit: usize, count: f64) -> Result<usize, HostError> {
    if count > MAX_STRING_LENGTH as f64 {
        return if unit == 0 { Ok(0) } else { Err(invalid_length()) };
    }
    match unit.checked_mul(count as usize) {
        Some(total) if total <= MAX_STRING_LENGTH => Ok(count as usize),
        _ => Err(invalid_length()),
    }
}

/// Clamps a possibly negative relative index into `0..=len`.
fn relative_index(value: &Value, len: usize, default: usize) -> usize {
    if value.is_undefined() {
        return default;
    }
    let n = to_integer(value);
    let len_f = len as f64;
    if n < 0.0 {
        (len_f + n).max(0.0) as usize
    } else {
        n.min(len_f) as usize
    }
}

fn array_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index.to_string() == key).then_some(index)
}

/// `[[Get]]` for every value kind. Missing properties are `undefined`.
pub fn get_property(target: &Value, key: &str) -> Value {
    match target {
        Value::Object(object) => object.get(key).cloned().unwrap_or_default(),
        Value::Array(items) => array_property(target, items, key),
        Value::String(s) => string_property(target, s, key),
        Value::Number(_) => number_property(target, key),
        Value::Bool(_) => match key {
            "toString" => method("toString", target, |this, _| Ok(Value::from(this.to_js_string()))),
            _ => Value::Undefined,
        },
        Value::Function(function) => function_property(function, key),
        Value::Element(element) => match key {
            "props" => Value::from(element.props_with_children()),
            "key" => element.key.clone().map(Value::from).unwrap_or(Value::Null),
            "type" => match &element.tag {
                Tag::Name(name) => Value::from(name.as_str()),
                Tag::Component(component) => Value::Component(component.clone()),
                Tag::Fragment => Value::from("#fragment"),
            },
            _ => Value::Undefined,
        },
        Value::Component(component) => match key {
            "name" | "displayName" => Value::from(component.name()),
            _ => Value::Undefined,
        },
        Value::Undefined | Value::Null => Value::Undefined,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FUNCTIONS
// ═══════════════════════════════════════════════════════════════════════════════

fn function_property(function: &Function, key: &str) -> Value {
    let receiver = Value::Function(function.clone());
    match key {
        "name" => Value::from(function.name()),
        "call" => method("call", &receiver, |this, args| {
            let target = expect_function(this)?;
            target.call(&arg(args, 0), args.get(1..).unwrap_or(&[]))
        }),
        "apply" => method("apply", &receiver, |this, args| {
            let target = expect_function(this)?;
            target.apply(&arg(args, 0), &arg(args, 1))
        }),
        "bind" => method("bind", &receiver, |this, args| {
            let target = expect_function(this)?;
            let bound = target.bind(arg(args, 0));
            let partial: Vec<Value> = args.get(1..).unwrap_or(&[]).to_vec();
            if partial.is_empty() {
                return Ok(Value::Function(bound));
            }
            let name = bound.name();
            Ok(Value::Function(Function::native(name, move |this, rest| {
                let mut all = partial.clone();
                all.extend_from_slice(rest);
                bound.call(this, &all)
            })))
        }),
        _ => Value::Undefined,
    }
}

fn expect_function(value: &Value) -> Result<&Function, HostError> {
    value
        .as_function()
        .ok_or_else(|| HostError::Type(format!("{} is not a function", value.type_of())))
}

// ═══════════════════════════════════════════════════════════════════════════════
// NUMBERS
// ═══════════════════════════════════════════════════════════════════════════════

fn number_property(target: &Value, key: &str) -> Value {
    match key {
        "toFixed" => method("toFixed", target, |this, args| {
            let digits = to_integer(&arg(args, 0));
            if !(0.0..=100.0).contains(&digits) {
                return Err(HostError::Range("toFixed() digits argument must be between 0 and 100".into()));
            }
            Ok(Value::from(to_fixed(this.to_number(), digits as usize)))
        }),
        "toPrecision" => method("toPrecision", target, |this, args| {
            let precision = arg(args, 0);
            if precision.is_undefined() {
                return Ok(Value::from(this.to_js_string()));
            }
            let precision = to_integer(&precision);
            if !(1.0..=100.0).contains(&precision) {
                return Err(HostError::Range("toPrecision() argument must be between 1 and 100".into()));
            }
            Ok(Value::from(to_precision(this.to_number(), precision as usize)))
        }),
        "toString" => method("toString", target, |this, args| {
            let radix = arg(args, 0);
            let radix = if radix.is_undefined() { 10.0 } else { to_integer(&radix) };
            if !(2.0..=36.0).contains(&radix) {
                return Err(HostError::Range("toString() radix must be between 2 and 36".into()));
            }
            Ok(Value::from(to_radix_string(this.to_number(), radix as u32)))
        }),
        "valueOf" => method("valueOf", target, |this, _| Ok(this.clone())),
        _ => Value::Undefined,
    }
}

pub(crate) fn to_fixed(n: f64, digits: usize) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return number_to_string(n);
    }
    let scale = 10f64.powi(digits as i32);
    let scaled = n.abs() * scale;
    // Exact ties round away from zero, unlike the formatter's half-to-even.
    if scaled.fract() == 0.5 && scaled < 9_007_199_254_740_992.0 {
        let rounded = (scaled.floor() + 1.0) / scale;
        let formatted = format!("{:.*}", digits, rounded);
        return if n < 0.0 { format!("-{}", formatted) } else { formatted };
    }
    let formatted = format!("{:.*}", digits, n);
    // `-0.00` prints as `0.00`.
    if formatted.starts_with('-') && formatted[1..].chars().all(|c| c == '0' || c == '.') {
        formatted[1..].to_string()
    } else {
        formatted
    }
}

fn to_precision(n: f64, precision: usize) -> String {
    if !n.is_finite() {
        return number_to_string(n);
    }
    if n == 0.0 {
        return if precision > 1 {
            format!("0.{}", "0".repeat(precision - 1))
        } else {
            "0".to_string()
        };
    }
    let exponential = format!("{:.*e}", precision - 1, n);
    let (mantissa, exponent) = exponential.split_once('e').unwrap_or((&exponential, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -6 || exponent >= precision as i32 {
        let sign = if exponent < 0 { "-" } else { "+" };
        return format!("{}e{}{}", mantissa, sign, exponent.abs());
    }
    let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
    format!("{:.*}", decimals, n)
}

fn to_radix_string(n: f64, radix: u32) -> String {
    if radix == 10 || !n.is_finite() || n.fract() != 0.0 || n.abs() >= 9_007_199_254_740_992.0 {
        return number_to_string(n);
    }
    let mut value = n.abs() as u64;
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        let digit = (value % radix as u64) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        value /= radix as u64;
    }
    if n < 0.0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// STRINGS
// ═══════════════════════════════════════════════════════════════════════════════

fn char_index_of(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

fn chars_of(value: &Value) -> Vec<char> {
    value.to_js_string().chars().collect()
}

fn string_property(target: &Value, s: &str, key: &str) -> Value {
    if key == "length" {
        return Value::from(s.chars().count());
    }
    if let Some(index) = array_index(key) {
        return s
            .chars()
            .nth(index)
            .map(|c| Value::from(c.to_string()))
            .unwrap_or_default();
    }
    match key {
        "startsWith" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let needle = chars_of(&arg(args, 0));
            let start = relative_index(&arg(args, 1), chars.len(), 0);
            Ok(Value::from(chars[start..].starts_with(&needle)))
        }),
        "endsWith" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let needle = chars_of(&arg(args, 0));
            let end = relative_index(&arg(args, 1), chars.len(), chars.len());
            Ok(Value::from(chars[..end].ends_with(&needle)))
        }),
        "includes" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let from = relative_index(&arg(args, 1), chars.len(), 0);
            Ok(Value::from(char_index_of(&chars, &chars_of(&arg(args, 0)), from).is_some()))
        }),
        "indexOf" | "search" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let from = relative_index(&arg(args, 1), chars.len(), 0);
            Ok(match char_index_of(&chars, &chars_of(&arg(args, 0)), from) {
                Some(index) => Value::from(index),
                None => Value::from(-1),
            })
        }),
        "substr" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let start = relative_index(&arg(args, 0), chars.len(), 0);
            let length = match arg(args, 1) {
                Value::Undefined => chars.len() - start,
                len => to_integer(&len).clamp(0.0, (chars.len() - start) as f64) as usize,
            };
            Ok(Value::from(chars[start..start + length].iter().collect::<String>()))
        }),
        "substring" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let clamp = |v: &Value, default: usize| {
                if v.is_undefined() {
                    default
                } else {
                    to_integer(v).clamp(0.0, chars.len() as f64) as usize
                }
            };
            let a = clamp(&arg(args, 0), 0);
            let b = clamp(&arg(args, 1), chars.len());
            let (start, end) = if a <= b { (a, b) } else { (b, a) };
            Ok(Value::from(chars[start..end].iter().collect::<String>()))
        }),
        "slice" => method(key, target, |this, args| {
            let chars = chars_of(this);
            let start = relative_index(&arg(args, 0), chars.len(), 0);
            let end = relative_index(&arg(args, 1), chars.len(), chars.len());
            Ok(Value::from(if start < end {
                chars[start..end].iter().collect::<String>()
            } else {
                String::new()
            }))
        }),
        "charAt" => method(key, target, |this, args| {
            let index = to_integer(&arg(args, 0));
            let c = if index < 0.0 {
                None
            } else {
                this.to_js_string().chars().nth(index as usize)
            };
            Ok(Value::from(c.map(String::from).unwrap_or_default()))
        }),
        "replace" => method(key, target, |this, args| {
            let s = this.to_js_string();
            let pattern = arg(args, 0).to_js_string();
            let Some(at) = s.find(&pattern) else {
                return Ok(Value::from(s));
            };
            let replacement = match &arg(args, 1) {
                Value::Function(function) => function
                    .call(
                        &Value::Undefined,
                        &[
                            Value::from(pattern.as_str()),
                            Value::from(s[..at].chars().count()),
                            Value::from(s.as_str()),
                        ],
                    )?
                    .to_js_string(),
                other => other.to_js_string().replace("$&", &pattern),
            };
            Ok(Value::from(format!("{}{}{}", &s[..at], replacement, &s[at + pattern.len()..])))
        }),
        "split" => method(key, target, |this, args| {
            let s = this.to_js_string();
            let limit = match arg(args, 1) {
                Value::Undefined => usize::MAX,
                n => to_integer(&n).max(0.0) as usize,
            };
            let parts: Vec<Value> = match arg(args, 0) {
                Value::Undefined => vec![Value::from(s)],
                separator => {
                    let separator = separator.to_js_string();
                    if separator.is_empty() {
                        s.chars().map(|c| Value::from(c.to_string())).collect()
                    } else {
                        s.split(separator.as_str()).map(Value::from).collect()
                    }
                }
            };
            Ok(Value::from(parts.into_iter().take(limit).collect::<Vec<_>>()))
        }),
        "toUpperCase" => method(key, target, |this, _| Ok(Value::from(this.to_js_string().to_uppercase()))),
        "toLowerCase" => method(key, target, |this, _| Ok(Value::from(this.to_js_string().to_lowercase()))),
        "trim" => method(key, target, |this, _| Ok(Value::from(this.to_js_string().trim()))),
        "trimStart" => method(key, target, |this, _| Ok(Value::from(this.to_js_string().trim_start()))),
        "trimEnd" => method(key, target, |this, _| Ok(Value::from(this.to_js_string().trim_end()))),
        "concat" => method(key, target, |this, args| {
            let mut s = this.to_js_string();
            for part in args {
                s.push_str(&part.to_js_string());
            }
            Ok(Value::from(s))
        }),
        "repeat" => method(key, target, |this, args| {
            let count = to_integer(&arg(args, 0));
            if count < 0.0 || count.is_infinite() {
                return Err(HostError::Range(format!("Invalid count value: {}", number_to_string(count))));
            }
            let s = this.to_js_string();
            let count = checked_length(s.encode_utf16().count(), count)?;
            Ok(Value::from(s.repeat(count)))
        }),
        "padStart" | "padEnd" => {
            let at_start = key == "padStart";
            method(key, target, move |this, args| {
                let s = this.to_js_string();
                let width = to_integer(&arg(args, 0)).max(0.0);
                let filler = match arg(args, 1) {
                    Value::Undefined => " ".to_string(),
                    fill => fill.to_js_string(),
                };
                let current = s.chars().count();
                if width <= current as f64 || filler.is_empty() {
                    return Ok(Value::from(s));
                }
                let width = checked_length(1, width)?;
                let pad: String = filler.chars().cycle().take(width - current).collect();
                Ok(Value::from(if at_start { pad + &s } else { s + &pad }))
            })
        }
        "toString" | "valueOf" => method(key, target, |this, _| Ok(this.clone())),
        _ => Value::Undefined,
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// ARRAYS
// ═══════════════════════════════════════════════════════════════════════════════

/// SameValueZero
fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if x.is_nan() && y.is_nan() => true,
        _ => a.strict_equals(b),
    }
}

fn items_of(value: &Value) -> Rc<Vec<Value>> {
    match value {
        Value::Array(items) => Rc::clone(items),
        _ => Rc::new(Vec::new()),
    }
}

/// Runs `callback(element, index, array)` for each element until `visit` says stop.
fn for_each_callback<F>(this: &Value, args: &[Value], name: &str, mut visit: F) -> Result<(), HostError>
where
    F: FnMut(usize, &Value, Value) -> bool,
{
    let callback = callback(args, name)?;
    let receiver = arg(args, 1);
    let items = items_of(this);
    for (index, item) in items.iter().enumerate() {
        let result = callback.call(&receiver, &[item.clone(), Value::from(index), this.clone()])?;
        if !visit(index, item, result) {
            break;
        }
    }
    Ok(())
}

fn flatten_into(out: &mut Vec<Value>, items: &[Value], depth: f64) {
    for item in items {
        match item {
            Value::Array(inner) if depth >= 1.0 => flatten_into(out, inner, depth - 1.0),
            other => out.push(other.clone()),
        }
    }
}

fn default_sort_order(a: &Value, b: &Value) -> Ordering {
    match (a.is_undefined(), b.is_undefined()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => a
            .to_js_string()
            .encode_utf16()
            .cmp(b.to_js_string().encode_utf16()),
    }
}

/// Stable top-down merge sort. `after(a, b)` says whether `a` must follow
/// `b`. Any answer is accepted, so inconsistent comparators only scramble
/// the order.
fn merge_sort<F>(mut items: Vec<Value>, after: &mut F) -> Result<Vec<Value>, HostError>
where
    F: FnMut(&Value, &Value) -> Result<bool, HostError>,
{
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, after)?;
    let right = merge_sort(right, after)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(a), Some(b)) => after(a, b)?,
            _ => break,
        };
        merged.extend(if take_right { right.next() } else { left.next() });
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

fn array_property(target: &Value, items: &[Value], key: &str) -> Value {
    if key == "length" {
        return Value::from(items.len());
    }
    if let Some(index) = array_index(key) {
        return items.get(index).cloned().unwrap_or_default();
    }
    match key {
        "includes" => method(key, target, |this, args| {
            let needle = arg(args, 0);
            Ok(Value::from(items_of(this).iter().any(|item| same_value_zero(item, &needle))))
        }),
        "indexOf" => method(key, target, |this, args| {
            let needle = arg(args, 0);
            Ok(match items_of(this).iter().position(|item| item.strict_equals(&needle)) {
                Some(index) => Value::from(index),
                None => Value::from(-1),
            })
        }),
        "join" => method(key, target, |this, args| {
            let separator = match arg(args, 0) {
                Value::Undefined => ",".to_string(),
                sep => sep.to_js_string(),
            };
            let joined = items_of(this)
                .iter()
                .map(|item| if item.is_nullish() { String::new() } else { item.to_js_string() })
                .collect::<Vec<_>>()
                .join(&separator);
            Ok(Value::from(joined))
        }),
        "sort" => method(key, target, |this, args| {
            let mut sorted = items_of(this).as_ref().clone();
            match arg(args, 0) {
                Value::Undefined => sorted.sort_by(default_sort_order),
                Value::Function(compare) => {
                    let (defined, undefined): (Vec<Value>, Vec<Value>) =
                        sorted.into_iter().partition(|item| !item.is_undefined());
                    sorted = merge_sort(defined, &mut |a, b| {
                        let result = compare.call(&Value::Undefined, &[a.clone(), b.clone()])?;
                        Ok(result.to_number() > 0.0)
                    })?;
                    sorted.extend(undefined);
                }
                other => {
                    return Err(HostError::Type(format!(
                        "The comparison function must be either a function or undefined, got {}",
                        other.type_of()
                    )))
                }
            }
            Ok(Value::from(sorted))
        }),
        "slice" => method(key, target, |this, args| {
            let items = items_of(this);
            let start = relative_index(&arg(args, 0), items.len(), 0);
            let end = relative_index(&arg(args, 1), items.len(), items.len());
            Ok(Value::from(if start < end { items[start..end].to_vec() } else { Vec::new() }))
        }),
        "map" => method(key, target, |this, args| {
            let mut mapped = Vec::new();
            for_each_callback(this, args, "map", |_, _, result| {
                mapped.push(result);
                true
            })?;
            Ok(Value::from(mapped))
        }),
        "filter" => method(key, target, |this, args| {
            let mut kept = Vec::new();
            for_each_callback(this, args, "filter", |_, item, result| {
                if result.is_truthy() {
                    kept.push(item.clone());
                }
                true
            })?;
            Ok(Value::from(kept))
        }),
        "find" => method(key, target, |this, args| {
            let mut found = Value::Undefined;
            for_each_callback(this, args, "find", |_, item, result| {
                if result.is_truthy() {
                    found = item.clone();
                    return false;
                }
                true
            })?;
            Ok(found)
        }),
        "findIndex" => method(key, target, |this, args| {
            let mut found = Value::from(-1);
            for_each_callback(this, args, "findIndex", |index, _, result| {
                if result.is_truthy() {
                    found = Value::from(index);
                    return false;
                }
                true
            })?;
            Ok(found)
        }),
        "some" => method(key, target, |this, args| {
            let mut any = false;
            for_each_callback(this, args, "some", |_, _, result| {
                any = result.is_truthy();
                !any
            })?;
            Ok(Value::from(any))
        }),
        "every" => method(key, target, |this, args| {
            let mut all = true;
            for_each_callback(this, args, "every", |_, _, result| {
                all = result.is_truthy();
                all
            })?;
            Ok(Value::from(all))
        }),
        "forEach" => method(key, target, |this, args| {
            for_each_callback(this, args, "forEach", |_, _, _| true)?;
            Ok(Value::Undefined)
        }),
        "reduce" => method(key, target, |this, args| {
            let reducer = callback(args, "reduce")?;
            let items = items_of(this);
            let mut iter = items.iter().enumerate();
            let mut accumulator = match args.get(1) {
                Some(initial) => initial.clone(),
                None => match iter.next() {
                    Some((_, first)) => first.clone(),
                    None => {
                        return Err(HostError::Type("Reduce of empty array with no initial value".into()))
                    }
                },
            };
            for (index, item) in iter {
                accumulator = reducer.call(
                    &Value::Undefined,
                    &[accumulator, item.clone(), Value::from(index), this.clone()],
                )?;
            }
            Ok(accumulator)
        }),
        "concat" => method(key, target, |this, args| {
            let mut joined = items_of(this).as_ref().clone();
            for part in args {
                match part {
                    Value::Array(inner) => joined.extend(inner.iter().cloned()),
                    other => joined.push(other.clone()),
                }
            }
            Ok(Value::from(joined))
        }),
        "reverse" => method(key, target, |this, _| {
            let mut reversed = items_of(this).as_ref().clone();
            reversed.reverse();
            Ok(Value::from(reversed))
        }),
        "flat" => method(key, target, |this, args| {
            let depth = match arg(args, 0) {
                Value::Undefined => 1.0,
                d => to_integer(&d),
            };
            let mut flat = Vec::new();
            flatten_into(&mut flat, &items_of(this), depth);
            Ok(Value::from(flat))
        }),
        "at" => method(key, target, |this, args| {
            let items = items_of(this);
            let index = to_integer(&arg(args, 0));
            let resolved = if index < 0.0 { items.len() as f64 + index } else { index };
            if resolved < 0.0 {
                return Ok(Value::Undefined);
            }
            Ok(items.get(resolved as usize).cloned().unwrap_or_default())
        }),
        "toString" => method(key, target, |this, _| Ok(Value::from(this.to_js_string()))),
        _ => Value::Undefined,
    }
}

/// Own enumerable entries: object members, array indices or string characters.
pub(crate) fn own_entries(value: &Value) -> Vec<(String, Value)> {
    match value {
        Value::Object(object) => object.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item.clone()))
            .collect(),
        Value::String(s) => s
            .chars()
            .enumerate()
            .map(|(index, c)| (index.to_string(), Value::from(c.to_string())))
            .collect(),
        _ => Vec::new(),
    }
}

/// The members a spread (`...x`) expands to, or `None` when `x` is not iterable.
pub(crate) fn iterate(value: &Value) -> Option<Vec<Value>> {
    match value {
        Value::Array(items) => Some(items.as_ref().clone()),
        Value::String(s) => Some(s.chars().map(|c| Value::from(c.to_string())).collect()),
        _ => None,
    }
}
