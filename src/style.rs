//! Inline `style="…"` strings to property maps.

use crate::value::{Object, Value};

/// Parses `"prop: value; prop2: value2"` into camel-cased keys.
///
/// Declarations without a colon or with an empty name are dropped. Custom
/// properties (`--name`) keep their spelling.
pub fn parse_style(style: &str) -> Object {
    let mut parsed = Object::new();
    for declaration in style.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        parsed.insert(camel_case_property(name), Value::from(value.trim()));
    }
    parsed
}

fn camel_case_property(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let lower = name.to_ascii_lowercase();
    // `-ms-` is the one vendor prefix whose leading letter stays lowercase.
    let body = match lower.strip_prefix("-ms-") {
        Some(rest) => format!("ms-{}", rest),
        None => lower.strip_prefix('-').map(str::to_string).unwrap_or(lower.clone()),
    };
    let capitalize_first = lower.starts_with('-') && !lower.starts_with("-ms-");

    let mut out = String::with_capacity(body.len());
    let mut upper_next = capitalize_first;
    for ch in body.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Inverse of the camel-casing, for serializing a style map back to CSS.
pub fn kebab_case_property(name: &str) -> String {
    if name.starts_with("--") {
        return name.to_string();
    }
    let mut out = String::with_capacity(name.len() + 4);
    if name.starts_with("ms") && name.chars().nth(2).is_some_and(|c| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
