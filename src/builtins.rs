//! The ambient global layer: `Math`, `Date`, `JSON`, coercion functions and
//! the `Array`/`Object` helpers.
//!
//! Globals are rebuilt on every lookup so nothing is shared between
//! renders. Dates are interpreted in UTC.

use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::HostError;
use crate::function::Function;
use crate::methods::{arg, own_entries};
use crate::value::{Object, Value};

fn native<F>(name: &str, call: F) -> Value
where
    F: Fn(&[Value]) -> Result<Value, HostError> + 'static,
{
    Value::Function(Function::native(name, move |_this, args| call(args)))
}

fn math_fn(name: &str, op: fn(f64) -> f64) -> Value {
    native(name, move |args| Ok(Value::from(op(arg(args, 0).to_number()))))
}

pub fn global(name: &str) -> Option<Value> {
    let value = match name {
        "undefined" => Value::Undefined,
        "NaN" => Value::Number(f64::NAN),
        "Infinity" => Value::Number(f64::INFINITY),
        "Math" => math(),
        "Date" => native("Date", |args| Ok(date_from_args(args))),
        "JSON" => json(),
        "Number" => native("Number", |args| {
            Ok(Value::from(args.first().map(Value::to_number).unwrap_or(0.0)))
        }),
        "String" => native("String", |args| {
            Ok(Value::from(args.first().map(Value::to_js_string).unwrap_or_default()))
        }),
        "Boolean" => native("Boolean", |args| Ok(Value::from(arg(args, 0).is_truthy()))),
        "parseInt" => native("parseInt", |args| {
            Ok(Value::from(parse_int(&arg(args, 0).to_js_string(), &arg(args, 1))))
        }),
        "parseFloat" => native("parseFloat", |args| {
            Ok(Value::from(parse_float(&arg(args, 0).to_js_string())))
        }),
        "isNaN" => native("isNaN", |args| Ok(Value::from(arg(args, 0).to_number().is_nan()))),
        "Array" => [(
            "isArray",
            native("isArray", |args| Ok(Value::from(matches!(arg(args, 0), Value::Array(_))))),
        )]
        .into_iter()
        .collect(),
        "Object" => [
            (
                "keys",
                native("keys", |args| {
                    Ok(own_entries(&arg(args, 0))
                        .into_iter()
                        .map(|(key, _)| Value::from(key))
                        .collect::<Vec<_>>()
                        .into())
                }),
            ),
            (
                "values",
                native("values", |args| {
                    Ok(own_entries(&arg(args, 0))
                        .into_iter()
                        .map(|(_, value)| value)
                        .collect::<Vec<_>>()
                        .into())
                }),
            ),
            (
                "entries",
                native("entries", |args| {
                    Ok(own_entries(&arg(args, 0))
                        .into_iter()
                        .map(|(key, value)| Value::from(vec![Value::from(key), value]))
                        .collect::<Vec<_>>()
                        .into())
                }),
            ),
        ]
        .into_iter()
        .collect(),
        _ => return None,
    };
    Some(value)
}

// ═══════════════════════════════════════════════════════════════════════════════
// MATH
// ═══════════════════════════════════════════════════════════════════════════════

fn math() -> Value {
    let mut math = Object::new();
    math.insert("PI".into(), Value::from(std::f64::consts::PI));
    math.insert("E".into(), Value::from(std::f64::consts::E));
    math.insert(
        "max".into(),
        native("max", |args| {
            let mut max = f64::NEG_INFINITY;
            for value in args {
                let n = value.to_number();
                if n.is_nan() {
                    return Ok(Value::from(f64::NAN));
                }
                max = max.max(n);
            }
            Ok(Value::from(max))
        }),
    );
    math.insert(
        "min".into(),
        native("min", |args| {
            let mut min = f64::INFINITY;
            for value in args {
                let n = value.to_number();
                if n.is_nan() {
                    return Ok(Value::from(f64::NAN));
                }
                min = min.min(n);
            }
            Ok(Value::from(min))
        }),
    );
    math.insert(
        "pow".into(),
        native("pow", |args| {
            Ok(Value::from(arg(args, 0).to_number().powf(arg(args, 1).to_number())))
        }),
    );
    math.insert("abs".into(), math_fn("abs", f64::abs));
    math.insert("floor".into(), math_fn("floor", f64::floor));
    math.insert("ceil".into(), math_fn("ceil", f64::ceil));
    // Halves round toward +Infinity.
    math.insert("round".into(), math_fn("round", |n| (n + 0.5).floor()));
    math.insert("sqrt".into(), math_fn("sqrt", f64::sqrt));
    math.insert("trunc".into(), math_fn("trunc", f64::trunc));
    math.insert(
        "sign".into(),
        math_fn("sign", |n| if n.is_nan() || n == 0.0 { n } else { n.signum() }),
    );
    math.insert("random".into(), native("random", |_| Ok(Value::from(random_unit()))));
    Value::Object(Rc::new(math))
}

/// Uniform in `[0, 1)` from 53 random bits.
fn random_unit() -> f64 {
    let mut bytes = [0u8; 8];
    if getrandom::fill(&mut bytes).is_err() {
        return 0.0;
    }
    (u64::from_le_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64
}

// ═══════════════════════════════════════════════════════════════════════════════
// JSON & NUMBER PARSING
// ═══════════════════════════════════════════════════════════════════════════════

fn json() -> Value {
    [(
        "stringify",
        native("stringify", |args| {
            let value = arg(args, 0);
            if matches!(value, Value::Undefined | Value::Function(_)) {
                return Ok(Value::Undefined);
            }
            let json = value.to_json();
            let indent = match arg(args, 2) {
                Value::Number(n) => " ".repeat(n.clamp(0.0, 10.0) as usize),
                Value::String(s) => s.chars().take(10).collect(),
                _ => String::new(),
            };
            let text = if indent.is_empty() {
                serde_json::to_string(&json)
            } else {
                let mut out = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
                let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
                serde::Serialize::serialize(&json, &mut serializer)
                    .map(|_| String::from_utf8_lossy(&out).into_owned())
            };
            text.map(Value::from)
                .map_err(|err| HostError::Type(err.to_string()))
        }),
    )]
    .into_iter()
    .collect()
}

fn parse_int(input: &str, radix: &Value) -> f64 {
    let mut s = input.trim_start();
    let negative = s.starts_with('-');
    if negative || s.starts_with('+') {
        s = &s[1..];
    }
    let mut radix = match radix {
        Value::Undefined => 0,
        r => r.to_number() as u32,
    };
    if radix == 0 || radix == 16 {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }
    if !(2..=36).contains(&radix) {
        return f64::NAN;
    }
    let digits: String = s.chars().take_while(|c| c.is_digit(radix)).collect();
    if digits.is_empty() {
        return f64::NAN;
    }
    let value = digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64);
    if negative {
        -value
    } else {
        value
    }
}

fn parse_float(input: &str) -> f64 {
    let s = input.trim_start();
    for prefix in ["Infinity", "+Infinity"] {
        if s.starts_with(prefix) {
            return f64::INFINITY;
        }
    }
    if s.starts_with("-Infinity") {
        return f64::NEG_INFINITY;
    }
    // Longest prefix that parses as a decimal literal.
    let candidate: String = s
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .collect();
    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

// ═══════════════════════════════════════════════════════════════════════════════
// DATE
// ═══════════════════════════════════════════════════════════════════════════════

const MS_PER_DAY: f64 = 86_400_000.0;

/// Years past this cannot land inside the ±8.64e15 ms time range.
const MAX_YEAR: f64 = 275_761.0;

fn now_ms() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

/// Days since 1970-01-01 for a proleptic Gregorian date (`month` 1-based).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = if month > 2 { month - 3 } else { month + 9 };
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`]: `(year, month 1-based, day)`.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    (if m <= 2 { y + 1 } else { y }, m, d)
}

/// `month` is 0-based and may overflow into the next year, as in `Date.UTC`.
fn make_time(year: f64, month: f64, day: f64, h: f64, min: f64, s: f64, ms: f64) -> f64 {
    let parts = [year, month, day, h, min, s, ms];
    if parts.iter().any(|p| !p.is_finite()) {
        return f64::NAN;
    }
    let year = year.trunc() + (month.trunc() / 12.0).floor();
    if year.abs() > MAX_YEAR {
        return f64::NAN;
    }
    let month = month.trunc().rem_euclid(12.0) as i64 + 1;
    let days = days_from_civil(year as i64, month, 1) as f64 + day.trunc() - 1.0;
    days * MS_PER_DAY + h.trunc() * 3_600_000.0 + min.trunc() * 60_000.0 + s.trunc() * 1000.0 + ms.trunc()
}

/// `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM[:SS[.sss]][Z]`, read as UTC.
fn parse_iso_date(text: &str) -> f64 {
    let text = text.trim().trim_end_matches('Z');
    let (date, time) = match text.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (text, None),
    };
    let date: Vec<f64> = date.split('-').map(|p| p.parse().unwrap_or(f64::NAN)).collect();
    let (year, month, day) = match date.as_slice() {
        [y] => (*y, 1.0, 1.0),
        [y, m] => (*y, *m, 1.0),
        [y, m, d] => (*y, *m, *d),
        _ => return f64::NAN,
    };
    let mut clock = [0.0; 3];
    if let Some(time) = time {
        for (slot, part) in clock.iter_mut().zip(time.split(':')) {
            *slot = part.parse().unwrap_or(f64::NAN);
        }
    }
    let seconds = clock[2];
    make_time(
        year,
        month - 1.0,
        day,
        clock[0],
        clock[1],
        seconds.trunc(),
        (seconds.fract() * 1000.0).round(),
    )
}

fn date_from_args(args: &[Value]) -> Value {
    let ms = match args {
        [] => now_ms(),
        [Value::String(text)] => parse_iso_date(text),
        [single] => single.to_number(),
        many => {
            let n = |i: usize, default: f64| many.get(i).map(Value::to_number).unwrap_or(default);
            make_time(n(0, f64::NAN), n(1, 0.0), n(2, 1.0), n(3, 0.0), n(4, 0.0), n(5, 0.0), n(6, 0.0))
        }
    };
    date_object(ms)
}

fn date_field(valid: bool, value: f64) -> impl Fn(&[Value]) -> Result<Value, HostError> {
    move |_| Ok(Value::from(if valid { value } else { f64::NAN }))
}

fn date_object(ms: f64) -> Value {
    let valid = ms.is_finite() && ms.abs() <= 8.64e15;
    let ms = if valid { ms.trunc() } else { f64::NAN };
    let days = (ms / MS_PER_DAY).floor();
    let ms_in_day = ms - days * MS_PER_DAY;
    let (year, month, day) = if valid { civil_from_days(days as i64) } else { (0, 1, 1) };

    let mut date = Object::new();
    date.insert("getFullYear".into(), native("getFullYear", date_field(valid, year as f64)));
    date.insert("getMonth".into(), native("getMonth", date_field(valid, (month - 1) as f64)));
    date.insert("getDate".into(), native("getDate", date_field(valid, day as f64)));
    date.insert(
        "getDay".into(),
        native("getDay", date_field(valid, ((days as i64 + 4).rem_euclid(7)) as f64)),
    );
    date.insert("getHours".into(), native("getHours", date_field(valid, (ms_in_day / 3_600_000.0).floor())));
    date.insert(
        "getMinutes".into(),
        native("getMinutes", date_field(valid, (ms_in_day / 60_000.0).floor() % 60.0)),
    );
    date.insert(
        "getSeconds".into(),
        native("getSeconds", date_field(valid, (ms_in_day / 1000.0).floor() % 60.0)),
    );
    date.insert("getMilliseconds".into(), native("getMilliseconds", date_field(valid, ms_in_day % 1000.0)));
    date.insert("getTime".into(), native("getTime", date_field(valid, ms)));
    date.insert("valueOf".into(), native("valueOf", date_field(valid, ms)));
    date.insert("getTimezoneOffset".into(), native("getTimezoneOffset", date_field(valid, 0.0)));
    date.insert(
        "toISOString".into(),
        native("toISOString", move |_| {
            if !valid {
                return Err(HostError::Range("Invalid time value".into()));
            }
            Ok(Value::from(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
                year,
                month,
                day,
                (ms_in_day / 3_600_000.0).floor(),
                (ms_in_day / 60_000.0).floor() % 60.0,
                (ms_in_day / 1000.0).floor() % 60.0,
                ms_in_day % 1000.0
            )))
        }),
    );
    Value::Object(Rc::new(date))
}
