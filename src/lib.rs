//! # JSX Parser Native
//!
//! Renders markup strings with embedded expressions into element descriptor
//! trees, evaluating every `{expression}` against caller-supplied bindings.
//!
//! ## Pipeline
//!
//! 1. **Parse**: the markup is trimmed, stripped of `<!DOCTYPE>`, wrapped in
//!    a synthetic `<root>` and parsed with oxc. The arena AST is lowered into
//!    the owned [`ast`] tree.
//! 2. **Evaluate**: [`evaluate::Evaluator`] walks expressions against the
//!    bindings, local function scopes and the ambient globals. Faults are
//!    reported through `on_error` and degrade the offending node to
//!    `undefined`.
//! 3. **Build**: [`builder::ElementBuilder`] turns markup elements into
//!    [`value::ElementDescriptor`]s, applying the tag and attribute
//!    blacklists, the unknown-element policy and identity keys.
//!
//! ## Evaluation Invariants
//!
//! 1. **No exceptions escape**: every fault funnels through `on_error`. Only
//!    a syntax failure at the markup root nulls the whole output.
//! 2. **Lookup order**: function-invocation layers, then the bindings, then
//!    the globals. A miss is `undefined`.
//! 3. **Sandboxed functions**: arrow functions are interpreted, never
//!    compiled. Block bodies support declarations, `return`, `if` and
//!    expression statements only.
//! 4. **No cross-render state**: every render reparses and re-evaluates.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod ast;
pub mod builder;
pub mod builtins;
pub mod component;
pub mod context;
pub mod error;
pub mod evaluate;
pub mod function;
pub mod html;
mod jsx_lowerer;
pub mod key;
pub mod methods;
pub mod options;
pub mod parse;
pub mod proxy;
pub mod render;
pub mod sanitize;
pub mod scope;
pub mod style;
pub mod tags;
pub mod value;

#[cfg(test)]
mod expression_tests;
#[cfg(test)]
mod function_tests;
#[cfg(test)]
mod lowering_tests;
#[cfg(test)]
mod parse_tests;

use std::cell::RefCell;
use std::rc::Rc;

pub use component::{ComponentRef, ComponentRegistry};
pub use error::{Fault, HostError};
pub use function::Function;
pub use html::to_static_markup;
pub use key::{KeySource, RandomKeys, SequentialKeys};
pub use options::{ParserConfig, ParserOptions};
pub use proxy::ClosureProxy;
pub use render::{render, JsxParser};
pub use sanitize::AttrPattern;
pub use value::{Children, ElementDescriptor, Object, Tag, Value};

/// Renders `markup` with a JSON-encoded [`ParserConfig`] and returns
/// `{ tree, errors: [{ code, message }] }`.
pub fn render_markup_json(
    markup: &str,
    config_json: Option<&str>,
) -> Result<serde_json::Value, serde_json::Error> {
    let config = match config_json {
        Some(json) => ParserConfig::from_json(json)?,
        None => ParserConfig::default(),
    };
    let mut options = config.into_options();
    options.markup = markup.to_string();

    let faults: Rc<RefCell<Vec<serde_json::Value>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&faults);
    let options = options.with_on_error(move |fault: &Fault| {
        sink.borrow_mut().push(serde_json::json!({
            "code": fault.code(),
            "message": fault.to_string(),
        }));
    });

    let tree = render(options).to_json();
    let errors = faults.borrow().clone();
    Ok(serde_json::json!({ "tree": tree, "errors": errors }))
}

#[cfg(feature = "napi")]
#[napi]
pub fn render_markup_native(
    markup: String,
    options_json: Option<String>,
) -> napi::Result<serde_json::Value> {
    render_markup_json(&markup, options_json.as_deref())
        .map_err(|e| napi::Error::from_reason(format!("Invalid options: {}", e)))
}
