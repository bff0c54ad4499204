//! Fault taxonomy for markup rendering.
//!
//! Nothing in this crate raises past the render boundary. Every condition
//! below is handed to the caller's `on_error` hook and the offending
//! subtree degrades to null/absent.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// FAULT CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const JSX_ERR_SYNTAX: &str = "JSX-ERR-SYNTAX";
pub const JSX_ERR_BLACKLISTED_TAG: &str = "JSX-ERR-BLACKLISTED-TAG";
pub const JSX_ERR_UNRECOGNIZED_COMPONENT: &str = "JSX-ERR-UNRECOGNIZED-COMPONENT";
pub const JSX_ERR_UNRECOGNIZED_ELEMENT: &str = "JSX-ERR-UNRECOGNIZED-ELEMENT";
pub const JSX_ERR_UNRESOLVED_CALLEE: &str = "JSX-ERR-UNRESOLVED-CALLEE";
pub const JSX_ERR_INVOCATION: &str = "JSX-ERR-INVOCATION";
pub const JSX_ERR_MEMBER: &str = "JSX-ERR-MEMBER";
pub const JSX_ERR_NOT_ITERABLE: &str = "JSX-ERR-NOT-ITERABLE";
pub const JSX_ERR_UNSUPPORTED_FUNCTION: &str = "JSX-ERR-UNSUPPORTED-FUNCTION";
pub const JSX_ERR_UNSUPPORTED_SYNTAX: &str = "JSX-ERR-UNSUPPORTED-SYNTAX";

/// A failure raised by host code or a builtin while it was being invoked.
///
/// Native callables return this; call sites turn it into [`Fault::Invocation`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    #[error("TypeError: {0}")]
    Type(String),
    #[error("RangeError: {0}")]
    Range(String),
    #[error("SyntaxError: {0}")]
    Syntax(String),
    #[error("{0}")]
    Thrown(String),
}

impl HostError {
    pub fn thrown(message: impl Into<String>) -> Self {
        HostError::Thrown(message.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Fault {
    /// Markup could not be parsed. Offsets are relative to the wrapped source.
    #[error("{message} ({start}:{end})")]
    Syntax {
        message: String,
        start: u32,
        end: u32,
    },

    #[error("The tag <{tag}> is blacklisted, and will not be rendered.")]
    BlacklistedTag { tag: String },

    #[error("The component <{name}> is unrecognized, and will not be rendered.")]
    UnrecognizedComponent { name: String },

    #[error("The tag <{name}> is unrecognized, and will not be rendered.")]
    UnrecognizedElement { name: String },

    #[error("The expression '{callee}' could not be resolved, resulting in an undefined return value.")]
    UnresolvedCallee { callee: String },

    #[error("Calling '{callee}' failed: {source}")]
    Invocation {
        callee: String,
        #[source]
        source: HostError,
    },

    #[error("Unable to parse {root}{}", format_path(.path))]
    MemberResolution { root: String, path: Vec<String> },

    #[error("The value of '{expression}' is not iterable and cannot be spread.")]
    NotIterable { expression: String },

    #[error("{message}")]
    UnsupportedFunction { message: String },

    #[error("The {kind} syntax is not supported inside markup expressions.")]
    UnsupportedSyntax { kind: String },
}

impl Fault {
    pub fn code(&self) -> &'static str {
        match self {
            Fault::Syntax { .. } => JSX_ERR_SYNTAX,
            Fault::BlacklistedTag { .. } => JSX_ERR_BLACKLISTED_TAG,
            Fault::UnrecognizedComponent { .. } => JSX_ERR_UNRECOGNIZED_COMPONENT,
            Fault::UnrecognizedElement { .. } => JSX_ERR_UNRECOGNIZED_ELEMENT,
            Fault::UnresolvedCallee { .. } => JSX_ERR_UNRESOLVED_CALLEE,
            Fault::Invocation { .. } => JSX_ERR_INVOCATION,
            Fault::MemberResolution { .. } => JSX_ERR_MEMBER,
            Fault::NotIterable { .. } => JSX_ERR_NOT_ITERABLE,
            Fault::UnsupportedFunction { .. } => JSX_ERR_UNSUPPORTED_FUNCTION,
            Fault::UnsupportedSyntax { .. } => JSX_ERR_UNSUPPORTED_SYNTAX,
        }
    }
}

fn format_path(path: &[String]) -> String {
    path.iter().map(|segment| format!("[\"{}\"]", segment)).collect()
}
