//! Owned markup/expression AST.
//!
//! The parser's arena tree is lowered into this closed set of variants once
//! per render. Nodes are immutable; arrow functions sit behind `Rc` so that
//! closures created during evaluation can hold on to their body.

use oxc_span::Span;
use oxc_syntax::operator::{BinaryOperator, LogicalOperator, UnaryOperator};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    Identifier(String),
    /// One link of a member chain. `optional` marks `?.` on this link.
    Member {
        object: Box<Expr>,
        property: PropertyKey,
        optional: bool,
    },
    Binary {
        operator: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        operator: LogicalOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        operator: UnaryOperator,
        argument: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        optional: bool,
        /// Raw source of the callee, for diagnostics.
        callee_source: String,
    },
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    Array(Vec<Expr>),
    Object(Vec<ObjectProperty>),
    /// `...argument` inside an array literal or argument list.
    Spread(Box<Expr>),
    /// `quasis.len() == expressions.len() + 1`
    Template {
        quasis: Vec<String>,
        expressions: Vec<Expr>,
    },
    Arrow(Rc<ArrowFunction>),
    /// Markup element or fragment (`name == None`).
    Element(Box<MarkupElement>),
    Text(String),
    /// `{expression}`; `None` for an empty `{}` or a comment.
    ExpressionContainer(Option<Box<Expr>>),
    This,
    /// Syntax outside the supported subset; reported when evaluated.
    Unsupported(String),
}

#[derive(Debug, Clone)]
pub enum PropertyKey {
    Static(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum ObjectProperty {
    Property { key: PropertyKey, value: Expr },
    Spread(Expr),
}

// ═══════════════════════════════════════════════════════════════════════════════
// MARKUP
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct MarkupElement {
    /// Dotted or namespaced tag name; `None` for `<>…</>`.
    pub name: Option<String>,
    pub attributes: Vec<MarkupAttribute>,
    pub children: Vec<Expr>,
    pub span: Span,
}

impl MarkupElement {
    pub fn is_fragment(&self) -> bool {
        self.name.is_none()
    }
}

#[derive(Debug, Clone)]
pub enum MarkupAttribute {
    /// `name`, `name="text"` or `name={expr}`. A missing value means `true`.
    Attribute { name: String, value: Option<Expr> },
    Spread(Expr),
}

// ═══════════════════════════════════════════════════════════════════════════════
// FUNCTIONS & STATEMENTS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ArrowFunction {
    pub params: Vec<Pattern>,
    pub rest: Option<Pattern>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum ArrowBody {
    Expression(Expr),
    Block(Vec<Stmt>),
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Identifier(String),
    Array {
        elements: Vec<Option<Pattern>>,
        rest: Option<Box<Pattern>>,
    },
    Object {
        properties: Vec<(PropertyKey, Pattern)>,
        rest: Option<Box<Pattern>>,
    },
    Default {
        target: Box<Pattern>,
        default: Box<Expr>,
    },
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Declaration(Vec<(Pattern, Option<Expr>)>),
    Return(Option<Expr>),
    Expression(Expr),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    Empty,
    Unsupported(String),
}
